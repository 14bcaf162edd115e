use crate::host::clap_host;
use crate::id::clap_id;
use crate::plugin::clap_plugin;
use std::ffi::CStr;

pub const CLAP_EXT_EVENT_LOOP: &CStr = c"clap/event-loop";

#[cfg(windows)]
pub type clap_fd = *mut std::ffi::c_void;
#[cfg(not(windows))]
pub type clap_fd = i32;

pub type clap_fd_flags = u32;

/// IO events flags.
pub const CLAP_FD_READ: clap_fd_flags = 1 << 0;
pub const CLAP_FD_WRITE: clap_fd_flags = 1 << 1;
pub const CLAP_FD_ERROR: clap_fd_flags = 1 << 2;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_event_loop {
    /// [main-thread]
    pub on_timer: Option<unsafe extern "C" fn(plugin: *const clap_plugin, timer_id: clap_id)>,

    /// [main-thread]
    pub on_fd: Option<unsafe extern "C" fn(plugin: *const clap_plugin, fd: clap_fd, flags: clap_fd_flags)>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_event_loop {
    /// [main-thread]
    pub register_timer:
        Option<unsafe extern "C" fn(host: *const clap_host, period_ms: u32, timer_id: *mut clap_id) -> bool>,

    /// [main-thread]
    pub unregister_timer: Option<unsafe extern "C" fn(host: *const clap_host, timer_id: clap_id) -> bool>,

    /// [main-thread]
    pub register_fd: Option<unsafe extern "C" fn(host: *const clap_host, fd: clap_fd, flags: clap_fd_flags) -> bool>,

    /// [main-thread]
    pub modify_fd: Option<unsafe extern "C" fn(host: *const clap_host, fd: clap_fd, flags: clap_fd_flags) -> bool>,

    /// [main-thread]
    pub unregister_fd: Option<unsafe extern "C" fn(host: *const clap_host, fd: clap_fd) -> bool>,
}
