use crate::version::clap_version;
use std::ffi::{c_char, c_void};

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host {
    pub clap_version: clap_version,
    /// Reserved pointer for the host.
    pub host_data: *mut c_void,

    pub name: *const c_char,
    pub vendor: *const c_char,
    pub url: *const c_char,
    pub version: *const c_char,

    /// Query an extension. The returned pointer is owned by the host. It is forbidden to call it
    /// before `clap_plugin.init()`.
    /// [thread-safe]
    pub extension:
        Option<unsafe extern "C" fn(host: *const clap_host, extension_id: *const c_char) -> *const c_void>,

    /// Ask the host to deactivate and then reactivate the plugin.
    /// [thread-safe]
    pub request_restart: Option<unsafe extern "C" fn(host: *const clap_host)>,

    /// Ask the host to activate and start processing the plugin.
    /// [thread-safe]
    pub request_process: Option<unsafe extern "C" fn(host: *const clap_host)>,
}
