use crate::host::clap_host;
use std::ffi::{CStr, c_char};

pub const CLAP_EXT_LOG: &CStr = c"clap/log";

pub type clap_log_severity = i32;

pub const CLAP_LOG_DEBUG: clap_log_severity = 0;
pub const CLAP_LOG_INFO: clap_log_severity = 1;
pub const CLAP_LOG_WARNING: clap_log_severity = 2;
pub const CLAP_LOG_ERROR: clap_log_severity = 3;
pub const CLAP_LOG_FATAL: clap_log_severity = 4;

/// Used to report the host's misbehaviour regarding the protocol.
pub const CLAP_LOG_HOST_MISBEHAVING: clap_log_severity = 5;

/// Used to report the plugin's own misbehaviour.
pub const CLAP_LOG_PLUGIN_MISBEHAVING: clap_log_severity = 6;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_log {
    /// Log a message through the host.
    /// [thread-safe]
    pub log: Option<
        unsafe extern "C" fn(host: *const clap_host, severity: clap_log_severity, msg: *const c_char),
    >,
}
