use crate::host::clap_host;
use crate::plugin::clap_plugin;
use crate::stream::{clap_istream, clap_ostream};
use std::ffi::CStr;

pub const CLAP_EXT_STATE: &CStr = c"clap/state";

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_state {
    /// Saves the plugin state into stream.
    /// [main-thread]
    pub save: Option<unsafe extern "C" fn(plugin: *const clap_plugin, stream: *const clap_ostream) -> bool>,
    /// Loads the plugin state from stream.
    /// [main-thread]
    pub load: Option<unsafe extern "C" fn(plugin: *const clap_plugin, stream: *const clap_istream) -> bool>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_state {
    /// Tell the host that the plugin state has changed and should be saved again.
    /// [main-thread]
    pub mark_dirty: Option<unsafe extern "C" fn(host: *const clap_host)>,
}
