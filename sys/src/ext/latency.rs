use crate::host::clap_host;
use crate::plugin::clap_plugin;
use std::ffi::CStr;

pub const CLAP_EXT_LATENCY: &CStr = c"clap/latency";

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_latency {
    /// Returns the plugin latency, in samples.
    /// [main-thread]
    pub get: Option<unsafe extern "C" fn(plugin: *const clap_plugin) -> u32>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_latency {
    /// Tell the host that the latency changed.
    /// The latency is only allowed to change while the plugin is deactivated.
    /// [main-thread]
    pub changed: Option<unsafe extern "C" fn(host: *const clap_host)>,
}
