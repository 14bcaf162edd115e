use crate::host::clap_host;
use crate::plugin::clap_plugin;
use std::ffi::CStr;

pub const CLAP_EXT_EVENT_FILTER: &CStr = c"clap/event-filter";

/// This extension lets the host know which event types the plugin is interested in.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_event_filter {
    /// Returns true if the plugin is interested in the given event type.
    /// [main-thread]
    pub accepts: Option<unsafe extern "C" fn(plugin: *const clap_plugin, event_type: u16) -> bool>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_event_filter {
    /// Informs the host that the set of accepted event types changed.
    /// This requires the plugin to be deactivated.
    /// [main-thread]
    pub changed: Option<unsafe extern "C" fn(host: *const clap_host)>,
}
