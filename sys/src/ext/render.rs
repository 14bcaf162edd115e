use crate::plugin::clap_plugin;
use std::ffi::CStr;

pub const CLAP_EXT_RENDER: &CStr = c"clap/render";

pub type clap_plugin_render_mode = i32;

/// Default setting, used for realtime processing.
pub const CLAP_RENDER_REALTIME: clap_plugin_render_mode = 0;

/// Processing is not realtime: the plugin may use more expensive algorithms.
pub const CLAP_RENDER_OFFLINE: clap_plugin_render_mode = 1;

/// The render extension is used to let the plugin know if it has "realtime" pressure to process.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_render {
    /// [main-thread]
    pub set: Option<unsafe extern "C" fn(plugin: *const clap_plugin, mode: clap_plugin_render_mode)>,
}
