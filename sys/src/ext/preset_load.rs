use crate::plugin::clap_plugin;
use std::ffi::{CStr, c_char};

pub const CLAP_EXT_PRESET_LOAD: &CStr = c"clap/draft/preset-load";

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_preset_load {
    /// Loads a preset in the plugin native preset file format from a path.
    /// [main-thread]
    pub from_file: Option<unsafe extern "C" fn(plugin: *const clap_plugin, path: *const c_char) -> bool>,
}
