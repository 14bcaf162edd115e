use crate::plugin::clap_plugin;
use std::ffi::{CStr, c_void};

pub const CLAP_EXT_GUI_COCOA: &CStr = c"clap/gui-cocoa";

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_gui_cocoa {
    /// [main-thread]
    pub attach: Option<unsafe extern "C" fn(plugin: *const clap_plugin, ns_view: *mut c_void) -> bool>,
}
