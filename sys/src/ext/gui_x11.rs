use crate::plugin::clap_plugin;
use std::ffi::{CStr, c_char, c_ulong};

pub const CLAP_EXT_GUI_X11: &CStr = c"clap/gui-x11";

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_gui_x11 {
    /// Use the protocol XEmbed.
    /// `display_name` may be null to use the default display.
    /// [main-thread]
    pub attach: Option<
        unsafe extern "C" fn(plugin: *const clap_plugin, display_name: *const c_char, window: c_ulong) -> bool,
    >,
}
