use crate::plugin::clap_plugin;
use std::ffi::{CStr, c_void};

pub const CLAP_EXT_GUI_WIN32: &CStr = c"clap/gui-win32";

pub type clap_hwnd = *mut c_void;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_gui_win32 {
    /// [main-thread]
    pub attach: Option<unsafe extern "C" fn(plugin: *const clap_plugin, window: clap_hwnd) -> bool>,
}
