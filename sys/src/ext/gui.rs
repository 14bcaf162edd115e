use crate::host::clap_host;
use crate::plugin::clap_plugin;
use std::ffi::CStr;

pub const CLAP_EXT_GUI: &CStr = c"clap/gui";

/// Size (width, height) is in pixels; the corresponding windowing system extension is in charge
/// of mapping it to the physical size.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_gui {
    /// Create and allocate all resources necessary for the gui.
    /// After this call, the GUI is ready to be shown but it is not yet visible.
    /// [main-thread]
    pub create: Option<unsafe extern "C" fn(plugin: *const clap_plugin) -> bool>,

    /// Free all resources associated with the gui.
    /// [main-thread]
    pub destroy: Option<unsafe extern "C" fn(plugin: *const clap_plugin)>,

    /// Set the absolute GUI scaling factor.
    /// [main-thread]
    pub set_scale: Option<unsafe extern "C" fn(plugin: *const clap_plugin, scale: f64)>,

    /// Get the current size of the plugin UI, with the scaling applied.
    /// [main-thread]
    pub size: Option<unsafe extern "C" fn(plugin: *const clap_plugin, width: *mut u32, height: *mut u32) -> bool>,

    /// [main-thread]
    pub can_resize: Option<unsafe extern "C" fn(plugin: *const clap_plugin) -> bool>,

    /// If the plugin gui is resizable, then the plugin will calculate the closest usable size to
    /// the given arguments. The scaling is applied.
    /// [main-thread]
    pub round_size: Option<unsafe extern "C" fn(plugin: *const clap_plugin, width: *mut u32, height: *mut u32)>,

    /// Sets the window size. Returns true if the size is supported.
    /// [main-thread]
    pub set_size: Option<unsafe extern "C" fn(plugin: *const clap_plugin, width: u32, height: u32) -> bool>,

    /// Show the window.
    /// [main-thread]
    pub show: Option<unsafe extern "C" fn(plugin: *const clap_plugin)>,

    /// Hide the window, this method does not free the resources, it just hides the window content.
    /// [main-thread]
    pub hide: Option<unsafe extern "C" fn(plugin: *const clap_plugin)>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_gui {
    /// Request the host to resize the client area to width, height.
    /// Returns true on success.
    /// [thread-safe]
    pub resize: Option<unsafe extern "C" fn(host: *const clap_host, width: u32, height: u32) -> bool>,
}
