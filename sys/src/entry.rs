use crate::host::clap_host;
use crate::plugin::{clap_plugin, clap_plugin_descriptor};
use crate::version::clap_version;
use std::ffi::{CStr, c_char};

/// Name of the symbol every plugin module must export.
pub const CLAP_PLUGIN_ENTRY_SYMBOL: &CStr = c"clap_plugin_entry";

/// This interface is the entry point of the dynamic library.
///
/// Every method must be thread-safe.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_entry {
    pub clap_version: clap_version,

    /// Must be called first, with the path of the loaded module.
    pub init: Option<unsafe extern "C" fn(plugin_path: *const c_char) -> bool>,

    /// No more calls into the module must be made after deinit().
    pub deinit: Option<unsafe extern "C" fn()>,

    /// Get the number of plugins available.
    pub get_plugin_count: Option<unsafe extern "C" fn() -> u32>,

    /// Retrieves a plugin descriptor by its index.
    /// Returns null in case of error.
    /// The descriptor does not need to be freed.
    pub get_plugin_descriptor: Option<unsafe extern "C" fn(index: u32) -> *const clap_plugin_descriptor>,

    /// Create a clap_plugin by its plugin_id.
    /// The returned pointer must be freed by calling plugin->destroy(plugin).
    /// Returns null in case of error.
    pub create_plugin:
        Option<unsafe extern "C" fn(host: *const clap_host, plugin_id: *const c_char) -> *const clap_plugin>,
}
