use crate::host::clap_host;
use crate::id::clap_id;
use crate::plugin::clap_plugin;
use std::ffi::{CStr, c_char};

pub const CLAP_EXT_FILE_REFERENCE: &CStr = c"clap/draft/file-reference";

pub type clap_hash = u32;

pub const CLAP_HASH_SHA1: clap_hash = 0;
pub const CLAP_HASH_SHA256: clap_hash = 1;
pub const CLAP_HASH_SHA512: clap_hash = 2;
pub const CLAP_HASH_MD5: clap_hash = 3;

/// Describes a file reference held by the plugin.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_file_reference {
    pub resource_id: clap_id,
    /// Capacity of the `path` buffer, including the null terminator.
    pub path_capacity: u32,
    /// Length of the path written to `path`, excluding the null terminator.
    pub path_size: u32,
    pub path: *mut c_char,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_file_reference {
    /// Returns the number of file reference this plugin has.
    /// [main-thread]
    pub count: Option<unsafe extern "C" fn(plugin: *const clap_plugin) -> u32>,

    /// Gets the file reference at index.
    /// [main-thread]
    pub get: Option<unsafe extern "C" fn(plugin: *const clap_plugin, index: u32, file_reference: *mut clap_file_reference) -> bool>,

    /// Gets the hash of the resource's content.
    /// [main-thread]
    pub get_hash: Option<
        unsafe extern "C" fn(
            plugin: *const clap_plugin,
            resource_id: clap_id,
            hash: clap_hash,
            digest: *mut u8,
            digest_size: u32,
        ) -> bool,
    >,

    /// Updates the path to a file reference.
    /// [main-thread]
    pub update_path:
        Option<unsafe extern "C" fn(plugin: *const clap_plugin, resource_id: clap_id, path: *const c_char) -> bool>,

    /// Saves the resources that were modified.
    /// [main-thread]
    pub save_resources: Option<unsafe extern "C" fn(plugin: *const clap_plugin) -> bool>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_file_reference {
    /// Informs the host that the file references have changed.
    /// [main-thread]
    pub changed: Option<unsafe extern "C" fn(host: *const clap_host)>,

    /// Informs the host that file contents have changed, a call to save_resources() is needed.
    /// [main-thread]
    pub set_dirty: Option<unsafe extern "C" fn(host: *const clap_host, resource_id: clap_id)>,
}
