use crate::host::clap_host;
use crate::process::{clap_process, clap_process_status};
use crate::version::clap_version;
use std::ffi::{c_char, c_void};

pub type clap_plugin_type = u64;

/// The plugin can process note events and then produce audio.
pub const CLAP_PLUGIN_INSTRUMENT: clap_plugin_type = 1 << 0;
/// The plugin is an audio effect.
pub const CLAP_PLUGIN_AUDIO_EFFECT: clap_plugin_type = 1 << 1;
/// The plugin is an event effect, a "note effect".
pub const CLAP_PLUGIN_EVENT_EFFECT: clap_plugin_type = 1 << 2;
/// Analyze audio and/or events, and produces analysis results, but doesn't change audio.
pub const CLAP_PLUGIN_ANALYZER: clap_plugin_type = 1 << 3;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_descriptor {
    pub clap_version: clap_version,

    pub id: *const c_char,
    pub name: *const c_char,
    pub vendor: *const c_char,
    pub url: *const c_char,
    pub manual_url: *const c_char,
    pub support_url: *const c_char,
    pub version: *const c_char,
    pub description: *const c_char,

    /// Semicolon-separated list of keywords.
    pub keywords: *const c_char,

    /// Bitfield of `CLAP_PLUGIN_*` values.
    pub plugin_type: clap_plugin_type,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin {
    pub desc: *const clap_plugin_descriptor,

    /// Reserved pointer for the plugin.
    pub plugin_data: *mut c_void,

    /// Must be called after creating the plugin.
    /// If init returns false, the host must destroy the plugin instance.
    /// [main-thread]
    pub init: Option<unsafe extern "C" fn(plugin: *const clap_plugin) -> bool>,

    /// Free the plugin and its resources.
    /// It is not required to deactivate the plugin prior to this call.
    /// [main-thread]
    pub destroy: Option<unsafe extern "C" fn(plugin: *const clap_plugin)>,

    /// [main-thread]
    pub activate: Option<unsafe extern "C" fn(plugin: *const clap_plugin, sample_rate: i32) -> bool>,
    /// [main-thread]
    pub deactivate: Option<unsafe extern "C" fn(plugin: *const clap_plugin)>,

    /// Set to active state before processing.
    /// [audio-thread]
    pub start_processing: Option<unsafe extern "C" fn(plugin: *const clap_plugin) -> bool>,

    /// Set to inactive state after processing.
    /// [audio-thread]
    pub stop_processing: Option<unsafe extern "C" fn(plugin: *const clap_plugin)>,

    /// [audio-thread]
    pub process: Option<
        unsafe extern "C" fn(plugin: *const clap_plugin, process: *const clap_process) -> clap_process_status,
    >,

    /// Query an extension. The returned pointer is owned by the plugin.
    /// [thread-safe]
    pub extension:
        Option<unsafe extern "C" fn(plugin: *const clap_plugin, id: *const c_char) -> *const c_void>,
}
