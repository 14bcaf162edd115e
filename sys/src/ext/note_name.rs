use crate::host::clap_host;
use crate::plugin::clap_plugin;
use crate::string_sizes::CLAP_NAME_SIZE;
use std::ffi::{CStr, c_char};

pub const CLAP_EXT_NOTE_NAME: &CStr = c"clap/note-name";

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_note_name {
    pub name: [c_char; CLAP_NAME_SIZE],
    /// -1 for every port.
    pub port: i32,
    /// -1 for every key.
    pub key: i32,
    /// -1 for every channel.
    pub channel: i32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_note_name {
    /// Return the number of note names.
    /// [main-thread]
    pub count: Option<unsafe extern "C" fn(plugin: *const clap_plugin) -> u32>,

    /// Returns true on success and stores the result into note_name.
    /// [main-thread]
    pub get: Option<unsafe extern "C" fn(plugin: *const clap_plugin, index: u32, note_name: *mut clap_note_name) -> bool>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_note_name {
    /// Informs the host that the note names have changed.
    /// [main-thread]
    pub changed: Option<unsafe extern "C" fn(host: *const clap_host)>,
}
