use crate::chmap::clap_chmap;
use crate::color::clap_color;
use crate::host::clap_host;
use crate::id::clap_id;
use crate::plugin::clap_plugin;
use crate::string_sizes::{CLAP_MODULE_SIZE, CLAP_NAME_SIZE};
use std::ffi::{CStr, c_char};

pub const CLAP_EXT_TRACK_INFO: &CStr = c"clap/draft/track-info";

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_track_info {
    pub id: clap_id,
    pub index: i32,
    pub name: [c_char; CLAP_NAME_SIZE],
    /// Like "/group1/group2/drum-machine/drum-pad-13".
    pub path: [c_char; CLAP_MODULE_SIZE],
    pub channel_count: i32,
    pub channel_map: clap_chmap,
    pub color: clap_color,
    pub is_return_track: bool,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_track_info {
    /// [main-thread]
    pub changed: Option<unsafe extern "C" fn(plugin: *const clap_plugin)>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_track_info {
    /// Get info about the track the plugin belongs to.
    /// [main-thread]
    pub get: Option<unsafe extern "C" fn(host: *const clap_host, info: *mut clap_track_info) -> bool>,
}
