use crate::chmap::clap_chmap;
use crate::host::clap_host;
use crate::id::clap_id;
use crate::plugin::clap_plugin;
use crate::string_sizes::CLAP_NAME_SIZE;
use std::ffi::{CStr, c_char};

pub const CLAP_EXT_AUDIO_PORTS: &CStr = c"clap/audio-ports";

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_audio_port_info {
    /// Stable identifier.
    pub id: clap_id,
    /// Displayable name.
    pub name: [c_char; CLAP_NAME_SIZE],

    pub channel_count: u32,
    pub channel_map: clap_chmap,
    /// 32 for float and 64 for double.
    pub sample_size: u32,

    /// There can only be one main input and one main output.
    pub is_main: bool,
    /// Control voltage port.
    pub is_cv: bool,
    /// If true, the input and output ports with the same index can share the same buffer.
    pub in_place: bool,
}

/// The audio ports scan has to be done while the plugin is deactivated.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_audio_ports {
    /// Number of ports, for either input or output.
    /// [main-thread]
    pub count: Option<unsafe extern "C" fn(plugin: *const clap_plugin, is_input: bool) -> u32>,

    /// Get info about an audio port.
    /// [main-thread]
    pub info: Option<
        unsafe extern "C" fn(
            plugin: *const clap_plugin,
            index: u32,
            is_input: bool,
            info: *mut clap_audio_port_info,
        ) -> bool,
    >,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_audio_ports {
    /// Tell the host that the plugin's ports have changed.
    /// The host shall deactivate the plugin and then scan the ports again.
    /// [main-thread]
    pub invalidate_all: Option<unsafe extern "C" fn(host: *const clap_host)>,
}
