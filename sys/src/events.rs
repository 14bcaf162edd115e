use crate::fixedpoint::{clap_beattime, clap_sectime};
use crate::id::clap_id;
use std::ffi::c_void;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_event_header {
    /// Event size including this header.
    pub size: u32,
    /// Time at which the event happens, in frames from the start of the block.
    pub time: u32,
    pub space_id: u16,
    pub r#type: u16,
    pub flags: u32,
}

pub const CLAP_CORE_EVENT_SPACE_ID: u16 = 0;

pub const CLAP_EVENT_IS_LIVE: u32 = 1 << 0;
pub const CLAP_EVENT_DONT_RECORD: u32 = 1 << 1;

pub const CLAP_EVENT_NOTE_ON: u16 = 0;
pub const CLAP_EVENT_NOTE_OFF: u16 = 1;
pub const CLAP_EVENT_NOTE_CHOKE: u16 = 2;
pub const CLAP_EVENT_NOTE_END: u16 = 3;
pub const CLAP_EVENT_PARAM_VALUE: u16 = 5;
pub const CLAP_EVENT_TRANSPORT: u16 = 9;
pub const CLAP_EVENT_MIDI: u16 = 10;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_event_note {
    pub header: clap_event_header,

    pub port_index: i32,
    /// -1 if unspecified, otherwise 0..127.
    pub key: i32,
    pub channel: i32,
    pub velocity: f64,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_event_param_value {
    pub header: clap_event_header,

    pub param_id: clap_id,
    pub cookie: *mut c_void,

    pub port_index: i32,
    pub key: i32,
    pub channel: i32,

    pub value: f64,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_event_midi {
    pub header: clap_event_header,

    pub port_index: u16,
    pub data: [u8; 3],
}

pub type clap_transport_flags = u32;

pub const CLAP_TRANSPORT_HAS_TEMPO: clap_transport_flags = 1 << 0;
pub const CLAP_TRANSPORT_HAS_BEATS_TIMELINE: clap_transport_flags = 1 << 1;
pub const CLAP_TRANSPORT_HAS_SECONDS_TIMELINE: clap_transport_flags = 1 << 2;
pub const CLAP_TRANSPORT_HAS_TIME_SIGNATURE: clap_transport_flags = 1 << 3;
pub const CLAP_TRANSPORT_IS_PLAYING: clap_transport_flags = 1 << 4;
pub const CLAP_TRANSPORT_IS_RECORDING: clap_transport_flags = 1 << 5;
pub const CLAP_TRANSPORT_IS_LOOP_ACTIVE: clap_transport_flags = 1 << 6;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_event_transport {
    pub header: clap_event_header,

    pub flags: clap_transport_flags,

    pub song_pos_beats: clap_beattime,
    pub song_pos_seconds: clap_sectime,

    /// In bpm.
    pub tempo: f64,
    pub tempo_inc: f64,

    pub bar_start: clap_beattime,
    pub bar_number: i32,

    pub loop_start_beats: clap_beattime,
    pub loop_end_beats: clap_beattime,
    pub loop_start_seconds: clap_sectime,
    pub loop_end_seconds: clap_sectime,

    pub tsig_num: i16,
    pub tsig_denom: i16,
}

/// Input event list. The host owns it and only the plugin reads from it.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_input_events {
    pub ctx: *mut c_void,

    pub size: Option<unsafe extern "C" fn(list: *const clap_input_events) -> u32>,

    /// Don't free the returned event, it belongs to the list.
    pub get: Option<
        unsafe extern "C" fn(list: *const clap_input_events, index: u32) -> *const clap_event_header,
    >,
}

/// Output event list. The plugin pushes events in time order.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_output_events {
    pub ctx: *mut c_void,

    /// Pushes a copy of the event. Returns false if the event could not be pushed.
    pub push_back: Option<
        unsafe extern "C" fn(list: *const clap_output_events, event: *const clap_event_header) -> bool,
    >,
}
