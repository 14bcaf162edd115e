use crate::events::{clap_event_transport, clap_input_events, clap_output_events};

pub type clap_process_status = i32;

/// Processing failed. The output buffer must be discarded.
pub const CLAP_PROCESS_ERROR: clap_process_status = 0;
/// Processing succeeded, keep processing.
pub const CLAP_PROCESS_CONTINUE: clap_process_status = 1;
/// Processing succeeded, the plugin may be put to sleep until the next event.
pub const CLAP_PROCESS_SLEEP: clap_process_status = 2;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_audio_buffer {
    /// Either data32 or data64 must be set, never both.
    pub data32: *mut *mut f32,
    pub data64: *mut *mut f64,
    pub channel_count: u32,
    /// Latency from the host to the plugin, in samples.
    pub latency: u32,
    /// Bit N is set if channel N holds a constant value.
    pub constant_mask: u64,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_process {
    /// A steady sample time counter, or -1 if not available.
    pub steady_time: i64,

    /// Number of frames to process.
    pub frames_count: u32,

    /// Time info at sample 0. May be null if the plugin is not playing along a timeline.
    pub transport: *const clap_event_transport,

    pub audio_inputs: *const clap_audio_buffer,
    pub audio_outputs: *mut clap_audio_buffer,
    pub audio_inputs_count: u32,
    pub audio_outputs_count: u32,

    /// Input events, sorted by time.
    pub in_events: *const clap_input_events,
    /// Output events, to be pushed in time order.
    pub out_events: *const clap_output_events,
}
