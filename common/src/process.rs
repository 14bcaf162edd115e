//! Types describing a processing call.

use clasp_sys::process::*;

/// Status returned by a plugin after successfully processing a block.
///
/// Errors are reported through `Result`s, and map to `CLAP_PROCESS_ERROR` at the boundary.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProcessStatus {
    /// Processing succeeded, keep processing.
    Continue,
    /// Processing succeeded, the plugin may sleep until the next event.
    Sleep,
}

impl ProcessStatus {
    #[inline]
    pub const fn to_raw(self) -> clap_process_status {
        match self {
            ProcessStatus::Continue => CLAP_PROCESS_CONTINUE,
            ProcessStatus::Sleep => CLAP_PROCESS_SLEEP,
        }
    }

    /// Returns `None` if the status is `CLAP_PROCESS_ERROR` or an unknown value.
    #[inline]
    pub const fn from_raw(raw: clap_process_status) -> Option<Self> {
        match raw {
            CLAP_PROCESS_CONTINUE => Some(ProcessStatus::Continue),
            CLAP_PROCESS_SLEEP => Some(ProcessStatus::Sleep),
            _ => None,
        }
    }
}

/// The sample rate and related settings a plugin is activated with.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AudioConfiguration {
    pub sample_rate: u32,
}
