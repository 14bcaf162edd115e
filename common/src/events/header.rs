use bitflags::bitflags;
use clasp_sys::events::*;
use std::fmt::{Debug, Formatter};

bitflags! {
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct EventFlags: u32 {
        /// The event comes from live user input.
        const IS_LIVE = CLAP_EVENT_IS_LIVE;
        /// The event should not be recorded.
        const DONT_RECORD = CLAP_EVENT_DONT_RECORD;
    }
}

/// The common header all events start with.
#[repr(transparent)]
#[derive(Copy, Clone)]
pub struct EventHeader(clap_event_header);

impl EventHeader {
    /// A core-space header for an event of type `type_id` and `size` bytes.
    #[inline]
    pub const fn new_core(size: u32, type_id: u16, time: u32, flags: EventFlags) -> Self {
        Self(clap_event_header {
            size,
            time,
            space_id: CLAP_CORE_EVENT_SPACE_ID,
            r#type: type_id,
            flags: flags.bits(),
        })
    }

    #[inline]
    pub const fn from_raw(header: &clap_event_header) -> &Self {
        // SAFETY: EventHeader is repr(transparent)
        unsafe { &*(header as *const clap_event_header).cast() }
    }

    #[inline]
    pub const fn as_raw(&self) -> &clap_event_header {
        &self.0
    }

    #[inline]
    pub const fn size(&self) -> u32 {
        self.0.size
    }

    #[inline]
    pub const fn time(&self) -> u32 {
        self.0.time
    }

    #[inline]
    pub const fn space_id(&self) -> u16 {
        self.0.space_id
    }

    #[inline]
    pub const fn type_id(&self) -> u16 {
        self.0.r#type
    }

    #[inline]
    pub const fn flags(&self) -> EventFlags {
        EventFlags::from_bits_truncate(self.0.flags)
    }
}

impl Debug for EventHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHeader")
            .field("size", &self.0.size)
            .field("time", &self.0.time)
            .field("space_id", &self.0.space_id)
            .field("type", &self.0.r#type)
            .field("flags", &self.flags())
            .finish()
    }
}

#[allow(clippy::cast_possible_truncation)] // Events are at most a few hundred bytes long.
#[inline]
pub(crate) const fn event_size<E>() -> u32 {
    size_of::<E>() as u32
}
