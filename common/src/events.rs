//! Audio-processing events and related utilities.
//!
//! All events are sample-accurate, time-stamped events, starting with a common
//! [`EventHeader`]. They are provided to the plugin's audio processor alongside the audio buffers
//! through [`InputEvents`](io::InputEvents) lists, and sent back to the host through
//! [`OutputEvents`](io::OutputEvents) lists.

use clasp_sys::events::{CLAP_CORE_EVENT_SPACE_ID, clap_event_header};
use std::fmt::{Debug, Formatter};

pub mod event_types;
pub mod io;

mod header;
pub use header::*;

/// A specific event type.
///
/// # Safety
///
/// Implementers must be `#[repr(C)]` structs starting with a `clap_event_header`, and
/// [`TYPE_ID`](Event::TYPE_ID) must match the core event type of that layout.
pub unsafe trait Event: Sized + 'static {
    const TYPE_ID: u16;

    #[inline]
    fn header(&self) -> &EventHeader {
        // SAFETY: implementers start with a clap_event_header, per this trait's contract.
        unsafe { EventHeader::from_raw(&*(self as *const Self).cast::<clap_event_header>()) }
    }

    #[inline]
    fn as_unknown(&self) -> &UnknownEvent {
        // SAFETY: the whole event is reachable from the header, per this trait's contract.
        unsafe { UnknownEvent::from_raw(&*(self as *const Self).cast::<clap_event_header>()) }
    }
}

/// An event of any type, known only through its header.
#[repr(transparent)]
pub struct UnknownEvent(clap_event_header);

impl UnknownEvent {
    /// # Safety
    ///
    /// The header must be followed by the rest of the event data, for the `size` it declares.
    #[inline]
    pub unsafe fn from_raw(header: &clap_event_header) -> &Self {
        // SAFETY: UnknownEvent is repr(transparent)
        unsafe { &*(header as *const clap_event_header).cast() }
    }

    #[inline]
    pub fn header(&self) -> &EventHeader {
        // SAFETY: EventHeader is repr(transparent) over the same header type.
        unsafe { EventHeader::from_raw(&self.0) }
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_event_header {
        &self.0
    }

    /// Returns this event's raw bytes, as declared by its header size.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        let size = usize::try_from(self.0.size).unwrap_or(0);

        // SAFETY: from_raw's contract guarantees `size` readable bytes behind the header.
        unsafe { core::slice::from_raw_parts((self as *const Self).cast::<u8>(), size) }
    }

    /// Interprets this event as a specific core event type, if it matches.
    #[inline]
    pub fn as_event<E: Event>(&self) -> Option<&E> {
        let size = usize::try_from(self.0.size).ok()?;

        if self.0.space_id != CLAP_CORE_EVENT_SPACE_ID
            || self.0.r#type != E::TYPE_ID
            || size < size_of::<E>()
        {
            return None;
        }

        // Event lists keep events suitably aligned.
        #[allow(clippy::cast_ptr_alignment)]
        let event = (self as *const Self).cast::<E>();

        // SAFETY: type and size were checked above.
        Some(unsafe { &*event })
    }
}

impl Debug for UnknownEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnknownEvent")
            .field("header", self.header())
            .finish()
    }
}
