//! Input and output event lists.

use crate::events::{Event, UnknownEvent};
use clasp_sys::events::{clap_event_header, clap_input_events, clap_output_events};
use std::error::Error;
use std::ffi::c_void;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

/// An ordered list of events, provided by the host.
#[repr(C)]
pub struct InputEvents<'a> {
    inner: clap_input_events,
    _lifetime: PhantomData<&'a clap_input_events>,
}

impl<'a> InputEvents<'a> {
    /// # Safety
    ///
    /// The list must be valid for `'a`.
    #[inline]
    pub unsafe fn from_raw(raw: &'a clap_input_events) -> &'a Self {
        // SAFETY: InputEvents is repr(C) with a single clap_input_events field
        unsafe { &*(raw as *const clap_input_events).cast() }
    }

    /// Builds an input list reading from the given buffer.
    #[inline]
    pub fn from_buffer(buffer: &'a EventBuffer) -> Self {
        Self {
            inner: clap_input_events {
                ctx: buffer as *const EventBuffer as *mut c_void,
                size: Some(buffer_size),
                get: Some(buffer_get),
            },
            _lifetime: PhantomData,
        }
    }

    /// An input list with no events in it.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            inner: clap_input_events {
                ctx: core::ptr::null_mut(),
                size: None,
                get: None,
            },
            _lifetime: PhantomData,
        }
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_input_events {
        &self.inner
    }

    pub fn len(&self) -> u32 {
        match self.inner.size {
            // SAFETY: the list is valid per from_raw's contract
            Some(size) => unsafe { size(&self.inner) },
            None => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: u32) -> Option<&UnknownEvent> {
        let get = self.inner.get?;
        // SAFETY: the list is valid per from_raw's contract
        let header = unsafe { get(&self.inner, index).as_ref()? };

        // SAFETY: events returned by the list are complete, and live as long as the list
        Some(unsafe { UnknownEvent::from_raw(header) })
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &UnknownEvent> {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// Returned when an event couldn't be pushed to an output list.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TryPushError;

impl Display for TryPushError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Failed to push event to output list")
    }
}

impl Error for TryPushError {}

/// An ordered list events can be pushed to.
#[repr(C)]
pub struct OutputEvents<'a> {
    inner: clap_output_events,
    _lifetime: PhantomData<&'a mut clap_output_events>,
}

impl<'a> OutputEvents<'a> {
    /// # Safety
    ///
    /// The list must be valid for `'a`.
    #[inline]
    pub unsafe fn from_raw(raw: &'a clap_output_events) -> &'a Self {
        // SAFETY: OutputEvents is repr(C) with a single clap_output_events field
        unsafe { &*(raw as *const clap_output_events).cast() }
    }

    /// Builds an output list appending to the given buffer.
    #[inline]
    pub fn from_buffer(buffer: &'a mut EventBuffer) -> Self {
        Self {
            inner: clap_output_events {
                ctx: buffer as *mut EventBuffer as *mut c_void,
                push_back: Some(buffer_push_back),
            },
            _lifetime: PhantomData,
        }
    }

    /// An output list that accepts and discards every event.
    #[inline]
    pub const fn void() -> Self {
        Self {
            inner: clap_output_events {
                ctx: core::ptr::null_mut(),
                push_back: Some(void_push_back),
            },
            _lifetime: PhantomData,
        }
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_output_events {
        &self.inner
    }

    pub fn try_push(&self, event: &UnknownEvent) -> Result<(), TryPushError> {
        let push_back = self.inner.push_back.ok_or(TryPushError)?;

        // SAFETY: the list is valid per from_raw's contract, and the event is complete
        if unsafe { push_back(&self.inner, event.as_raw()) } {
            Ok(())
        } else {
            Err(TryPushError)
        }
    }

    #[inline]
    pub fn try_push_event<E: Event>(&self, event: &E) -> Result<(), TryPushError> {
        self.try_push(event.as_unknown())
    }
}

/// An owned, growable list of events of any type.
#[derive(Clone, Default)]
pub struct EventBuffer {
    // u64 words keep every event 8-byte aligned.
    data: Vec<u64>,
    indexes: Vec<usize>,
}

impl EventBuffer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
        self.indexes.clear();
    }

    /// Copies the given event at the end of the buffer.
    pub fn push(&mut self, event: &UnknownEvent) {
        let bytes = event.as_bytes();
        let index = self.data.len();
        let words = bytes.len().div_ceil(size_of::<u64>());

        self.data.resize(index + words, 0);

        // SAFETY: the destination was just resized to hold at least bytes.len() bytes.
        unsafe {
            core::ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                self.data.as_mut_ptr().add(index).cast::<u8>(),
                bytes.len(),
            )
        }

        self.indexes.push(index);
    }

    #[inline]
    pub fn push_event<E: Event>(&mut self, event: &E) {
        self.push(event.as_unknown())
    }

    pub fn get(&self, index: usize) -> Option<&UnknownEvent> {
        let start = *self.indexes.get(index)?;
        let header = self.data[start..].as_ptr().cast::<clap_event_header>();

        // SAFETY: push() copied a complete, aligned event at this index.
        Some(unsafe { UnknownEvent::from_raw(&*header) })
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &UnknownEvent> {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

unsafe extern "C" fn buffer_size(list: *const clap_input_events) -> u32 {
    // SAFETY: ctx was set from a valid &EventBuffer in InputEvents::from_buffer
    let buffer = unsafe { &*(*list).ctx.cast::<EventBuffer>() };
    u32::try_from(buffer.len()).unwrap_or(u32::MAX)
}

unsafe extern "C" fn buffer_get(
    list: *const clap_input_events,
    index: u32,
) -> *const clap_event_header {
    // SAFETY: ctx was set from a valid &EventBuffer in InputEvents::from_buffer
    let buffer = unsafe { &*(*list).ctx.cast::<EventBuffer>() };

    usize::try_from(index)
        .ok()
        .and_then(|i| buffer.get(i))
        .map(|e| e.as_raw() as *const _)
        .unwrap_or(core::ptr::null())
}

unsafe extern "C" fn buffer_push_back(
    list: *const clap_output_events,
    event: *const clap_event_header,
) -> bool {
    // SAFETY: ctx was set from a valid &mut EventBuffer in OutputEvents::from_buffer
    let buffer = unsafe { &mut *(*list).ctx.cast::<EventBuffer>() };
    // SAFETY: the caller guarantees the event is either null or complete
    let Some(event) = (unsafe { event.as_ref() }) else {
        return false;
    };

    // SAFETY: same as above
    buffer.push(unsafe { UnknownEvent::from_raw(event) });
    true
}

unsafe extern "C" fn void_push_back(
    _list: *const clap_output_events,
    _event: *const clap_event_header,
) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_types::{NoteOnEvent, NoteTarget, ParamValueEvent};
    use crate::utils::Cookie;

    #[test]
    fn buffer_is_readable_through_raw_lists() {
        let mut buffer = EventBuffer::new();
        let target = NoteTarget {
            port_index: 0,
            key: 60,
            channel: 0,
        };
        buffer.push_event(&NoteOnEvent::new(0, target, 1.0));
        buffer.push_event(&ParamValueEvent::new(8, 3, 0.25, Cookie::empty()));

        let input = InputEvents::from_buffer(&buffer);
        assert_eq!(input.len(), 2);

        let param = input.get(1).unwrap().as_event::<ParamValueEvent>().unwrap();
        assert_eq!(param.param_id(), 3);
        assert!(input.get(2).is_none());
    }

    #[test]
    fn output_list_appends_to_buffer() {
        let mut buffer = EventBuffer::new();
        let output = OutputEvents::from_buffer(&mut buffer);
        output
            .try_push_event(&ParamValueEvent::new(0, 1, 0.75, Cookie::empty()))
            .unwrap();

        assert_eq!(buffer.len(), 1);
        let value = buffer.get(0).unwrap().as_event::<ParamValueEvent>();
        assert_eq!(value.map(|e| e.value()), Some(0.75));
    }

    #[test]
    fn placeholder_lists() {
        assert!(InputEvents::empty().is_empty());
        assert!(InputEvents::empty().get(0).is_none());

        let output = OutputEvents::void();
        assert!(
            output
                .try_push_event(&ParamValueEvent::new(0, 1, 0.5, Cookie::empty()))
                .is_ok()
        );
    }
}
