//! The core event types.

use crate::events::header::event_size;
use crate::events::{Event, EventFlags, EventHeader};
use crate::utils::Cookie;
use clasp_sys::events::*;
use clasp_sys::id::clap_id;

macro_rules! impl_event {
    ($event:ty, $raw:ty, $type_id:expr) => {
        // SAFETY: the event is repr(C) and starts with the matching raw event.
        unsafe impl Event for $event {
            const TYPE_ID: u16 = $type_id;
        }

        impl $event {
            #[inline]
            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            /// Views a raw event as this type, without copying it.
            #[inline]
            pub const fn from_raw_ref(raw: &$raw) -> &Self {
                // SAFETY: the event is repr(C), with the raw event as its only field.
                unsafe { &*(raw as *const $raw).cast::<Self>() }
            }

            #[inline]
            pub const fn as_raw(&self) -> &$raw {
                &self.0
            }

            #[inline]
            pub const fn time(&self) -> u32 {
                self.0.header.time
            }
        }
    };
}

/// The fields shared by all note events.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NoteTarget {
    pub port_index: i32,
    /// -1 if unspecified.
    pub key: i32,
    /// -1 if unspecified.
    pub channel: i32,
}

fn note(type_id: u16, time: u32, target: NoteTarget, velocity: f64) -> clap_event_note {
    clap_event_note {
        header: *EventHeader::new_core(
            event_size::<clap_event_note>(),
            type_id,
            time,
            EventFlags::empty(),
        )
        .as_raw(),
        port_index: target.port_index,
        key: target.key,
        channel: target.channel,
        velocity,
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NoteOnEvent(clap_event_note);
impl_event!(NoteOnEvent, clap_event_note, CLAP_EVENT_NOTE_ON);

impl NoteOnEvent {
    #[inline]
    pub fn new(time: u32, target: NoteTarget, velocity: f64) -> Self {
        Self(note(CLAP_EVENT_NOTE_ON, time, target, velocity))
    }

    #[inline]
    pub fn key(&self) -> i32 {
        self.0.key
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.0.velocity
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct NoteOffEvent(clap_event_note);
impl_event!(NoteOffEvent, clap_event_note, CLAP_EVENT_NOTE_OFF);

impl NoteOffEvent {
    #[inline]
    pub fn new(time: u32, target: NoteTarget, velocity: f64) -> Self {
        Self(note(CLAP_EVENT_NOTE_OFF, time, target, velocity))
    }

    #[inline]
    pub fn key(&self) -> i32 {
        self.0.key
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct ParamValueEvent(clap_event_param_value);
impl_event!(ParamValueEvent, clap_event_param_value, CLAP_EVENT_PARAM_VALUE);

impl ParamValueEvent {
    /// A global (not per-note) parameter change.
    pub fn new(time: u32, param_id: clap_id, value: f64, cookie: Cookie) -> Self {
        Self(clap_event_param_value {
            header: *EventHeader::new_core(
                event_size::<clap_event_param_value>(),
                CLAP_EVENT_PARAM_VALUE,
                time,
                EventFlags::empty(),
            )
            .as_raw(),
            param_id,
            cookie: cookie.as_raw(),
            port_index: -1,
            key: -1,
            channel: -1,
            value,
        })
    }

    #[inline]
    pub fn param_id(&self) -> clap_id {
        self.0.param_id
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0.value
    }

    #[inline]
    pub fn cookie(&self) -> Cookie {
        Cookie::from_raw(self.0.cookie)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct MidiEvent(clap_event_midi);
impl_event!(MidiEvent, clap_event_midi, CLAP_EVENT_MIDI);

impl MidiEvent {
    pub fn new(time: u32, port_index: u16, data: [u8; 3]) -> Self {
        Self(clap_event_midi {
            header: *EventHeader::new_core(
                event_size::<clap_event_midi>(),
                CLAP_EVENT_MIDI,
                time,
                EventFlags::empty(),
            )
            .as_raw(),
            port_index,
            data,
        })
    }

    #[inline]
    pub fn data(&self) -> [u8; 3] {
        self.0.data
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct TransportEvent(clap_event_transport);
impl_event!(TransportEvent, clap_event_transport, CLAP_EVENT_TRANSPORT);

impl TransportEvent {
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.0.flags & CLAP_TRANSPORT_IS_PLAYING != 0
    }

    /// The tempo in bpm, if the host provides one.
    #[inline]
    pub fn tempo(&self) -> Option<f64> {
        (self.0.flags & CLAP_TRANSPORT_HAS_TEMPO != 0).then_some(self.0.tempo)
    }

    #[inline]
    pub fn time_signature(&self) -> Option<(i16, i16)> {
        (self.0.flags & CLAP_TRANSPORT_HAS_TIME_SIGNATURE != 0)
            .then_some((self.0.tsig_num, self.0.tsig_denom))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_recognized_from_their_header() {
        let event = ParamValueEvent::new(4, 2, 0.5, Cookie::empty());
        let unknown = event.as_unknown();

        assert_eq!(unknown.header().time(), 4);
        assert!(unknown.as_event::<NoteOnEvent>().is_none());
        assert_eq!(unknown.as_event::<ParamValueEvent>().map(|e| e.value()), Some(0.5));
    }
}
