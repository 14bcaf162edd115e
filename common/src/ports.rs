//! Audio port descriptions and their comparison rules.

use crate::utils::{data_from_array_buf, write_str_to_array_buf};
use bitflags::bitflags;
use clasp_sys::chmap::*;
use clasp_sys::ext::audio_ports::clap_audio_port_info;
use clasp_sys::id::clap_id;
use std::mem::MaybeUninit;
use std::ptr::addr_of_mut;

/// The layout of the channels within an audio port.
#[repr(i32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum ChannelMap {
    #[default]
    Unspecified = CLAP_CHMAP_UNSPECIFIED,
    Mono = CLAP_CHMAP_MONO,
    Stereo = CLAP_CHMAP_STEREO,
    Surround = CLAP_CHMAP_SURROUND,
}

impl ChannelMap {
    pub fn from_raw(raw: clap_chmap) -> Self {
        use ChannelMap::*;

        match raw {
            CLAP_CHMAP_MONO => Mono,
            CLAP_CHMAP_STEREO => Stereo,
            CLAP_CHMAP_SURROUND => Surround,
            _ => Unspecified,
        }
    }

    #[inline]
    pub fn to_raw(&self) -> clap_chmap {
        *self as clap_chmap
    }
}

/// Whether a port is an input or an output.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

impl PortDirection {
    #[inline]
    pub fn from_is_input(is_input: bool) -> Self {
        if is_input {
            PortDirection::Input
        } else {
            PortDirection::Output
        }
    }

    #[inline]
    pub fn is_input(&self) -> bool {
        matches!(self, PortDirection::Input)
    }
}

bitflags! {
    /// The fields in which two [`AudioPortInfo`]s differ.
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct AudioPortDifferences: u32 {
        const ID = 1 << 0;
        const NAME = 1 << 1;
        const CHANNEL_COUNT = 1 << 2;
        const CHANNEL_MAP = 1 << 3;
        const SAMPLE_SIZE = 1 << 4;
        const IS_MAIN = 1 << 5;
        const IS_CV = 1 << 6;
        const IN_PLACE = 1 << 7;

        /// The differences that make a port definition incompatible with a previous one.
        const STRUCTURAL = Self::ID.bits() | Self::CHANNEL_COUNT.bits() | Self::CHANNEL_MAP.bits();
    }
}

/// The full description of an audio port.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AudioPortInfo {
    /// Stable identifier, used to match ports across redefinitions.
    pub id: clap_id,
    pub name: String,
    pub channel_count: u32,
    pub channel_map: ChannelMap,
    /// 32 for `f32` buffers, 64 for `f64` buffers.
    pub sample_size: u32,
    pub is_main: bool,
    pub is_cv: bool,
    pub in_place: bool,
}

impl AudioPortInfo {
    /// A main 32-bit port with the given id, name and channel count.
    ///
    /// The channel map is derived from the channel count.
    pub fn main(id: clap_id, name: &str, channel_count: u32) -> Self {
        Self {
            id,
            name: name.to_owned(),
            channel_count,
            channel_map: match channel_count {
                1 => ChannelMap::Mono,
                2 => ChannelMap::Stereo,
                _ => ChannelMap::Unspecified,
            },
            sample_size: 32,
            is_main: true,
            is_cv: false,
            in_place: false,
        }
    }

    #[inline]
    pub fn with_channel_map(mut self, channel_map: ChannelMap) -> Self {
        self.channel_map = channel_map;
        self
    }

    #[inline]
    pub fn with_in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }

    /// Returns every field in which `self` and `other` differ.
    pub fn compare(&self, other: &AudioPortInfo) -> AudioPortDifferences {
        let mut differences = AudioPortDifferences::empty();

        differences.set(AudioPortDifferences::ID, self.id != other.id);
        differences.set(AudioPortDifferences::NAME, self.name != other.name);
        differences.set(
            AudioPortDifferences::CHANNEL_COUNT,
            self.channel_count != other.channel_count,
        );
        differences.set(
            AudioPortDifferences::CHANNEL_MAP,
            self.channel_map != other.channel_map,
        );
        differences.set(
            AudioPortDifferences::SAMPLE_SIZE,
            self.sample_size != other.sample_size,
        );
        differences.set(AudioPortDifferences::IS_MAIN, self.is_main != other.is_main);
        differences.set(AudioPortDifferences::IS_CV, self.is_cv != other.is_cv);
        differences.set(AudioPortDifferences::IN_PLACE, self.in_place != other.in_place);

        differences
    }

    /// Reads a port description from its raw C representation.
    pub fn from_raw(raw: &clap_audio_port_info) -> Self {
        Self {
            id: raw.id,
            name: String::from_utf8_lossy(data_from_array_buf(&raw.name)).into_owned(),
            channel_count: raw.channel_count,
            channel_map: ChannelMap::from_raw(raw.channel_map),
            sample_size: raw.sample_size,
            is_main: raw.is_main,
            is_cv: raw.is_cv,
            in_place: raw.in_place,
        }
    }

    /// Writes this port description into a possibly uninitialized raw buffer.
    ///
    /// The name is truncated if it doesn't fit.
    pub fn write_to_raw(&self, buf: &mut MaybeUninit<clap_audio_port_info>) {
        use core::ptr::write;

        let buf = buf.as_mut_ptr();

        // SAFETY: buf comes from a mutable reference, so every field pointer is valid for writes.
        unsafe {
            write(addr_of_mut!((*buf).id), self.id);
            write_str_to_array_buf(addr_of_mut!((*buf).name), &self.name);
            write(addr_of_mut!((*buf).channel_count), self.channel_count);
            write(addr_of_mut!((*buf).channel_map), self.channel_map.to_raw());
            write(addr_of_mut!((*buf).sample_size), self.sample_size);
            write(addr_of_mut!((*buf).is_main), self.is_main);
            write(addr_of_mut!((*buf).is_cv), self.is_cv);
            write(addr_of_mut!((*buf).in_place), self.in_place);
        }
    }
}

/// Returns `true` if both port lists are structurally identical: same length, and each port
/// has the same id, channel count and channel map as the one at the same position.
///
/// Names and flags are not compared.
pub fn audio_ports_structurally_equal(a: &[AudioPortInfo], b: &[AudioPortInfo]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(a, b)| !a.compare(b).intersects(AudioPortDifferences::STRUCTURAL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_map_falls_back_to_unspecified() {
        assert_eq!(ChannelMap::from_raw(CLAP_CHMAP_STEREO), ChannelMap::Stereo);
        assert_eq!(ChannelMap::from_raw(42), ChannelMap::Unspecified);
        assert_eq!(ChannelMap::Surround.to_raw(), CLAP_CHMAP_SURROUND);
    }

    #[test]
    fn compare_reports_every_changed_field() {
        let a = AudioPortInfo::main(0, "main", 2);
        let mut b = a.clone();
        b.name = "other".into();
        b.channel_count = 1;

        let diff = a.compare(&b);
        assert_eq!(
            diff,
            AudioPortDifferences::NAME | AudioPortDifferences::CHANNEL_COUNT
        );
        assert!(a.compare(&a).is_empty());
    }

    #[test]
    fn raw_round_trip_keeps_all_fields() {
        let port = AudioPortInfo::main(7, "sidechain", 1).with_in_place(true);

        let mut raw = MaybeUninit::zeroed();
        port.write_to_raw(&mut raw);
        // SAFETY: the buffer was zeroed, and all-zeroes is a valid clap_audio_port_info
        let raw = unsafe { raw.assume_init() };

        assert_eq!(AudioPortInfo::from_raw(&raw), port);
    }

    #[test]
    fn long_names_are_cut_between_characters() {
        use clasp_sys::string_sizes::CLAP_NAME_SIZE;

        let port = AudioPortInfo::main(0, &"é".repeat(CLAP_NAME_SIZE), 2);

        let mut raw = MaybeUninit::zeroed();
        port.write_to_raw(&mut raw);
        // SAFETY: the buffer was zeroed, and all-zeroes is a valid clap_audio_port_info
        let raw = unsafe { raw.assume_init() };

        let name = AudioPortInfo::from_raw(&raw).name;
        assert_eq!(name, "é".repeat((CLAP_NAME_SIZE - 1) / 2));
    }
}
