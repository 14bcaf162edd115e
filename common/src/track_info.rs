use crate::ports::ChannelMap;
use crate::utils::{Color, data_from_array_buf, write_str_to_array_buf};
use clasp_sys::ext::track_info::clap_track_info;
use clasp_sys::id::clap_id;
use std::mem::MaybeUninit;
use std::ptr::addr_of_mut;

/// A snapshot of the information the host gave about the track a plugin instance lives on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TrackInfo {
    pub id: clap_id,
    pub index: i32,
    pub name: String,
    /// Like "/group1/group2/drum-machine/drum-pad-13".
    pub path: String,
    pub channel_count: u32,
    pub channel_map: ChannelMap,
    pub color: Color,
    pub is_return_track: bool,
}

impl TrackInfo {
    /// The channel count assumed when the host doesn't give any track information.
    pub const DEFAULT_CHANNEL_COUNT: u32 = 2;
    /// The channel map assumed when the host doesn't give any track information.
    pub const DEFAULT_CHANNEL_MAP: ChannelMap = ChannelMap::Stereo;

    pub fn from_raw(raw: &clap_track_info) -> Self {
        Self {
            id: raw.id,
            index: raw.index,
            name: String::from_utf8_lossy(data_from_array_buf(&raw.name)).into_owned(),
            path: String::from_utf8_lossy(data_from_array_buf(&raw.path)).into_owned(),
            channel_count: u32::try_from(raw.channel_count).unwrap_or(0),
            channel_map: ChannelMap::from_raw(raw.channel_map),
            color: Color::from_raw(&raw.color),
            is_return_track: raw.is_return_track,
        }
    }

    /// Writes this snapshot into a possibly uninitialized raw buffer.
    pub fn write_to_raw(&self, buf: &mut MaybeUninit<clap_track_info>) {
        use core::ptr::write;

        let buf = buf.as_mut_ptr();

        // SAFETY: buf comes from a mutable reference, so every field pointer is valid for writes.
        unsafe {
            write(addr_of_mut!((*buf).id), self.id);
            write(addr_of_mut!((*buf).index), self.index);
            write_str_to_array_buf(addr_of_mut!((*buf).name), &self.name);
            write_str_to_array_buf(addr_of_mut!((*buf).path), &self.path);
            write(
                addr_of_mut!((*buf).channel_count),
                i32::try_from(self.channel_count).unwrap_or(i32::MAX),
            );
            write(addr_of_mut!((*buf).channel_map), self.channel_map.to_raw());
            write(addr_of_mut!((*buf).color), self.color.to_raw());
            write(addr_of_mut!((*buf).is_return_track), self.is_return_track);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_channel_counts_are_clamped() {
        let track = TrackInfo {
            id: 1,
            index: 3,
            name: "Drums".into(),
            path: "/drums".into(),
            channel_count: 6,
            channel_map: ChannelMap::Surround,
            color: Color::TRANSPARENT,
            is_return_track: false,
        };

        let mut raw = MaybeUninit::zeroed();
        track.write_to_raw(&mut raw);
        // SAFETY: the buffer was zeroed, and all-zeroes is a valid clap_track_info
        let mut raw = unsafe { raw.assume_init() };
        assert_eq!(TrackInfo::from_raw(&raw), track);

        raw.channel_count = -1;
        assert_eq!(TrackInfo::from_raw(&raw).channel_count, 0);
    }
}
