extern crate static_assertions as sa;

use clasp_sys::chmap::clap_chmap;
use clasp_sys::ext::audio_ports::*;
use clasp_sys::ext::thread_pool::*;
use clasp_sys::ext::track_info::*;
use clasp_sys::plugin::*;
use clasp_sys::process::*;
use clasp_sys::version::clap_version;
use std::ffi::c_void;
use std::mem::{align_of, offset_of, size_of};

// Function tables are made of nullable pointers only.
sa::assert_eq_size!(clap_plugin_thread_pool, *const c_void);
sa::assert_eq_size!(clap_host_thread_pool, *const c_void);
sa::assert_eq_size!(clap_plugin_audio_ports, [*const c_void; 2]);
sa::assert_eq_size!(clap_host_audio_ports, *const c_void);
sa::assert_eq_size!(clap_plugin, [*const c_void; 10]);

sa::assert_eq_size!(clap_version, [u32; 3]);
sa::assert_eq_size!(clap_chmap, i32);

sa::assert_impl_all!(clap_plugin_audio_ports: Copy, Send, Sync);

#[test]
fn plugin_table_order_is_frozen() {
    let ptr = size_of::<*const c_void>();

    assert_eq!(offset_of!(clap_plugin, desc), 0);
    assert_eq!(offset_of!(clap_plugin, plugin_data), ptr);
    assert_eq!(offset_of!(clap_plugin, init), 2 * ptr);
    assert_eq!(offset_of!(clap_plugin, destroy), 3 * ptr);
    assert_eq!(offset_of!(clap_plugin, activate), 4 * ptr);
    assert_eq!(offset_of!(clap_plugin, deactivate), 5 * ptr);
    assert_eq!(offset_of!(clap_plugin, start_processing), 6 * ptr);
    assert_eq!(offset_of!(clap_plugin, stop_processing), 7 * ptr);
    assert_eq!(offset_of!(clap_plugin, process), 8 * ptr);
    assert_eq!(offset_of!(clap_plugin, extension), 9 * ptr);
}

#[test]
fn audio_port_info_layout() {
    assert_eq!(offset_of!(clap_audio_port_info, id), 0);
    assert_eq!(offset_of!(clap_audio_port_info, name), 4);
    assert_eq!(offset_of!(clap_audio_port_info, channel_count), 4 + 256);
    assert_eq!(offset_of!(clap_audio_port_info, channel_map), 8 + 256);
    assert_eq!(offset_of!(clap_audio_port_info, sample_size), 12 + 256);
    assert_eq!(offset_of!(clap_audio_port_info, is_main), 16 + 256);
    assert_eq!(align_of::<clap_audio_port_info>(), 4);
}

#[test]
fn track_info_layout() {
    assert_eq!(offset_of!(clap_track_info, name), 8);
    assert_eq!(offset_of!(clap_track_info, path), 8 + 256);
    assert_eq!(offset_of!(clap_track_info, channel_count), 8 + 256 + 1024);
    assert_eq!(offset_of!(clap_track_info, color), 16 + 256 + 1024);
    assert_eq!(offset_of!(clap_track_info, is_return_track), 20 + 256 + 1024);
}

#[test]
fn audio_buffer_layout() {
    let ptr = size_of::<*const c_void>();

    assert_eq!(offset_of!(clap_audio_buffer, channel_count), 2 * ptr);
    assert_eq!(offset_of!(clap_audio_buffer, constant_mask), 2 * ptr + 8);
    assert_eq!(size_of::<clap_audio_buffer>(), 2 * ptr + 16);
}
