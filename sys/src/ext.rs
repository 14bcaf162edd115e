//! Extension tables.
//!
//! Each module defines the extension identifier and the plugin-side and/or host-side tables for
//! one capability. Identifiers under `clap/draft/` are not frozen yet.

pub mod audio_ports;
pub mod event_filter;
pub mod event_loop;
pub mod file_reference;
pub mod gui;
pub mod gui_cocoa;
pub mod gui_win32;
pub mod gui_x11;
pub mod latency;
pub mod log;
pub mod note_name;
pub mod params;
pub mod preset_load;
pub mod render;
pub mod state;
pub mod thread_check;
pub mod thread_pool;
pub mod track_info;
