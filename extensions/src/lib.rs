//! Opt-in extensions of the CLAP draft plugin protocol.
//!
//! Every extension lives behind its own cargo feature (`all-extensions` enables them all), and
//! follows the same layout:
//!
//! * a `Plugin*` type for the table the plugin implements, registered through
//!   [`PluginExtensions::register`](clasp_plugin::extensions::PluginExtensions::register) once the
//!   plugin type implements the matching `Plugin*Impl` trait;
//! * a `Host*` type for the table the host implements, which plugins query through
//!   [`InitializingHostHandle::get_extension`](clasp_plugin::host::InitializingHostHandle::get_extension).
//!
//! The `Plugin*` types also expose `unsafe` methods calling into the plugin's table, for use by
//! hosts and test harnesses.

#[cfg(feature = "event-filter")]
pub mod event_filter;
#[cfg(feature = "event-loop")]
pub mod event_loop;
#[cfg(feature = "file-reference")]
pub mod file_reference;
#[cfg(feature = "gui")]
pub mod gui;
#[cfg(feature = "latency")]
pub mod latency;
#[cfg(feature = "note-name")]
pub mod note_name;
#[cfg(feature = "params")]
pub mod params;
#[cfg(feature = "preset-load")]
pub mod preset_load;
#[cfg(feature = "render")]
pub mod render;
#[cfg(feature = "state")]
pub mod state;

#[cfg(all(test, feature = "all-extensions"))]
mod tests {
    use static_assertions::assert_impl_all;

    assert_impl_all!(crate::gui::PluginGui: Send, Sync, Copy);
    assert_impl_all!(crate::gui::HostGui: Send, Sync, Copy);
    assert_impl_all!(crate::params::PluginParams: Send, Sync, Copy);
    assert_impl_all!(crate::params::HostParams: Send, Sync, Copy);
    assert_impl_all!(crate::state::HostState: Send, Sync, Copy);
    assert_impl_all!(crate::event_loop::HostEventLoop: Send, Sync, Copy);
}
