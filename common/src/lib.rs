//! Side-agnostic types of the CLAP draft plugin protocol.
//!
//! Everything in this crate can be used by plugins and hosts alike: it only wraps the raw
//! [`clasp_sys`] structures into safer types, without any knowledge of which side of the
//! boundary it runs on.

pub mod events;
pub mod extensions;
pub mod log;
pub mod plugin;
pub mod ports;
pub mod process;
pub mod stream;
pub mod track_info;
pub mod utils;
pub mod version;

#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    assert_impl_all!(crate::plugin::PluginDescriptor: Send, Sync);
    assert_impl_all!(crate::ports::AudioPortInfo: Send, Sync, Clone);
    assert_impl_all!(crate::track_info::TrackInfo: Send, Sync, Clone);
}
