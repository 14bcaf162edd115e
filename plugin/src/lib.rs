//! Safe wrappers to implement audio plugins over the CLAP draft plugin protocol.
//!
//! A plugin is a type implementing the [`Plugin`](plugin::Plugin) trait, which lives on the host's
//! main thread, and which produces a [`PluginAudioProcessor`](plugin::PluginAudioProcessor) upon
//! activation. The [`PluginWrapper`](plugin::wrapper::PluginWrapper) binds both to the raw
//! `clap_plugin` function table, enforcing the protocol's lifecycle and threading rules before any
//! of the plugin's methods are called.
//!
//! Plugin types are exposed to the host through an [`PluginEntry`](entry::PluginEntry), exported
//! with the [`clasp_export_entry`] macro.

#[macro_use]
pub mod entry;
pub mod extensions;
pub mod factory;
pub mod host;
pub mod plugin;
pub mod process;

pub use clasp_common::events;
pub use clasp_common::ports;
pub use clasp_common::stream;
pub use clasp_common::track_info;
pub use clasp_common::utils;

/// A helpful prelude re-exporting all the types related to plugin implementation.
pub mod prelude {
    pub use crate::clasp_export_entry;
    pub use crate::entry::{PluginEntry, SinglePluginEntry};
    pub use crate::events::{
        UnknownEvent,
        io::{InputEvents, OutputEvents},
    };
    pub use crate::extensions::PluginExtensions;
    pub use crate::factory::PluginFactoryEntry;
    pub use crate::host::{HostHandle, HostInfo, HostMainThreadHandle, InitializingHostHandle};
    pub use crate::plugin::{
        Plugin, PluginAudioProcessor, PluginDescriptor, PluginError, PluginType,
    };
    pub use crate::ports::{AudioPortInfo, ChannelMap};
    pub use crate::process::{
        AudioConfiguration, Events, Process, ProcessStatus, TaskExecution,
        audio::{Audio, ChannelPair},
    };
    pub use clasp_common::log::LogSeverity;
}

#[cfg(test)]
mod tests {
    use static_assertions::assert_impl_all;

    assert_impl_all!(crate::host::HostHandle: Send, Sync, Copy);
    assert_impl_all!(crate::extensions::thread_pool::HostThreadPool: Send, Sync, Copy);
    assert_impl_all!(crate::extensions::log::HostLog: Send, Sync, Copy);
}
