//! Traits and associated utilities to handle and implement extensions.
//!
//! The core extensions every plugin relies on (log, thread check, thread pool, audio ports and
//! track info) are defined in this module. Other extensions live in the `clasp_extensions` crate,
//! and are implemented the same way.
//!
//! # Example
//!
//! This example shows a basic implementation for the plugin side of the latency extension.
//!
//! ```
//! use clasp_plugin::extensions::prelude::*;
//! use clasp_sys::ext::latency::{CLAP_EXT_LATENCY, clap_plugin_latency};
//! use std::ffi::CStr;
//!
//! // The type hosts use to refer to this extension.
//! #[derive(Copy, Clone)]
//! pub struct PluginLatency(RawExtension<PluginExtensionSide, clap_plugin_latency>);
//!
//! // SAFETY: the identifier matches the table type.
//! unsafe impl Extension for PluginLatency {
//!     const IDENTIFIER: &'static CStr = CLAP_EXT_LATENCY;
//!     type ExtensionSide = PluginExtensionSide;
//!
//!     unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
//!         Self(unsafe { raw.cast() })
//!     }
//! }
//!
//! // The trait plugins implement.
//! pub trait PluginLatencyImpl {
//!     fn latency(&self) -> u32;
//! }
//!
//! // The table exposed to the host, one per plugin type.
//! impl<P: Plugin + PluginLatencyImpl> ExtensionImplementation<P> for PluginLatency {
//!     const IMPLEMENTATION: RawExtensionImplementation =
//!         RawExtensionImplementation::new(&clap_plugin_latency { get: Some(get::<P>) });
//! }
//!
//! unsafe extern "C" fn get<P: Plugin + PluginLatencyImpl>(plugin: *const clap_plugin) -> u32 {
//!     // SAFETY: the host gives a valid plugin pointer.
//!     unsafe {
//!         PluginWrapper::<P>::handle_main_thread(plugin, "latency.get", |plugin, _host| {
//!             Ok(plugin.latency())
//!         })
//!     }
//!     .unwrap_or(0)
//! }
//! ```

use crate::plugin::Plugin;
use std::ffi::CStr;
use std::marker::PhantomData;

pub mod audio_ports;
pub mod log;
pub mod thread_check;
pub mod thread_pool;
pub mod track_info;

pub use clasp_common::extensions::*;

/// Provides an implementation of an extension table for a given plugin type `P`.
///
/// The table is a `'static` constant: it is shared by every instance of `P`.
pub trait ExtensionImplementation<P>: Extension<ExtensionSide = PluginExtensionSide> {
    const IMPLEMENTATION: RawExtensionImplementation;
}

#[derive(Copy, Clone)]
struct DeclaredExtension {
    identifier: &'static CStr,
    implementation: RawExtensionImplementation,
}

/// A collection of all extensions supported for a given plugin type `P`.
///
/// Plugins can declare the different extensions they support by using the
/// [`register`](PluginExtensions::register) method on this struct, during a call to
/// [`declare_extensions`](Plugin::declare_extensions).
pub struct PluginExtensions<P> {
    declared: Vec<DeclaredExtension>,
    _plugin: PhantomData<fn() -> P>,
}

impl<P: Plugin> PluginExtensions<P> {
    #[inline]
    fn new() -> Self {
        Self {
            declared: Vec::new(),
            _plugin: PhantomData,
        }
    }

    /// Adds a given extension implementation to the list of extensions this plugin supports.
    ///
    /// If an extension with the same identifier was already registered, the first one is kept.
    pub fn register<E: ExtensionImplementation<P>>(&mut self) -> &mut Self {
        if !self.declared.iter().any(|e| e.identifier == E::IDENTIFIER) {
            self.declared.push(DeclaredExtension {
                identifier: E::IDENTIFIER,
                implementation: E::IMPLEMENTATION,
            });
        }

        self
    }
}

/// The extensions of a plugin instance, fixed once the instance is created.
pub(crate) struct ExtensionRegistry {
    declared: Box<[DeclaredExtension]>,
}

impl ExtensionRegistry {
    pub fn new<P: Plugin>(plugin: &P) -> Self {
        let mut builder = PluginExtensions::<P>::new();

        builder
            .register::<audio_ports::PluginAudioPorts>()
            .register::<track_info::PluginTrackInfo>()
            .register::<thread_pool::PluginThreadPool>();

        plugin.declare_extensions(&mut builder);

        Self {
            declared: builder.declared.into_boxed_slice(),
        }
    }

    pub fn find(&self, identifier: &CStr) -> Option<RawExtensionImplementation> {
        self.declared
            .iter()
            .find(|e| e.identifier == identifier)
            .map(|e| e.implementation)
    }
}

/// Everything needed to implement an extension.
pub mod prelude {
    pub use crate::extensions::{
        Extension, ExtensionImplementation, HostExtensionSide, PluginExtensionSide, RawExtension,
        RawExtensionImplementation,
    };
    pub use crate::host::{HostHandle, HostMainThreadHandle, InitializingHostHandle};
    pub use crate::plugin::wrapper::{PluginWrapper, PluginWrapperError};
    pub use crate::plugin::{Plugin, PluginAudioProcessor, PluginError};
    pub use clasp_common::log::LogSeverity;
    pub use clasp_sys::plugin::clap_plugin;
}
