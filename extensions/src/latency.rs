//! Lets plugins report the latency they introduce, in samples.
//!
//! The latency is only queried by the host while the plugin is inactive. Plugins whose latency
//! changes notify the host through [`HostLatency::changed`], which usually triggers a restart.

use clasp_plugin::extensions::prelude::*;
use clasp_sys::ext::latency::*;
use std::ffi::CStr;

/// The plugin's latency table.
#[derive(Copy, Clone)]
pub struct PluginLatency(RawExtension<PluginExtensionSide, clap_plugin_latency>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginLatency {
    const IDENTIFIER: &'static CStr = CLAP_EXT_LATENCY;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl PluginLatency {
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    #[inline]
    pub unsafe fn get(&self) -> u32 {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.get {
            // SAFETY: upheld by caller
            Some(get) => unsafe { get(self.0.plugin_ptr().as_ptr()) },
            None => 0,
        }
    }
}

/// Implemented by plugins reporting their latency.
pub trait PluginLatencyImpl {
    /// The latency of the plugin, in samples.
    fn latency(&self) -> u32;
}

impl<P: Plugin + PluginLatencyImpl> ExtensionImplementation<P> for PluginLatency {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_latency { get: Some(get::<P>) });
}

unsafe extern "C" fn get<P: Plugin + PluginLatencyImpl>(plugin: *const clap_plugin) -> u32 {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "latency.get", |plugin, _host| {
            Ok(plugin.latency())
        })
    }
    .unwrap_or(0)
}

/// The host's latency table.
#[derive(Copy, Clone)]
pub struct HostLatency(RawExtension<HostExtensionSide, clap_host_latency>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostLatency {
    const IDENTIFIER: &'static CStr = CLAP_EXT_LATENCY;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl HostLatency {
    /// Tells the host the plugin's latency changed.
    #[inline]
    pub fn changed(&self, host: &HostMainThreadHandle) {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        if let Some(changed) = unsafe { self.0.as_ref() }.changed {
            // SAFETY: the handle proves we're on the main thread.
            unsafe { changed(host.shared().as_raw()) }
        }
    }
}
