//! Lets plugins tell which event types they are interested in, so hosts can skip sending the
//! others.

use clasp_plugin::extensions::prelude::*;
use clasp_sys::ext::event_filter::*;
use std::ffi::CStr;

/// The plugin's event filter table.
#[derive(Copy, Clone)]
pub struct PluginEventFilter(RawExtension<PluginExtensionSide, clap_plugin_event_filter>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginEventFilter {
    const IDENTIFIER: &'static CStr = CLAP_EXT_EVENT_FILTER;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// The host's event filter table.
#[derive(Copy, Clone)]
pub struct HostEventFilter(RawExtension<HostExtensionSide, clap_host_event_filter>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostEventFilter {
    const IDENTIFIER: &'static CStr = CLAP_EXT_EVENT_FILTER;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

pub trait PluginEventFilterImpl {
    fn accepts(&self, event_type: u16) -> bool;
}

impl<P: Plugin + PluginEventFilterImpl> ExtensionImplementation<P> for PluginEventFilter {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_event_filter {
            accepts: Some(accepts::<P>),
        });
}

unsafe extern "C" fn accepts<P: Plugin + PluginEventFilterImpl>(
    plugin: *const clap_plugin,
    event_type: u16,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "event_filter.accepts", |plugin, _host| {
            Ok(plugin.accepts(event_type))
        })
    }
    .unwrap_or(false)
}

impl PluginEventFilter {
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn accepts(&self, event_type: u16) -> bool {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.accepts {
            // SAFETY: upheld by caller
            Some(accepts) => unsafe { accepts(self.0.plugin_ptr().as_ptr(), event_type) },
            None => false,
        }
    }
}

impl HostEventFilter {
    /// Tells the host the set of accepted event types changed.
    #[inline]
    pub fn changed(&self, host: &HostMainThreadHandle) {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        if let Some(changed) = unsafe { self.0.as_ref() }.changed {
            // SAFETY: the handle proves we're on the main thread.
            unsafe { changed(host.shared().as_raw()) }
        }
    }
}
