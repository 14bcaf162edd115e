//! The `clap/draft/track-info` extension.

use crate::extensions::prelude::*;
use crate::host::HostCapability;
use crate::track_info::TrackInfo;
use clasp_sys::ext::track_info::*;
use std::ffi::CStr;
use std::mem::MaybeUninit;

/// The plugin's track info table.
#[derive(Copy, Clone)]
pub struct PluginTrackInfo(RawExtension<PluginExtensionSide, clap_plugin_track_info>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginTrackInfo {
    const IDENTIFIER: &'static CStr = CLAP_EXT_TRACK_INFO;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl PluginTrackInfo {
    /// Notifies the plugin that the track's information changed.
    ///
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn changed(&self) {
        // SAFETY: upheld by caller
        if let Some(changed) = unsafe { self.0.as_ref() }.changed {
            // SAFETY: upheld by caller
            unsafe { changed(self.0.plugin_ptr().as_ptr()) }
        }
    }
}

impl<P: Plugin> ExtensionImplementation<P> for PluginTrackInfo {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_track_info {
            changed: Some(changed::<P>),
        });
}

unsafe extern "C" fn changed<P: Plugin>(plugin: *const clap_plugin) {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_wrapper_main_thread(plugin, "track_info.changed", |wrapper| {
            wrapper.track_info_changed()
        });
    }
}

/// Gives information about the track the plugin is on.
#[derive(Copy, Clone)]
pub struct HostTrackInfo(RawExtension<HostExtensionSide, clap_host_track_info>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostTrackInfo {
    const IDENTIFIER: &'static CStr = CLAP_EXT_TRACK_INFO;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl HostTrackInfo {
    /// Fetches the current track information from the host.
    ///
    /// Returns `None` if the host failed to provide it.
    ///
    /// Plugins rarely have to call this directly: the last fetched snapshot is available through
    /// [`HostMainThreadHandle::track_info`].
    pub fn get(&self, host: &HostMainThreadHandle) -> Option<TrackInfo> {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        let get = unsafe { self.0.as_ref() }.get?;
        let mut info = MaybeUninit::zeroed();

        // SAFETY: the handle proves we're on the main thread, and the buffer is valid for writes.
        if unsafe { get(host.shared().as_raw(), info.as_mut_ptr()) } {
            // SAFETY: the buffer was zero-initialized, and filled by the host.
            Some(TrackInfo::from_raw(unsafe { info.assume_init_ref() }))
        } else {
            None
        }
    }
}

impl HostCapability for HostTrackInfo {
    #[inline]
    fn is_complete(&self) -> bool {
        // SAFETY: capabilities are checked during init, while the host is alive.
        unsafe { self.0.as_ref() }.get.is_some()
    }
}
