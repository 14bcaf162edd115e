//! The `clap/audio-ports` extension.
//!
//! Every plugin implements it: the ports are the ones defined by
//! [`Plugin::define_audio_ports`](crate::plugin::Plugin::define_audio_ports).

use crate::extensions::prelude::*;
use crate::host::HostCapability;
use crate::ports::{AudioPortInfo, PortDirection};
use clasp_sys::ext::audio_ports::*;
use std::ffi::CStr;
use std::mem::MaybeUninit;

/// The plugin's audio ports table.
#[derive(Copy, Clone)]
pub struct PluginAudioPorts(RawExtension<PluginExtensionSide, clap_plugin_audio_ports>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginAudioPorts {
    const IDENTIFIER: &'static CStr = CLAP_EXT_AUDIO_PORTS;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl PluginAudioPorts {
    /// Returns the number of input or output ports of the plugin.
    ///
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn count(&self, is_input: bool) -> u32 {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.count {
            // SAFETY: upheld by caller
            Some(count) => unsafe { count(self.0.plugin_ptr().as_ptr(), is_input) },
            None => 0,
        }
    }

    /// Returns the description of the port at the given index.
    ///
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn get(&self, index: u32, is_input: bool) -> Option<AudioPortInfo> {
        // SAFETY: upheld by caller
        let info = unsafe { self.0.as_ref() }.info?;
        let mut buf = MaybeUninit::zeroed();

        // SAFETY: upheld by caller, and the buffer is valid for writes.
        if unsafe { info(self.0.plugin_ptr().as_ptr(), index, is_input, buf.as_mut_ptr()) } {
            // SAFETY: the buffer was zero-initialized, and filled by the plugin.
            Some(AudioPortInfo::from_raw(unsafe { buf.assume_init_ref() }))
        } else {
            None
        }
    }
}

impl<P: Plugin> ExtensionImplementation<P> for PluginAudioPorts {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_audio_ports {
            count: Some(count::<P>),
            info: Some(info::<P>),
        });
}

unsafe extern "C" fn count<P: Plugin>(plugin: *const clap_plugin, is_input: bool) -> u32 {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_wrapper_main_thread(plugin, "audio_ports.count", |wrapper| {
            let count = wrapper.audio_ports().count(PortDirection::from_is_input(is_input));
            Ok(u32::try_from(count).unwrap_or(u32::MAX))
        })
    }
    .unwrap_or(0)
}

unsafe extern "C" fn info<P: Plugin>(
    plugin: *const clap_plugin,
    index: u32,
    is_input: bool,
    info: *mut clap_audio_port_info,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_wrapper_main_thread(plugin, "audio_ports.info", |wrapper| {
            let info = info
                .cast::<MaybeUninit<clap_audio_port_info>>()
                .as_mut()
                .ok_or(PluginWrapperError::NulPtr("clap_audio_port_info"))?;

            let direction = PortDirection::from_is_input(is_input);
            let Some(port) = usize::try_from(index)
                .ok()
                .and_then(|i| wrapper.audio_ports().get(direction, i))
            else {
                return Ok(false);
            };

            port.write_to_raw(info);
            Ok(true)
        })
    }
    .unwrap_or(false)
}

/// Lets the plugin tell the host its audio ports changed.
#[derive(Copy, Clone)]
pub struct HostAudioPorts(RawExtension<HostExtensionSide, clap_host_audio_ports>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostAudioPorts {
    const IDENTIFIER: &'static CStr = CLAP_EXT_AUDIO_PORTS;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl HostAudioPorts {
    /// Tells the host all audio ports have to be re-scanned.
    ///
    /// Plugins don't have to call this directly: use
    /// [`HostMainThreadHandle::invalidate_audio_ports_definition`] instead, which only notifies the
    /// host when the ports actually changed, and never while the plugin is active.
    #[inline]
    pub fn invalidate_all(&self, host: &HostMainThreadHandle) {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        if let Some(invalidate_all) = unsafe { self.0.as_ref() }.invalidate_all {
            // SAFETY: the handle proves we're on the main thread.
            unsafe { invalidate_all(host.shared().as_raw()) }
        }
    }
}

impl HostCapability for HostAudioPorts {
    #[inline]
    fn is_complete(&self) -> bool {
        // SAFETY: capabilities are checked during init, while the host is alive.
        unsafe { self.0.as_ref() }.invalidate_all.is_some()
    }
}
