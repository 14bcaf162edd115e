//! Allows plugins to save and restore their state through host-managed byte streams.
//!
//! Plugins can also tell the host their state changed since it was last saved or loaded, using
//! [`HostState::mark_dirty`].

use clasp_common::stream::{InputStream, OutputStream};
use clasp_plugin::extensions::prelude::*;
use clasp_sys::ext::state::*;
use clasp_sys::stream::{clap_istream, clap_ostream};
use std::error::Error;
use std::ffi::CStr;
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

/// The plugin's state table.
#[derive(Copy, Clone)]
pub struct PluginState(RawExtension<PluginExtensionSide, clap_plugin_state>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginState {
    const IDENTIFIER: &'static CStr = CLAP_EXT_STATE;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// The host's state table.
#[derive(Copy, Clone)]
pub struct HostState(RawExtension<HostExtensionSide, clap_host_state>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostState {
    const IDENTIFIER: &'static CStr = CLAP_EXT_STATE;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// The plugin failed to save or load its state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct StateError {
    saving: bool,
}

impl StateError {
    #[inline]
    pub fn is_saving(&self) -> bool {
        self.saving
    }
}

impl Display for StateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.saving {
            f.write_str("Failed to save plugin state")
        } else {
            f.write_str("Failed to load plugin state")
        }
    }
}

impl Error for StateError {}

impl PluginState {
    /// Asks the plugin to write its state into `writer`.
    ///
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn save<W: Write>(&self, writer: &mut W) -> Result<(), StateError> {
        const ERROR: StateError = StateError { saving: true };

        let stream = OutputStream::from_writer(writer);
        // SAFETY: upheld by caller
        let save = unsafe { self.0.as_ref() }.save.ok_or(ERROR)?;

        // SAFETY: upheld by caller. The stream outlives the call.
        if unsafe { save(self.0.plugin_ptr().as_ptr(), stream.as_raw()) } {
            Ok(())
        } else {
            Err(ERROR)
        }
    }

    /// Asks the plugin to restore its state from `reader`.
    ///
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn load<R: Read>(&self, reader: &mut R) -> Result<(), StateError> {
        const ERROR: StateError = StateError { saving: false };

        let stream = InputStream::from_reader(reader);
        // SAFETY: upheld by caller
        let load = unsafe { self.0.as_ref() }.load.ok_or(ERROR)?;

        // SAFETY: upheld by caller. The stream outlives the call.
        if unsafe { load(self.0.plugin_ptr().as_ptr(), stream.as_raw()) } {
            Ok(())
        } else {
            Err(ERROR)
        }
    }
}

/// Implemented by plugins that can save and restore their state.
pub trait PluginStateImpl {
    fn save(&mut self, output: &mut OutputStream) -> Result<(), PluginError>;
    fn load(&mut self, input: &mut InputStream) -> Result<(), PluginError>;
}

impl<P: Plugin + PluginStateImpl> ExtensionImplementation<P> for PluginState {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_state {
            save: Some(save::<P>),
            load: Some(load::<P>),
        });
}

unsafe extern "C" fn save<P: Plugin + PluginStateImpl>(
    plugin: *const clap_plugin,
    stream: *const clap_ostream,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "state.save", |plugin, _host| {
            let Some(stream) = stream.cast_mut().as_mut() else {
                return Err(PluginWrapperError::NulPtr("clap_ostream"));
            };

            // The host keeps the stream alive for the whole call.
            plugin.save(OutputStream::from_raw_mut(stream))?;
            Ok(())
        })
    }
    .is_some()
}

unsafe extern "C" fn load<P: Plugin + PluginStateImpl>(
    plugin: *const clap_plugin,
    stream: *const clap_istream,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "state.load", |plugin, _host| {
            let Some(stream) = stream.cast_mut().as_mut() else {
                return Err(PluginWrapperError::NulPtr("clap_istream"));
            };

            plugin.load(InputStream::from_raw_mut(stream))?;
            Ok(())
        })
    }
    .is_some()
}

impl HostState {
    /// Tells the host the plugin's state changed and should be saved again.
    #[inline]
    pub fn mark_dirty(&self, host: &HostMainThreadHandle) {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        if let Some(mark_dirty) = unsafe { self.0.as_ref() }.mark_dirty {
            // SAFETY: the handle proves we're on the main thread.
            unsafe { mark_dirty(host.shared().as_raw()) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_error_messages() {
        assert_eq!(
            StateError { saving: true }.to_string(),
            "Failed to save plugin state"
        );
        assert_eq!(
            StateError { saving: false }.to_string(),
            "Failed to load plugin state"
        );
    }
}
