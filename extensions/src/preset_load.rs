//! Lets hosts ask plugins to load a preset from a file.

use clasp_common::utils::cstr_from_nullable_ptr;
use clasp_plugin::extensions::prelude::*;
use clasp_sys::ext::preset_load::*;
use std::ffi::{CStr, c_char};

/// The plugin's preset load table.
#[derive(Copy, Clone)]
pub struct PluginPresetLoad(RawExtension<PluginExtensionSide, clap_plugin_preset_load>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginPresetLoad {
    const IDENTIFIER: &'static CStr = CLAP_EXT_PRESET_LOAD;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

pub trait PluginPresetLoadImpl {
    fn from_file(&mut self, path: &CStr) -> Result<(), PluginError>;
}

impl<P: Plugin + PluginPresetLoadImpl> ExtensionImplementation<P> for PluginPresetLoad {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_preset_load {
            from_file: Some(from_file::<P>),
        });
}

unsafe extern "C" fn from_file<P: Plugin + PluginPresetLoadImpl>(
    plugin: *const clap_plugin,
    path: *const c_char,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer, and a valid C string if non-null.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "preset_load.from_file", |plugin, _host| {
            let path = cstr_from_nullable_ptr(path).ok_or(PluginWrapperError::NulPtr("path"))?;
            plugin.from_file(path)?;
            Ok(())
        })
    }
    .is_some()
}

impl PluginPresetLoad {
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn from_file(&self, path: &CStr) -> bool {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.from_file {
            // SAFETY: upheld by caller
            Some(from_file) => unsafe { from_file(self.0.plugin_ptr().as_ptr(), path.as_ptr()) },
            None => false,
        }
    }
}
