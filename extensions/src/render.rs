//! Lets hosts tell plugins whether they are rendering in real time or offline.

use clasp_plugin::extensions::prelude::*;
use clasp_sys::ext::render::*;
use std::ffi::CStr;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum RenderMode {
    /// Processing is bound to real time, e.g. for live playback.
    #[default]
    Realtime,
    /// Processing runs as fast as possible, e.g. for a bounce.
    Offline,
}

impl RenderMode {
    #[inline]
    pub fn from_raw(raw: clap_plugin_render_mode) -> Option<Self> {
        match raw {
            CLAP_RENDER_REALTIME => Some(Self::Realtime),
            CLAP_RENDER_OFFLINE => Some(Self::Offline),
            _ => None,
        }
    }

    #[inline]
    pub fn to_raw(self) -> clap_plugin_render_mode {
        match self {
            Self::Realtime => CLAP_RENDER_REALTIME,
            Self::Offline => CLAP_RENDER_OFFLINE,
        }
    }
}

/// The plugin's render table.
#[derive(Copy, Clone)]
pub struct PluginRender(RawExtension<PluginExtensionSide, clap_plugin_render>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginRender {
    const IDENTIFIER: &'static CStr = CLAP_EXT_RENDER;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

pub trait PluginRenderImpl {
    fn set(&mut self, mode: RenderMode);
}

impl<P: Plugin + PluginRenderImpl> ExtensionImplementation<P> for PluginRender {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_render { set: Some(set::<P>) });
}

unsafe extern "C" fn set<P: Plugin + PluginRenderImpl>(
    plugin: *const clap_plugin,
    mode: clap_plugin_render_mode,
) {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "render.set", |plugin, host| {
            match RenderMode::from_raw(mode) {
                Some(mode) => plugin.set(mode),
                None => host
                    .shared()
                    .host_misbehaving(&format!("Unknown render mode: {mode}")),
            }
            Ok(())
        });
    }
}

impl PluginRender {
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn set(&self, mode: RenderMode) {
        // SAFETY: upheld by caller
        if let Some(set) = unsafe { self.0.as_ref() }.set {
            // SAFETY: upheld by caller
            unsafe { set(self.0.plugin_ptr().as_ptr(), mode.to_raw()) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_modes_are_rejected() {
        assert_eq!(RenderMode::from_raw(1), Some(RenderMode::Offline));
        assert_eq!(RenderMode::from_raw(7), None);
        assert_eq!(RenderMode::default().to_raw(), CLAP_RENDER_REALTIME);
    }
}
