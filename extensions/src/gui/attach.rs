use super::Window;
use clasp_common::utils::cstr_from_nullable_ptr;
use clasp_plugin::extensions::prelude::*;
use clasp_sys::ext::gui_cocoa::*;
use clasp_sys::ext::gui_win32::*;
use clasp_sys::ext::gui_x11::*;
use std::ffi::{CStr, c_char, c_ulong, c_void};

/// Implemented by plugins with a GUI, to embed it into a host window.
///
/// This enables the `clap/gui-win32`, `clap/gui-cocoa` and `clap/gui-x11` tables alike. Plugins
/// only register the ones their platform supports.
pub trait PluginGuiAttachImpl {
    fn attach(&mut self, window: Window) -> Result<(), PluginError>;
}

/// # Safety
///
/// The plugin pointer must be valid.
unsafe fn attach<P: Plugin + PluginGuiAttachImpl>(
    plugin: *const clap_plugin,
    method: &'static str,
    window: Window,
) -> bool {
    // SAFETY: upheld by caller
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, method, |plugin, _host| {
            plugin.attach(window)?;
            Ok(())
        })
    }
    .is_some()
}

#[derive(Copy, Clone)]
pub struct PluginGuiWin32(RawExtension<PluginExtensionSide, clap_plugin_gui_win32>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginGuiWin32 {
    const IDENTIFIER: &'static CStr = CLAP_EXT_GUI_WIN32;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl PluginGuiWin32 {
    /// # Safety
    ///
    /// The plugin instance must still be alive, this must be called on the main thread, and the
    /// window handle must be valid.
    pub unsafe fn attach(&self, hwnd: clap_hwnd) -> bool {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.attach {
            // SAFETY: upheld by caller
            Some(attach) => unsafe { attach(self.0.plugin_ptr().as_ptr(), hwnd) },
            None => false,
        }
    }
}

impl<P: Plugin + PluginGuiAttachImpl> ExtensionImplementation<P> for PluginGuiWin32 {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_gui_win32 {
            attach: Some(attach_win32::<P>),
        });
}

unsafe extern "C" fn attach_win32<P: Plugin + PluginGuiAttachImpl>(
    plugin: *const clap_plugin,
    window: clap_hwnd,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe { attach::<P>(plugin, "gui_win32.attach", Window::Win32(window)) }
}

#[derive(Copy, Clone)]
pub struct PluginGuiCocoa(RawExtension<PluginExtensionSide, clap_plugin_gui_cocoa>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginGuiCocoa {
    const IDENTIFIER: &'static CStr = CLAP_EXT_GUI_COCOA;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl PluginGuiCocoa {
    /// # Safety
    ///
    /// The plugin instance must still be alive, this must be called on the main thread, and the
    /// view pointer must be valid.
    pub unsafe fn attach(&self, ns_view: *mut c_void) -> bool {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.attach {
            // SAFETY: upheld by caller
            Some(attach) => unsafe { attach(self.0.plugin_ptr().as_ptr(), ns_view) },
            None => false,
        }
    }
}

impl<P: Plugin + PluginGuiAttachImpl> ExtensionImplementation<P> for PluginGuiCocoa {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_gui_cocoa {
            attach: Some(attach_cocoa::<P>),
        });
}

unsafe extern "C" fn attach_cocoa<P: Plugin + PluginGuiAttachImpl>(
    plugin: *const clap_plugin,
    ns_view: *mut c_void,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe { attach::<P>(plugin, "gui_cocoa.attach", Window::Cocoa(ns_view)) }
}

#[derive(Copy, Clone)]
pub struct PluginGuiX11(RawExtension<PluginExtensionSide, clap_plugin_gui_x11>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginGuiX11 {
    const IDENTIFIER: &'static CStr = CLAP_EXT_GUI_X11;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl PluginGuiX11 {
    /// # Safety
    ///
    /// The plugin instance must still be alive, this must be called on the main thread, and the
    /// window must exist on the given display.
    pub unsafe fn attach(&self, display_name: Option<&CStr>, window: c_ulong) -> bool {
        let display_name = display_name.map_or(core::ptr::null(), CStr::as_ptr);

        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.attach {
            // SAFETY: upheld by caller
            Some(attach) => unsafe { attach(self.0.plugin_ptr().as_ptr(), display_name, window) },
            None => false,
        }
    }
}

impl<P: Plugin + PluginGuiAttachImpl> ExtensionImplementation<P> for PluginGuiX11 {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_gui_x11 {
            attach: Some(attach_x11::<P>),
        });
}

unsafe extern "C" fn attach_x11<P: Plugin + PluginGuiAttachImpl>(
    plugin: *const clap_plugin,
    display_name: *const c_char,
    window: c_ulong,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer, and a valid display name if non-null.
    unsafe {
        let display_name = cstr_from_nullable_ptr(display_name);
        attach::<P>(plugin, "gui_x11.attach", Window::X11 { display_name, window })
    }
}
