//! Allows plugins to present a GUI, embedded in a window provided by the host.
//!
//! The windowing-system specific part lives in three separate tables (`clap/gui-win32`,
//! `clap/gui-cocoa` and `clap/gui-x11`), each with a single `attach` entry. Plugins implement
//! [`PluginGuiAttachImpl`] once, and receive a [`Window`] whatever the windowing system is.
//!
//! All GUI calls happen on the main thread.

use clasp_plugin::extensions::prelude::*;
use clasp_sys::ext::gui::*;
use std::error::Error;
use std::ffi::CStr;
use std::fmt::{Display, Formatter};

mod attach;
mod window;

pub use attach::*;
pub use window::*;

/// The size of a GUI, in pixels.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct GuiSize {
    pub width: u32,
    pub height: u32,
}

/// The plugin's GUI table.
#[derive(Copy, Clone)]
pub struct PluginGui(RawExtension<PluginExtensionSide, clap_plugin_gui>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginGui {
    const IDENTIFIER: &'static CStr = CLAP_EXT_GUI;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// The host's GUI table.
#[derive(Copy, Clone)]
pub struct HostGui(RawExtension<HostExtensionSide, clap_host_gui>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostGui {
    const IDENTIFIER: &'static CStr = CLAP_EXT_GUI;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum HostGuiError {
    /// The host refused or failed to resize the plugin's window.
    ResizeError(GuiSize),
}

impl Display for HostGuiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HostGuiError::ResizeError(size) => write!(
                f,
                "Request to resize plugin window to {}x{} failed",
                size.width, size.height
            ),
        }
    }
}

impl Error for HostGuiError {}

impl HostGui {
    /// Asks the host to resize the window the plugin's GUI is embedded in.
    pub fn resize(
        &self,
        host: &HostMainThreadHandle,
        width: u32,
        height: u32,
    ) -> Result<(), HostGuiError> {
        let error = HostGuiError::ResizeError(GuiSize { width, height });
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        let resize = unsafe { self.0.as_ref() }.resize.ok_or(error)?;

        // SAFETY: the handle proves we're on the main thread.
        if unsafe { resize(host.shared().as_raw(), width, height) } {
            Ok(())
        } else {
            Err(error)
        }
    }
}

/// Implemented by plugins with a GUI.
pub trait PluginGuiImpl {
    /// Creates the GUI's resources. It is attached to a window afterwards.
    fn create(&mut self) -> Result<(), PluginError>;
    fn destroy(&mut self);

    /// Sets the scaling factor the GUI should use, e.g. `2.0` on high-density displays.
    fn set_scale(&mut self, _scale: f64) {}

    fn size(&mut self) -> Option<GuiSize>;

    fn can_resize(&mut self) -> bool {
        false
    }

    /// Adjusts the given size to the closest one the GUI supports.
    fn round_size(&mut self, size: GuiSize) -> GuiSize {
        size
    }

    fn set_size(&mut self, _size: GuiSize) -> Result<(), PluginError> {
        Err(PluginError::Message("This GUI can't be resized"))
    }

    fn show(&mut self);
    fn hide(&mut self);
}

impl<P: Plugin + PluginGuiImpl> ExtensionImplementation<P> for PluginGui {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_gui {
            create: Some(create::<P>),
            destroy: Some(destroy::<P>),
            set_scale: Some(set_scale::<P>),
            size: Some(size::<P>),
            can_resize: Some(can_resize::<P>),
            round_size: Some(round_size::<P>),
            set_size: Some(set_size::<P>),
            show: Some(show::<P>),
            hide: Some(hide::<P>),
        });
}

unsafe extern "C" fn create<P: Plugin + PluginGuiImpl>(plugin: *const clap_plugin) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "gui.create", |plugin, _host| {
            plugin.create()?;
            Ok(())
        })
    }
    .is_some()
}

unsafe extern "C" fn destroy<P: Plugin + PluginGuiImpl>(plugin: *const clap_plugin) {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "gui.destroy", |plugin, _host| {
            plugin.destroy();
            Ok(())
        });
    }
}

unsafe extern "C" fn set_scale<P: Plugin + PluginGuiImpl>(plugin: *const clap_plugin, scale: f64) {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "gui.set_scale", |plugin, _host| {
            plugin.set_scale(scale);
            Ok(())
        });
    }
}

unsafe extern "C" fn size<P: Plugin + PluginGuiImpl>(
    plugin: *const clap_plugin,
    width: *mut u32,
    height: *mut u32,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer, and valid size pointers if non-null.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "gui.size", |plugin, _host| {
            if width.is_null() || height.is_null() {
                return Err(PluginWrapperError::NulPtr("size"));
            }

            let Some(size) = plugin.size() else {
                return Ok(false);
            };

            width.write(size.width);
            height.write(size.height);
            Ok(true)
        })
    }
    .unwrap_or(false)
}

unsafe extern "C" fn can_resize<P: Plugin + PluginGuiImpl>(plugin: *const clap_plugin) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "gui.can_resize", |plugin, _host| {
            Ok(plugin.can_resize())
        })
    }
    .unwrap_or(false)
}

unsafe extern "C" fn round_size<P: Plugin + PluginGuiImpl>(
    plugin: *const clap_plugin,
    width: *mut u32,
    height: *mut u32,
) {
    // SAFETY: the host gives a valid plugin pointer, and valid size pointers if non-null.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "gui.round_size", |plugin, _host| {
            if width.is_null() || height.is_null() {
                return Err(PluginWrapperError::NulPtr("size"));
            }

            let size = plugin.round_size(GuiSize {
                width: width.read(),
                height: height.read(),
            });

            width.write(size.width);
            height.write(size.height);
            Ok(())
        });
    }
}

unsafe extern "C" fn set_size<P: Plugin + PluginGuiImpl>(
    plugin: *const clap_plugin,
    width: u32,
    height: u32,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "gui.set_size", |plugin, _host| {
            plugin.set_size(GuiSize { width, height })?;
            Ok(())
        })
    }
    .is_some()
}

unsafe extern "C" fn show<P: Plugin + PluginGuiImpl>(plugin: *const clap_plugin) {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "gui.show", |plugin, _host| {
            plugin.show();
            Ok(())
        });
    }
}

unsafe extern "C" fn hide<P: Plugin + PluginGuiImpl>(plugin: *const clap_plugin) {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "gui.hide", |plugin, _host| {
            plugin.hide();
            Ok(())
        });
    }
}

// Every method below requires the plugin instance to still be alive, and to be called on the
// main thread.
#[allow(clippy::missing_safety_doc)]
impl PluginGui {
    pub unsafe fn create(&self) -> bool {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.create {
            // SAFETY: upheld by caller
            Some(create) => unsafe { create(self.0.plugin_ptr().as_ptr()) },
            None => false,
        }
    }

    pub unsafe fn destroy(&self) {
        // SAFETY: upheld by caller
        if let Some(destroy) = unsafe { self.0.as_ref() }.destroy {
            // SAFETY: upheld by caller
            unsafe { destroy(self.0.plugin_ptr().as_ptr()) }
        }
    }

    pub unsafe fn set_scale(&self, scale: f64) {
        // SAFETY: upheld by caller
        if let Some(set_scale) = unsafe { self.0.as_ref() }.set_scale {
            // SAFETY: upheld by caller
            unsafe { set_scale(self.0.plugin_ptr().as_ptr(), scale) }
        }
    }

    pub unsafe fn size(&self) -> Option<GuiSize> {
        // SAFETY: upheld by caller
        let size = unsafe { self.0.as_ref() }.size?;
        let (mut width, mut height) = (0, 0);

        // SAFETY: upheld by caller. Both pointers are valid for writes.
        unsafe { size(self.0.plugin_ptr().as_ptr(), &mut width, &mut height) }
            .then_some(GuiSize { width, height })
    }

    pub unsafe fn can_resize(&self) -> bool {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.can_resize {
            // SAFETY: upheld by caller
            Some(can_resize) => unsafe { can_resize(self.0.plugin_ptr().as_ptr()) },
            None => false,
        }
    }

    pub unsafe fn round_size(&self, size: GuiSize) -> GuiSize {
        // SAFETY: upheld by caller
        let Some(round_size) = unsafe { self.0.as_ref() }.round_size else {
            return size;
        };
        let GuiSize {
            mut width,
            mut height,
        } = size;

        // SAFETY: upheld by caller. Both pointers are valid for reads and writes.
        unsafe { round_size(self.0.plugin_ptr().as_ptr(), &mut width, &mut height) };
        GuiSize { width, height }
    }

    pub unsafe fn set_size(&self, size: GuiSize) -> bool {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.set_size {
            // SAFETY: upheld by caller
            Some(set_size) => unsafe {
                set_size(self.0.plugin_ptr().as_ptr(), size.width, size.height)
            },
            None => false,
        }
    }

    pub unsafe fn show(&self) {
        // SAFETY: upheld by caller
        if let Some(show) = unsafe { self.0.as_ref() }.show {
            // SAFETY: upheld by caller
            unsafe { show(self.0.plugin_ptr().as_ptr()) }
        }
    }

    pub unsafe fn hide(&self) {
        // SAFETY: upheld by caller
        if let Some(hide) = unsafe { self.0.as_ref() }.hide {
            // SAFETY: upheld by caller
            unsafe { hide(self.0.plugin_ptr().as_ptr()) }
        }
    }
}
