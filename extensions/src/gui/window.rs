use raw_window_handle_05::{
    AppKitWindowHandle, HasRawWindowHandle, RawWindowHandle, Win32WindowHandle, XlibWindowHandle,
};
use std::ffi::{CStr, c_ulong, c_void};

/// A host-provided parent window, to embed the plugin's GUI into.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Window<'a> {
    /// A Win32 `HWND`.
    Win32(*mut c_void),
    /// A Cocoa `NSView`.
    Cocoa(*mut c_void),
    /// An X11 window, on the given display (or the default one if `None`).
    X11 {
        display_name: Option<&'a CStr>,
        window: c_ulong,
    },
}

impl Window<'static> {
    /// Creates a [`Window`] from any window object implementing [`HasRawWindowHandle`].
    ///
    /// Returns [`None`] if the window isn't backed by Win32, AppKit or Xlib.
    #[inline]
    pub fn from_window<W: HasRawWindowHandle>(window: &W) -> Option<Self> {
        Self::from_raw_window_handle(window.raw_window_handle())
    }

    /// X11 windows use the default display.
    pub fn from_raw_window_handle(handle: RawWindowHandle) -> Option<Self> {
        match handle {
            RawWindowHandle::Win32(handle) => Some(Window::Win32(handle.hwnd)),
            RawWindowHandle::AppKit(handle) => Some(Window::Cocoa(handle.ns_view)),
            RawWindowHandle::Xlib(handle) => Some(Window::X11 {
                display_name: None,
                window: handle.window,
            }),
            _ => None,
        }
    }
}

// SAFETY: the returned handle is the one the host gave, and stays valid as long as the host keeps
// its window alive.
unsafe impl HasRawWindowHandle for Window<'_> {
    fn raw_window_handle(&self) -> RawWindowHandle {
        match *self {
            Window::Win32(hwnd) => {
                let mut handle = Win32WindowHandle::empty();
                handle.hwnd = hwnd;
                RawWindowHandle::Win32(handle)
            }
            Window::Cocoa(ns_view) => {
                let mut handle = AppKitWindowHandle::empty();
                handle.ns_view = ns_view;
                RawWindowHandle::AppKit(handle)
            }
            Window::X11 { window, .. } => {
                let mut handle = XlibWindowHandle::empty();
                handle.window = window;
                RawWindowHandle::Xlib(handle)
            }
        }
    }
}
