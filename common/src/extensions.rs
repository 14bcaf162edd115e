//! Base traits and types describing extension tables.
//!
//! An extension is a string-identified, versioned table of function pointers. Either side may
//! implement one, and the other side looks it up by identifier. This module only describes the
//! tables: implementing and calling them is the job of the plugin and host crates.

use clasp_sys::host::clap_host;
use clasp_sys::plugin::clap_plugin;
use std::ffi::CStr;

mod raw;
pub use raw::*;

/// The plugin side of an extension.
#[derive(Copy, Clone, Debug)]
pub struct PluginExtensionSide;

/// The host side of an extension.
#[derive(Copy, Clone, Debug)]
pub struct HostExtensionSide;

/// Which side of the boundary implements an extension table.
pub trait ExtensionSide: private::Sealed + Copy + Send + Sync + 'static {
    /// The raw instance an extension table of this side is called with.
    type Instance: 'static;
}

impl ExtensionSide for PluginExtensionSide {
    type Instance = clap_plugin;
}

impl ExtensionSide for HostExtensionSide {
    type Instance = clap_host;
}

mod private {
    use super::*;

    pub trait Sealed {}
    impl Sealed for PluginExtensionSide {}
    impl Sealed for HostExtensionSide {}
}

/// A typed handle to an extension table provided by the other side.
///
/// # Safety
///
/// The [`IDENTIFIER`](Extension::IDENTIFIER) must match the official identifier for the given
/// extension, otherwise the extension data could be misinterpreted, and UB could occur.
pub unsafe trait Extension: Copy + Sized + Send + Sync + 'static {
    /// The identifier of this extension, e.g. `clap/audio-ports`.
    const IDENTIFIER: &'static CStr;
    /// The side implementing this extension.
    type ExtensionSide: ExtensionSide;

    /// Creates the typed handle from a raw, untyped extension pointer.
    ///
    /// # Safety
    ///
    /// The raw extension must point to a table of the type this extension wraps.
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self;
}
