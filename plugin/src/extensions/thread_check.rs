//! The host's `clap/thread-check` extension.

use crate::extensions::prelude::*;
use crate::host::HostCapability;
use clasp_sys::ext::thread_check::{CLAP_EXT_THREAD_CHECK, clap_host_thread_check};
use std::ffi::CStr;

/// Lets the plugin ask the host which kind of thread it is running on.
#[derive(Copy, Clone)]
pub struct HostThreadCheck(RawExtension<HostExtensionSide, clap_host_thread_check>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostThreadCheck {
    const IDENTIFIER: &'static CStr = CLAP_EXT_THREAD_CHECK;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl HostThreadCheck {
    /// Returns `None` if the host doesn't implement this check.
    #[inline]
    pub fn is_main_thread(&self, host: &HostHandle) -> Option<bool> {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        let check = unsafe { self.0.as_ref() }.is_main_thread?;
        // SAFETY: this function is thread-safe.
        Some(unsafe { check(host.as_raw()) })
    }

    /// Returns `None` if the host doesn't implement this check.
    #[inline]
    pub fn is_audio_thread(&self, host: &HostHandle) -> Option<bool> {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        let check = unsafe { self.0.as_ref() }.is_audio_thread?;
        // SAFETY: this function is thread-safe.
        Some(unsafe { check(host.as_raw()) })
    }
}

impl HostCapability for HostThreadCheck {
    #[inline]
    fn is_complete(&self) -> bool {
        // SAFETY: capabilities are checked during init, while the host is alive.
        let table = unsafe { self.0.as_ref() };
        table.is_main_thread.is_some() && table.is_audio_thread.is_some()
    }
}
