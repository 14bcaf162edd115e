//! The host's `clap/log` extension.

use crate::extensions::prelude::*;
use crate::host::HostCapability;
use clasp_sys::ext::log::{CLAP_EXT_LOG, clap_host_log};
use std::ffi::CStr;

/// The host's logger.
#[derive(Copy, Clone)]
pub struct HostLog(RawExtension<HostExtensionSide, clap_host_log>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostLog {
    const IDENTIFIER: &'static CStr = CLAP_EXT_LOG;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl HostLog {
    /// Logs a message through the host. Does nothing if the host's table is incomplete.
    #[inline]
    pub fn log(&self, host: &HostHandle, severity: LogSeverity, message: &CStr) {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        let Some(log) = (unsafe { self.0.as_ref() }).log else {
            return;
        };

        // SAFETY: the log function is thread-safe, and the message is a valid C string.
        unsafe { log(host.as_raw(), severity.to_raw(), message.as_ptr()) }
    }
}

impl HostCapability for HostLog {
    #[inline]
    fn is_complete(&self) -> bool {
        // SAFETY: capabilities are checked during init, while the host is alive.
        unsafe { self.0.as_ref() }.log.is_some()
    }
}
