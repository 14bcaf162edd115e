use crate::extensions::audio_ports::HostAudioPorts;
use crate::extensions::log::HostLog;
use crate::extensions::thread_check::HostThreadCheck;
use crate::extensions::thread_pool::HostThreadPool;
use crate::extensions::track_info::HostTrackInfo;
use crate::extensions::{Extension, HostExtensionSide};
use crate::host::query_host_extension;
use clasp_sys::host::clap_host;
use std::ffi::CStr;
use std::ptr::NonNull;

/// A host extension the plugin wrapper relies on.
pub(crate) trait HostCapability: Extension<ExtensionSide = HostExtensionSide> {
    /// Whether all of the mandatory functions of the table are present.
    fn is_complete(&self) -> bool;
}

/// The host extensions queried by the wrapper during init, cached for the lifetime of the instance.
#[derive(Copy, Clone, Default)]
pub(crate) struct HostCapabilities {
    pub log: Option<HostLog>,
    pub thread_check: Option<HostThreadCheck>,
    pub thread_pool: Option<HostThreadPool>,
    pub audio_ports: Option<HostAudioPorts>,
    pub track_info: Option<HostTrackInfo>,
}

impl HostCapabilities {
    pub const NONE: Self = Self {
        log: None,
        thread_check: None,
        thread_pool: None,
        audio_ports: None,
        track_info: None,
    };

    /// Queries every capability from the host, once.
    ///
    /// Also returns the identifiers of the tables the host provided but that were missing
    /// mandatory functions. Those are discarded.
    ///
    /// # Safety
    ///
    /// The host pointer must be valid, and the plugin must be initializing.
    pub unsafe fn query(host: NonNull<clap_host>) -> (Self, Vec<&'static CStr>) {
        let mut incomplete = Vec::new();

        // SAFETY: upheld by caller
        let capabilities = unsafe {
            Self {
                log: query_capability(host, &mut incomplete),
                thread_check: query_capability(host, &mut incomplete),
                thread_pool: query_capability(host, &mut incomplete),
                audio_ports: query_capability(host, &mut incomplete),
                track_info: query_capability(host, &mut incomplete),
            }
        };

        (capabilities, incomplete)
    }
}

unsafe fn query_capability<E: HostCapability>(
    host: NonNull<clap_host>,
    incomplete: &mut Vec<&'static CStr>,
) -> Option<E> {
    // SAFETY: upheld by caller
    let capability = unsafe { query_host_extension::<E>(host) }?;

    if capability.is_complete() {
        Some(capability)
    } else {
        incomplete.push(E::IDENTIFIER);
        None
    }
}
