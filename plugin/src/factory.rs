//! Creation of plugin instances from their descriptor ID.

use crate::plugin::wrapper::PluginWrapper;
use crate::plugin::{Plugin, PluginDescriptor};
use clasp_common::utils::cstr_from_nullable_ptr;
use clasp_common::version::ClapVersion;
use clasp_sys::host::clap_host;
use clasp_sys::plugin::clap_plugin;
use std::ffi::c_char;
use std::ptr::NonNull;

mod error;

pub use error::FactoryError;

/// A plugin type, as exposed by a [`PluginEntry`](crate::entry::PluginEntry).
#[derive(Copy, Clone)]
pub struct PluginFactoryEntry {
    descriptor: &'static PluginDescriptor,
    create: fn(NonNull<clap_host>) -> Result<NonNull<clap_plugin>, FactoryError>,
}

impl PluginFactoryEntry {
    #[inline]
    pub const fn of<P: Plugin>() -> Self {
        Self {
            descriptor: P::DESCRIPTOR,
            create: PluginWrapper::<P>::create,
        }
    }

    #[inline]
    pub const fn descriptor(&self) -> &'static PluginDescriptor {
        self.descriptor
    }
}

/// Creates an instance of the plugin matching the given ID.
///
/// # Safety
///
/// The host pointer must be null or valid, and the plugin ID must be null or a valid C string.
pub(crate) unsafe fn create_plugin(
    plugins: &[PluginFactoryEntry],
    host: *const clap_host,
    plugin_id: *const c_char,
) -> Result<NonNull<clap_plugin>, FactoryError> {
    let host = NonNull::new(host.cast_mut()).ok_or(FactoryError::NulHost)?;
    // SAFETY: upheld by caller
    let plugin_id = unsafe { cstr_from_nullable_ptr(plugin_id) }.ok_or(FactoryError::NulPluginId)?;

    // SAFETY: upheld by caller
    let raw_host = unsafe { host.as_ref() };
    let host_version = ClapVersion::from_raw(raw_host.clap_version);
    if !host_version.is_compatible() {
        return Err(FactoryError::IncompatibleHostVersion(host_version));
    }

    if raw_host.extension.is_none() {
        return Err(FactoryError::MissingHostExtensionFunction);
    }

    let entry = plugins
        .iter()
        .find(|p| p.descriptor.id() == plugin_id)
        .ok_or_else(|| FactoryError::UnknownPluginId(plugin_id.to_string_lossy().into_owned()))?;

    (entry.create)(host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use clasp_sys::version::{CLAP_VERSION, clap_version};

    struct Failing;

    impl Plugin for Failing {
        type AudioProcessor = Processor;
        const DESCRIPTOR: &'static PluginDescriptor =
            &PluginDescriptor::new(c"org.clasp.failing", c"Failing");

        fn new(_host: HostHandle) -> Result<Self, PluginError> {
            Err(PluginError::Message("nope"))
        }

        fn activate(
            &mut self,
            _host: HostMainThreadHandle,
            _audio_config: AudioConfiguration,
        ) -> Result<Processor, PluginError> {
            Ok(Processor)
        }
    }

    struct Processor;

    impl PluginAudioProcessor for Processor {
        fn process(
            &mut self,
            _process: Process,
            _audio: Audio,
            _events: Events,
        ) -> Result<ProcessStatus, PluginError> {
            Ok(ProcessStatus::Continue)
        }
    }

    unsafe extern "C" fn no_extension(
        _host: *const clap_host,
        _id: *const c_char,
    ) -> *const std::ffi::c_void {
        core::ptr::null()
    }

    fn host(clap_version: clap_version) -> clap_host {
        clap_host {
            clap_version,
            host_data: core::ptr::null_mut(),
            name: core::ptr::null(),
            vendor: core::ptr::null(),
            url: core::ptr::null(),
            version: core::ptr::null(),
            extension: Some(no_extension),
            request_restart: None,
            request_process: None,
        }
    }

    const PLUGINS: &[PluginFactoryEntry] = &[PluginFactoryEntry::of::<Failing>()];

    #[test]
    fn invalid_requests_are_rejected() {
        let host = host(CLAP_VERSION);

        // SAFETY: all pointers are null or valid
        unsafe {
            assert!(matches!(
                create_plugin(PLUGINS, core::ptr::null(), c"org.clasp.failing".as_ptr()),
                Err(FactoryError::NulHost)
            ));
            assert!(matches!(
                create_plugin(PLUGINS, &host, core::ptr::null()),
                Err(FactoryError::NulPluginId)
            ));
            assert!(matches!(
                create_plugin(PLUGINS, &host, c"org.clasp.unknown".as_ptr()),
                Err(FactoryError::UnknownPluginId(_))
            ));
        }
    }

    #[test]
    fn incompatible_hosts_are_rejected() {
        let host = host(clap_version {
            major: CLAP_VERSION.major + 1,
            minor: 0,
            revision: 0,
        });

        // SAFETY: all pointers are valid
        let result = unsafe { create_plugin(PLUGINS, &host, c"org.clasp.failing".as_ptr()) };
        assert!(matches!(
            result,
            Err(FactoryError::IncompatibleHostVersion(_))
        ));
    }

    #[test]
    fn constructor_errors_are_reported() {
        let host = host(CLAP_VERSION);

        // SAFETY: all pointers are valid
        let result = unsafe { create_plugin(PLUGINS, &host, c"org.clasp.failing".as_ptr()) };
        assert!(matches!(result, Err(FactoryError::PluginCreation(_))));
    }
}
