//! Handles plugins use to interact with their host.
//!
//! The handle types reflect the thread the plugin is running on:
//!
//! * [`HostHandle`] is [`Send`] and [`Sync`], and can be used from any thread. It can be stored
//!   for the lifetime of the plugin instance (e.g. in the audio processor).
//! * [`HostMainThreadHandle`] is only available on the main thread, during a call from the host.
//! * [`InitializingHostHandle`] is only available during [`Plugin::init`](crate::plugin::Plugin::init),
//!   and is the only handle allowed to query extensions from the host.

use crate::extensions::{Extension, HostExtensionSide, RawExtension};
use crate::plugin::LifecycleState;
use crate::ports::ChannelMap;
use crate::track_info::TrackInfo;
use clasp_common::log::LogSeverity;
use clasp_common::utils::cstr_from_nullable_ptr;
use clasp_common::version::ClapVersion;
use clasp_sys::host::clap_host;
use std::marker::PhantomData;
use std::ptr::NonNull;

mod capabilities;
mod shared;

pub(crate) use capabilities::*;
pub(crate) use shared::*;

/// Information about the host, as given at instantiation.
#[derive(Copy, Clone)]
pub struct HostInfo<'a> {
    raw: &'a clap_host,
}

impl<'a> HostInfo<'a> {
    /// # Safety
    ///
    /// The host's name, vendor, url and version fields must be null or valid C strings.
    #[inline]
    pub unsafe fn from_raw(raw: &'a clap_host) -> Self {
        Self { raw }
    }

    #[inline]
    pub fn clap_version(&self) -> ClapVersion {
        ClapVersion::from_raw(self.raw.clap_version)
    }

    #[inline]
    pub fn name(&self) -> Option<&'a str> {
        self.read_str(self.raw.name)
    }

    #[inline]
    pub fn vendor(&self) -> Option<&'a str> {
        self.read_str(self.raw.vendor)
    }

    #[inline]
    pub fn url(&self) -> Option<&'a str> {
        self.read_str(self.raw.url)
    }

    #[inline]
    pub fn version(&self) -> Option<&'a str> {
        self.read_str(self.raw.version)
    }

    #[inline]
    fn read_str(&self, ptr: *const std::ffi::c_char) -> Option<&'a str> {
        // SAFETY: the strings are either null or valid, per from_raw's contract.
        unsafe { cstr_from_nullable_ptr(ptr) }?.to_str().ok()
    }
}

/// A thread-safe handle to the host.
///
/// This handle is valid for the lifetime of the plugin instance it was given to.
#[derive(Copy, Clone)]
pub struct HostHandle {
    shared: NonNull<InstanceShared>,
}

// SAFETY: InstanceShared only holds thread-safe state, and the host methods this handle exposes
// are all thread-safe.
unsafe impl Send for HostHandle {}
// SAFETY: same as above.
unsafe impl Sync for HostHandle {}

impl HostHandle {
    #[inline]
    pub(crate) fn new(shared: &InstanceShared) -> Self {
        Self {
            shared: NonNull::from(shared),
        }
    }

    #[inline]
    pub(crate) fn shared(&self) -> &InstanceShared {
        // SAFETY: the instance outlives every handle given to the plugin.
        unsafe { self.shared.as_ref() }
    }

    #[inline]
    pub fn info(&self) -> HostInfo<'_> {
        // SAFETY: the host pointer was checked by the factory.
        unsafe { HostInfo::from_raw(self.as_raw()) }
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_host {
        self.shared().host()
    }

    /// Asks the host to deactivate and then reactivate the plugin.
    #[inline]
    pub fn request_restart(&self) {
        if let Some(request_restart) = self.as_raw().request_restart {
            // SAFETY: this function is thread-safe.
            unsafe { request_restart(self.as_raw()) }
        }
    }

    /// Asks the host to activate the plugin and start processing.
    #[inline]
    pub fn request_process(&self) {
        if let Some(request_process) = self.as_raw().request_process {
            // SAFETY: this function is thread-safe.
            unsafe { request_process(self.as_raw()) }
        }
    }

    /// Logs a message through the host's logger, or to the standard error output if the host
    /// doesn't have one.
    #[inline]
    pub fn log(&self, severity: LogSeverity, message: &str) {
        self.shared().log(severity, message)
    }

    /// Reports a violation of the protocol by the host.
    #[inline]
    pub fn host_misbehaving(&self, message: &str) {
        self.shared().host_misbehaving(message)
    }

    #[inline]
    pub fn can_use_host_log(&self) -> bool {
        self.shared().capabilities().log.is_some()
    }

    #[inline]
    pub fn can_use_thread_check(&self) -> bool {
        self.shared().capabilities().thread_check.is_some()
    }

    #[inline]
    pub fn can_use_thread_pool(&self) -> bool {
        self.shared().capabilities().thread_pool.is_some()
    }

    #[inline]
    pub fn can_use_track_info(&self) -> bool {
        self.shared().capabilities().track_info.is_some()
    }

    /// Whether the host can be notified of audio port changes.
    #[inline]
    pub fn can_change_audio_ports(&self) -> bool {
        self.shared().capabilities().audio_ports.is_some()
    }

    /// Returns `None` if the host can't tell.
    #[inline]
    pub fn is_main_thread(&self) -> Option<bool> {
        self.shared().is_main_thread()
    }

    /// Returns `None` if the host can't tell.
    #[inline]
    pub fn is_audio_thread(&self) -> Option<bool> {
        self.shared().is_audio_thread()
    }

    #[inline]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.shared().state.load()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.lifecycle_state().is_active()
    }

    #[inline]
    pub fn is_processing(&self) -> bool {
        self.lifecycle_state() == LifecycleState::ActiveProcessing
    }

    /// The sample rate the plugin was activated with, if it is active.
    #[inline]
    pub fn sample_rate(&self) -> Option<u32> {
        self.shared().sample_rate()
    }
}

/// A handle to the host, only available on the main thread.
#[derive(Copy, Clone)]
pub struct HostMainThreadHandle<'a> {
    host: HostHandle,
    track_info: Option<&'a TrackInfo>,
    _not_send: PhantomData<*const clap_host>,
}

impl<'a> HostMainThreadHandle<'a> {
    #[inline]
    pub(crate) fn new(shared: &'a InstanceShared, track_info: Option<&'a TrackInfo>) -> Self {
        Self {
            host: HostHandle::new(shared),
            track_info,
            _not_send: PhantomData,
        }
    }

    #[inline]
    pub fn shared(&self) -> HostHandle {
        self.host
    }

    /// The last track information received from the host, if any.
    #[inline]
    pub fn track_info(&self) -> Option<&'a TrackInfo> {
        self.track_info
    }

    /// The channel count of the track, or [`TrackInfo::DEFAULT_CHANNEL_COUNT`] if unknown.
    #[inline]
    pub fn track_channel_count(&self) -> u32 {
        self.track_info
            .map(|t| t.channel_count)
            .unwrap_or(TrackInfo::DEFAULT_CHANNEL_COUNT)
    }

    /// The channel map of the track, or [`TrackInfo::DEFAULT_CHANNEL_MAP`] if unknown.
    #[inline]
    pub fn track_channel_map(&self) -> ChannelMap {
        self.track_info
            .map(|t| t.channel_map)
            .unwrap_or(TrackInfo::DEFAULT_CHANNEL_MAP)
    }

    /// Requests the audio ports to be re-defined through
    /// [`Plugin::define_audio_ports`](crate::plugin::Plugin::define_audio_ports).
    ///
    /// If the plugin is inactive, this happens as soon as the current call from the host returns.
    /// Otherwise, it happens on the next deactivation. Either way, the host is only notified if
    /// the ports actually changed.
    #[inline]
    pub fn invalidate_audio_ports_definition(&self) {
        self.host.shared().request_audio_ports_invalidation()
    }
}

/// A handle to the host, only available during the plugin's initialization.
pub struct InitializingHostHandle<'a> {
    main_thread: HostMainThreadHandle<'a>,
}

impl<'a> InitializingHostHandle<'a> {
    #[inline]
    pub(crate) fn new(main_thread: HostMainThreadHandle<'a>) -> Self {
        Self { main_thread }
    }

    #[inline]
    pub fn main_thread(&self) -> HostMainThreadHandle<'a> {
        self.main_thread
    }

    #[inline]
    pub fn shared(&self) -> HostHandle {
        self.main_thread.shared()
    }

    /// Queries an extension from the host.
    ///
    /// The returned handle can be stored and used for the lifetime of the plugin instance.
    #[inline]
    pub fn get_extension<E: Extension<ExtensionSide = HostExtensionSide>>(&self) -> Option<E> {
        let host = self.shared().shared().host_ptr();

        // SAFETY: the host is initializing the plugin, so it can be queried for extensions.
        unsafe { query_host_extension(host) }
    }
}

/// # Safety
///
/// The host pointer must be valid, and the plugin must be initializing.
pub(crate) unsafe fn query_host_extension<E: Extension<ExtensionSide = HostExtensionSide>>(
    host: NonNull<clap_host>,
) -> Option<E> {
    // SAFETY: upheld by caller
    let extension = unsafe { host.as_ref() }.extension?;
    // SAFETY: upheld by caller
    let ptr = unsafe { extension(host.as_ptr(), E::IDENTIFIER.as_ptr()) };
    let ptr = NonNull::new(ptr.cast_mut())?;

    // SAFETY: the host returned this pointer for the extension's identifier.
    Some(unsafe { E::from_raw(RawExtension::<HostExtensionSide>::from_raw(ptr.cast(), host)) })
}
