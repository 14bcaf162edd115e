use crate::extensions::thread_pool::ThreadPoolTasks;
use crate::host::HostCapabilities;
use crate::plugin::AtomicLifecycleState;
use clasp_sys::host::clap_host;
use std::ptr::NonNull;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// The state of a plugin instance that is shared between all threads.
pub(crate) struct InstanceShared {
    host: NonNull<clap_host>,
    capabilities: OnceLock<HostCapabilities>,
    pub state: AtomicLifecycleState,
    sample_rate: AtomicU32,
    audio_ports_invalidation_requested: AtomicBool,
    main_thread_busy: AtomicBool,
    pub thread_pool_tasks: ThreadPoolTasks,
}

// SAFETY: the host pointer is only used to call thread-safe host functions, or main-thread
// functions from the main thread. Everything else is thread-safe.
unsafe impl Send for InstanceShared {}
// SAFETY: same as above.
unsafe impl Sync for InstanceShared {}

impl InstanceShared {
    pub fn new(host: NonNull<clap_host>) -> Self {
        Self {
            host,
            capabilities: OnceLock::new(),
            state: AtomicLifecycleState::new(),
            sample_rate: AtomicU32::new(0),
            audio_ports_invalidation_requested: AtomicBool::new(false),
            main_thread_busy: AtomicBool::new(false),
            thread_pool_tasks: ThreadPoolTasks::new(),
        }
    }

    #[inline]
    pub fn host(&self) -> &clap_host {
        // SAFETY: the host outlives all of its plugin instances.
        unsafe { self.host.as_ref() }
    }

    #[inline]
    pub fn host_ptr(&self) -> NonNull<clap_host> {
        self.host
    }

    /// The cached host capabilities. Those are all absent until the instance is initialized.
    #[inline]
    pub fn capabilities(&self) -> &HostCapabilities {
        static NO_CAPABILITIES: HostCapabilities = HostCapabilities::NONE;

        self.capabilities.get().unwrap_or(&NO_CAPABILITIES)
    }

    /// Caches the capabilities. Only the first call has any effect.
    #[inline]
    pub fn set_capabilities(&self, capabilities: HostCapabilities) {
        let _ = self.capabilities.set(capabilities);
    }

    #[inline]
    pub fn sample_rate(&self) -> Option<u32> {
        match self.sample_rate.load(Ordering::Acquire) {
            0 => None,
            rate => Some(rate),
        }
    }

    #[inline]
    pub fn set_sample_rate(&self, sample_rate: Option<u32>) {
        self.sample_rate
            .store(sample_rate.unwrap_or(0), Ordering::Release)
    }

    #[inline]
    pub fn request_audio_ports_invalidation(&self) {
        self.audio_ports_invalidation_requested
            .store(true, Ordering::Release)
    }

    /// Clears the pending invalidation request, returning whether there was one.
    #[inline]
    pub fn take_audio_ports_invalidation_request(&self) -> bool {
        self.audio_ports_invalidation_requested
            .swap(false, Ordering::AcqRel)
    }

    /// Marks the main-thread state as in use, until the returned guard is dropped.
    ///
    /// Returns `None` if it already is, i.e. if the host called back into the plugin from within
    /// a call the plugin made.
    #[inline]
    pub fn enter_main_thread(&self) -> Option<MainThreadGuard<'_>> {
        self.main_thread_busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()?;

        Some(MainThreadGuard(&self.main_thread_busy))
    }
}

pub(crate) struct MainThreadGuard<'a>(&'a AtomicBool);

impl Drop for MainThreadGuard<'_> {
    #[inline]
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clasp_sys::host::clap_host;
    use clasp_sys::version::CLAP_VERSION;

    fn host() -> clap_host {
        clap_host {
            clap_version: CLAP_VERSION,
            host_data: core::ptr::null_mut(),
            name: core::ptr::null(),
            vendor: core::ptr::null(),
            url: core::ptr::null(),
            version: core::ptr::null(),
            extension: None,
            request_restart: None,
            request_process: None,
        }
    }

    #[test]
    fn main_thread_guard_refuses_reentrancy() {
        let host = host();
        let shared = InstanceShared::new(NonNull::from(&host));

        let guard = shared.enter_main_thread();
        assert!(guard.is_some());
        assert!(shared.enter_main_thread().is_none());

        drop(guard);
        assert!(shared.enter_main_thread().is_some());
    }

    #[test]
    fn invalidation_request_is_sticky_until_taken() {
        let host = host();
        let shared = InstanceShared::new(NonNull::from(&host));

        assert!(!shared.take_audio_ports_invalidation_request());
        shared.request_audio_ports_invalidation();
        shared.request_audio_ports_invalidation();
        assert!(shared.take_audio_ports_invalidation_request());
        assert!(!shared.take_audio_ports_invalidation_request());
    }

    #[test]
    fn capabilities_are_absent_before_init() {
        let host = host();
        let shared = InstanceShared::new(NonNull::from(&host));

        assert!(shared.capabilities().log.is_none());
        assert_eq!(shared.sample_rate(), None);
    }
}
