//! The host side of the harness: a `clap_host` table backed by shared, inspectable state.

use crate::config::{TestHostConfig, ThreadPoolMode};
use crate::error::TestHostError;
use clasp_common::log::LogSeverity;
use clasp_common::track_info::TrackInfo;
use clasp_plugin::extensions::thread_pool::PluginThreadPool;
use clasp_sys::host::clap_host;
use std::cell::Cell;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::ThreadId;

mod tables;

thread_local! {
    static IS_AUDIO_THREAD: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as an audio thread until dropped.
#[must_use]
pub struct AudioThreadGuard {
    previous: bool,
    _not_send: PhantomData<*const ()>,
}

impl AudioThreadGuard {
    pub fn enter() -> Self {
        Self {
            previous: IS_AUDIO_THREAD.replace(true),
            _not_send: PhantomData,
        }
    }
}

impl Drop for AudioThreadGuard {
    fn drop(&mut self) {
        IS_AUDIO_THREAD.set(self.previous);
    }
}

/// Returns `true` if the current thread is considered an audio thread by the host.
#[inline]
pub fn is_audio_thread() -> bool {
    IS_AUDIO_THREAD.get()
}

/// A message logged by the plugin.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogEntry {
    /// [`None`] if the plugin used a severity the host doesn't know.
    pub severity: Option<LogSeverity>,
    pub message: String,
}

/// A call the plugin made into the host.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum HostCall {
    RequestRestart,
    RequestProcess,
    AudioPortsInvalidated,
    TrackInfoQueried,
    ThreadPoolRequest(u32),
    StateMarkedDirty,
    LatencyChanged,
    ParamsRescan(u32),
    ParamsClear { param_id: u32, flags: u32 },
    ParamsFlushRequested,
    GuiResize { width: u32, height: u32 },
    NoteNamesChanged,
    EventFilterChanged,
    FileReferencesChanged,
    FileReferenceDirty(u32),
    TimerRegistered { timer_id: u32, period_ms: u32 },
    TimerUnregistered(u32),
    FdRegistered { flags: u32 },
    FdModified { flags: u32 },
    FdUnregistered,
}

pub(crate) struct HostShared {
    raw: clap_host,
    config: TestHostConfig,
    main_thread: ThreadId,
    logs: Mutex<Vec<LogEntry>>,
    calls: Mutex<Vec<HostCall>>,
    audio_ports_invalidations: AtomicU32,
    track_info: Mutex<Option<TrackInfo>>,
    rayon_pool: Option<rayon::ThreadPool>,
    plugin_thread_pool: Mutex<Option<PluginThreadPool>>,
    next_timer_id: AtomicU32,
}

// SAFETY: the raw host table is never mutated after construction, and its pointers are either
// static strings or point back to this structure.
unsafe impl Send for HostShared {}
// SAFETY: same as above, every other field is thread-safe.
unsafe impl Sync for HostShared {}

#[inline]
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HostShared {
    /// # Safety
    ///
    /// The host pointer must be null, or come from a live [`TestHost`].
    #[inline]
    unsafe fn from_raw<'a>(host: *const clap_host) -> Option<&'a Self> {
        // SAFETY: upheld by caller, host_data always points to the owning HostShared.
        unsafe { host.as_ref()?.host_data.cast_const().cast::<Self>().as_ref() }
    }

    fn record(&self, call: HostCall) {
        lock(&self.calls).push(call);
    }
}

/// A host instance, to be given to a single plugin instance at a time.
///
/// Cloning the handle shares the same host.
#[derive(Clone)]
pub struct TestHost {
    shared: Arc<HostShared>,
}

impl TestHost {
    /// Creates a new host. The calling thread becomes the host's main thread.
    pub fn new(config: TestHostConfig) -> Result<Self, TestHostError> {
        let rayon_pool = match config.thread_pool {
            ThreadPoolMode::Rayon(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("clasp-test-host-worker-{i}"))
                    .start_handler(|_| IS_AUDIO_THREAD.set(true))
                    .build()?,
            ),
            _ => None,
        };

        let shared = Arc::new_cyclic(|this: &Weak<HostShared>| HostShared {
            raw: clap_host {
                clap_version: config.clap_version.to_raw(),
                host_data: this.as_ptr().cast_mut().cast(),
                name: c"clasp-test-host".as_ptr(),
                vendor: c"clasp".as_ptr(),
                url: c"".as_ptr(),
                version: c"0.1.0".as_ptr(),
                extension: Some(tables::get_extension),
                request_restart: Some(tables::request_restart),
                request_process: Some(tables::request_process),
            },
            main_thread: std::thread::current().id(),
            logs: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            audio_ports_invalidations: AtomicU32::new(0),
            track_info: Mutex::new(config.initial_track_info.clone()),
            rayon_pool,
            plugin_thread_pool: Mutex::new(None),
            next_timer_id: AtomicU32::new(1),
            config,
        });

        Ok(Self { shared })
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_host {
        &self.shared.raw
    }

    #[inline]
    pub fn config(&self) -> &TestHostConfig {
        &self.shared.config
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        lock(&self.shared.logs).clone()
    }

    /// The messages logged with the given severity, in order.
    pub fn messages_with_severity(&self, severity: LogSeverity) -> Vec<String> {
        lock(&self.shared.logs)
            .iter()
            .filter(|e| e.severity == Some(severity))
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        lock(&self.shared.calls).clone()
    }

    pub fn count_calls(&self, call: HostCall) -> usize {
        lock(&self.shared.calls).iter().filter(|c| **c == call).count()
    }

    /// Forgets every recorded log and call.
    pub fn clear_records(&self) {
        lock(&self.shared.logs).clear();
        lock(&self.shared.calls).clear();
    }

    /// How many times the plugin notified the audio ports changed.
    #[inline]
    pub fn audio_ports_invalidations(&self) -> u32 {
        self.shared.audio_ports_invalidations.load(Ordering::SeqCst)
    }

    /// Changes what the host reports for the plugin's track.
    ///
    /// The plugin isn't notified until [`TestInstance::notify_track_info_changed`](crate::TestInstance::notify_track_info_changed)
    /// is called.
    pub fn set_track_info(&self, info: Option<TrackInfo>) {
        *lock(&self.shared.track_info) = info;
    }

    /// The plugin thread pool `request_exec` dispatches to.
    pub(crate) fn set_plugin_thread_pool(&self, thread_pool: Option<PluginThreadPool>) {
        *lock(&self.shared.plugin_thread_pool) = thread_pool;
    }
}
