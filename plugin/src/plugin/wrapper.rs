//! The adapter binding a [`Plugin`] implementation to the raw `clap_plugin` table.
//!
//! Every raw function exposed to the host goes through one of the `handle*` methods of
//! [`PluginWrapper`], which retrieve the instance from the raw pointer, check which thread they
//! are called on, catch panics, and log any error to the host.

use crate::extensions::ExtensionRegistry;
use crate::extensions::thread_pool::ThreadPoolTasks;
use crate::factory::FactoryError;
use crate::host::{HostHandle, HostMainThreadHandle, InstanceShared};
use crate::plugin::{AudioPorts, LifecycleState, Plugin, PluginError, instance};
use crate::track_info::TrackInfo;
use clasp_common::log::LogSeverity;
use clasp_sys::host::clap_host;
use clasp_sys::plugin::clap_plugin;
use std::cell::UnsafeCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::mem::ManuallyDrop;
use std::panic::AssertUnwindSafe;
use std::ptr::NonNull;

pub(crate) mod panic {
    #[cfg(not(test))]
    pub use std::panic::catch_unwind;

    #[cfg(test)]
    #[inline]
    pub fn catch_unwind<F: FnOnce() -> R + std::panic::UnwindSafe, R>(
        f: F,
    ) -> std::thread::Result<R> {
        Ok(f())
    }
}

/// The main-thread state the wrapper keeps alongside the plugin.
#[derive(Default)]
pub(crate) struct MainThreadData {
    pub audio_ports: AudioPorts,
    pub track_info: Option<TrackInfo>,
}

/// A plugin instance, as exposed to the host.
pub struct PluginWrapper<P: Plugin> {
    raw: clap_plugin,
    extensions: ExtensionRegistry,
    audio_processor: UnsafeCell<Option<P::AudioProcessor>>,
    plugin: UnsafeCell<ManuallyDrop<P>>,
    main_thread_data: UnsafeCell<MainThreadData>,
    shared: NonNull<InstanceShared>,
}

impl<P: Plugin> PluginWrapper<P> {
    /// Creates a new instance of the plugin, returning the pointer the host uses to refer to it.
    ///
    /// The instance is freed by the `destroy` function of the returned table.
    pub(crate) fn create(host: NonNull<clap_host>) -> Result<NonNull<clap_plugin>, FactoryError> {
        let shared = NonNull::from(Box::leak(Box::new(InstanceShared::new(host))));

        let created = panic::catch_unwind(AssertUnwindSafe(|| {
            // SAFETY: the shared state was just allocated, and is only freed with the instance.
            let plugin = P::new(HostHandle::new(unsafe { shared.as_ref() }))?;
            let extensions = ExtensionRegistry::new(&plugin);

            Ok::<_, PluginError>((plugin, extensions))
        }));

        let (plugin, extensions) = match created {
            Ok(Ok(created)) => created,
            Ok(Err(e)) => {
                // SAFETY: the plugin wasn't created, so nothing else refers to the shared state.
                drop(unsafe { Box::from_raw(shared.as_ptr()) });
                return Err(FactoryError::PluginCreation(e));
            }
            Err(_) => {
                // SAFETY: same as above.
                drop(unsafe { Box::from_raw(shared.as_ptr()) });
                return Err(FactoryError::Panic);
            }
        };

        let wrapper = Box::into_raw(Box::new(Self {
            raw: instance::raw_plugin::<P>(),
            extensions,
            audio_processor: UnsafeCell::new(None),
            plugin: UnsafeCell::new(ManuallyDrop::new(plugin)),
            main_thread_data: UnsafeCell::new(MainThreadData::default()),
            shared,
        }));

        // SAFETY: the pointer was just created from a Box, and is never moved afterwards.
        unsafe {
            (*wrapper).raw.plugin_data = wrapper.cast();
            Ok(NonNull::new_unchecked(&raw mut (*wrapper).raw))
        }
    }

    #[inline]
    pub(crate) fn shared(&self) -> &InstanceShared {
        // SAFETY: the shared state lives as long as the wrapper.
        unsafe { self.shared.as_ref() }
    }

    /// A thread-safe handle to the host of this instance.
    #[inline]
    pub fn host(&self) -> HostHandle {
        HostHandle::new(self.shared())
    }

    /// Reports the host calling `method` outside of the main thread, if it can tell.
    #[inline]
    pub fn ensure_main_thread(&self, method: &str) {
        self.shared().ensure_main_thread(method)
    }

    /// Reports the host calling `method` outside of an audio thread, if it can tell.
    #[inline]
    pub fn ensure_audio_thread(&self, method: &str) {
        self.shared().ensure_audio_thread(method)
    }

    #[inline]
    pub(crate) fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    #[inline]
    pub(crate) fn thread_pool_tasks(&self) -> &ThreadPoolTasks {
        &self.shared().thread_pool_tasks
    }

    /// # Safety
    ///
    /// Must only be called on the main thread, while holding the main-thread guard.
    #[inline]
    pub(crate) unsafe fn main_thread_parts(&self) -> (&mut P, HostMainThreadHandle<'_>) {
        // SAFETY: upheld by caller
        let data = unsafe { &*self.main_thread_data.get() };
        // SAFETY: upheld by caller
        let plugin = unsafe { &mut **self.plugin.get() };

        (
            plugin,
            HostMainThreadHandle::new(self.shared(), data.track_info.as_ref()),
        )
    }

    /// # Safety
    ///
    /// Must only be called on the main thread, while holding the main-thread guard.
    #[inline]
    pub(crate) unsafe fn main_thread_data_mut(&self) -> &mut MainThreadData {
        // SAFETY: upheld by caller
        unsafe { &mut *self.main_thread_data.get() }
    }

    /// # Safety
    ///
    /// Must only be called on the main thread, while holding the main-thread guard.
    #[inline]
    pub(crate) unsafe fn audio_ports(&self) -> &AudioPorts {
        // SAFETY: upheld by caller
        unsafe { &(*self.main_thread_data.get()).audio_ports }
    }

    /// # Safety
    ///
    /// The caller must have exclusive access to the audio processor: either from the audio thread
    /// while the plugin is active, or from the main thread during (de)activation.
    #[inline]
    pub(crate) unsafe fn audio_processor_slot(&self) -> &mut Option<P::AudioProcessor> {
        // SAFETY: upheld by caller
        unsafe { &mut *self.audio_processor.get() }
    }

    /// # Safety
    ///
    /// Same as [`audio_processor_slot`](Self::audio_processor_slot).
    #[inline]
    pub(crate) unsafe fn audio_processor(
        &self,
        method: &'static str,
    ) -> Result<&mut P::AudioProcessor, PluginWrapperError> {
        // SAFETY: upheld by caller
        unsafe { self.audio_processor_slot() }
            .as_mut()
            .ok_or_else(|| PluginWrapperError::InvalidState {
                method,
                state: self.shared().state.load(),
            })
    }

    /// Retrieves the wrapper from the pointer given by the host.
    ///
    /// # Safety
    ///
    /// The plugin pointer must be null, or point to an instance created by [`create`](Self::create)
    /// that is still alive.
    pub(crate) unsafe fn from_raw<'a>(
        plugin: *const clap_plugin,
    ) -> Result<&'a Self, PluginWrapperError> {
        // SAFETY: upheld by caller
        unsafe {
            plugin
                .as_ref()
                .ok_or(PluginWrapperError::NulPluginDesc)?
                .plugin_data
                .cast::<Self>()
                .as_ref()
                .ok_or(PluginWrapperError::NulPluginData)
        }
    }

    /// Handles a call from the host that can happen on any thread.
    ///
    /// Panics are caught, and errors are logged to the host. Returns `None` on failure.
    ///
    /// # Safety
    ///
    /// The plugin pointer must be valid.
    pub unsafe fn handle<T, F>(plugin: *const clap_plugin, handler: F) -> Option<T>
    where
        F: FnOnce(&Self) -> Result<T, PluginWrapperError>,
    {
        // SAFETY: upheld by caller
        let wrapper = match unsafe { Self::from_raw(plugin) } {
            Ok(wrapper) => wrapper,
            Err(e) => {
                report_without_host(&e);
                return None;
            }
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| handler(wrapper)))
            .unwrap_or(Err(PluginWrapperError::Panic));

        wrapper.unwrap_or_log(result)
    }

    /// Handles a main-thread call from the host, giving access to the plugin.
    ///
    /// On top of what [`handle`](Self::handle) does, this checks the call happens on the main
    /// thread, refuses re-entrant calls, and processes any audio ports invalidation the plugin
    /// requested once the handler returns.
    ///
    /// # Safety
    ///
    /// The plugin pointer must be valid.
    pub unsafe fn handle_main_thread<T, F>(
        plugin: *const clap_plugin,
        method: &'static str,
        handler: F,
    ) -> Option<T>
    where
        F: FnOnce(&mut P, HostMainThreadHandle) -> Result<T, PluginWrapperError>,
    {
        // SAFETY: upheld by caller
        unsafe {
            Self::handle_wrapper_main_thread(plugin, method, |wrapper| {
                let (plugin, host) = wrapper.main_thread_parts();
                handler(plugin, host)
            })
        }
    }

    /// Handles an audio-thread call from the host, giving access to the audio processor.
    ///
    /// Fails if the plugin isn't active.
    ///
    /// # Safety
    ///
    /// The plugin pointer must be valid.
    pub unsafe fn handle_audio_processor<T, F>(
        plugin: *const clap_plugin,
        method: &'static str,
        handler: F,
    ) -> Option<T>
    where
        F: FnOnce(&mut P::AudioProcessor, HostHandle) -> Result<T, PluginWrapperError>,
    {
        // SAFETY: upheld by caller
        unsafe {
            Self::handle(plugin, |wrapper| {
                wrapper.ensure_audio_thread(method);

                let state = wrapper.shared().state.load();
                if !state.is_active() {
                    return Err(PluginWrapperError::InvalidState { method, state });
                }

                handler(wrapper.audio_processor(method)?, wrapper.host())
            })
        }
    }

    /// Handles a call that goes to the audio processor while the plugin is active, and to the
    /// plugin on the main thread otherwise.
    ///
    /// # Safety
    ///
    /// The plugin pointer must be valid.
    pub unsafe fn handle_audio_processor_or_main_thread<T, A, M>(
        plugin: *const clap_plugin,
        method: &'static str,
        on_audio_processor: A,
        on_main_thread: M,
    ) -> Option<T>
    where
        A: FnOnce(&mut P::AudioProcessor, HostHandle) -> Result<T, PluginWrapperError>,
        M: FnOnce(&mut P, HostMainThreadHandle) -> Result<T, PluginWrapperError>,
    {
        // SAFETY: upheld by caller
        let is_active = match unsafe { Self::from_raw(plugin) } {
            Ok(wrapper) => wrapper.shared().state.load().is_active(),
            Err(e) => {
                report_without_host(&e);
                return None;
            }
        };

        // SAFETY: upheld by caller
        unsafe {
            if is_active {
                Self::handle_audio_processor(plugin, method, on_audio_processor)
            } else {
                Self::handle_main_thread(plugin, method, on_main_thread)
            }
        }
    }

    /// Same as [`handle_main_thread`](Self::handle_main_thread), but gives access to the whole
    /// wrapper.
    ///
    /// # Safety
    ///
    /// The plugin pointer must be valid.
    pub(crate) unsafe fn handle_wrapper_main_thread<T, F>(
        plugin: *const clap_plugin,
        method: &'static str,
        handler: F,
    ) -> Option<T>
    where
        F: FnOnce(&Self) -> Result<T, PluginWrapperError>,
    {
        // SAFETY: upheld by caller
        let wrapper = match unsafe { Self::from_raw(plugin) } {
            Ok(wrapper) => wrapper,
            Err(e) => {
                report_without_host(&e);
                return None;
            }
        };

        wrapper.ensure_main_thread(method);

        let Some(guard) = wrapper.shared().enter_main_thread() else {
            return wrapper.unwrap_or_log(Err(PluginWrapperError::Reentrant(method)));
        };

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            // SAFETY: we are on the main thread, and hold the guard.
            unsafe {
                let changed_before = wrapper.flush_audio_ports();
                let result = handler(wrapper);
                let changed_after = wrapper.flush_audio_ports();

                (result, changed_before || changed_after)
            }
        }));

        // The host may call back into the plugin when notified.
        drop(guard);

        let result = match result {
            Ok((result, ports_changed)) => {
                if ports_changed {
                    wrapper.notify_audio_ports_changed();
                }
                result
            }
            Err(_) => Err(PluginWrapperError::Panic),
        };

        wrapper.unwrap_or_log(result)
    }

    fn unwrap_or_log<T>(&self, result: Result<T, PluginWrapperError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.shared().log(e.severity(), &e.to_string());
                None
            }
        }
    }

    /// Re-defines the audio ports if an invalidation was requested and the plugin is inactive.
    ///
    /// Returns `true` if the host has to be notified.
    ///
    /// # Safety
    ///
    /// Must only be called on the main thread, while holding the main-thread guard.
    pub(crate) unsafe fn flush_audio_ports(&self) -> bool {
        if !self.shared().state.load().is_inactive() {
            return false;
        }

        if !self.shared().take_audio_ports_invalidation_request() {
            return false;
        }

        // SAFETY: upheld by caller
        unsafe { self.redefine_audio_ports() }
    }

    /// Returns `true` if the new definition is structurally different from the previous one.
    ///
    /// # Safety
    ///
    /// Must only be called on the main thread, while holding the main-thread guard.
    pub(crate) unsafe fn redefine_audio_ports(&self) -> bool {
        // SAFETY: upheld by caller
        let ports = unsafe {
            let (plugin, host) = self.main_thread_parts();
            AudioPorts::define(&*plugin, &host)
        };

        // SAFETY: upheld by caller
        unsafe { self.main_thread_data_mut() }
            .audio_ports
            .replace(ports)
    }

    /// Must only be called on the main thread, without holding the main-thread guard.
    fn notify_audio_ports_changed(&self) {
        match self.shared().capabilities().audio_ports {
            Some(audio_ports) => {
                audio_ports.invalidate_all(&HostMainThreadHandle::new(self.shared(), None))
            }
            None => self.shared().log(
                LogSeverity::Warning,
                "The audio ports changed, but the host can't be notified",
            ),
        }
    }
}

impl<P: Plugin> Drop for PluginWrapper<P> {
    fn drop(&mut self) {
        // The plugin and its audio processor may use their host handles while being dropped.
        drop(self.audio_processor.get_mut().take());

        // SAFETY: the plugin is never used again.
        unsafe { ManuallyDrop::drop(self.plugin.get_mut()) };

        // SAFETY: the shared state was allocated by create(), and the plugin, which holds all the
        // handles pointing to it, is gone.
        drop(unsafe { Box::from_raw(self.shared.as_ptr()) });
    }
}

/// Used when the instance can't be retrieved, and therefore neither can the host's logger.
#[cold]
pub(crate) fn report_without_host(e: &PluginWrapperError) {
    eprintln!("[CLASP_PLUGIN_ERROR] {e}");
}

/// Errors raised by the wrapper when handling a call from the host.
#[derive(Debug)]
pub enum PluginWrapperError {
    /// The host passed a null `clap_plugin` pointer.
    NulPluginDesc,
    /// The host passed a `clap_plugin` with a null `plugin_data` pointer.
    NulPluginData,
    /// The host passed another null pointer.
    NulPtr(&'static str),
    /// The host called a method the current lifecycle state doesn't allow.
    InvalidState {
        method: &'static str,
        state: LifecycleState,
    },
    /// The host tried to activate the plugin with a zero or negative sample rate.
    InvalidSampleRate(i32),
    /// The host called a main-thread method from within a call made by the plugin.
    Reentrant(&'static str),
    /// The plugin panicked.
    Panic,
    /// The plugin returned an error.
    Plugin(PluginError),
    /// Any other error, with a custom severity.
    Any(LogSeverity, Box<dyn Error + Send + Sync>),
}

impl PluginWrapperError {
    pub fn severity(&self) -> LogSeverity {
        match self {
            PluginWrapperError::Plugin(_) => LogSeverity::Error,
            PluginWrapperError::Panic => LogSeverity::PluginMisbehaving,
            PluginWrapperError::Any(s, _) => *s,
            _ => LogSeverity::HostMisbehaving,
        }
    }

    #[inline]
    pub fn with_severity<E: Error + Send + Sync + 'static>(
        severity: LogSeverity,
    ) -> impl Fn(E) -> PluginWrapperError {
        move |e| PluginWrapperError::Any(severity, Box::new(e))
    }
}

impl From<PluginError> for PluginWrapperError {
    #[inline]
    fn from(e: PluginError) -> Self {
        PluginWrapperError::Plugin(e)
    }
}

impl Display for PluginWrapperError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginWrapperError::NulPluginDesc => {
                f.write_str("Plugin method was called with null clap_plugin pointer")
            }
            PluginWrapperError::NulPluginData => {
                f.write_str("Plugin method was called with null clap_plugin.plugin_data pointer")
            }
            PluginWrapperError::NulPtr(ptr_name) => {
                write!(f, "Plugin method was called with null {ptr_name} pointer")
            }
            PluginWrapperError::InvalidState { method, state } => {
                write!(f, "Host called {method} while the plugin was {state}")
            }
            PluginWrapperError::InvalidSampleRate(rate) => {
                write!(f, "Host tried to activate the plugin with a sample rate of {rate}")
            }
            PluginWrapperError::Reentrant(method) => write!(
                f,
                "Host called {method} from within a call made by the plugin"
            ),
            PluginWrapperError::Panic => f.write_str("Plugin panicked"),
            PluginWrapperError::Plugin(e) => Display::fmt(e, f),
            PluginWrapperError::Any(_, e) => Display::fmt(e, f),
        }
    }
}

impl Error for PluginWrapperError {}
