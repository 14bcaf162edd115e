//! The lifecycle functions of the raw `clap_plugin` table.

use crate::host::{HostCapabilities, HostMainThreadHandle, InitializingHostHandle};
use crate::plugin::wrapper::{PluginWrapper, PluginWrapperError, panic, report_without_host};
use crate::plugin::{LifecycleState, Plugin, PluginAudioProcessor};
use crate::process::{Events, Process, audio::Audio};
use crate::track_info::TrackInfo;
use clasp_common::events::io::{InputEvents, OutputEvents};
use clasp_common::process::{AudioConfiguration, ProcessStatus};
use clasp_common::utils::cstr_from_nullable_ptr;
use clasp_sys::plugin::clap_plugin;
use clasp_sys::process::{CLAP_PROCESS_ERROR, clap_process, clap_process_status};
use std::ffi::{c_char, c_void};
use std::panic::AssertUnwindSafe;

/// The raw table of a new instance of `P`. The `plugin_data` pointer is set by the wrapper.
pub(crate) fn raw_plugin<P: Plugin>() -> clap_plugin {
    clap_plugin {
        desc: P::DESCRIPTOR.as_raw(),
        plugin_data: core::ptr::null_mut(),
        init: Some(init::<P>),
        destroy: Some(destroy::<P>),
        activate: Some(activate::<P>),
        deactivate: Some(deactivate::<P>),
        start_processing: Some(start_processing::<P>),
        stop_processing: Some(stop_processing::<P>),
        process: Some(process::<P>),
        extension: Some(extension::<P>),
    }
}

impl<P: Plugin> PluginWrapper<P> {
    /// # Safety
    ///
    /// Must be called on the main thread, while holding the main-thread guard.
    unsafe fn init(&self) -> Result<(), PluginWrapperError> {
        let state = self.shared().state.load();
        if state != LifecycleState::Constructed {
            return Err(PluginWrapperError::InvalidState {
                method: "init",
                state,
            });
        }

        // SAFETY: the plugin is initializing.
        let (capabilities, incomplete) = unsafe { HostCapabilities::query(self.shared().host_ptr()) };
        self.shared().set_capabilities(capabilities);

        for identifier in incomplete {
            self.shared().host_misbehaving(&format!(
                "Host's {} extension is missing mandatory functions, ignoring it",
                identifier.to_string_lossy()
            ));
        }

        // The thread check extension is only usable from now on.
        self.ensure_main_thread("init");

        // SAFETY: upheld by caller
        unsafe {
            self.refresh_track_info();

            let (plugin, host) = self.main_thread_parts();
            plugin.init(&mut InitializingHostHandle::new(host))?;

            self.shared().take_audio_ports_invalidation_request();
            self.redefine_audio_ports();
        }

        self.shared().state.store(LifecycleState::Initialized);
        Ok(())
    }

    /// # Safety
    ///
    /// Must be called on the main thread, while holding the main-thread guard.
    unsafe fn activate(&self, sample_rate: i32) -> Result<(), PluginWrapperError> {
        let state = self.shared().state.load();
        if !state.is_inactive() {
            return Err(PluginWrapperError::InvalidState {
                method: "activate",
                state,
            });
        }

        let sample_rate = u32::try_from(sample_rate)
            .ok()
            .filter(|rate| *rate > 0)
            .ok_or(PluginWrapperError::InvalidSampleRate(sample_rate))?;

        // SAFETY: upheld by caller, and the plugin is inactive, so no audio thread holds the
        // audio processor.
        unsafe {
            let (plugin, host) = self.main_thread_parts();
            let audio_processor = plugin.activate(host, AudioConfiguration { sample_rate })?;
            *self.audio_processor_slot() = Some(audio_processor);
        }

        self.shared().set_sample_rate(Some(sample_rate));
        self.shared().state.store(LifecycleState::ActiveIdle);
        Ok(())
    }

    /// # Safety
    ///
    /// Must be called on the main thread, while holding the main-thread guard.
    unsafe fn deactivate(&self) -> Result<(), PluginWrapperError> {
        match self.shared().state.load() {
            LifecycleState::ActiveProcessing => {
                self.shared()
                    .host_misbehaving("Host called deactivate while the plugin was processing");
                // SAFETY: upheld by caller
                unsafe { self.force_stop_processing() }
            }
            LifecycleState::ActiveIdle => {}
            state => {
                return Err(PluginWrapperError::InvalidState {
                    method: "deactivate",
                    state,
                });
            }
        }

        // SAFETY: upheld by caller
        unsafe { self.force_deactivate() };
        Ok(())
    }

    /// Stops processing from the main thread, when the host didn't.
    ///
    /// # Safety
    ///
    /// Must be called on the main thread.
    unsafe fn force_stop_processing(&self) {
        // SAFETY: the host stopped calling process, or is misbehaving anyway.
        if let Some(audio_processor) = unsafe { self.audio_processor_slot() } {
            audio_processor.stop_processing();
        }

        self.shared().state.store(LifecycleState::ActiveIdle);
    }

    /// # Safety
    ///
    /// Must be called on the main thread, while the plugin isn't processing.
    unsafe fn force_deactivate(&self) {
        // SAFETY: upheld by caller
        let audio_processor = unsafe { self.audio_processor_slot() }.take();

        self.shared().state.store(LifecycleState::Inactive);
        self.shared().set_sample_rate(None);

        if let Some(audio_processor) = audio_processor {
            // SAFETY: upheld by caller
            let (plugin, host) = unsafe { self.main_thread_parts() };
            plugin.deactivate(host, audio_processor);
        }
    }

    fn start_processing(&self) -> Result<(), PluginWrapperError> {
        self.ensure_audio_thread("start_processing");

        let invalid_state = |state: LifecycleState| PluginWrapperError::InvalidState {
            method: "start_processing",
            state,
        };

        let lifecycle = &self.shared().state;
        let state = lifecycle.load();
        if state != LifecycleState::ActiveIdle {
            return Err(invalid_state(state));
        }

        // SAFETY: the plugin is active, and we're on the audio thread.
        unsafe { self.audio_processor("start_processing") }?.start_processing()?;

        lifecycle
            .transition(LifecycleState::ActiveIdle, LifecycleState::ActiveProcessing)
            .map_err(invalid_state)
    }

    fn stop_processing(&self) -> Result<(), PluginWrapperError> {
        self.ensure_audio_thread("stop_processing");

        self.shared()
            .state
            .transition(LifecycleState::ActiveProcessing, LifecycleState::ActiveIdle)
            .map_err(|state| PluginWrapperError::InvalidState {
                method: "stop_processing",
                state,
            })?;

        // SAFETY: the plugin was processing, and we're on the audio thread.
        unsafe { self.audio_processor("stop_processing") }?.stop_processing();
        Ok(())
    }

    /// # Safety
    ///
    /// The process pointer must be null, or point to a valid process structure.
    unsafe fn process(
        &self,
        process: *const clap_process,
    ) -> Result<ProcessStatus, PluginWrapperError> {
        self.ensure_audio_thread("process");

        let state = self.shared().state.load();
        if state != LifecycleState::ActiveProcessing {
            return Err(PluginWrapperError::InvalidState {
                method: "process",
                state,
            });
        }

        // SAFETY: upheld by caller
        let process = unsafe { process.as_ref() }.ok_or(PluginWrapperError::NulPtr("clap_process"))?;

        let empty_input = InputEvents::empty();
        let void_output = OutputEvents::void();

        // SAFETY: the host guarantees the buffers and event lists are valid for this call.
        let (process_info, audio, events) = unsafe {
            (
                Process::from_raw(process, self.shared()),
                Audio::from_raw(process),
                Events::from_raw(process, &empty_input, &void_output),
            )
        };

        // SAFETY: the plugin is processing, and we're on the audio thread.
        let audio_processor = unsafe { self.audio_processor("process") }?;
        Ok(audio_processor.process(process_info, audio, events)?)
    }

    /// Called when the host notifies the track information changed.
    ///
    /// # Safety
    ///
    /// Must be called on the main thread, while holding the main-thread guard.
    pub(crate) unsafe fn track_info_changed(&self) -> Result<(), PluginWrapperError> {
        let state = self.shared().state.load();
        if state == LifecycleState::Constructed {
            return Err(PluginWrapperError::InvalidState {
                method: "track_info.changed",
                state,
            });
        }

        // SAFETY: upheld by caller
        unsafe {
            let channels_changed = self.refresh_track_info();
            let (plugin, host) = self.main_thread_parts();

            if channels_changed && plugin.should_invalidate_audio_ports_on_track_channel_change() {
                host.invalidate_audio_ports_definition();
            }

            plugin.track_info_changed(host);
        }

        Ok(())
    }

    /// Fetches the track information from the host, and caches it.
    ///
    /// Returns `true` if the channel count or channel map changed.
    ///
    /// # Safety
    ///
    /// Must be called on the main thread, while holding the main-thread guard.
    unsafe fn refresh_track_info(&self) -> bool {
        let track_info = self
            .shared()
            .capabilities()
            .track_info
            .and_then(|t| t.get(&HostMainThreadHandle::new(self.shared(), None)));

        // SAFETY: upheld by caller
        let data = unsafe { self.main_thread_data_mut() };
        let channels = |info: Option<&TrackInfo>| {
            info.map(|i| (i.channel_count, i.channel_map)).unwrap_or((
                TrackInfo::DEFAULT_CHANNEL_COUNT,
                TrackInfo::DEFAULT_CHANNEL_MAP,
            ))
        };

        let changed = channels(data.track_info.as_ref()) != channels(track_info.as_ref());
        data.track_info = track_info;

        changed
    }
}

unsafe extern "C" fn init<P: Plugin>(plugin: *const clap_plugin) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_wrapper_main_thread(plugin, "init", |wrapper| wrapper.init())
    }
    .is_some()
}

unsafe extern "C" fn destroy<P: Plugin>(plugin: *const clap_plugin) {
    // SAFETY: the host gives a valid plugin pointer.
    let wrapper = match unsafe { PluginWrapper::<P>::from_raw(plugin) } {
        Ok(wrapper) => wrapper,
        Err(e) => {
            eprintln!("[CLASP_PLUGIN_ERROR] {e}");
            return;
        }
    };

    wrapper.ensure_main_thread("destroy");

    let teardown = panic::catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: destroy is called on the main thread, and is the last call the host makes.
        unsafe {
            match wrapper.shared().state.load() {
                LifecycleState::ActiveProcessing => {
                    wrapper.force_stop_processing();
                    wrapper.force_deactivate();
                }
                LifecycleState::ActiveIdle => wrapper.force_deactivate(),
                _ => {}
            }
        }
    }));

    if teardown.is_err() {
        let e = PluginWrapperError::Panic;
        wrapper.shared().log(e.severity(), &e.to_string());
    }

    // SAFETY: the wrapper was allocated by PluginWrapper::create, and the host won't use this
    // instance again.
    let wrapper = unsafe { Box::from_raw((*plugin).plugin_data.cast::<PluginWrapper<P>>()) };
    if panic::catch_unwind(AssertUnwindSafe(move || drop(wrapper))).is_err() {
        // The host log went away with the instance.
        report_without_host(&PluginWrapperError::Panic);
    }
}

unsafe extern "C" fn activate<P: Plugin>(plugin: *const clap_plugin, sample_rate: i32) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_wrapper_main_thread(plugin, "activate", |wrapper| {
            wrapper.activate(sample_rate)
        })
    }
    .is_some()
}

unsafe extern "C" fn deactivate<P: Plugin>(plugin: *const clap_plugin) {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_wrapper_main_thread(plugin, "deactivate", |wrapper| {
            wrapper.deactivate()
        });
    }
}

unsafe extern "C" fn start_processing<P: Plugin>(plugin: *const clap_plugin) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe { PluginWrapper::<P>::handle(plugin, |wrapper| wrapper.start_processing()) }.is_some()
}

unsafe extern "C" fn stop_processing<P: Plugin>(plugin: *const clap_plugin) {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe { PluginWrapper::<P>::handle(plugin, |wrapper| wrapper.stop_processing()) };
}

unsafe extern "C" fn process<P: Plugin>(
    plugin: *const clap_plugin,
    process: *const clap_process,
) -> clap_process_status {
    // SAFETY: the host gives valid plugin and process pointers.
    unsafe { PluginWrapper::<P>::handle(plugin, |wrapper| wrapper.process(process)) }
        .map(ProcessStatus::to_raw)
        .unwrap_or(CLAP_PROCESS_ERROR)
}

unsafe extern "C" fn extension<P: Plugin>(
    plugin: *const clap_plugin,
    identifier: *const c_char,
) -> *const c_void {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle(plugin, |wrapper| {
            // SAFETY: the host gives a null or valid C string.
            let Some(identifier) = cstr_from_nullable_ptr(identifier) else {
                return Ok(core::ptr::null());
            };

            Ok(wrapper
                .extensions()
                .find(identifier)
                .map(|e| e.as_ptr().as_ptr().cast_const())
                .unwrap_or(core::ptr::null()))
        })
    }
    .unwrap_or(core::ptr::null())
}
