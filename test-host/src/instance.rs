use crate::error::TestHostError;
use crate::host::{AudioThreadGuard, TestHost};
use clasp_common::events::io::{EventBuffer, InputEvents, OutputEvents};
use clasp_common::ports::AudioPortInfo;
use clasp_common::process::ProcessStatus;
use clasp_plugin::extensions::audio_ports::PluginAudioPorts;
use clasp_plugin::extensions::thread_pool::PluginThreadPool;
use clasp_plugin::extensions::track_info::PluginTrackInfo;
use clasp_plugin::extensions::{Extension, PluginExtensionSide, RawExtension};
use clasp_sys::plugin::clap_plugin;
use clasp_sys::process::{CLAP_PROCESS_ERROR, clap_audio_buffer, clap_process, clap_process_status};
use std::ffi::{CStr, c_char, c_void};
use std::ptr::NonNull;

/// The lifecycle state the host believes the instance is in.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ShadowState {
    Created,
    Initialized,
    Active,
    Processing,
}

struct PortBuffer {
    channels: Vec<Vec<f32>>,
    pointers: Vec<*mut f32>,
}

#[derive(Default)]
struct AudioBuffers {
    ports: Vec<PortBuffer>,
    raw: Vec<clap_audio_buffer>,
}

impl AudioBuffers {
    fn new(ports: &[AudioPortInfo], max_frames: u32) -> Self {
        Self {
            ports: ports
                .iter()
                .map(|port| PortBuffer {
                    channels: (0..port.channel_count)
                        .map(|_| vec![0.0; max_frames as usize])
                        .collect(),
                    pointers: Vec::new(),
                })
                .collect(),
            raw: Vec::new(),
        }
    }

    /// Rebuilds the raw buffer list. The returned pointer is valid until `self` is borrowed again.
    fn prepare(&mut self) -> (*mut clap_audio_buffer, u32) {
        self.raw.clear();

        for port in &mut self.ports {
            port.pointers.clear();
            port.pointers
                .extend(port.channels.iter_mut().map(|c| c.as_mut_ptr()));

            self.raw.push(clap_audio_buffer {
                data32: port.pointers.as_mut_ptr(),
                data64: core::ptr::null_mut(),
                channel_count: u32::try_from(port.pointers.len()).unwrap_or(u32::MAX),
                latency: 0,
                constant_mask: 0,
            });
        }

        if self.raw.is_empty() {
            return (core::ptr::null_mut(), 0);
        }

        let count = u32::try_from(self.raw.len()).unwrap_or(u32::MAX);
        (self.raw.as_mut_ptr(), count)
    }

    fn channel(&self, port: usize, channel: usize) -> Option<&[f32]> {
        Some(self.ports.get(port)?.channels.get(channel)?.as_slice())
    }

    fn channel_mut(&mut self, port: usize, channel: usize) -> Option<&mut [f32]> {
        Some(self.ports.get_mut(port)?.channels.get_mut(channel)?.as_mut_slice())
    }
}

/// A plugin instance driven by the test host.
///
/// Every call is forwarded to the plugin, even out of order, so that the plugin's own protocol
/// checks can be observed. The instance is torn down in order and destroyed when dropped.
pub struct TestInstance {
    host: TestHost,
    plugin: NonNull<clap_plugin>,
    state: ShadowState,
    orderly_teardown: bool,
    inputs: AudioBuffers,
    outputs: AudioBuffers,
    input_events: EventBuffer,
    output_events: EventBuffer,
    steady_time: i64,
}

// SAFETY: the instance is only ever used from one thread at a time, and the plugin's thread
// checks are part of what the harness exercises.
unsafe impl Send for TestInstance {}

impl TestInstance {
    /// # Safety
    ///
    /// The plugin must have just been created with the given host, and must not be used elsewhere.
    pub(crate) unsafe fn from_raw(host: TestHost, plugin: NonNull<clap_plugin>) -> Self {
        let instance = Self {
            host,
            plugin,
            state: ShadowState::Created,
            orderly_teardown: true,
            inputs: AudioBuffers::default(),
            outputs: AudioBuffers::default(),
            input_events: EventBuffer::new(),
            output_events: EventBuffer::new(),
            steady_time: 0,
        };

        instance
            .host
            .set_plugin_thread_pool(instance.get_extension::<PluginThreadPool>());

        instance
    }

    #[inline]
    pub fn host(&self) -> &TestHost {
        &self.host
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_plugin {
        // SAFETY: the plugin is alive until this instance is dropped.
        unsafe { self.plugin.as_ref() }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const clap_plugin {
        self.plugin.as_ptr()
    }

    #[inline]
    pub fn state(&self) -> ShadowState {
        self.state
    }

    pub fn init(&mut self) -> bool {
        let Some(init) = self.as_raw().init else {
            return false;
        };

        // SAFETY: the plugin is alive.
        let initialized = unsafe { init(self.as_ptr()) };
        if initialized && self.state == ShadowState::Created {
            self.state = ShadowState::Initialized;
        }

        initialized
    }

    /// Activates the plugin, and allocates buffers matching its audio ports.
    pub fn activate(&mut self, sample_rate: i32) -> bool {
        let Some(activate) = self.as_raw().activate else {
            return false;
        };

        // SAFETY: the plugin is alive.
        let activated = unsafe { activate(self.as_ptr(), sample_rate) };
        if activated && self.state == ShadowState::Initialized {
            self.state = ShadowState::Active;

            let max_frames = self.host.config().max_frames;
            self.inputs = AudioBuffers::new(&self.audio_ports(true), max_frames);
            self.outputs = AudioBuffers::new(&self.audio_ports(false), max_frames);
        }

        activated
    }

    pub fn deactivate(&mut self) {
        if let Some(deactivate) = self.as_raw().deactivate {
            // SAFETY: the plugin is alive.
            unsafe { deactivate(self.as_ptr()) }
        }

        if matches!(self.state, ShadowState::Active | ShadowState::Processing) {
            self.state = ShadowState::Initialized;
        }
    }

    /// Starts processing, on an audio thread.
    pub fn start_processing(&mut self) -> bool {
        let Some(start_processing) = self.as_raw().start_processing else {
            return false;
        };

        let _audio_thread = AudioThreadGuard::enter();
        // SAFETY: the plugin is alive.
        let started = unsafe { start_processing(self.as_ptr()) };
        if started && self.state == ShadowState::Active {
            self.state = ShadowState::Processing;
        }

        started
    }

    /// Stops processing, on an audio thread.
    pub fn stop_processing(&mut self) {
        if let Some(stop_processing) = self.as_raw().stop_processing {
            let _audio_thread = AudioThreadGuard::enter();
            // SAFETY: the plugin is alive.
            unsafe { stop_processing(self.as_ptr()) }
        }

        if self.state == ShadowState::Processing {
            self.state = ShadowState::Active;
        }
    }

    /// Processes a block of `frames` samples on an audio thread, using the instance's buffers
    /// and input events.
    ///
    /// The call is forwarded even if the instance isn't processing. In that case, this returns
    /// [`TestHostError::OutOfOrder`] if the plugin refused the call, and
    /// [`TestHostError::OrderingNotEnforced`] if it didn't.
    pub fn process(&mut self, frames: u32) -> Result<ProcessStatus, TestHostError> {
        let max_frames = self.host.config().max_frames;
        if frames > max_frames {
            return Err(TestHostError::BlockTooLarge { frames, max_frames });
        }

        let status = {
            let _audio_thread = AudioThreadGuard::enter();
            let plugin = self.plugin;

            let (audio_inputs, audio_inputs_count) = self.inputs.prepare();
            let (audio_outputs, audio_outputs_count) = self.outputs.prepare();

            self.output_events.clear();
            let input_events = InputEvents::from_buffer(&self.input_events);
            let output_events = OutputEvents::from_buffer(&mut self.output_events);

            let process = clap_process {
                steady_time: self.steady_time,
                frames_count: frames,
                transport: core::ptr::null(),
                audio_inputs: audio_inputs.cast_const(),
                audio_outputs,
                audio_inputs_count,
                audio_outputs_count,
                in_events: input_events.as_raw(),
                out_events: output_events.as_raw(),
            };

            // SAFETY: the plugin is alive, and every buffer and list outlives the call.
            unsafe { call_process(plugin, &process) }
        };

        self.input_events.clear();
        self.steady_time += i64::from(frames);

        if self.state != ShadowState::Processing {
            let (method, state) = ("process", self.state);
            return Err(if status == CLAP_PROCESS_ERROR {
                TestHostError::OutOfOrder { method, state }
            } else {
                TestHostError::OrderingNotEnforced { method, state }
            });
        }

        ProcessStatus::from_raw(status).ok_or(TestHostError::ProcessFailed)
    }

    /// Calls the plugin's `process` function with a null process structure.
    pub fn process_null(&mut self) -> clap_process_status {
        let _audio_thread = AudioThreadGuard::enter();
        // SAFETY: the plugin is alive, and accepts null pointers.
        unsafe { call_process(self.plugin, core::ptr::null()) }
    }

    /// Queries the raw extension pointer of the given identifier.
    pub fn extension_ptr(&self, identifier: *const c_char) -> *const c_void {
        match self.as_raw().extension {
            // SAFETY: the plugin is alive. The identifier may be null, which plugins must accept.
            Some(extension) => unsafe { extension(self.as_ptr(), identifier) },
            None => core::ptr::null(),
        }
    }

    pub fn has_extension(&self, identifier: &CStr) -> bool {
        !self.extension_ptr(identifier.as_ptr()).is_null()
    }

    /// Queries one of the plugin's extensions.
    ///
    /// The returned handle must not be used after this instance is dropped.
    pub fn get_extension<E: Extension<ExtensionSide = PluginExtensionSide>>(&self) -> Option<E> {
        let ptr = NonNull::new(self.extension_ptr(E::IDENTIFIER.as_ptr()).cast_mut())?;

        // SAFETY: the plugin returned this pointer for the extension's identifier.
        Some(unsafe {
            E::from_raw(RawExtension::<PluginExtensionSide>::from_raw(
                ptr.cast(),
                self.plugin,
            ))
        })
    }

    /// Lists the plugin's input or output ports, through its audio ports extension.
    pub fn audio_ports(&self, is_input: bool) -> Vec<AudioPortInfo> {
        let Some(audio_ports) = self.get_extension::<PluginAudioPorts>() else {
            return Vec::new();
        };

        // SAFETY: the plugin is alive, and the host calls it from the main thread.
        unsafe {
            (0..audio_ports.count(is_input))
                .filter_map(|i| audio_ports.get(i, is_input))
                .collect()
        }
    }

    /// Notifies the plugin that the host's track information changed.
    pub fn notify_track_info_changed(&self) {
        if let Some(track_info) = self.get_extension::<PluginTrackInfo>() {
            // SAFETY: the plugin is alive.
            unsafe { track_info.changed() }
        }
    }

    pub fn input_channel_mut(&mut self, port: usize, channel: usize) -> Option<&mut [f32]> {
        self.inputs.channel_mut(port, channel)
    }

    pub fn output_channel(&self, port: usize, channel: usize) -> Option<&[f32]> {
        self.outputs.channel(port, channel)
    }

    /// The events given to the plugin on the next process call.
    pub fn input_events_mut(&mut self) -> &mut EventBuffer {
        &mut self.input_events
    }

    /// The events the plugin output during the last process call.
    pub fn output_events(&self) -> &EventBuffer {
        &self.output_events
    }

    /// Destroys the plugin without stopping or deactivating it first.
    pub fn destroy(mut self) {
        self.orderly_teardown = false;
    }
}

/// # Safety
///
/// The plugin must be alive, and the process pointer must be null or valid.
unsafe fn call_process(
    plugin: NonNull<clap_plugin>,
    process: *const clap_process,
) -> clap_process_status {
    // SAFETY: upheld by caller
    match unsafe { plugin.as_ref() }.process {
        // SAFETY: upheld by caller
        Some(process_fn) => unsafe { process_fn(plugin.as_ptr(), process) },
        None => CLAP_PROCESS_ERROR,
    }
}

impl Drop for TestInstance {
    fn drop(&mut self) {
        if self.orderly_teardown {
            if self.state == ShadowState::Processing {
                self.stop_processing();
            }
            if self.state == ShadowState::Active {
                self.deactivate();
            }
        }

        self.host.set_plugin_thread_pool(None);

        if let Some(destroy) = self.as_raw().destroy {
            // SAFETY: this is the last call made to the plugin.
            unsafe { destroy(self.as_ptr()) }
        }
    }
}
