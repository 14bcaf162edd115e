//! A stereo gain plugin, with a single automatable parameter.

use clasp_extensions::event_filter::{PluginEventFilter, PluginEventFilterImpl};
use clasp_extensions::latency::{PluginLatency, PluginLatencyImpl};
use clasp_extensions::params::{
    ParamDisplayWriter, ParamInfo, ParamInfoFlags, ParamInfoWriter, PluginAudioProcessorParams,
    PluginMainThreadParams, PluginParams,
};
use clasp_extensions::render::{PluginRender, PluginRenderImpl, RenderMode};
use clasp_extensions::state::{PluginState, PluginStateImpl};
use clasp_plugin::events::Event;
use clasp_plugin::events::event_types::ParamValueEvent;
use clasp_plugin::prelude::*;
use clasp_plugin::stream::{InputStream, OutputStream};
use std::io::{Read, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const GAIN_PARAM_ID: u32 = 0;
pub const MAX_GAIN: f64 = 2.0;

/// The gain value, shared between the main thread and the audio processor.
struct SharedGain(AtomicU64);

impl SharedGain {
    fn new(value: f64) -> Self {
        Self(AtomicU64::new(value.to_bits()))
    }

    #[inline]
    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    fn set(&self, value: f64) {
        self.0.store(value.clamp(0.0, MAX_GAIN).to_bits(), Ordering::Relaxed)
    }

    /// Applies every gain change in `events`.
    fn apply_changes(&self, events: &InputEvents) {
        for event in events.iter() {
            if let Some(change) = event.as_event::<ParamValueEvent>() {
                if change.param_id() == GAIN_PARAM_ID {
                    self.set(change.value())
                }
            }
        }
    }
}

pub struct GainPlugin {
    host: HostHandle,
    gain: Arc<SharedGain>,
    render_mode: RenderMode,
}

impl Plugin for GainPlugin {
    type AudioProcessor = GainAudioProcessor;

    const DESCRIPTOR: &'static PluginDescriptor =
        &PluginDescriptor::new(c"org.clasp.gain", c"Clasp Gain")
            .with_vendor(c"clasp")
            .with_version(c"0.1.0")
            .with_description(c"A plain stereo gain")
            .with_plugin_type(PluginType::AUDIO_EFFECT);

    fn new(host: HostHandle) -> Result<Self, PluginError> {
        Ok(Self {
            host,
            gain: Arc::new(SharedGain::new(1.0)),
            render_mode: RenderMode::Realtime,
        })
    }

    fn activate(
        &mut self,
        _host: HostMainThreadHandle,
        _audio_config: AudioConfiguration,
    ) -> Result<GainAudioProcessor, PluginError> {
        Ok(GainAudioProcessor {
            gain: Arc::clone(&self.gain),
        })
    }

    fn define_audio_ports(
        &self,
        host: &HostMainThreadHandle,
        inputs: &mut Vec<AudioPortInfo>,
        outputs: &mut Vec<AudioPortInfo>,
    ) {
        let channels = host.track_channel_count();

        inputs.push(AudioPortInfo::main(0, "main", channels));
        outputs.push(AudioPortInfo::main(0, "main", channels));
    }

    // The ports follow the track's channel layout.
    fn should_invalidate_audio_ports_on_track_channel_change(&self) -> bool {
        true
    }

    fn declare_extensions(&self, builder: &mut PluginExtensions<Self>) {
        builder
            .register::<PluginParams>()
            .register::<PluginState>()
            .register::<PluginLatency>()
            .register::<PluginEventFilter>()
            .register::<PluginRender>();
    }
}

impl PluginMainThreadParams for GainPlugin {
    fn count(&mut self) -> u32 {
        1
    }

    fn get_info(&mut self, param_index: u32, info: &mut ParamInfoWriter) {
        if param_index != 0 {
            return;
        }

        info.set(
            &ParamInfo::new(GAIN_PARAM_ID)
                .with_name("Gain")
                .with_module("gain")
                .with_value_bounds(0.0, MAX_GAIN)
                .with_default_value(1.0)
                .with_flags(ParamInfoFlags::IS_AUTOMATABLE),
        )
    }

    fn get_value(&mut self, param_id: u32) -> Option<f64> {
        (param_id == GAIN_PARAM_ID).then(|| self.gain.get())
    }

    fn value_to_text(
        &mut self,
        param_id: u32,
        value: f64,
        writer: &mut ParamDisplayWriter,
    ) -> core::fmt::Result {
        use core::fmt::Write;

        if param_id != GAIN_PARAM_ID {
            return Err(core::fmt::Error);
        }

        write!(writer, "{value:.2}x")
    }

    fn text_to_value(&mut self, param_id: u32, text: &str) -> Option<f64> {
        if param_id != GAIN_PARAM_ID {
            return None;
        }

        let value: f64 = text.trim().trim_end_matches('x').parse().ok()?;
        (0.0..=MAX_GAIN).contains(&value).then_some(value)
    }

    fn flush(&mut self, input_parameter_changes: &InputEvents, _output: &OutputEvents) {
        self.gain.apply_changes(input_parameter_changes)
    }
}

impl PluginStateImpl for GainPlugin {
    fn save(&mut self, output: &mut OutputStream) -> Result<(), PluginError> {
        output.write_all(&self.gain.get().to_le_bytes())?;
        Ok(())
    }

    fn load(&mut self, input: &mut InputStream) -> Result<(), PluginError> {
        let mut bytes = [0; 8];
        input.read_exact(&mut bytes)?;

        let value = f64::from_le_bytes(bytes);
        if !(0.0..=MAX_GAIN).contains(&value) {
            return Err(PluginError::Message("Invalid gain value in saved state"));
        }

        self.gain.set(value);
        Ok(())
    }
}

impl PluginLatencyImpl for GainPlugin {
    fn latency(&self) -> u32 {
        0
    }
}

impl PluginEventFilterImpl for GainPlugin {
    fn accepts(&self, event_type: u16) -> bool {
        event_type == ParamValueEvent::TYPE_ID
    }
}

impl PluginRenderImpl for GainPlugin {
    fn set(&mut self, mode: RenderMode) {
        if self.render_mode != mode {
            self.host
                .log(LogSeverity::Debug, &format!("Render mode set to {mode:?}"));
            self.render_mode = mode;
        }
    }
}

pub struct GainAudioProcessor {
    gain: Arc<SharedGain>,
}

impl PluginAudioProcessor for GainAudioProcessor {
    fn process(
        &mut self,
        _process: Process,
        mut audio: Audio,
        events: Events,
    ) -> Result<ProcessStatus, PluginError> {
        // Changes apply to the whole block.
        self.gain.apply_changes(events.input);
        #[allow(clippy::cast_possible_truncation)]
        let gain = self.gain.get() as f32;

        for port_index in 0..audio.port_pair_count() {
            let Some(mut port_pair) = audio.port_pair(port_index) else {
                continue;
            };

            for mut channel_pair in port_pair.channel_pairs().map_err(PluginError::custom)? {
                channel_pair.map(|sample| sample * gain);
            }
        }

        Ok(ProcessStatus::Continue)
    }
}

impl PluginAudioProcessorParams for GainAudioProcessor {
    fn flush(&mut self, input_parameter_changes: &InputEvents, _output: &OutputEvents) {
        self.gain.apply_changes(input_parameter_changes)
    }
}

clasp_export_entry!(SinglePluginEntry<GainPlugin>);
