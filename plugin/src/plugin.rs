//! Core types and traits to implement a plugin.
//!
//! # Thread model
//!
//! The protocol splits a plugin's operations between the host's *main thread* and its *audio
//! threads*. This split is reflected in the two traits a plugin implements:
//!
//! * [`Plugin`] is the main-thread part of the plugin. It is created by the factory, lives until
//!   the instance is destroyed, and handles every main-thread operation: lifecycle, audio port
//!   definitions, track information, and most extensions (GUI, state, ...).
//!
//!   This type is never sent to another thread, and doesn't have to be [`Send`].
//!
//! * [`PluginAudioProcessor`] is the audio-thread part of the plugin. It is created by
//!   [`Plugin::activate`] and handed back to [`Plugin::deactivate`], and is only used in between
//!   by [`start_processing`](PluginAudioProcessor::start_processing),
//!   [`process`](PluginAudioProcessor::process) and
//!   [`stop_processing`](PluginAudioProcessor::stop_processing).
//!
//!   The host may call those from any of its audio threads, so this type has to be [`Send`].
//!
//! Data that has to be shared between both parts can be given to the audio processor when it is
//! created, e.g. behind an [`Arc`](std::sync::Arc).

use crate::extensions::PluginExtensions;
use crate::host::{HostHandle, HostMainThreadHandle, InitializingHostHandle};
use crate::ports::AudioPortInfo;
use crate::process::{Audio, AudioConfiguration, Events, Process, ProcessStatus};

mod audio_ports;
mod error;
mod instance;
pub(crate) mod logging;
mod state;
pub mod wrapper;

pub(crate) use audio_ports::*;
pub use clasp_common::plugin::*;
pub use error::PluginError;
pub use state::LifecycleState;
pub(crate) use state::*;

/// The main-thread part of a plugin.
///
/// See the [module documentation](crate::plugin) for more information on the thread model.
pub trait Plugin: Sized + 'static {
    /// The audio-thread part of the plugin, created on activation.
    type AudioProcessor: PluginAudioProcessor;

    /// A static reference to the plugin's descriptor.
    ///
    /// This contains read-only data about the plugin, such as its name, stable identifier, and more.
    const DESCRIPTOR: &'static PluginDescriptor;

    /// Creates a new plugin instance.
    ///
    /// The host isn't initialized yet: the given handle can be stored, but any log message sent
    /// through it before [`init`](Plugin::init) is only printed to the standard error output.
    ///
    /// # Errors
    ///
    /// This operation may fail for any reason, in which case `Err` is returned and the factory
    /// returns a null instance to the host.
    fn new(host: HostHandle) -> Result<Self, PluginError>;

    /// Initializes the plugin, once the host's capabilities have been queried.
    ///
    /// This is the only place where the plugin can query the host for additional extensions, using
    /// [`InitializingHostHandle::get_extension`]. The returned handles can be stored and used for
    /// the lifetime of the instance.
    ///
    /// The default implementation does nothing.
    #[inline]
    fn init(&mut self, host: &mut InitializingHostHandle) -> Result<(), PluginError> {
        let _ = host;
        Ok(())
    }

    /// Activates the plugin, creating its audio processor.
    ///
    /// This is where per-activation resources (e.g. audio buffers sized for the given
    /// [`AudioConfiguration`]) are allocated. It is always called on the main thread.
    ///
    /// # Errors
    ///
    /// If activation fails, the plugin stays deactivated and the host is told activation failed.
    fn activate(
        &mut self,
        host: HostMainThreadHandle,
        audio_config: AudioConfiguration,
    ) -> Result<Self::AudioProcessor, PluginError>;

    /// Deactivates the plugin, giving back the audio processor created by
    /// [`activate`](Plugin::activate).
    ///
    /// The default implementation drops the audio processor.
    #[inline]
    fn deactivate(&mut self, host: HostMainThreadHandle, audio_processor: Self::AudioProcessor) {
        let _ = host;
        drop(audio_processor);
    }

    /// Defines the plugin's audio ports, by pushing their descriptions to `inputs` and `outputs`.
    ///
    /// This is called after [`init`](Plugin::init), and again every time the plugin requests the
    /// audio ports to be re-defined through
    /// [`HostMainThreadHandle::invalidate_audio_ports_definition`]. The host is only notified if the
    /// new definition differs structurally from the previous one.
    ///
    /// The default implementation defines no ports at all.
    #[inline]
    fn define_audio_ports(
        &self,
        host: &HostMainThreadHandle,
        inputs: &mut Vec<AudioPortInfo>,
        outputs: &mut Vec<AudioPortInfo>,
    ) {
        let _ = (host, inputs, outputs);
    }

    /// Whether a change in the track's channel count or channel map should re-define the audio
    /// ports automatically.
    ///
    /// Defaults to `false`.
    #[inline]
    fn should_invalidate_audio_ports_on_track_channel_change(&self) -> bool {
        false
    }

    /// Called when the host notified that the track's information changed.
    ///
    /// The new information is available through [`HostMainThreadHandle::track_info`].
    #[inline]
    fn track_info_changed(&mut self, host: HostMainThreadHandle) {
        let _ = host;
    }

    /// Declares the extensions this plugin implements, in addition to the core ones (audio ports,
    /// track info and thread pool) every plugin supports.
    ///
    /// This is called once, right after the plugin is created. The declared extensions then stay
    /// the same for the lifetime of the instance.
    #[inline]
    fn declare_extensions(&self, builder: &mut PluginExtensions<Self>) {
        let _ = builder;
    }
}

/// The audio-thread part of a plugin.
///
/// See the [module documentation](crate::plugin) for more information on the thread model.
pub trait PluginAudioProcessor: Sized + Send + 'static {
    /// Called by the host before it starts calling [`process`](PluginAudioProcessor::process).
    ///
    /// If this fails, the plugin doesn't start processing.
    #[inline]
    fn start_processing(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    /// Called by the host once it stops processing.
    #[inline]
    fn stop_processing(&mut self) {}

    /// Processes a block of audio and events.
    ///
    /// Returning an error makes the host discard the output buffers for this block.
    fn process(
        &mut self,
        process: Process,
        audio: Audio,
        events: Events,
    ) -> Result<ProcessStatus, PluginError>;
}
