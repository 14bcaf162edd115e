//! Access to the audio buffers of a processing block.
//!
//! Audio buffers follow this structure:
//!
//! * Plugins may have an arbitrary amount of input and output ports;
//! * Port sample data is split in multiple channels (1 for mono, 2 for stereo, etc.);
//! * Each channel is a buffer of [`f32`] samples, `frames_count` long.
//!
//! Input and output ports at the same index can be accessed together as a [`PairedPort`], whose
//! channels can share the same buffer when the host processes the plugin in place.

use clasp_common::utils::{slice_from_external_parts, slice_from_external_parts_mut};
use clasp_sys::process::{clap_audio_buffer, clap_process};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input and output audio buffers to be processed by the plugin.
pub struct Audio<'a> {
    inputs: &'a [clap_audio_buffer],
    outputs: &'a mut [clap_audio_buffer],
    frames_count: u32,
}

impl<'a> Audio<'a> {
    /// # Safety
    ///
    /// The buffer lists of the process structure must be valid for `'a`, and every channel buffer
    /// they point to must be valid for `frames_count` samples.
    #[inline]
    pub(crate) unsafe fn from_raw(process: &'a clap_process) -> Self {
        // SAFETY: upheld by caller
        unsafe {
            Self {
                inputs: slice_from_external_parts(
                    process.audio_inputs,
                    process.audio_inputs_count as usize,
                ),
                outputs: slice_from_external_parts_mut(
                    process.audio_outputs,
                    process.audio_outputs_count as usize,
                ),
                frames_count: process.frames_count,
            }
        }
    }

    #[inline]
    pub fn frames_count(&self) -> u32 {
        self.frames_count
    }

    #[inline]
    pub fn input_port_count(&self) -> usize {
        self.inputs.len()
    }

    #[inline]
    pub fn output_port_count(&self) -> usize {
        self.outputs.len()
    }

    /// The number of port pairs, i.e. the greatest of the input and output port counts.
    #[inline]
    pub fn port_pair_count(&self) -> usize {
        self.input_port_count().max(self.output_port_count())
    }

    #[inline]
    pub fn input_port(&self, index: usize) -> Option<InputPort<'_>> {
        self.inputs.get(index).map(|buffer| InputPort {
            buffer,
            frames_count: self.frames_count,
        })
    }

    #[inline]
    pub fn output_port(&mut self, index: usize) -> Option<OutputPort<'_>> {
        self.outputs.get_mut(index).map(|buffer| OutputPort {
            buffer,
            frames_count: self.frames_count,
        })
    }

    /// Returns the input and output ports at the given index together.
    ///
    /// In asymmetric layouts (e.g. side-chain), one of the two may be missing. `None` is returned
    /// only if both are.
    #[inline]
    pub fn port_pair(&mut self, index: usize) -> Option<PairedPort<'_>> {
        match (self.inputs.get(index), self.outputs.get_mut(index)) {
            (None, None) => None,
            (input, output) => Some(PairedPort {
                input,
                output,
                frames_count: self.frames_count,
            }),
        }
    }
}

/// Errors raised when the host provides invalid buffers.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BufferError {
    /// The port has channels, but no 32-bit sample data.
    MissingSampleData,
}

impl Display for BufferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::MissingSampleData => {
                f.write_str("Host provided an audio port without 32-bit sample data")
            }
        }
    }
}

impl Error for BufferError {}

/// # Safety
///
/// The buffer's channel list must be valid, and every channel valid for `frames_count` samples.
unsafe fn channel_ptrs(buffer: &clap_audio_buffer) -> Result<&[*mut f32], BufferError> {
    if buffer.channel_count > 0 && buffer.data32.is_null() {
        return Err(BufferError::MissingSampleData);
    }

    // SAFETY: upheld by caller
    Ok(unsafe { slice_from_external_parts(buffer.data32, buffer.channel_count as usize) })
}

/// An input port, holding a list of read-only channels.
#[derive(Copy, Clone)]
pub struct InputPort<'a> {
    buffer: &'a clap_audio_buffer,
    frames_count: u32,
}

impl<'a> InputPort<'a> {
    #[inline]
    pub fn channel_count(&self) -> u32 {
        self.buffer.channel_count
    }

    /// The latency from the audio interface to this port, in samples.
    #[inline]
    pub fn latency(&self) -> u32 {
        self.buffer.latency
    }

    /// Whether the given channel only holds a constant value.
    #[inline]
    pub fn is_channel_constant(&self, index: u32) -> bool {
        index < 64 && self.buffer.constant_mask & (1 << index) != 0
    }

    /// Returns the samples of the given channel.
    pub fn channel(&self, index: usize) -> Result<Option<&'a [f32]>, BufferError> {
        // SAFETY: the host guarantees the buffers are valid for the whole process call.
        let channels = unsafe { channel_ptrs(self.buffer) }?;

        Ok(channels.get(index).map(|channel| {
            // SAFETY: same as above
            unsafe { slice_from_external_parts(*channel, self.frames_count as usize) }
        }))
    }
}

/// An output port, holding a list of writable channels.
pub struct OutputPort<'a> {
    buffer: &'a mut clap_audio_buffer,
    frames_count: u32,
}

impl OutputPort<'_> {
    #[inline]
    pub fn channel_count(&self) -> u32 {
        self.buffer.channel_count
    }

    /// Marks the given channel as holding a constant value, or not.
    #[inline]
    pub fn set_channel_constant(&mut self, index: u32, is_constant: bool) {
        if index < 64 {
            if is_constant {
                self.buffer.constant_mask |= 1 << index;
            } else {
                self.buffer.constant_mask &= !(1 << index);
            }
        }
    }

    /// Returns the samples of the given channel.
    pub fn channel_mut(&mut self, index: usize) -> Result<Option<&mut [f32]>, BufferError> {
        // SAFETY: the host guarantees the buffers are valid for the whole process call.
        let channels = unsafe { channel_ptrs(self.buffer) }?;

        Ok(channels.get(index).map(|channel| {
            // SAFETY: same as above, and &mut self guarantees exclusive access
            unsafe { slice_from_external_parts_mut(*channel, self.frames_count as usize) }
        }))
    }
}

/// An input and an output port sharing the same index.
pub struct PairedPort<'a> {
    input: Option<&'a clap_audio_buffer>,
    output: Option<&'a mut clap_audio_buffer>,
    frames_count: u32,
}

impl PairedPort<'_> {
    #[inline]
    pub fn input(&self) -> Option<InputPort<'_>> {
        self.input.map(|buffer| InputPort {
            buffer,
            frames_count: self.frames_count,
        })
    }

    #[inline]
    pub fn output(&mut self) -> Option<OutputPort<'_>> {
        self.output.as_deref_mut().map(|buffer| OutputPort {
            buffer,
            frames_count: self.frames_count,
        })
    }

    /// The number of channel pairs, i.e. the greatest of the two ports' channel counts.
    #[inline]
    pub fn channel_pair_count(&self) -> usize {
        let inputs = self.input.map(|b| b.channel_count).unwrap_or(0);
        let outputs = self.output.as_ref().map(|b| b.channel_count).unwrap_or(0);

        inputs.max(outputs) as usize
    }

    /// Returns every pair of input and output channels of this port pair.
    pub fn channel_pairs(
        &mut self,
    ) -> Result<impl Iterator<Item = ChannelPair<'_>>, BufferError> {
        let frames_count = self.frames_count as usize;

        // SAFETY: the host guarantees the buffers are valid for the whole process call.
        let inputs = unsafe { self.input.map(|b| channel_ptrs(b)).transpose()? }.unwrap_or(&[]);
        // SAFETY: same as above
        let outputs = unsafe { self.output.as_deref().map(|b| channel_ptrs(b)).transpose()? }
            .unwrap_or(&[]);

        Ok((0..self.channel_pair_count()).filter_map(move |i| {
            let input = inputs.get(i).copied();
            let output = outputs.get(i).copied();

            // SAFETY: every channel is valid for frames_count samples, and each output channel is
            // handed out only once for the lifetime of the &mut self borrow.
            unsafe { ChannelPair::from_ptrs(input, output, frames_count) }
        }))
    }
}

/// A pair of input and output channels at the same index of a [`PairedPort`].
pub enum ChannelPair<'a> {
    /// There is only an input channel at this index.
    InputOnly(&'a [f32]),
    /// There is only an output channel at this index.
    OutputOnly(&'a mut [f32]),
    /// The input and output channels are separate buffers.
    InputOutput(&'a [f32], &'a mut [f32]),
    /// The input and output channels share the same buffer.
    InPlace(&'a mut [f32]),
}

impl ChannelPair<'_> {
    /// # Safety
    ///
    /// Non-null pointers must be valid for `len` samples, and the output must not be aliased
    /// elsewhere.
    unsafe fn from_ptrs(
        input: Option<*mut f32>,
        output: Option<*mut f32>,
        len: usize,
    ) -> Option<Self> {
        // SAFETY: upheld by caller
        unsafe {
            Some(match (input, output) {
                (None, None) => return None,
                (Some(input), None) => ChannelPair::InputOnly(slice_from_external_parts(input, len)),
                (None, Some(output)) => {
                    ChannelPair::OutputOnly(slice_from_external_parts_mut(output, len))
                }
                (Some(input), Some(output)) if input == output => {
                    ChannelPair::InPlace(slice_from_external_parts_mut(output, len))
                }
                (Some(input), Some(output)) => ChannelPair::InputOutput(
                    slice_from_external_parts(input, len),
                    slice_from_external_parts_mut(output, len),
                ),
            })
        }
    }

    /// The input samples of this pair, if any. For in-place pairs, this is the output buffer.
    #[inline]
    pub fn input(&self) -> Option<&[f32]> {
        match self {
            ChannelPair::InputOnly(input) | ChannelPair::InputOutput(input, _) => Some(input),
            ChannelPair::InPlace(buffer) => Some(buffer),
            ChannelPair::OutputOnly(_) => None,
        }
    }

    /// The output samples of this pair, if any.
    #[inline]
    pub fn output_mut(&mut self) -> Option<&mut [f32]> {
        match self {
            ChannelPair::OutputOnly(output)
            | ChannelPair::InputOutput(_, output)
            | ChannelPair::InPlace(output) => Some(output),
            ChannelPair::InputOnly(_) => None,
        }
    }

    /// Writes `f(input sample)` to every output sample, in place if possible.
    ///
    /// Output-only pairs read silence as input. Input-only pairs are left untouched.
    pub fn map(&mut self, mut f: impl FnMut(f32) -> f32) {
        match self {
            ChannelPair::InputOnly(_) => {}
            ChannelPair::OutputOnly(output) => output.iter_mut().for_each(|o| *o = f(0.0)),
            ChannelPair::InputOutput(input, output) => {
                for (o, i) in output.iter_mut().zip(input.iter()) {
                    *o = f(*i);
                }
            }
            ChannelPair::InPlace(buffer) => buffer.iter_mut().for_each(|s| *s = f(*s)),
        }
    }
}
