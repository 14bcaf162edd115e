//! Allows plugins to expose parameters to the host, and to receive parameter changes from it.
//!
//! Parameter values are queried and displayed from the main thread. Changes go through event
//! lists: either in [`process`](clasp_plugin::plugin::PluginAudioProcessor::process), or in a
//! `flush` call while the plugin isn't processing. A flush is routed to the audio processor while
//! the plugin is active, and to the plugin itself otherwise.

use bitflags::bitflags;
use clasp_common::events::io::{InputEvents, OutputEvents};
use clasp_common::utils::cstr_from_nullable_ptr;
use clasp_plugin::extensions::prelude::*;
use clasp_sys::events::{clap_input_events, clap_output_events};
use clasp_sys::ext::params::*;
use clasp_sys::id::clap_id;
use std::ffi::{CStr, CString, c_char};
use std::mem::MaybeUninit;

mod info;

pub use info::*;

bitflags! {
    /// What a host should rescan after the plugin's parameters changed.
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct ParamRescanFlags: u32 {
        const VALUES = CLAP_PARAM_RESCAN_VALUES;
        const TEXT = CLAP_PARAM_RESCAN_TEXT;
        const INFO = CLAP_PARAM_RESCAN_INFO;
        const ALL = CLAP_PARAM_RESCAN_ALL;
    }
}

bitflags! {
    /// What a host should forget about a parameter.
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct ParamClearFlags: u32 {
        const ALL = CLAP_PARAM_CLEAR_ALL;
        const AUTOMATIONS = CLAP_PARAM_CLEAR_AUTOMATIONS;
        const MODULATIONS = CLAP_PARAM_CLEAR_MODULATIONS;
    }
}

/// The plugin's params table.
#[derive(Copy, Clone)]
pub struct PluginParams(RawExtension<PluginExtensionSide, clap_plugin_params>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginParams {
    const IDENTIFIER: &'static CStr = CLAP_EXT_PARAMS;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// The host's params table.
#[derive(Copy, Clone)]
pub struct HostParams(RawExtension<HostExtensionSide, clap_host_params>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostParams {
    const IDENTIFIER: &'static CStr = CLAP_EXT_PARAMS;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// Implemented by the main-thread side of plugins exposing parameters.
pub trait PluginMainThreadParams {
    fn count(&mut self) -> u32;
    fn get_info(&mut self, param_index: u32, info: &mut ParamInfoWriter);
    fn get_value(&mut self, param_id: clap_id) -> Option<f64>;
    fn value_to_text(
        &mut self,
        param_id: clap_id,
        value: f64,
        writer: &mut ParamDisplayWriter,
    ) -> core::fmt::Result;
    fn text_to_value(&mut self, param_id: clap_id, text: &str) -> Option<f64>;

    /// Receives parameter changes while the plugin is inactive.
    fn flush(&mut self, input_parameter_changes: &InputEvents, output_parameter_changes: &OutputEvents);
}

/// Implemented by the audio processor of plugins exposing parameters.
pub trait PluginAudioProcessorParams {
    /// Receives parameter changes while the plugin is active but not processing.
    fn flush(&mut self, input_parameter_changes: &InputEvents, output_parameter_changes: &OutputEvents);
}

impl<P> ExtensionImplementation<P> for PluginParams
where
    P: Plugin + PluginMainThreadParams,
    P::AudioProcessor: PluginAudioProcessorParams,
{
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_params {
            count: Some(count::<P>),
            get_info: Some(get_info::<P>),
            get_value: Some(get_value::<P>),
            value_to_text: Some(value_to_text::<P>),
            text_to_value: Some(text_to_value::<P>),
            flush: Some(flush::<P>),
        });
}

unsafe extern "C" fn count<P: Plugin + PluginMainThreadParams>(plugin: *const clap_plugin) -> u32 {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "params.count", |plugin, _host| {
            Ok(plugin.count())
        })
    }
    .unwrap_or(0)
}

unsafe extern "C" fn get_info<P: Plugin + PluginMainThreadParams>(
    plugin: *const clap_plugin,
    param_index: u32,
    info: *mut clap_param_info,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer, and a valid info pointer if non-null.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "params.get_info", |plugin, _host| {
            if info.is_null() {
                return Err(PluginWrapperError::NulPtr("clap_param_info"));
            }

            let mut writer = ParamInfoWriter::from_raw(info);
            plugin.get_info(param_index, &mut writer);
            Ok(writer.is_set())
        })
    }
    .unwrap_or(false)
}

unsafe extern "C" fn get_value<P: Plugin + PluginMainThreadParams>(
    plugin: *const clap_plugin,
    param_id: clap_id,
    value: *mut f64,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer, and a valid value pointer if non-null.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "params.get_value", |plugin, _host| {
            if value.is_null() {
                return Err(PluginWrapperError::NulPtr("value"));
            }

            Ok(plugin.get_value(param_id).map(|v| value.write(v)).is_some())
        })
    }
    .unwrap_or(false)
}

unsafe extern "C" fn value_to_text<P: Plugin + PluginMainThreadParams>(
    plugin: *const clap_plugin,
    param_id: clap_id,
    value: f64,
    display: *mut c_char,
    size: u32,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer, and a display buffer valid for `size` bytes.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "params.value_to_text", |plugin, _host| {
            if display.is_null() {
                return Err(PluginWrapperError::NulPtr("display"));
            }

            let buffer = core::slice::from_raw_parts_mut(display.cast::<u8>(), size as usize);
            let mut writer = ParamDisplayWriter::new(buffer);

            plugin
                .value_to_text(param_id, value, &mut writer)
                .map_err(PluginWrapperError::with_severity(LogSeverity::Error))?;

            Ok(writer.finish())
        })
    }
    .unwrap_or(false)
}

unsafe extern "C" fn text_to_value<P: Plugin + PluginMainThreadParams>(
    plugin: *const clap_plugin,
    param_id: clap_id,
    display: *const c_char,
    value: *mut f64,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer, and valid display and value pointers if
    // non-null.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "params.text_to_value", |plugin, _host| {
            let Some(display) = cstr_from_nullable_ptr(display) else {
                return Err(PluginWrapperError::NulPtr("display"));
            };
            if value.is_null() {
                return Err(PluginWrapperError::NulPtr("value"));
            }

            let display = display
                .to_str()
                .map_err(PluginWrapperError::with_severity(LogSeverity::Error))?;

            Ok(plugin.text_to_value(param_id, display).map(|v| value.write(v)).is_some())
        })
    }
    .unwrap_or(false)
}

unsafe extern "C" fn flush<P>(
    plugin: *const clap_plugin,
    input_parameter_changes: *const clap_input_events,
    output_parameter_changes: *const clap_output_events,
) where
    P: Plugin + PluginMainThreadParams,
    P::AudioProcessor: PluginAudioProcessorParams,
{
    let empty = InputEvents::empty();
    let void = OutputEvents::void();

    // SAFETY: the host gives lists that are either null or valid for the duration of the call.
    let (input, output) = unsafe {
        (
            input_parameter_changes
                .as_ref()
                .map(|e| InputEvents::from_raw(e))
                .unwrap_or(&empty),
            output_parameter_changes
                .as_ref()
                .map(|e| OutputEvents::from_raw(e))
                .unwrap_or(&void),
        )
    };

    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_audio_processor_or_main_thread(
            plugin,
            "params.flush",
            |processor, _host| {
                PluginAudioProcessorParams::flush(processor, input, output);
                Ok(())
            },
            |plugin, _host| {
                PluginMainThreadParams::flush(plugin, input, output);
                Ok(())
            },
        );
    }
}

impl PluginParams {
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn count(&self) -> u32 {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.count {
            // SAFETY: upheld by caller
            Some(count) => unsafe { count(self.0.plugin_ptr().as_ptr()) },
            None => 0,
        }
    }

    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn get_info(&self, param_index: u32) -> Option<ParamInfo> {
        // SAFETY: upheld by caller
        let get_info = unsafe { self.0.as_ref() }.get_info?;
        let mut info = MaybeUninit::<clap_param_info>::uninit();

        // SAFETY: upheld by caller. The info pointer is valid for writes.
        if unsafe { get_info(self.0.plugin_ptr().as_ptr(), param_index, info.as_mut_ptr()) } {
            // SAFETY: the plugin returned true, so it filled the info.
            Some(ParamInfo::from_raw(unsafe { info.assume_init_ref() }))
        } else {
            None
        }
    }

    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn get_value(&self, param_id: clap_id) -> Option<f64> {
        // SAFETY: upheld by caller
        let get_value = unsafe { self.0.as_ref() }.get_value?;
        let mut value = 0.0;

        // SAFETY: upheld by caller. The value pointer is valid for writes.
        unsafe { get_value(self.0.plugin_ptr().as_ptr(), param_id, &mut value) }.then_some(value)
    }

    /// Returns the plugin's text for `value`, using a buffer of `capacity` bytes.
    ///
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn value_to_text(
        &self,
        param_id: clap_id,
        value: f64,
        capacity: u32,
    ) -> Option<CString> {
        // SAFETY: upheld by caller
        let value_to_text = unsafe { self.0.as_ref() }.value_to_text?;
        let mut buffer = vec![0u8; capacity as usize];

        // SAFETY: upheld by caller. The buffer is valid for `capacity` bytes.
        let ok = unsafe {
            value_to_text(
                self.0.plugin_ptr().as_ptr(),
                param_id,
                value,
                buffer.as_mut_ptr().cast(),
                capacity,
            )
        };
        if !ok {
            return None;
        }

        let len = buffer.iter().position(|b| *b == 0)?;
        buffer.truncate(len);
        CString::new(buffer).ok()
    }

    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn text_to_value(&self, param_id: clap_id, text: &CStr) -> Option<f64> {
        // SAFETY: upheld by caller
        let text_to_value = unsafe { self.0.as_ref() }.text_to_value?;
        let mut value = 0.0;

        // SAFETY: upheld by caller. Both pointers are valid for the call.
        unsafe {
            text_to_value(
                self.0.plugin_ptr().as_ptr(),
                param_id,
                text.as_ptr(),
                &mut value,
            )
        }
        .then_some(value)
    }

    /// # Safety
    ///
    /// The plugin instance must still be alive. If the plugin is active, this must be called on
    /// the audio thread, and on the main thread otherwise.
    pub unsafe fn flush(&self, input: &InputEvents, output: &OutputEvents) {
        // SAFETY: upheld by caller
        if let Some(flush) = unsafe { self.0.as_ref() }.flush {
            // SAFETY: upheld by caller. Both lists are valid for the call.
            unsafe { flush(self.0.plugin_ptr().as_ptr(), input.as_raw(), output.as_raw()) }
        }
    }
}

impl HostParams {
    /// Asks the host to rescan the plugin's parameters.
    #[inline]
    pub fn rescan(&self, host: &HostMainThreadHandle, flags: ParamRescanFlags) {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        if let Some(rescan) = unsafe { self.0.as_ref() }.rescan {
            // SAFETY: the handle proves we're on the main thread.
            unsafe { rescan(host.shared().as_raw(), flags.bits()) }
        }
    }

    /// Asks the host to forget about a parameter's automation or modulation.
    #[inline]
    pub fn clear(&self, host: &HostMainThreadHandle, param_id: clap_id, flags: ParamClearFlags) {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        if let Some(clear) = unsafe { self.0.as_ref() }.clear {
            // SAFETY: the handle proves we're on the main thread.
            unsafe { clear(host.shared().as_raw(), param_id, flags.bits()) }
        }
    }

    /// Asks the host to call `flush` as soon as possible. Can be called from any thread.
    #[inline]
    pub fn request_flush(&self, host: &HostHandle) {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        if let Some(request_flush) = unsafe { self.0.as_ref() }.request_flush {
            // SAFETY: this function is thread-safe.
            unsafe { request_flush(host.as_raw()) }
        }
    }
}
