use crate::events::{clap_input_events, clap_output_events};
use crate::host::clap_host;
use crate::id::clap_id;
use crate::plugin::clap_plugin;
use crate::string_sizes::{CLAP_MODULE_SIZE, CLAP_NAME_SIZE};
use std::ffi::{CStr, c_char, c_void};

pub const CLAP_EXT_PARAMS: &CStr = c"clap/params";

pub type clap_param_info_flags = u32;

/// Is this param stepped? (integer values only)
pub const CLAP_PARAM_IS_STEPPED: clap_param_info_flags = 1 << 0;
/// Does this param support per note automations?
pub const CLAP_PARAM_IS_PER_NOTE: clap_param_info_flags = 1 << 1;
/// Does this param support per channel automations?
pub const CLAP_PARAM_IS_PER_CHANNEL: clap_param_info_flags = 1 << 2;
/// Does this param support per port automations?
pub const CLAP_PARAM_IS_PER_PORT: clap_param_info_flags = 1 << 3;
/// Useful for periodic parameters like a phase.
pub const CLAP_PARAM_IS_PERIODIC: clap_param_info_flags = 1 << 4;
/// The parameter should not be shown to the user, because it is currently not used.
pub const CLAP_PARAM_IS_HIDDEN: clap_param_info_flags = 1 << 5;
/// The parameter can't be changed by the host.
pub const CLAP_PARAM_IS_READONLY: clap_param_info_flags = 1 << 6;
/// This parameter is used to merge the plugin and host bypass button.
pub const CLAP_PARAM_IS_BYPASS: clap_param_info_flags = 1 << 7;
/// When set, automation can be recorded.
pub const CLAP_PARAM_IS_AUTOMATABLE: clap_param_info_flags = 1 << 8;
/// Does changing this value require the processing to be restarted?
pub const CLAP_PARAM_REQUIRES_PROCESS: clap_param_info_flags = 1 << 9;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_param_info {
    /// Stable parameter identifier, it must never change.
    pub id: clap_id,
    pub flags: clap_param_info_flags,

    /// Opaque value the host passes back along with parameter events for faster lookups.
    pub cookie: *mut c_void,

    /// The display name.
    pub name: [c_char; CLAP_NAME_SIZE],
    /// The module containing the param, eg: "oscillators/wt1".
    pub module: [c_char; CLAP_MODULE_SIZE],

    pub min_value: f64,
    pub max_value: f64,
    pub default_value: f64,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_params {
    /// Returns the number of parameters.
    /// [main-thread]
    pub count: Option<unsafe extern "C" fn(plugin: *const clap_plugin) -> u32>,

    /// Copies the parameter's info to param_info and returns true on success.
    /// [main-thread]
    pub get_info: Option<
        unsafe extern "C" fn(plugin: *const clap_plugin, param_index: u32, param_info: *mut clap_param_info) -> bool,
    >,

    /// Gets the parameter plain value.
    /// [main-thread]
    pub get_value:
        Option<unsafe extern "C" fn(plugin: *const clap_plugin, param_id: clap_id, value: *mut f64) -> bool>,

    /// Formats the display text for the given parameter value.
    /// [main-thread]
    pub value_to_text: Option<
        unsafe extern "C" fn(
            plugin: *const clap_plugin,
            param_id: clap_id,
            value: f64,
            display: *mut c_char,
            size: u32,
        ) -> bool,
    >,

    /// Converts the display text to a parameter value.
    /// [main-thread]
    pub text_to_value: Option<
        unsafe extern "C" fn(
            plugin: *const clap_plugin,
            param_id: clap_id,
            display: *const c_char,
            value: *mut f64,
        ) -> bool,
    >,

    /// Flushes a set of parameter changes.
    /// This method must not be called concurrently to clap_plugin->process().
    /// [active ? audio-thread : main-thread]
    pub flush: Option<
        unsafe extern "C" fn(
            plugin: *const clap_plugin,
            input_parameter_changes: *const clap_input_events,
            output_parameter_changes: *const clap_output_events,
        ),
    >,
}

pub type clap_param_rescan_flags = u32;

/// The parameter values did change, eg. after loading a preset.
pub const CLAP_PARAM_RESCAN_VALUES: clap_param_rescan_flags = 1 << 0;
/// The value to text conversion changed, and the text needs to be rendered again.
pub const CLAP_PARAM_RESCAN_TEXT: clap_param_rescan_flags = 1 << 1;
/// The parameter info did change, use this flag for name, module or flags changes.
pub const CLAP_PARAM_RESCAN_INFO: clap_param_rescan_flags = 1 << 2;
/// Invalidates everything the host knows about parameters.
/// It can only be used while the plugin is deactivated.
pub const CLAP_PARAM_RESCAN_ALL: clap_param_rescan_flags = 1 << 3;

pub type clap_param_clear_flags = u32;

/// Clears all possible references to a parameter.
pub const CLAP_PARAM_CLEAR_ALL: clap_param_clear_flags = 1 << 0;
/// Clears all automations to a parameter.
pub const CLAP_PARAM_CLEAR_AUTOMATIONS: clap_param_clear_flags = 1 << 1;
/// Clears all modulations to a parameter.
pub const CLAP_PARAM_CLEAR_MODULATIONS: clap_param_clear_flags = 1 << 2;

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_params {
    /// Rescan the full list of parameters according to the flags.
    /// [main-thread]
    pub rescan: Option<unsafe extern "C" fn(host: *const clap_host, flags: clap_param_rescan_flags)>,

    /// Clears references to a parameter.
    /// [main-thread]
    pub clear: Option<unsafe extern "C" fn(host: *const clap_host, param_id: clap_id, flags: clap_param_clear_flags)>,

    /// Request the host to call clap_plugin_params->flush().
    /// [thread-safe]
    pub request_flush: Option<unsafe extern "C" fn(host: *const clap_host)>,
}
