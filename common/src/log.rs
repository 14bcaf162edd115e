use clasp_sys::ext::log::*;
use std::fmt::{Display, Formatter};

/// Severity of a message logged through the host's `clap/log` extension.
#[repr(i32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum LogSeverity {
    Debug = CLAP_LOG_DEBUG,
    Info = CLAP_LOG_INFO,
    Warning = CLAP_LOG_WARNING,
    Error = CLAP_LOG_ERROR,
    Fatal = CLAP_LOG_FATAL,
    /// The host broke the protocol, e.g. by calling a method out of order or on the wrong thread.
    HostMisbehaving = CLAP_LOG_HOST_MISBEHAVING,
    /// The plugin broke the protocol, or panicked.
    PluginMisbehaving = CLAP_LOG_PLUGIN_MISBEHAVING,
}

impl LogSeverity {
    #[inline]
    pub fn from_raw(raw: clap_log_severity) -> Option<Self> {
        use LogSeverity::*;

        match raw {
            CLAP_LOG_DEBUG => Some(Debug),
            CLAP_LOG_INFO => Some(Info),
            CLAP_LOG_WARNING => Some(Warning),
            CLAP_LOG_ERROR => Some(Error),
            CLAP_LOG_FATAL => Some(Fatal),
            CLAP_LOG_HOST_MISBEHAVING => Some(HostMisbehaving),
            CLAP_LOG_PLUGIN_MISBEHAVING => Some(PluginMisbehaving),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_raw(self) -> clap_log_severity {
        self as _
    }
}

impl Display for LogSeverity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO",
            LogSeverity::Warning => "WARNING",
            LogSeverity::Error => "ERROR",
            LogSeverity::Fatal => "FATAL",
            LogSeverity::HostMisbehaving => "HOST_MISBEHAVING",
            LogSeverity::PluginMisbehaving => "PLUGIN_MISBEHAVING",
        };

        f.write_str(str)
    }
}
