use crate::host::{HostHandle, InstanceShared};
use clasp_common::log::LogSeverity;
use std::ffi::CString;

impl InstanceShared {
    pub fn log(&self, severity: LogSeverity, message: &str) {
        if let Some(log) = self.capabilities().log {
            match CString::new(message) {
                Ok(message) => {
                    log.log(&HostHandle::new(self), severity, &message);
                    return;
                }
                Err(e) => eprintln!(
                    "[CLASP_PLUGIN_ERROR] Failed to serialize log message for host: {e}"
                ),
            }
        }

        eprintln!("[CLASP_PLUGIN_{severity}] {message}");
    }

    #[inline]
    pub fn host_misbehaving(&self, message: &str) {
        self.log(LogSeverity::HostMisbehaving, message)
    }

    #[inline]
    pub fn is_main_thread(&self) -> Option<bool> {
        self.capabilities()
            .thread_check?
            .is_main_thread(&HostHandle::new(self))
    }

    #[inline]
    pub fn is_audio_thread(&self) -> Option<bool> {
        self.capabilities()
            .thread_check?
            .is_audio_thread(&HostHandle::new(self))
    }

    /// Reports the host calling `method` from a thread other than the main thread.
    ///
    /// This does nothing if the host can't tell which thread this is.
    #[inline]
    pub fn ensure_main_thread(&self, method: &str) {
        if self.is_main_thread() == Some(false) {
            self.thread_violation(method, "main")
        }
    }

    /// Reports the host calling `method` from a thread other than an audio thread.
    ///
    /// This does nothing if the host can't tell which thread this is.
    #[inline]
    pub fn ensure_audio_thread(&self, method: &str) {
        if self.is_audio_thread() == Some(false) {
            self.thread_violation(method, "audio")
        }
    }

    #[cold]
    fn thread_violation(&self, method: &str, expected_thread: &str) {
        self.host_misbehaving(&format!(
            "Host called {method} from outside of the {expected_thread} thread"
        ));

        if cfg!(debug_assertions) && !cfg!(feature = "lenient-thread-checks") {
            std::process::abort();
        }
    }
}
