use crate::host::clap_host;
use crate::plugin::clap_plugin;
use std::ffi::CStr;

pub const CLAP_EXT_THREAD_POOL: &CStr = c"clap/draft/thread-pool";

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_plugin_thread_pool {
    /// Called by the thread pool.
    pub exec: Option<unsafe extern "C" fn(plugin: *const clap_plugin, task_index: u32)>,
}

#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct clap_host_thread_pool {
    /// Schedule `num_tasks` jobs in the host thread pool.
    /// It can't be called concurrently or from the thread pool, and blocks until all the tasks
    /// are processed. It must be used exclusively for realtime processing within the process
    /// call. Returns true if the host did execute all the tasks, false if it rejected the request.
    /// [audio-thread]
    pub request_exec: Option<unsafe extern "C" fn(host: *const clap_host, num_tasks: u32) -> bool>,
}
