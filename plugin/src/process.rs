//! Types exposing data and metadata to be used by plugins during audio processing.
//!
//! All of those types are exclusively used in the
//! [`PluginAudioProcessor::process`](crate::plugin::PluginAudioProcessor::process) method.

use crate::extensions::thread_pool::PublishedTasks;
use crate::host::{HostHandle, InstanceShared};
use clasp_common::events::event_types::TransportEvent;
use clasp_common::events::io::{InputEvents, OutputEvents};
use clasp_sys::process::clap_process;

pub use clasp_common::process::{AudioConfiguration, ProcessStatus};

pub mod audio;

pub use audio::Audio;

/// Metadata about the current process call.
#[derive(Copy, Clone)]
pub struct Process<'a> {
    /// The number of frames to process in this block.
    pub frames_count: u32,
    /// A steady sample time counter, or [`None`] if the host doesn't provide one.
    ///
    /// This can be used to calculate the sleep duration between two process calls.
    pub steady_time: Option<u64>,
    /// Transport information at sample 0.
    ///
    /// If this is [`None`], the plugin is running in a free-running host.
    pub transport: Option<&'a TransportEvent>,
    shared: &'a InstanceShared,
}

impl<'a> Process<'a> {
    /// # Safety
    ///
    /// The transport pointer must be null or valid for `'a`.
    #[inline]
    pub(crate) unsafe fn from_raw(raw: &'a clap_process, shared: &'a InstanceShared) -> Self {
        Self {
            frames_count: raw.frames_count,
            steady_time: u64::try_from(raw.steady_time).ok(),
            // SAFETY: upheld by caller
            transport: unsafe { raw.transport.as_ref() }.map(TransportEvent::from_raw_ref),
            shared,
        }
    }

    #[inline]
    pub fn host(&self) -> HostHandle {
        HostHandle::new(self.shared)
    }

    /// Runs `task` once for every index in `0..task_count`, and returns once all of them have
    /// completed.
    ///
    /// If the host provides a thread pool, the tasks are spread across its threads. Otherwise, or
    /// if the host refuses the request, they are all run sequentially on the current thread.
    pub fn run_tasks<F>(&self, task_count: u32, task: F) -> TaskExecution
    where
        F: Fn(u32) + Sync,
    {
        if task_count == 0 {
            return TaskExecution::Sequential;
        }

        if let Some(thread_pool) = self.shared.capabilities().thread_pool {
            let tasks = PublishedTasks::new(&task, task_count);
            let host = self.host();

            let executed = self.shared.thread_pool_tasks.publish(&tasks, || {
                thread_pool.request_exec(&host, task_count)
            });

            if executed == Some(true) {
                return TaskExecution::ThreadPool;
            }
        }

        (0..task_count).for_each(task);
        TaskExecution::Sequential
    }
}

/// How the tasks given to [`Process::run_tasks`] were run.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TaskExecution {
    /// The host ran the tasks on its thread pool.
    ThreadPool,
    /// The tasks were run one after the other on the audio thread.
    Sequential,
}

/// Input and output events that occurred during this processing block.
#[derive(Copy, Clone)]
pub struct Events<'a> {
    /// The input event list, for the plugin to read events from.
    pub input: &'a InputEvents<'a>,
    /// The output event list, for the plugin to push events into.
    pub output: &'a OutputEvents<'a>,
}

impl<'a> Events<'a> {
    /// Null event lists are replaced with the given placeholders.
    ///
    /// # Safety
    ///
    /// The event list pointers must be null or valid for `'a`.
    #[inline]
    pub(crate) unsafe fn from_raw(
        raw: &'a clap_process,
        empty_input: &'a InputEvents<'a>,
        void_output: &'a OutputEvents<'a>,
    ) -> Self {
        // SAFETY: upheld by caller
        unsafe {
            Self {
                input: raw
                    .in_events
                    .as_ref()
                    .map(|e| InputEvents::from_raw(e))
                    .unwrap_or(empty_input),
                output: raw
                    .out_events
                    .as_ref()
                    .map(|e| OutputEvents::from_raw(e))
                    .unwrap_or(void_output),
            }
        }
    }
}
