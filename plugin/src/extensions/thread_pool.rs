//! The `clap/draft/thread-pool` extension.
//!
//! Plugins use the host's thread pool through [`Process::run_tasks`](crate::process::Process::run_tasks),
//! which is only available while processing.

use crate::extensions::prelude::*;
use crate::host::HostCapability;
use clasp_sys::ext::thread_pool::*;
use std::error::Error;
use std::ffi::{CStr, c_void};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicPtr, Ordering};

/// The plugin's thread pool table.
#[derive(Copy, Clone)]
pub struct PluginThreadPool(RawExtension<PluginExtensionSide, clap_plugin_thread_pool>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginThreadPool {
    const IDENTIFIER: &'static CStr = CLAP_EXT_THREAD_POOL;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl PluginThreadPool {
    /// Executes one of the tasks the plugin requested.
    ///
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called from within a
    /// `request_exec` call made by the plugin.
    pub unsafe fn exec(&self, task_index: u32) {
        // SAFETY: upheld by caller
        if let Some(exec) = unsafe { self.0.as_ref() }.exec {
            // SAFETY: upheld by caller
            unsafe { exec(self.0.plugin_ptr().as_ptr(), task_index) }
        }
    }
}

impl<P: Plugin> ExtensionImplementation<P> for PluginThreadPool {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_thread_pool {
            exec: Some(exec::<P>),
        });
}

unsafe extern "C" fn exec<P: Plugin>(plugin: *const clap_plugin, task_index: u32) {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle(plugin, |wrapper| {
            wrapper.ensure_audio_thread("thread_pool.exec");
            wrapper
                .thread_pool_tasks()
                .exec(task_index)
                .map_err(PluginWrapperError::with_severity(LogSeverity::HostMisbehaving))
        });
    }
}

/// The host's thread pool.
#[derive(Copy, Clone)]
pub struct HostThreadPool(RawExtension<HostExtensionSide, clap_host_thread_pool>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostThreadPool {
    const IDENTIFIER: &'static CStr = CLAP_EXT_THREAD_POOL;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

impl HostThreadPool {
    /// Only reachable through `Process`, i.e. from within a `process` call.
    #[inline]
    pub(crate) fn request_exec(&self, host: &HostHandle, task_count: u32) -> bool {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        match unsafe { self.0.as_ref() }.request_exec {
            // SAFETY: this is only called on the audio thread, while processing.
            Some(request_exec) => unsafe { request_exec(host.as_raw(), task_count) },
            None => false,
        }
    }
}

impl HostCapability for HostThreadPool {
    #[inline]
    fn is_complete(&self) -> bool {
        // SAFETY: capabilities are checked during init, while the host is alive.
        unsafe { self.0.as_ref() }.request_exec.is_some()
    }
}

/// A batch of tasks currently offered to the host's thread pool.
pub(crate) struct PublishedTasks<'a> {
    task: &'a (dyn Fn(u32) + Sync),
    count: u32,
}

impl<'a> PublishedTasks<'a> {
    #[inline]
    pub fn new(task: &'a (dyn Fn(u32) + Sync), count: u32) -> Self {
        Self { task, count }
    }
}

/// The slot through which the audio thread hands tasks over to the host's pool threads.
pub(crate) struct ThreadPoolTasks {
    current: AtomicPtr<c_void>,
}

impl ThreadPoolTasks {
    #[inline]
    pub const fn new() -> Self {
        Self {
            current: AtomicPtr::new(core::ptr::null_mut()),
        }
    }

    /// Makes `tasks` available to [`exec`](Self::exec) while `f` runs.
    ///
    /// Returns `None` without calling `f` if another batch is already published.
    pub fn publish<R>(&self, tasks: &PublishedTasks, f: impl FnOnce() -> R) -> Option<R> {
        let ptr = (tasks as *const PublishedTasks).cast_mut().cast::<c_void>();

        self.current
            .compare_exchange(
                core::ptr::null_mut(),
                ptr,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .ok()?;

        struct Unpublish<'a>(&'a AtomicPtr<c_void>);

        impl Drop for Unpublish<'_> {
            #[inline]
            fn drop(&mut self) {
                self.0.store(core::ptr::null_mut(), Ordering::Release)
            }
        }

        let _unpublish = Unpublish(&self.current);
        Some(f())
    }

    pub fn exec(&self, task_index: u32) -> Result<(), ThreadPoolExecError> {
        let current = self.current.load(Ordering::Acquire);

        // SAFETY: a non-null pointer always points to the batch published by publish(), which
        // outlives the request_exec call this runs in.
        let tasks = unsafe { current.cast::<PublishedTasks>().as_ref() }
            .ok_or(ThreadPoolExecError::NoPublishedTasks)?;

        if task_index >= tasks.count {
            return Err(ThreadPoolExecError::OutOfRange {
                task_index,
                task_count: tasks.count,
            });
        }

        (tasks.task)(task_index);
        Ok(())
    }
}

/// Errors that occur when the host executes a task it wasn't asked to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ThreadPoolExecError {
    NoPublishedTasks,
    OutOfRange { task_index: u32, task_count: u32 },
}

impl Display for ThreadPoolExecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadPoolExecError::NoPublishedTasks => {
                f.write_str("Host called thread_pool.exec outside of a request_exec call")
            }
            ThreadPoolExecError::OutOfRange {
                task_index,
                task_count,
            } => write!(
                f,
                "Host called thread_pool.exec with task index {task_index}, but only {task_count} tasks were requested"
            ),
        }
    }
}

impl Error for ThreadPoolExecError {}
