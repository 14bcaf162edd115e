//! Lets plugins run code on the host's main-thread event loop, through timers and file
//! descriptor notifications.

use bitflags::bitflags;
use clasp_plugin::extensions::prelude::*;
use clasp_sys::ext::event_loop::*;
use clasp_sys::id::clap_id;
use std::error::Error;
use std::ffi::CStr;
use std::fmt::{Display, Formatter};

/// A file descriptor (a `HANDLE` on Windows) watched by the host's event loop.
pub type Fd = clap_fd;

bitflags! {
    /// IO events for file descriptors.
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct FdFlags: u32 {
        const READ = CLAP_FD_READ;
        const WRITE = CLAP_FD_WRITE;
        const ERROR = CLAP_FD_ERROR;
    }
}

/// Identifies a timer given to a plugin. Unique for a given plugin instance.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub struct TimerId(pub clap_id);

impl Display for TimerId {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum TimerError {
    /// The host failed or declined to register a timer.
    RegisterError,
    /// The host failed to unregister a timer.
    UnregisterError(TimerId),
}

impl Display for TimerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TimerError::RegisterError => f.write_str("Failed to register timer"),
            TimerError::UnregisterError(id) => write!(f, "Failed to unregister timer ({id})"),
        }
    }
}

impl Error for TimerError {}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FdError {
    Register(Fd, FdFlags),
    Modify(Fd, FdFlags),
    Unregister(Fd),
}

impl Display for FdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FdError::Register(fd, flags) => write!(
                f,
                "Failed to register file descriptor ({fd:?}) with flags ({flags:?})"
            ),
            FdError::Modify(fd, flags) => write!(
                f,
                "Failed to modify file descriptor ({fd:?}) with flags ({flags:?})"
            ),
            FdError::Unregister(fd) => write!(f, "Failed to unregister file descriptor ({fd:?})"),
        }
    }
}

impl Error for FdError {}

/// The plugin's event loop table.
#[derive(Copy, Clone)]
pub struct PluginEventLoop(RawExtension<PluginExtensionSide, clap_plugin_event_loop>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginEventLoop {
    const IDENTIFIER: &'static CStr = CLAP_EXT_EVENT_LOOP;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// The host's event loop table.
#[derive(Copy, Clone)]
pub struct HostEventLoop(RawExtension<HostExtensionSide, clap_host_event_loop>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostEventLoop {
    const IDENTIFIER: &'static CStr = CLAP_EXT_EVENT_LOOP;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// Implemented by plugins using the host's event loop.
pub trait PluginEventLoopImpl {
    /// Called on every tick of a timer this plugin registered.
    fn on_timer(&mut self, timer_id: TimerId);

    /// Called when a file descriptor this plugin registered is ready.
    fn on_fd(&mut self, _fd: Fd, _flags: FdFlags) {}
}

impl<P: Plugin + PluginEventLoopImpl> ExtensionImplementation<P> for PluginEventLoop {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_event_loop {
            on_timer: Some(on_timer::<P>),
            on_fd: Some(on_fd::<P>),
        });
}

unsafe extern "C" fn on_timer<P: Plugin + PluginEventLoopImpl>(
    plugin: *const clap_plugin,
    timer_id: clap_id,
) {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "event_loop.on_timer", |plugin, _host| {
            plugin.on_timer(TimerId(timer_id));
            Ok(())
        });
    }
}

unsafe extern "C" fn on_fd<P: Plugin + PluginEventLoopImpl>(
    plugin: *const clap_plugin,
    fd: clap_fd,
    flags: clap_fd_flags,
) {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "event_loop.on_fd", |plugin, _host| {
            plugin.on_fd(fd, FdFlags::from_bits_truncate(flags));
            Ok(())
        });
    }
}

impl PluginEventLoop {
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn on_timer(&self, timer_id: TimerId) {
        // SAFETY: upheld by caller
        if let Some(on_timer) = unsafe { self.0.as_ref() }.on_timer {
            // SAFETY: upheld by caller
            unsafe { on_timer(self.0.plugin_ptr().as_ptr(), timer_id.0) }
        }
    }

    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn on_fd(&self, fd: Fd, flags: FdFlags) {
        // SAFETY: upheld by caller
        if let Some(on_fd) = unsafe { self.0.as_ref() }.on_fd {
            // SAFETY: upheld by caller
            unsafe { on_fd(self.0.plugin_ptr().as_ptr(), fd, flags.bits()) }
        }
    }
}

impl HostEventLoop {
    /// Registers a timer ticking every `period_ms` milliseconds.
    ///
    /// Hosts may adjust the period if it is too short.
    pub fn register_timer(
        &self,
        host: &HostMainThreadHandle,
        period_ms: u32,
    ) -> Result<TimerId, TimerError> {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        let register_timer = unsafe { self.0.as_ref() }
            .register_timer
            .ok_or(TimerError::RegisterError)?;

        let mut id = 0;
        // SAFETY: the handle proves we're on the main thread. The id pointer is valid.
        if unsafe { register_timer(host.shared().as_raw(), period_ms, &mut id) } {
            Ok(TimerId(id))
        } else {
            Err(TimerError::RegisterError)
        }
    }

    pub fn unregister_timer(
        &self,
        host: &HostMainThreadHandle,
        timer_id: TimerId,
    ) -> Result<(), TimerError> {
        let error = TimerError::UnregisterError(timer_id);
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        let unregister_timer = unsafe { self.0.as_ref() }.unregister_timer.ok_or(error)?;

        // SAFETY: the handle proves we're on the main thread.
        if unsafe { unregister_timer(host.shared().as_raw(), timer_id.0) } {
            Ok(())
        } else {
            Err(error)
        }
    }

    pub fn register_fd(
        &self,
        host: &HostMainThreadHandle,
        fd: Fd,
        flags: FdFlags,
    ) -> Result<(), FdError> {
        let error = FdError::Register(fd, flags);
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        let register_fd = unsafe { self.0.as_ref() }.register_fd.ok_or(error)?;

        // SAFETY: the handle proves we're on the main thread.
        if unsafe { register_fd(host.shared().as_raw(), fd, flags.bits()) } {
            Ok(())
        } else {
            Err(error)
        }
    }

    pub fn modify_fd(
        &self,
        host: &HostMainThreadHandle,
        fd: Fd,
        flags: FdFlags,
    ) -> Result<(), FdError> {
        let error = FdError::Modify(fd, flags);
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        let modify_fd = unsafe { self.0.as_ref() }.modify_fd.ok_or(error)?;

        // SAFETY: the handle proves we're on the main thread.
        if unsafe { modify_fd(host.shared().as_raw(), fd, flags.bits()) } {
            Ok(())
        } else {
            Err(error)
        }
    }

    pub fn unregister_fd(&self, host: &HostMainThreadHandle, fd: Fd) -> Result<(), FdError> {
        let error = FdError::Unregister(fd);
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        let unregister_fd = unsafe { self.0.as_ref() }.unregister_fd.ok_or(error)?;

        // SAFETY: the handle proves we're on the main thread.
        if unsafe { unregister_fd(host.shared().as_raw(), fd) } {
            Ok(())
        } else {
            Err(error)
        }
    }
}
