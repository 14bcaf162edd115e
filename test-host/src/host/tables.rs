//! The raw host extension tables, and the functions they point to.

use super::{HostCall, HostShared, IS_AUDIO_THREAD, LogEntry, lock};
use crate::config::ThreadPoolMode;
use clasp_common::log::LogSeverity;
use clasp_common::utils::cstr_from_nullable_ptr;
use clasp_sys::ext::audio_ports::*;
use clasp_sys::ext::event_filter::*;
use clasp_sys::ext::event_loop::*;
use clasp_sys::ext::file_reference::*;
use clasp_sys::ext::gui::*;
use clasp_sys::ext::latency::*;
use clasp_sys::ext::log::*;
use clasp_sys::ext::note_name::*;
use clasp_sys::ext::params::*;
use clasp_sys::ext::state::*;
use clasp_sys::ext::thread_check::*;
use clasp_sys::ext::thread_pool::*;
use clasp_sys::ext::track_info::*;
use clasp_sys::host::clap_host;
use clasp_sys::id::clap_id;
use rayon::prelude::*;
use std::ffi::{CStr, c_char, c_void};
use std::mem::MaybeUninit;
use std::sync::atomic::Ordering;

static LOG: clap_host_log = clap_host_log { log: Some(log) };

static THREAD_CHECK: clap_host_thread_check = clap_host_thread_check {
    is_main_thread: Some(is_main_thread),
    is_audio_thread: Some(is_audio_thread),
};

static THREAD_POOL: clap_host_thread_pool = clap_host_thread_pool {
    request_exec: Some(request_exec),
};

static AUDIO_PORTS: clap_host_audio_ports = clap_host_audio_ports {
    invalidate_all: Some(invalidate_all),
};

static TRACK_INFO: clap_host_track_info = clap_host_track_info {
    get: Some(get_track_info),
};

static STATE: clap_host_state = clap_host_state {
    mark_dirty: Some(state_mark_dirty),
};

static LATENCY: clap_host_latency = clap_host_latency {
    changed: Some(latency_changed),
};

static PARAMS: clap_host_params = clap_host_params {
    rescan: Some(params_rescan),
    clear: Some(params_clear),
    request_flush: Some(params_request_flush),
};

static GUI: clap_host_gui = clap_host_gui {
    resize: Some(gui_resize),
};

static NOTE_NAME: clap_host_note_name = clap_host_note_name {
    changed: Some(note_name_changed),
};

static EVENT_FILTER: clap_host_event_filter = clap_host_event_filter {
    changed: Some(event_filter_changed),
};

static FILE_REFERENCE: clap_host_file_reference = clap_host_file_reference {
    changed: Some(file_reference_changed),
    set_dirty: Some(file_reference_set_dirty),
};

static EVENT_LOOP: clap_host_event_loop = clap_host_event_loop {
    register_timer: Some(register_timer),
    unregister_timer: Some(unregister_timer),
    register_fd: Some(register_fd),
    modify_fd: Some(modify_fd),
    unregister_fd: Some(unregister_fd),
};

#[inline]
fn table<T>(table: &'static T) -> *const c_void {
    (table as *const T).cast()
}

impl HostShared {
    fn extension(&self, identifier: &CStr) -> Option<*const c_void> {
        let config = &self.config;

        let core = [
            (CLAP_EXT_LOG, config.log, table(&LOG)),
            (CLAP_EXT_THREAD_CHECK, config.thread_check, table(&THREAD_CHECK)),
            (
                CLAP_EXT_THREAD_POOL,
                config.thread_pool != ThreadPoolMode::Absent,
                table(&THREAD_POOL),
            ),
            (CLAP_EXT_AUDIO_PORTS, config.audio_ports, table(&AUDIO_PORTS)),
            (CLAP_EXT_TRACK_INFO, config.track_info, table(&TRACK_INFO)),
        ];

        let optional = [
            (CLAP_EXT_STATE, table(&STATE)),
            (CLAP_EXT_LATENCY, table(&LATENCY)),
            (CLAP_EXT_PARAMS, table(&PARAMS)),
            (CLAP_EXT_GUI, table(&GUI)),
            (CLAP_EXT_NOTE_NAME, table(&NOTE_NAME)),
            (CLAP_EXT_EVENT_FILTER, table(&EVENT_FILTER)),
            (CLAP_EXT_FILE_REFERENCE, table(&FILE_REFERENCE)),
            (CLAP_EXT_EVENT_LOOP, table(&EVENT_LOOP)),
        ]
        .map(|(id, ptr)| (id, config.optional_extensions, ptr));

        core.into_iter()
            .chain(optional)
            .find(|(id, enabled, _)| *enabled && *id == identifier)
            .map(|(_, _, ptr)| ptr)
    }
}

/// Runs `f` with the host behind the given pointer, or returns `default` if there is none.
#[inline]
fn with_host<T>(host: *const clap_host, default: T, f: impl FnOnce(&HostShared) -> T) -> T {
    // SAFETY: the plugin only receives pointers to live TestHost tables.
    match unsafe { HostShared::from_raw(host) } {
        Some(shared) => f(shared),
        None => default,
    }
}

#[inline]
fn record(host: *const clap_host, call: HostCall) {
    with_host(host, (), |shared| shared.record(call))
}

pub(super) unsafe extern "C" fn get_extension(
    host: *const clap_host,
    identifier: *const c_char,
) -> *const c_void {
    with_host(host, core::ptr::null(), |shared| {
        // SAFETY: the plugin gives a null or valid C string.
        let Some(identifier) = (unsafe { cstr_from_nullable_ptr(identifier) }) else {
            return core::ptr::null();
        };

        shared.extension(identifier).unwrap_or(core::ptr::null())
    })
}

pub(super) unsafe extern "C" fn request_restart(host: *const clap_host) {
    record(host, HostCall::RequestRestart)
}

pub(super) unsafe extern "C" fn request_process(host: *const clap_host) {
    record(host, HostCall::RequestProcess)
}

unsafe extern "C" fn log(host: *const clap_host, severity: clap_log_severity, message: *const c_char) {
    with_host(host, (), |shared| {
        // SAFETY: the plugin gives a null or valid C string.
        let message = unsafe { cstr_from_nullable_ptr(message) }
            .map(|m| m.to_string_lossy().into_owned())
            .unwrap_or_default();

        lock(&shared.logs).push(LogEntry {
            severity: LogSeverity::from_raw(severity),
            message,
        });
    })
}

unsafe extern "C" fn is_main_thread(host: *const clap_host) -> bool {
    with_host(host, false, |shared| {
        shared.main_thread == std::thread::current().id()
    })
}

unsafe extern "C" fn is_audio_thread(_host: *const clap_host) -> bool {
    IS_AUDIO_THREAD.get()
}

unsafe extern "C" fn request_exec(host: *const clap_host, num_tasks: u32) -> bool {
    with_host(host, false, |shared| {
        shared.record(HostCall::ThreadPoolRequest(num_tasks));

        let Some(pool) = &shared.rayon_pool else {
            return false;
        };
        let Some(thread_pool) = *lock(&shared.plugin_thread_pool) else {
            return false;
        };

        pool.install(|| {
            (0..num_tasks).into_par_iter().for_each(|task_index| {
                // SAFETY: the instance is alive, as it's the one requesting the execution.
                unsafe { thread_pool.exec(task_index) }
            })
        });

        true
    })
}

unsafe extern "C" fn invalidate_all(host: *const clap_host) {
    with_host(host, (), |shared| {
        shared.audio_ports_invalidations.fetch_add(1, Ordering::SeqCst);
        shared.record(HostCall::AudioPortsInvalidated);
    })
}

unsafe extern "C" fn get_track_info(host: *const clap_host, info: *mut clap_track_info) -> bool {
    with_host(host, false, |shared| {
        shared.record(HostCall::TrackInfoQueried);

        // SAFETY: the plugin gives a null or valid pointer. MaybeUninit has the same layout.
        let Some(buf) = (unsafe { info.cast::<MaybeUninit<clap_track_info>>().as_mut() }) else {
            return false;
        };

        match &*lock(&shared.track_info) {
            Some(track_info) => {
                track_info.write_to_raw(buf);
                true
            }
            None => false,
        }
    })
}

unsafe extern "C" fn state_mark_dirty(host: *const clap_host) {
    record(host, HostCall::StateMarkedDirty)
}

unsafe extern "C" fn latency_changed(host: *const clap_host) {
    record(host, HostCall::LatencyChanged)
}

unsafe extern "C" fn params_rescan(host: *const clap_host, flags: clap_param_rescan_flags) {
    record(host, HostCall::ParamsRescan(flags))
}

unsafe extern "C" fn params_clear(
    host: *const clap_host,
    param_id: clap_id,
    flags: clap_param_clear_flags,
) {
    record(host, HostCall::ParamsClear { param_id, flags })
}

unsafe extern "C" fn params_request_flush(host: *const clap_host) {
    record(host, HostCall::ParamsFlushRequested)
}

unsafe extern "C" fn gui_resize(host: *const clap_host, width: u32, height: u32) -> bool {
    with_host(host, false, |shared| {
        shared.record(HostCall::GuiResize { width, height });
        shared.config.accept_gui_resize
    })
}

unsafe extern "C" fn note_name_changed(host: *const clap_host) {
    record(host, HostCall::NoteNamesChanged)
}

unsafe extern "C" fn event_filter_changed(host: *const clap_host) {
    record(host, HostCall::EventFilterChanged)
}

unsafe extern "C" fn file_reference_changed(host: *const clap_host) {
    record(host, HostCall::FileReferencesChanged)
}

unsafe extern "C" fn file_reference_set_dirty(host: *const clap_host, resource_id: clap_id) {
    record(host, HostCall::FileReferenceDirty(resource_id))
}

unsafe extern "C" fn register_timer(
    host: *const clap_host,
    period_ms: u32,
    timer_id: *mut clap_id,
) -> bool {
    with_host(host, false, |shared| {
        // SAFETY: the plugin gives a null or valid pointer.
        let Some(timer_id) = (unsafe { timer_id.as_mut() }) else {
            return false;
        };

        *timer_id = shared.next_timer_id.fetch_add(1, Ordering::SeqCst);
        shared.record(HostCall::TimerRegistered {
            timer_id: *timer_id,
            period_ms,
        });
        true
    })
}

unsafe extern "C" fn unregister_timer(host: *const clap_host, timer_id: clap_id) -> bool {
    with_host(host, false, |shared| {
        let registered = lock(&shared.calls)
            .iter()
            .any(|c| matches!(c, HostCall::TimerRegistered { timer_id: id, .. } if *id == timer_id));

        shared.record(HostCall::TimerUnregistered(timer_id));
        registered
    })
}

unsafe extern "C" fn register_fd(host: *const clap_host, _fd: clap_fd, flags: clap_fd_flags) -> bool {
    with_host(host, false, |shared| {
        shared.record(HostCall::FdRegistered { flags });
        true
    })
}

unsafe extern "C" fn modify_fd(host: *const clap_host, _fd: clap_fd, flags: clap_fd_flags) -> bool {
    with_host(host, false, |shared| {
        shared.record(HostCall::FdModified { flags });
        true
    })
}

unsafe extern "C" fn unregister_fd(host: *const clap_host, _fd: clap_fd) -> bool {
    with_host(host, false, |shared| {
        shared.record(HostCall::FdUnregistered);
        true
    })
}
