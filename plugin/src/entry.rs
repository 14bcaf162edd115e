//! The entry point of a plugin module.
//!
//! Every plugin module exports a single `clap_plugin_entry` symbol, through which hosts enumerate
//! the module's plugins and create instances of them. The symbol is defined by implementing
//! [`PluginEntry`] (or using [`SinglePluginEntry`]), and exporting it with the
//! [`clasp_export_entry`](crate::clasp_export_entry) macro.

use crate::factory::{self, PluginFactoryEntry};
use crate::plugin::wrapper::panic::catch_unwind;
use crate::plugin::wrapper::{PluginWrapperError, report_without_host};
use clasp_common::utils::cstr_from_nullable_ptr;
use clasp_sys::entry::clap_plugin_entry;
use clasp_sys::host::clap_host;
use clasp_sys::plugin::{clap_plugin, clap_plugin_descriptor};
use clasp_sys::version::CLAP_VERSION;
use std::ffi::{CStr, c_char};

mod single;

pub use single::SinglePluginEntry;

/// A plugin module's entry point.
pub trait PluginEntry: Sized + 'static {
    /// The plugins this module exposes, in the order hosts enumerate them.
    const PLUGINS: &'static [PluginFactoryEntry];

    /// Called by the host once the module is loaded, with the path of the module.
    ///
    /// Returning `false` makes the host unload the module.
    #[inline]
    fn init(plugin_path: &CStr) -> bool {
        let _ = plugin_path;
        true
    }

    /// Called by the host before it unloads the module.
    #[inline]
    fn deinit() {}

    /// The raw entry table, to be exported by [`clasp_export_entry`](crate::clasp_export_entry).
    const DESCRIPTOR: EntryDescriptor = EntryDescriptor(clap_plugin_entry {
        clap_version: CLAP_VERSION,
        init: Some(init::<Self>),
        deinit: Some(deinit::<Self>),
        get_plugin_count: Some(get_plugin_count::<Self>),
        get_plugin_descriptor: Some(get_plugin_descriptor::<Self>),
        create_plugin: Some(create_plugin::<Self>),
    });
}

/// The raw `clap_plugin_entry` table of a plugin module.
#[repr(transparent)]
#[derive(Copy, Clone)]
pub struct EntryDescriptor(clap_plugin_entry);

impl EntryDescriptor {
    #[inline]
    pub const fn as_raw(&self) -> &clap_plugin_entry {
        &self.0
    }
}

unsafe extern "C" fn init<E: PluginEntry>(plugin_path: *const c_char) -> bool {
    // SAFETY: the host gives a null or valid C string.
    let plugin_path = unsafe { cstr_from_nullable_ptr(plugin_path) }.unwrap_or(c"");

    catch_unwind(|| E::init(plugin_path)).unwrap_or(false)
}

unsafe extern "C" fn deinit<E: PluginEntry>() {
    if catch_unwind(E::deinit).is_err() {
        report_without_host(&PluginWrapperError::Panic);
    }
}

unsafe extern "C" fn get_plugin_count<E: PluginEntry>() -> u32 {
    u32::try_from(E::PLUGINS.len()).unwrap_or(u32::MAX)
}

unsafe extern "C" fn get_plugin_descriptor<E: PluginEntry>(
    index: u32,
) -> *const clap_plugin_descriptor {
    usize::try_from(index)
        .ok()
        .and_then(|i| E::PLUGINS.get(i))
        .map(|p| p.descriptor().as_raw() as *const _)
        .unwrap_or(core::ptr::null())
}

unsafe extern "C" fn create_plugin<E: PluginEntry>(
    host: *const clap_host,
    plugin_id: *const c_char,
) -> *const clap_plugin {
    // SAFETY: the host gives a null or valid host pointer and plugin ID.
    let result = catch_unwind(|| unsafe { factory::create_plugin(E::PLUGINS, host, plugin_id) })
        .unwrap_or(Err(factory::FactoryError::Panic));

    match result {
        Ok(plugin) => plugin.as_ptr(),
        Err(e) => {
            eprintln!("[PLUGIN_FACTORY_ERROR] {e}");
            core::ptr::null()
        }
    }
}

/// Exports the given [`PluginEntry`] type as this module's `clap_plugin_entry` symbol.
///
/// This must be used exactly once per module.
///
/// # Example
///
/// ```ignore
/// use clasp_plugin::prelude::*;
///
/// clasp_export_entry!(SinglePluginEntry<MyPlugin>);
/// ```
#[macro_export]
macro_rules! clasp_export_entry {
    ($entry_type:ty) => {
        #[allow(non_upper_case_globals)]
        #[unsafe(no_mangle)]
        pub static clap_plugin_entry: $crate::entry::EntryDescriptor =
            <$entry_type as $crate::entry::PluginEntry>::DESCRIPTOR;
    };
}
