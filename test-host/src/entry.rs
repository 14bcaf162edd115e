use crate::error::TestHostError;
use crate::host::TestHost;
use crate::instance::TestInstance;
use clasp_common::plugin::PluginDescriptor;
use clasp_plugin::entry::EntryDescriptor;
use clasp_sys::entry::clap_plugin_entry;
use clasp_sys::host::clap_host;
use clasp_sys::plugin::clap_plugin;
use std::ffi::{CStr, c_char};
use std::ptr::NonNull;

/// An initialized plugin module entry. The entry is de-initialized when this is dropped.
pub struct TestEntry {
    raw: clap_plugin_entry,
}

impl TestEntry {
    /// Initializes the entry of a statically linked plugin module.
    pub fn load(descriptor: &EntryDescriptor) -> Result<Self, TestHostError> {
        // SAFETY: EntryDescriptor tables are always valid.
        unsafe { Self::load_raw(*descriptor.as_raw()) }
    }

    /// # Safety
    ///
    /// All of the entry's functions must be safe to call, as per the protocol.
    pub unsafe fn load_raw(raw: clap_plugin_entry) -> Result<Self, TestHostError> {
        let init = raw.init.ok_or(TestHostError::MissingEntryFunction("init"))?;

        // SAFETY: upheld by caller
        if !unsafe { init(c"".as_ptr()) } {
            return Err(TestHostError::EntryInitFailed);
        }

        Ok(Self { raw })
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_plugin_entry {
        &self.raw
    }

    pub fn plugin_count(&self) -> u32 {
        match self.raw.get_plugin_count {
            // SAFETY: the entry is initialized.
            Some(get_plugin_count) => unsafe { get_plugin_count() },
            None => 0,
        }
    }

    pub fn descriptor(&self, index: u32) -> Option<PluginDescriptor> {
        let get_plugin_descriptor = self.raw.get_plugin_descriptor?;

        // SAFETY: the entry is initialized.
        let raw = unsafe { get_plugin_descriptor(index).as_ref() }?;
        if raw.id.is_null() || raw.name.is_null() {
            return None;
        }

        // SAFETY: the module outlives the entry, and its descriptors are static.
        Some(unsafe { PluginDescriptor::from_raw(*raw) })
    }

    pub fn descriptors(&self) -> impl Iterator<Item = PluginDescriptor> + '_ {
        (0..self.plugin_count()).filter_map(|i| self.descriptor(i))
    }

    /// Creates a new instance of the plugin with the given ID.
    pub fn create(&self, host: &TestHost, plugin_id: &CStr) -> Result<TestInstance, TestHostError> {
        // SAFETY: both pointers are valid.
        let plugin = unsafe { self.create_raw(host.as_raw(), plugin_id.as_ptr()) };
        let plugin = NonNull::new(plugin.cast_mut()).ok_or(TestHostError::PluginCreationFailed)?;

        // SAFETY: the plugin was just created with this host.
        Ok(unsafe { TestInstance::from_raw(host.clone(), plugin) })
    }

    /// Calls the raw `create_plugin` function.
    ///
    /// # Safety
    ///
    /// The host pointer must be null or valid for the lifetime of the returned instance, and the
    /// plugin ID must be null or a valid C string. A returned instance is never destroyed.
    pub unsafe fn create_raw(
        &self,
        host: *const clap_host,
        plugin_id: *const c_char,
    ) -> *const clap_plugin {
        match self.raw.create_plugin {
            // SAFETY: upheld by caller
            Some(create_plugin) => unsafe { create_plugin(host, plugin_id) },
            None => core::ptr::null(),
        }
    }
}

impl Drop for TestEntry {
    fn drop(&mut self) {
        if let Some(deinit) = self.raw.deinit {
            // SAFETY: the entry was initialized, and this is the last call made to it.
            unsafe { deinit() }
        }
    }
}
