use crate::utils::cstr_from_nullable_ptr;
use bitflags::bitflags;
use clasp_sys::plugin::*;
use clasp_sys::version::CLAP_VERSION;
use std::ffi::CStr;
use std::fmt::{Debug, Formatter};

bitflags! {
    /// The kinds of processing a plugin performs.
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct PluginType: u64 {
        /// The plugin can process note events and then produce audio.
        const INSTRUMENT = CLAP_PLUGIN_INSTRUMENT;
        /// The plugin is an audio effect.
        const AUDIO_EFFECT = CLAP_PLUGIN_AUDIO_EFFECT;
        /// The plugin is an event effect, a "note effect".
        const EVENT_EFFECT = CLAP_PLUGIN_EVENT_EFFECT;
        /// The plugin analyzes audio and/or events, without changing the audio.
        const ANALYZER = CLAP_PLUGIN_ANALYZER;
    }
}

/// Provides metadata about a given plugin, such as its ID, name, version, and more.
///
/// Descriptors are built at compile time from `'static` C strings, so they can be stored in
/// constants and handed out to hosts for the whole lifetime of the plugin module.
///
/// # Example
///
/// ```
/// use clasp_common::plugin::{PluginDescriptor, PluginType};
///
/// const DESCRIPTOR: PluginDescriptor = PluginDescriptor::new(c"org.example.gain", c"Gain")
///     .with_vendor(c"Example")
///     .with_version(c"0.1.0")
///     .with_plugin_type(PluginType::AUDIO_EFFECT);
///
/// assert_eq!(DESCRIPTOR.id(), c"org.example.gain");
/// ```
#[repr(transparent)]
#[derive(Copy, Clone)]
pub struct PluginDescriptor(clap_plugin_descriptor);

impl PluginDescriptor {
    /// Creates a new plugin descriptor with the given ID and name. All other fields are empty.
    pub const fn new(id: &'static CStr, name: &'static CStr) -> Self {
        Self(clap_plugin_descriptor {
            clap_version: CLAP_VERSION,
            id: id.as_ptr(),
            name: name.as_ptr(),
            vendor: core::ptr::null(),
            url: core::ptr::null(),
            manual_url: core::ptr::null(),
            support_url: core::ptr::null(),
            version: core::ptr::null(),
            description: core::ptr::null(),
            keywords: core::ptr::null(),
            plugin_type: 0,
        })
    }

    #[inline]
    pub const fn with_vendor(mut self, vendor: &'static CStr) -> Self {
        self.0.vendor = vendor.as_ptr();
        self
    }

    #[inline]
    pub const fn with_url(mut self, url: &'static CStr) -> Self {
        self.0.url = url.as_ptr();
        self
    }

    #[inline]
    pub const fn with_manual_url(mut self, manual_url: &'static CStr) -> Self {
        self.0.manual_url = manual_url.as_ptr();
        self
    }

    #[inline]
    pub const fn with_support_url(mut self, support_url: &'static CStr) -> Self {
        self.0.support_url = support_url.as_ptr();
        self
    }

    #[inline]
    pub const fn with_version(mut self, version: &'static CStr) -> Self {
        self.0.version = version.as_ptr();
        self
    }

    #[inline]
    pub const fn with_description(mut self, description: &'static CStr) -> Self {
        self.0.description = description.as_ptr();
        self
    }

    /// Sets the keywords, as a semicolon-separated list (e.g. `c"gain;utility"`).
    #[inline]
    pub const fn with_keywords(mut self, keywords: &'static CStr) -> Self {
        self.0.keywords = keywords.as_ptr();
        self
    }

    #[inline]
    pub const fn with_plugin_type(mut self, plugin_type: PluginType) -> Self {
        self.0.plugin_type = plugin_type.bits();
        self
    }

    /// # Safety
    ///
    /// Every string pointer of the raw descriptor must either be null or point to a valid
    /// C string that lives for `'static`.
    #[inline]
    pub const unsafe fn from_raw(raw: clap_plugin_descriptor) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn as_raw(&self) -> &clap_plugin_descriptor {
        &self.0
    }

    #[inline]
    pub fn id(&self) -> &CStr {
        // SAFETY: id is always set from a 'static CStr by new()
        unsafe { CStr::from_ptr(self.0.id) }
    }

    #[inline]
    pub fn name(&self) -> &CStr {
        // SAFETY: name is always set from a 'static CStr by new()
        unsafe { CStr::from_ptr(self.0.name) }
    }

    #[inline]
    pub fn vendor(&self) -> Option<&CStr> {
        // SAFETY: the pointer is either null or comes from a 'static CStr
        unsafe { cstr_from_nullable_ptr(self.0.vendor) }
    }

    #[inline]
    pub fn url(&self) -> Option<&CStr> {
        // SAFETY: the pointer is either null or comes from a 'static CStr
        unsafe { cstr_from_nullable_ptr(self.0.url) }
    }

    #[inline]
    pub fn manual_url(&self) -> Option<&CStr> {
        // SAFETY: the pointer is either null or comes from a 'static CStr
        unsafe { cstr_from_nullable_ptr(self.0.manual_url) }
    }

    #[inline]
    pub fn support_url(&self) -> Option<&CStr> {
        // SAFETY: the pointer is either null or comes from a 'static CStr
        unsafe { cstr_from_nullable_ptr(self.0.support_url) }
    }

    #[inline]
    pub fn version(&self) -> Option<&CStr> {
        // SAFETY: the pointer is either null or comes from a 'static CStr
        unsafe { cstr_from_nullable_ptr(self.0.version) }
    }

    #[inline]
    pub fn description(&self) -> Option<&CStr> {
        // SAFETY: the pointer is either null or comes from a 'static CStr
        unsafe { cstr_from_nullable_ptr(self.0.description) }
    }

    /// Returns an iterator over the keywords of this descriptor.
    pub fn keywords(&self) -> impl Iterator<Item = &[u8]> {
        // SAFETY: the pointer is either null or comes from a 'static CStr
        let keywords = unsafe { cstr_from_nullable_ptr(self.0.keywords) };

        keywords
            .map(|k| k.to_bytes())
            .unwrap_or(&[])
            .split(|b| *b == b';')
            .filter(|k| !k.is_empty())
    }

    #[inline]
    pub fn plugin_type(&self) -> PluginType {
        PluginType::from_bits_truncate(self.0.plugin_type)
    }
}

impl Debug for PluginDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("vendor", &self.vendor())
            .field("version", &self.version())
            .field("plugin_type", &self.plugin_type())
            .finish_non_exhaustive()
    }
}

// SAFETY: the descriptor is immutable, and only points to 'static C strings.
unsafe impl Send for PluginDescriptor {}
// SAFETY: same as above.
unsafe impl Sync for PluginDescriptor {}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: PluginDescriptor = PluginDescriptor::new(c"org.example.test", c"Test")
        .with_keywords(c"gain;;utility")
        .with_plugin_type(PluginType::AUDIO_EFFECT.union(PluginType::ANALYZER));

    #[test]
    fn missing_fields_are_none() {
        assert_eq!(DESCRIPTOR.name(), c"Test");
        assert_eq!(DESCRIPTOR.vendor(), None);
        assert_eq!(DESCRIPTOR.description(), None);
    }

    #[test]
    fn keywords_are_split_on_semicolons() {
        let keywords: Vec<_> = DESCRIPTOR.keywords().collect();
        assert_eq!(keywords, [&b"gain"[..], &b"utility"[..]]);
    }

    #[test]
    fn plugin_type_is_a_bitfield() {
        assert!(DESCRIPTOR.plugin_type().contains(PluginType::ANALYZER));
        assert!(!DESCRIPTOR.plugin_type().contains(PluginType::INSTRUMENT));
    }
}
