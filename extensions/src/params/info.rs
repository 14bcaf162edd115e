use bitflags::bitflags;
use clasp_common::utils::{Cookie, data_from_array_buf, write_str_to_array_buf};
use clasp_sys::ext::params::*;
use clasp_sys::id::clap_id;
use clasp_sys::string_sizes::{CLAP_MODULE_SIZE, CLAP_NAME_SIZE};
use std::fmt::{Debug, Formatter};
use std::mem::MaybeUninit;

bitflags! {
    #[repr(C)]
    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    pub struct ParamInfoFlags: u32 {
        const IS_STEPPED = CLAP_PARAM_IS_STEPPED;
        const IS_PER_NOTE = CLAP_PARAM_IS_PER_NOTE;
        const IS_PER_CHANNEL = CLAP_PARAM_IS_PER_CHANNEL;
        const IS_PER_PORT = CLAP_PARAM_IS_PER_PORT;
        const IS_PERIODIC = CLAP_PARAM_IS_PERIODIC;
        const IS_HIDDEN = CLAP_PARAM_IS_HIDDEN;
        const IS_READONLY = CLAP_PARAM_IS_READONLY;
        const IS_BYPASS = CLAP_PARAM_IS_BYPASS;
        const IS_AUTOMATABLE = CLAP_PARAM_IS_AUTOMATABLE;
        const REQUIRES_PROCESS = CLAP_PARAM_REQUIRES_PROCESS;
    }
}

/// Describes a single parameter.
///
/// Built by plugins with the `with_*` methods, and read by hosts with the matching getters.
#[derive(Copy, Clone)]
pub struct ParamInfo {
    inner: clap_param_info,
}

impl ParamInfo {
    /// A parameter with the given id, no name, and a `0..=1` range defaulting to `0`.
    #[inline]
    pub fn new(id: clap_id) -> Self {
        Self {
            inner: clap_param_info {
                id,
                flags: 0,
                cookie: core::ptr::null_mut(),
                name: [0; CLAP_NAME_SIZE],
                module: [0; CLAP_MODULE_SIZE],
                min_value: 0.0,
                max_value: 1.0,
                default_value: 0.0,
            },
        }
    }

    #[inline]
    pub fn from_raw(raw: &clap_param_info) -> Self {
        Self { inner: *raw }
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_param_info {
        &self.inner
    }

    #[inline]
    pub fn with_flags(mut self, flags: ParamInfoFlags) -> Self {
        self.inner.flags = flags.bits();
        self
    }

    #[inline]
    pub fn with_cookie(mut self, cookie: Cookie) -> Self {
        self.inner.cookie = cookie.as_raw();
        self
    }

    #[inline]
    pub fn with_default_value(mut self, default_value: f64) -> Self {
        self.inner.default_value = default_value;
        self
    }

    #[inline]
    pub fn with_value_bounds(mut self, min_value: f64, max_value: f64) -> Self {
        self.inner.min_value = min_value;
        self.inner.max_value = max_value;
        self
    }

    /// Names longer than the protocol's name buffer are truncated.
    #[inline]
    pub fn with_name(mut self, name: &str) -> Self {
        // SAFETY: the buffer is a valid, owned array.
        unsafe { write_str_to_array_buf(&mut self.inner.name, name) };
        self
    }

    #[inline]
    pub fn with_module(mut self, module: &str) -> Self {
        // SAFETY: the buffer is a valid, owned array.
        unsafe { write_str_to_array_buf(&mut self.inner.module, module) };
        self
    }

    #[inline]
    pub fn id(&self) -> clap_id {
        self.inner.id
    }

    #[inline]
    pub fn flags(&self) -> ParamInfoFlags {
        ParamInfoFlags::from_bits_truncate(self.inner.flags)
    }

    #[inline]
    pub fn cookie(&self) -> Cookie {
        Cookie::from_raw(self.inner.cookie)
    }

    #[inline]
    pub fn name(&self) -> &[u8] {
        data_from_array_buf(&self.inner.name)
    }

    #[inline]
    pub fn module(&self) -> &[u8] {
        data_from_array_buf(&self.inner.module)
    }

    #[inline]
    pub fn min_value(&self) -> f64 {
        self.inner.min_value
    }

    #[inline]
    pub fn max_value(&self) -> f64 {
        self.inner.max_value
    }

    #[inline]
    pub fn default_value(&self) -> f64 {
        self.inner.default_value
    }
}

impl Debug for ParamInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParamInfo")
            .field("id", &self.id())
            .field("flags", &self.flags())
            .field("name", &String::from_utf8_lossy(self.name()))
            .field("module", &String::from_utf8_lossy(self.module()))
            .field("min_value", &self.min_value())
            .field("max_value", &self.max_value())
            .field("default_value", &self.default_value())
            .finish()
    }
}

/// Receives the description of a parameter from the plugin.
///
/// If [`set`](ParamInfoWriter::set) is never called, the host is told the parameter doesn't
/// exist.
pub struct ParamInfoWriter<'a> {
    initialized: bool,
    inner: &'a mut MaybeUninit<clap_param_info>,
}

impl<'a> ParamInfoWriter<'a> {
    /// # Safety
    ///
    /// The pointer must be non-null, well-aligned and valid for writes for `'a`. It doesn't need
    /// to be initialized.
    #[inline]
    pub(crate) unsafe fn from_raw(ptr: *mut clap_param_info) -> Self {
        Self {
            initialized: false,
            // SAFETY: upheld by caller. MaybeUninit<T> has the same layout as T.
            inner: unsafe { &mut *ptr.cast() },
        }
    }

    #[inline]
    pub fn set(&mut self, info: &ParamInfo) {
        self.inner.write(info.inner);
        self.initialized = true;
    }

    #[inline]
    pub(crate) fn is_set(&self) -> bool {
        self.initialized
    }
}

/// Receives the text representation of a parameter value.
///
/// The text is written with [`core::fmt::Write`], and is always null-terminated. Writing more
/// than the host's buffer can hold fails.
pub struct ParamDisplayWriter<'a> {
    cursor_position: usize,
    buffer: &'a mut [u8],
}

impl<'a> ParamDisplayWriter<'a> {
    #[inline]
    pub(crate) fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            cursor_position: 0,
            buffer,
        }
    }

    /// The maximum number of bytes the text can hold, without the null terminator.
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.buffer.len().saturating_sub(1)
    }

    #[inline]
    pub fn remaining_len(&self) -> usize {
        self.buffer.len().saturating_sub(self.cursor_position + 1)
    }

    /// Terminates the text. Returns `false` if nothing was written.
    pub(crate) fn finish(self) -> bool {
        if self.cursor_position == 0 {
            return false;
        }

        self.buffer[self.cursor_position] = 0;
        true
    }
}

impl core::fmt::Write for ParamDisplayWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let s = s.as_bytes();
        if s.len() > self.remaining_len() {
            return Err(core::fmt::Error);
        }

        self.buffer[self.cursor_position..self.cursor_position + s.len()].copy_from_slice(s);
        self.cursor_position += s.len();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn info_builder_truncates_long_names() {
        let long_name = "n".repeat(CLAP_NAME_SIZE * 2);
        let info = ParamInfo::new(7)
            .with_name(&long_name)
            .with_module("filters/low")
            .with_value_bounds(-1.0, 1.0)
            .with_flags(ParamInfoFlags::IS_AUTOMATABLE | ParamInfoFlags::IS_STEPPED);

        assert_eq!(info.id(), 7);
        assert_eq!(info.name().len(), CLAP_NAME_SIZE - 1);
        assert_eq!(info.module(), b"filters/low");
        assert_eq!(info.min_value(), -1.0);
        assert!(info.flags().contains(ParamInfoFlags::IS_STEPPED));
        assert!(!info.flags().contains(ParamInfoFlags::IS_HIDDEN));
    }

    #[test]
    fn display_writer_keeps_room_for_terminator() {
        let mut buffer = [0xFFu8; 6];
        let mut writer = ParamDisplayWriter::new(&mut buffer);

        assert_eq!(writer.len(), 5);
        write!(writer, "1.5").unwrap();
        assert!(write!(writer, " dB!").is_err());
        write!(writer, "dB").unwrap();
        assert_eq!(writer.remaining_len(), 0);
        assert!(writer.finish());

        assert_eq!(&buffer, b"1.5dB\0");
    }

    #[test]
    fn empty_display_is_a_failure() {
        let mut buffer = [0u8; 4];
        assert!(!ParamDisplayWriter::new(&mut buffer).finish());
    }
}
