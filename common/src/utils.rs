//! Small helpers shared by the plugin and host sides.

use clasp_sys::color::clap_color;
use std::ffi::{CStr, c_char, c_void};

/// An opaque pointer for use in e.g. parameter definitions and parameter-related events.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Cookie(*mut c_void);

impl Cookie {
    #[inline]
    pub const fn empty() -> Self {
        Self(core::ptr::null_mut())
    }

    #[inline]
    pub const fn from_raw(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    #[inline]
    pub const fn as_raw(&self) -> *mut c_void {
        self.0
    }
}

impl Default for Cookie {
    #[inline]
    fn default() -> Self {
        Self::empty()
    }
}

// SAFETY: Cookies themselves are just pointers, which plugins have to consider as Send + Sync
unsafe impl Send for Cookie {}
// SAFETY: same as above.
unsafe impl Sync for Cookie {}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub struct Color {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color {
        alpha: 0,
        red: 0,
        green: 0,
        blue: 0,
    };

    #[inline]
    pub const fn from_raw(raw: &clap_color) -> Self {
        Self {
            alpha: raw.alpha,
            red: raw.red,
            green: raw.green,
            blue: raw.blue,
        }
    }

    #[inline]
    pub const fn to_raw(self) -> clap_color {
        clap_color {
            alpha: self.alpha,
            red: self.red,
            green: self.green,
            blue: self.blue,
        }
    }
}

/// # Safety
///
/// Same as [`CStr::from_ptr`], except `ptr` *can* be NULL.
#[inline]
pub unsafe fn cstr_from_nullable_ptr<'a>(ptr: *const c_char) -> Option<&'a CStr> {
    if ptr.is_null() {
        None
    } else {
        // SAFETY: Upheld by caller
        unsafe { Some(CStr::from_ptr(ptr)) }
    }
}

/// Returns the bytes of a fixed-size, null-terminated C string buffer, without the terminator.
///
/// If no null byte is found, the whole buffer is returned.
pub fn data_from_array_buf<const N: usize>(data: &[c_char; N]) -> &[u8] {
    // SAFETY: casting from i8 to u8 is safe
    let data = unsafe { core::slice::from_raw_parts(data.as_ptr().cast::<u8>(), data.len()) };

    data.iter()
        .position(|b| *b == 0)
        .map(|pos| &data[..pos])
        .unwrap_or(data)
}

/// Writes `value` into a fixed-size C string buffer, truncating it if needed so that the null
/// terminator always fits.
///
/// # Safety
///
/// The pointer must be non-null and well-aligned. However, the array doesn't need to be initialized.
/// `dst` and `value` must not overlap.
#[inline]
pub unsafe fn write_to_array_buf<const N: usize>(dst: *mut [c_char; N], value: &[u8]) {
    let max_len = core::cmp::min(N - 1, value.len()); // Space for null byte
    let value = &value[..max_len];
    let dst = dst.cast::<u8>();

    // SAFETY: buffer is valid for N bytes per the caller, and max_len < N
    unsafe {
        core::ptr::copy_nonoverlapping(value.as_ptr(), dst, max_len);
        dst.add(max_len).write(0)
    }
}

/// Writes `value` into a C string buffer like [`write_to_array_buf`], but truncates it on a
/// character boundary so that it stays valid UTF-8.
///
/// # Safety
///
/// Same as [`write_to_array_buf`].
#[inline]
pub unsafe fn write_str_to_array_buf<const N: usize>(dst: *mut [c_char; N], value: &str) {
    let mut len = core::cmp::min(N.saturating_sub(1), value.len());
    while !value.is_char_boundary(len) {
        len -= 1;
    }

    // SAFETY: upheld by caller
    unsafe { write_to_array_buf(dst, &value.as_bytes()[..len]) }
}

/// A safer form of [`core::slice::from_raw_parts`] that returns a properly aligned slice in case
/// the length is 0.
///
/// In C it is common for empty slices to be represented using a null pointer, but this is UB in
/// Rust, as all references must be aligned and non-null.
///
/// # Safety
///
/// Same as [`core::slice::from_raw_parts`], except the provided pointer *can* be null or
/// dangling for zero-length slices.
#[inline]
pub unsafe fn slice_from_external_parts<'a, T>(data: *const T, len: usize) -> &'a [T] {
    if len == 0 {
        return &[];
    }

    // SAFETY: upheld by caller
    unsafe { core::slice::from_raw_parts(data, len) }
}

/// Same as [`slice_from_external_parts`] but for mut slices.
///
/// # Safety
///
/// Same as [`core::slice::from_raw_parts_mut`], except the provided pointer *can* be null or
/// dangling for zero-length slices.
#[inline]
pub unsafe fn slice_from_external_parts_mut<'a, T>(data: *mut T, len: usize) -> &'a mut [T] {
    if len == 0 {
        return &mut [];
    }

    // SAFETY: upheld by caller
    unsafe { core::slice::from_raw_parts_mut(data, len) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_buf_is_truncated_and_terminated() {
        let mut buf: [c_char; 4] = [0x7f; 4];
        // SAFETY: buf is a valid, aligned array
        unsafe { write_to_array_buf(&mut buf, b"stereo") };

        assert_eq!(data_from_array_buf(&buf), b"ste");
    }

    #[test]
    fn strings_are_truncated_on_char_boundaries() {
        let mut buf: [c_char; 6] = [0x7f; 6];
        // SAFETY: buf is a valid, aligned array
        unsafe { write_str_to_array_buf(&mut buf, "déjà vu") };

        // "déjà" is 6 bytes long, and only 5 fit.
        assert_eq!(data_from_array_buf(&buf), "déj".as_bytes());
    }

    #[test]
    fn empty_external_slices_ignore_pointer() {
        // SAFETY: length is zero
        let slice: &[f32] = unsafe { slice_from_external_parts(core::ptr::null(), 0) };
        assert!(slice.is_empty());
    }
}
