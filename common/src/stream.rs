//! Byte streams used to save and load plugin state.
//!
//! [`InputStream`] and [`OutputStream`] implement [`Read`] and [`Write`] over the raw stream
//! tables, and can also be built on top of any Rust reader or writer.

use clasp_sys::stream::{clap_istream, clap_ostream};
use std::error::Error;
use std::ffi::c_void;
use std::fmt::{Display, Formatter};
use std::io::{ErrorKind, Read, Write};
use std::marker::PhantomData;

#[derive(Copy, Clone, Debug)]
pub struct StreamError {
    code: i64,
}

impl Display for StreamError {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Clap stream error (code: {})", self.code)
    }
}

impl Error for StreamError {}

#[repr(C)]
pub struct InputStream<'a>(clap_istream, PhantomData<&'a mut clap_istream>);

impl<'a> InputStream<'a> {
    pub fn from_reader<R: Read + Sized + 'a>(reader: &'a mut R) -> Self {
        Self(
            clap_istream {
                ctx: reader as *mut R as *mut _,
                read: Some(read::<R>),
            },
            PhantomData,
        )
    }

    /// # Safety
    ///
    /// The stream must be valid for the lifetime `'a`.
    #[inline]
    pub unsafe fn from_raw_mut(raw: &mut clap_istream) -> &mut Self {
        // SAFETY: InputStream is repr(C) and starts with a clap_istream.
        unsafe { &mut *(raw as *mut clap_istream).cast() }
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_istream {
        &self.0
    }
}

impl Read for InputStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let Some(read) = self.0.read else {
            return Err(ErrorKind::Unsupported.into());
        };

        // SAFETY: the function pointer comes from a valid stream, and buf is valid for its length.
        let ret = unsafe { read(&self.0, buf.as_mut_ptr().cast(), buf.len() as u64) };

        usize::try_from(ret).map_err(|_| std::io::Error::other(StreamError { code: ret }))
    }
}

#[repr(C)]
pub struct OutputStream<'a>(clap_ostream, PhantomData<&'a mut clap_ostream>);

impl<'a> OutputStream<'a> {
    pub fn from_writer<W: Write + Sized + 'a>(writer: &'a mut W) -> Self {
        Self(
            clap_ostream {
                ctx: writer as *mut W as *mut _,
                write: Some(write::<W>),
            },
            PhantomData,
        )
    }

    /// # Safety
    ///
    /// The stream must be valid for the lifetime `'a`.
    #[inline]
    pub unsafe fn from_raw_mut(raw: &mut clap_ostream) -> &mut Self {
        // SAFETY: OutputStream is repr(C) and starts with a clap_ostream.
        unsafe { &mut *(raw as *mut clap_ostream).cast() }
    }

    #[inline]
    pub fn as_raw(&self) -> &clap_ostream {
        &self.0
    }
}

impl Write for OutputStream<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let Some(write) = self.0.write else {
            return Err(ErrorKind::Unsupported.into());
        };

        // SAFETY: the function pointer comes from a valid stream, and buf is valid for its length.
        let ret = unsafe { write(&self.0, buf.as_ptr().cast(), buf.len() as u64) };

        usize::try_from(ret).map_err(|_| std::io::Error::other(StreamError { code: ret }))
    }

    #[inline]
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

unsafe extern "C" fn read<R: Read + Sized>(
    istream: *const clap_istream,
    buffer: *mut c_void,
    size: u64,
) -> i64 {
    // SAFETY: ctx was set from a &mut R in from_reader, and the stream is borrowed for 'a.
    let reader = unsafe { &mut *((*istream).ctx as *mut R) };
    let len = usize::try_from(size).unwrap_or(usize::MAX);
    // SAFETY: the caller guarantees the buffer is valid for `size` bytes.
    let buffer = unsafe { crate::utils::slice_from_external_parts_mut(buffer.cast::<u8>(), len) };

    match handle_interrupted(|| reader.read(buffer)) {
        Ok(read) => i64::try_from(read).unwrap_or(i64::MAX),
        Err(_) => -1,
    }
}

unsafe extern "C" fn write<W: Write + Sized>(
    ostream: *const clap_ostream,
    buffer: *const c_void,
    size: u64,
) -> i64 {
    // SAFETY: ctx was set from a &mut W in from_writer, and the stream is borrowed for 'a.
    let writer = unsafe { &mut *((*ostream).ctx as *mut W) };
    let len = usize::try_from(size).unwrap_or(usize::MAX);
    // SAFETY: the caller guarantees the buffer is valid for `size` bytes.
    let buffer = unsafe { crate::utils::slice_from_external_parts(buffer.cast::<u8>(), len) };

    match handle_interrupted(|| writer.write(buffer)) {
        Ok(written) => i64::try_from(written).unwrap_or(i64::MAX),
        Err(_) => -1,
    }
}

#[inline]
fn handle_interrupted<T, F>(mut handler: F) -> std::io::Result<T>
where
    F: FnMut() -> std::io::Result<T>,
{
    loop {
        match handler() {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            r => return r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_then_reads_through_raw_tables() {
        let mut storage = Vec::new();
        let mut output = OutputStream::from_writer(&mut storage);
        output.write_all(b"clasp").unwrap();

        let mut bytes = storage.as_slice();
        let mut input = InputStream::from_reader(&mut bytes);
        let mut read = String::new();
        input.read_to_string(&mut read).unwrap();

        assert_eq!(read, "clasp");
    }
}
