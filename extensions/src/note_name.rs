//! Allows plugins to give names to specific notes, e.g. the drum pieces of a drum kit.

use clasp_common::utils::{data_from_array_buf, write_to_array_buf};
use clasp_plugin::extensions::prelude::*;
use clasp_sys::ext::note_name::*;
use clasp_sys::string_sizes::CLAP_NAME_SIZE;
use std::ffi::CStr;
use std::mem::MaybeUninit;

/// The plugin's note name table.
#[derive(Copy, Clone)]
pub struct PluginNoteName(RawExtension<PluginExtensionSide, clap_plugin_note_name>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginNoteName {
    const IDENTIFIER: &'static CStr = CLAP_EXT_NOTE_NAME;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// The host's note name table.
#[derive(Copy, Clone)]
pub struct HostNoteName(RawExtension<HostExtensionSide, clap_host_note_name>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostNoteName {
    const IDENTIFIER: &'static CStr = CLAP_EXT_NOTE_NAME;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// A name for a note, or a range of notes.
///
/// A negative port, key or channel matches any value.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NoteName<'a> {
    pub name: &'a [u8],
    pub port: i32,
    pub key: i32,
    pub channel: i32,
}

impl<'a> NoteName<'a> {
    #[inline]
    pub fn from_raw(raw: &'a clap_note_name) -> Self {
        Self {
            name: data_from_array_buf(&raw.name),
            port: raw.port,
            key: raw.key,
            channel: raw.channel,
        }
    }

    /// Names longer than the protocol's name buffer are truncated.
    pub fn to_raw(&self) -> clap_note_name {
        let mut raw = clap_note_name {
            name: [0; CLAP_NAME_SIZE],
            port: self.port,
            key: self.key,
            channel: self.channel,
        };

        // SAFETY: the buffer is a valid, owned array.
        unsafe { write_to_array_buf(&mut raw.name, self.name) };
        raw
    }
}

/// Implemented by plugins naming their notes.
pub trait PluginNoteNameImpl {
    fn count(&mut self) -> u32;
    fn get(&mut self, index: u32) -> Option<NoteName<'_>>;
}

impl<P: Plugin + PluginNoteNameImpl> ExtensionImplementation<P> for PluginNoteName {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_note_name {
            count: Some(count::<P>),
            get: Some(get::<P>),
        });
}

unsafe extern "C" fn count<P: Plugin + PluginNoteNameImpl>(plugin: *const clap_plugin) -> u32 {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "note_name.count", |plugin, _host| {
            Ok(plugin.count())
        })
    }
    .unwrap_or(0)
}

unsafe extern "C" fn get<P: Plugin + PluginNoteNameImpl>(
    plugin: *const clap_plugin,
    index: u32,
    note_name: *mut clap_note_name,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer, and a valid note name pointer if non-null.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "note_name.get", |plugin, _host| {
            if note_name.is_null() {
                return Err(PluginWrapperError::NulPtr("clap_note_name"));
            }

            match plugin.get(index) {
                Some(name) => {
                    note_name.write(name.to_raw());
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }
    .unwrap_or(false)
}

impl PluginNoteName {
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn count(&self) -> u32 {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.count {
            // SAFETY: upheld by caller
            Some(count) => unsafe { count(self.0.plugin_ptr().as_ptr()) },
            None => 0,
        }
    }

    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn get<'b>(
        &self,
        index: u32,
        buffer: &'b mut MaybeUninit<clap_note_name>,
    ) -> Option<NoteName<'b>> {
        // SAFETY: upheld by caller
        let get = unsafe { self.0.as_ref() }.get?;

        // SAFETY: upheld by caller. The buffer is valid for writes.
        if unsafe { get(self.0.plugin_ptr().as_ptr(), index, buffer.as_mut_ptr()) } {
            // SAFETY: the plugin returned true, so it filled the buffer.
            Some(NoteName::from_raw(unsafe { buffer.assume_init_ref() }))
        } else {
            None
        }
    }
}

impl HostNoteName {
    /// Tells the host the note names changed.
    #[inline]
    pub fn changed(&self, host: &HostMainThreadHandle) {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        if let Some(changed) = unsafe { self.0.as_ref() }.changed {
            // SAFETY: the handle proves we're on the main thread.
            unsafe { changed(host.shared().as_raw()) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_name_is_truncated_and_terminated() {
        let long = [b'k'; CLAP_NAME_SIZE + 10];
        let name = NoteName {
            name: &long,
            port: -1,
            key: 36,
            channel: -1,
        };

        let raw = name.to_raw();
        let back = NoteName::from_raw(&raw);

        assert_eq!(back.name.len(), CLAP_NAME_SIZE - 1);
        assert_eq!(back.key, 36);
        assert_eq!(back.port, -1);
    }
}
