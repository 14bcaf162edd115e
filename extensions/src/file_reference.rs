//! Lets plugins expose the files they depend on (samples, impulse responses, ...), so hosts can
//! collect, relocate and check them.

use clasp_common::utils::cstr_from_nullable_ptr;
use clasp_plugin::extensions::prelude::*;
use clasp_sys::ext::file_reference::*;
use clasp_sys::id::clap_id;
use std::ffi::{CStr, CString, c_char};

/// A hashing algorithm hosts can ask file digests in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
    Sha512,
    Md5,
}

impl HashAlgorithm {
    #[inline]
    pub fn from_raw(raw: clap_hash) -> Option<Self> {
        match raw {
            CLAP_HASH_SHA1 => Some(Self::Sha1),
            CLAP_HASH_SHA256 => Some(Self::Sha256),
            CLAP_HASH_SHA512 => Some(Self::Sha512),
            CLAP_HASH_MD5 => Some(Self::Md5),
            _ => None,
        }
    }

    #[inline]
    pub fn to_raw(self) -> clap_hash {
        match self {
            Self::Sha1 => CLAP_HASH_SHA1,
            Self::Sha256 => CLAP_HASH_SHA256,
            Self::Sha512 => CLAP_HASH_SHA512,
            Self::Md5 => CLAP_HASH_MD5,
        }
    }

    /// The size of a digest, in bytes.
    #[inline]
    pub fn digest_size(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
            Self::Md5 => 16,
        }
    }
}

/// A file the plugin depends on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FileReference<'a> {
    pub resource_id: clap_id,
    pub path: &'a [u8],
}

/// The plugin's file reference table.
#[derive(Copy, Clone)]
pub struct PluginFileReference(RawExtension<PluginExtensionSide, clap_plugin_file_reference>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for PluginFileReference {
    const IDENTIFIER: &'static CStr = CLAP_EXT_FILE_REFERENCE;
    type ExtensionSide = PluginExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// The host's file reference table.
#[derive(Copy, Clone)]
pub struct HostFileReference(RawExtension<HostExtensionSide, clap_host_file_reference>);

// SAFETY: the identifier matches the table type.
unsafe impl Extension for HostFileReference {
    const IDENTIFIER: &'static CStr = CLAP_EXT_FILE_REFERENCE;
    type ExtensionSide = HostExtensionSide;

    #[inline]
    unsafe fn from_raw(raw: RawExtension<Self::ExtensionSide>) -> Self {
        // SAFETY: the table type matches the identifier.
        Self(unsafe { raw.cast() })
    }
}

/// Implemented by plugins referencing files.
pub trait PluginFileReferenceImpl {
    fn count(&mut self) -> u32;
    fn get(&mut self, index: u32) -> Option<FileReference<'_>>;

    /// Writes the digest of a file into `digest`, which is exactly
    /// [`digest_size`](HashAlgorithm::digest_size) bytes long.
    fn get_hash(
        &mut self,
        resource_id: clap_id,
        algorithm: HashAlgorithm,
        digest: &mut [u8],
    ) -> Result<(), PluginError>;

    fn update_path(&mut self, resource_id: clap_id, path: &CStr) -> Result<(), PluginError>;
    fn save_resources(&mut self) -> Result<(), PluginError>;
}

impl<P: Plugin + PluginFileReferenceImpl> ExtensionImplementation<P> for PluginFileReference {
    const IMPLEMENTATION: RawExtensionImplementation =
        RawExtensionImplementation::new(&clap_plugin_file_reference {
            count: Some(count::<P>),
            get: Some(get::<P>),
            get_hash: Some(get_hash::<P>),
            update_path: Some(update_path::<P>),
            save_resources: Some(save_resources::<P>),
        });
}

unsafe extern "C" fn count<P: Plugin + PluginFileReferenceImpl>(plugin: *const clap_plugin) -> u32 {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "file_reference.count", |plugin, _host| {
            Ok(plugin.count())
        })
    }
    .unwrap_or(0)
}

/// The path is copied into the host's buffer, which must fit it and its null terminator.
unsafe extern "C" fn get<P: Plugin + PluginFileReferenceImpl>(
    plugin: *const clap_plugin,
    index: u32,
    file_reference: *mut clap_file_reference,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer, and a valid reference if non-null whose
    // path buffer is valid for `path_capacity` bytes.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "file_reference.get", |plugin, _host| {
            let Some(raw) = file_reference.as_mut() else {
                return Err(PluginWrapperError::NulPtr("clap_file_reference"));
            };

            let Some(reference) = plugin.get(index) else {
                return Ok(false);
            };

            let path_size = u32::try_from(reference.path.len()).unwrap_or(u32::MAX);
            raw.resource_id = reference.resource_id;
            raw.path_size = path_size;

            if raw.path.is_null() || path_size >= raw.path_capacity {
                return Ok(false);
            }

            let path = raw.path.cast::<u8>();
            core::ptr::copy_nonoverlapping(reference.path.as_ptr(), path, reference.path.len());
            path.add(reference.path.len()).write(0);
            Ok(true)
        })
    }
    .unwrap_or(false)
}

unsafe extern "C" fn get_hash<P: Plugin + PluginFileReferenceImpl>(
    plugin: *const clap_plugin,
    resource_id: clap_id,
    hash: clap_hash,
    digest: *mut u8,
    digest_size: u32,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer, and a digest buffer valid for `digest_size`
    // bytes.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(plugin, "file_reference.get_hash", |plugin, host| {
            let Some(algorithm) = HashAlgorithm::from_raw(hash) else {
                host.shared()
                    .host_misbehaving(&format!("Unknown hash algorithm: {hash}"));
                return Ok(false);
            };

            if digest.is_null() || (digest_size as usize) < algorithm.digest_size() {
                return Ok(false);
            }

            let digest = core::slice::from_raw_parts_mut(digest, algorithm.digest_size());
            plugin.get_hash(resource_id, algorithm, digest)?;
            Ok(true)
        })
    }
    .unwrap_or(false)
}

unsafe extern "C" fn update_path<P: Plugin + PluginFileReferenceImpl>(
    plugin: *const clap_plugin,
    resource_id: clap_id,
    path: *const c_char,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer, and a valid C string if non-null.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(
            plugin,
            "file_reference.update_path",
            |plugin, _host| {
                let path =
                    cstr_from_nullable_ptr(path).ok_or(PluginWrapperError::NulPtr("path"))?;
                plugin.update_path(resource_id, path)?;
                Ok(())
            },
        )
    }
    .is_some()
}

unsafe extern "C" fn save_resources<P: Plugin + PluginFileReferenceImpl>(
    plugin: *const clap_plugin,
) -> bool {
    // SAFETY: the host gives a valid plugin pointer.
    unsafe {
        PluginWrapper::<P>::handle_main_thread(
            plugin,
            "file_reference.save_resources",
            |plugin, _host| {
                plugin.save_resources()?;
                Ok(())
            },
        )
    }
    .is_some()
}

impl PluginFileReference {
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

    /// Returns the resource id and path of the file at `index`, using a path buffer of
    /// `path_capacity` bytes.
    ///
    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn get(&self, index: u32, path_capacity: u32) -> Option<(clap_id, CString)> {
        // SAFETY: upheld by caller
        let get = unsafe { self.0.as_ref() }.get?;
        let mut buffer = vec![0u8; path_capacity as usize];
        let mut raw = clap_file_reference {
            resource_id: 0,
            path_capacity,
            path_size: 0,
            path: buffer.as_mut_ptr().cast(),
        };

        // SAFETY: upheld by caller. The path buffer is valid for `path_capacity` bytes.
        if !unsafe { get(self.0.plugin_ptr().as_ptr(), index, &mut raw) } {
            return None;
        }

        buffer.truncate(raw.path_size as usize);
        Some((raw.resource_id, CString::new(buffer).ok()?))
    }

    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn get_hash(&self, resource_id: clap_id, algorithm: HashAlgorithm) -> Option<Vec<u8>> {
        // SAFETY: upheld by caller
        let get_hash = unsafe { self.0.as_ref() }.get_hash?;
        let mut digest = vec![0u8; algorithm.digest_size()];
        let size = u32::try_from(digest.len()).ok()?;

        // SAFETY: upheld by caller. The digest buffer is valid for `size` bytes.
        unsafe {
            get_hash(
                self.0.plugin_ptr().as_ptr(),
                resource_id,
                algorithm.to_raw(),
                digest.as_mut_ptr(),
                size,
            )
        }
        .then_some(digest)
    }

    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn update_path(&self, resource_id: clap_id, path: &CStr) -> bool {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.update_path {
            // SAFETY: upheld by caller
            Some(update_path) => unsafe {
                update_path(self.0.plugin_ptr().as_ptr(), resource_id, path.as_ptr())
            },
            None => false,
        }
    }

    /// # Safety
    ///
    /// The plugin instance must still be alive, and this must be called on the main thread.
    pub unsafe fn save_resources(&self) -> bool {
        // SAFETY: upheld by caller
        match unsafe { self.0.as_ref() }.save_resources {
            // SAFETY: upheld by caller
            Some(save_resources) => unsafe { save_resources(self.0.plugin_ptr().as_ptr()) },
            None => false,
        }
    }
}

impl HostFileReference {
    /// Tells the host the list of referenced files changed.
    #[inline]
    pub fn changed(&self, host: &HostMainThreadHandle) {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        if let Some(changed) = unsafe { self.0.as_ref() }.changed {
            // SAFETY: the handle proves we're on the main thread.
            unsafe { changed(host.shared().as_raw()) }
        }
    }

    /// Tells the host a referenced file was modified and should be saved.
    #[inline]
    pub fn set_dirty(&self, host: &HostMainThreadHandle, resource_id: clap_id) {
        // SAFETY: the handle proves the instance, and therefore the host table, are still alive.
        if let Some(set_dirty) = unsafe { self.0.as_ref() }.set_dirty {
            // SAFETY: the handle proves we're on the main thread.
            unsafe { set_dirty(host.shared().as_raw(), resource_id) }
        }
    }
}
