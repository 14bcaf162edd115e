use crate::extensions::{ExtensionSide, HostExtensionSide, PluginExtensionSide};
use clasp_sys::host::clap_host;
use clasp_sys::plugin::clap_plugin;
use std::ffi::c_void;
use std::fmt::{Debug, Formatter};
use std::ptr::NonNull;

/// A table of type `T` implemented by side `S`, along with the instance it has to be called with.
///
/// The instance pointer is never dereferenced here: it is only handed back to the table's
/// functions, and may be dangling once the instance is destroyed.
pub struct RawExtension<S: ExtensionSide, T = ()> {
    table: NonNull<T>,
    instance: NonNull<S::Instance>,
}

impl<S: ExtensionSide, T> Clone for RawExtension<S, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ExtensionSide, T> Copy for RawExtension<S, T> {}

// Two handles to the same table are the same extension, whoever obtained them.
impl<S: ExtensionSide, T> PartialEq for RawExtension<S, T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.table == other.table
    }
}

impl<S: ExtensionSide, T> Eq for RawExtension<S, T> {}

impl<S: ExtensionSide, T> Debug for RawExtension<S, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawExtension")
            .field("table", &self.table)
            .field("instance", &self.instance)
            .finish()
    }
}

// SAFETY: both pointers are only passed back through the table's functions, and the handle
// types wrapping this one decide which threads those may be called from.
unsafe impl<S: ExtensionSide, T> Send for RawExtension<S, T> {}
// SAFETY: same as above.
unsafe impl<S: ExtensionSide, T> Sync for RawExtension<S, T> {}

impl<S: ExtensionSide, T> RawExtension<S, T> {
    /// # Safety
    ///
    /// `table` must point to a `T` that stays valid as long as the instance is alive. The
    /// `instance` pointer may dangle.
    #[inline]
    pub unsafe fn from_raw(table: NonNull<T>, instance: NonNull<S::Instance>) -> Self {
        Self { table, instance }
    }

    #[inline]
    pub fn as_ptr(&self) -> NonNull<T> {
        self.table
    }

    /// The instance this table was obtained from.
    #[inline]
    pub fn instance_ptr(&self) -> NonNull<S::Instance> {
        self.instance
    }

    /// # Safety
    ///
    /// The instance this table was obtained from must not have been destroyed.
    #[inline]
    pub unsafe fn as_ref(&self) -> &T {
        // SAFETY: upheld by caller
        unsafe { self.table.as_ref() }
    }
}

impl<S: ExtensionSide> RawExtension<S, ()> {
    /// Gives the untyped table its actual type.
    ///
    /// # Safety
    ///
    /// `T` must be the type of the table the identifier it was looked up with stands for.
    #[inline]
    pub unsafe fn cast<T>(&self) -> RawExtension<S, T> {
        RawExtension {
            table: self.table.cast(),
            instance: self.instance,
        }
    }
}

impl<T> RawExtension<PluginExtensionSide, T> {
    #[inline]
    pub fn plugin_ptr(&self) -> NonNull<clap_plugin> {
        self.instance
    }
}

impl<T> RawExtension<HostExtensionSide, T> {
    #[inline]
    pub fn host_ptr(&self) -> NonNull<clap_host> {
        self.instance
    }
}

/// The address of a plugin-side table, as answered to the host's `extension` queries.
#[derive(Copy, Clone, Debug)]
pub struct RawExtensionImplementation(NonNull<c_void>);

impl RawExtensionImplementation {
    /// Tables are `'static`, so every instance of a plugin type answers with the same address.
    pub const fn new<I>(table: &'static I) -> Self {
        let ptr = core::ptr::from_ref(table).cast_mut().cast::<c_void>();
        // SAFETY: the pointer comes from a reference.
        Self(unsafe { NonNull::new_unchecked(ptr) })
    }

    #[inline]
    pub const fn as_ptr(&self) -> NonNull<c_void> {
        self.0
    }
}

// SAFETY: the tables are immutable, and only hold function pointers.
unsafe impl Send for RawExtensionImplementation {}
// SAFETY: same as above.
unsafe impl Sync for RawExtensionImplementation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_tables_keep_their_instance() {
        let table = 42u32;
        let host = NonNull::<clap_host>::dangling();

        // SAFETY: the table outlives the handles, and the instance is never dereferenced.
        let raw: RawExtension<HostExtensionSide> =
            unsafe { RawExtension::from_raw(NonNull::from(&table).cast(), host) };
        // SAFETY: the table is a u32.
        let typed = unsafe { raw.cast::<u32>() };

        assert_eq!(typed.host_ptr(), host);
        // SAFETY: the table is still alive.
        assert_eq!(unsafe { *typed.as_ref() }, 42);
        assert_eq!(typed, typed.clone());
    }
}
