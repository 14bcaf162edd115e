#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct clap_version {
    pub major: u32,
    pub minor: u32,
    pub revision: u32,
}

pub const CLAP_VERSION_MAJOR: u32 = 0;
pub const CLAP_VERSION_MINOR: u32 = 10;
pub const CLAP_VERSION_REVISION: u32 = 0;

pub const CLAP_VERSION: clap_version = clap_version {
    major: CLAP_VERSION_MAJOR,
    minor: CLAP_VERSION_MINOR,
    revision: CLAP_VERSION_REVISION,
};

/// Versions are compatible as long as their major numbers match.
#[inline]
pub const fn clap_version_is_compatible(v: clap_version) -> bool {
    v.major == CLAP_VERSION_MAJOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_major_version_matters() {
        assert!(clap_version_is_compatible(CLAP_VERSION));
        assert!(clap_version_is_compatible(clap_version {
            major: 0,
            minor: 7,
            revision: 3
        }));
        assert!(!clap_version_is_compatible(clap_version {
            major: 1,
            minor: 10,
            revision: 0
        }));
    }
}
