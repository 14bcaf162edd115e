pub type clap_chmap = i32;

pub const CLAP_CHMAP_UNSPECIFIED: clap_chmap = 0;
pub const CLAP_CHMAP_MONO: clap_chmap = 1;

/// Left, right.
pub const CLAP_CHMAP_STEREO: clap_chmap = 2;

/// See <https://www.iso.org/standard/63389.html>
pub const CLAP_CHMAP_SURROUND: clap_chmap = 3;
