pub type clap_id = u32;

pub const CLAP_INVALID_ID: clap_id = u32::MAX;
