pub const CLAP_NAME_SIZE: usize = 256;
pub const CLAP_MODULE_SIZE: usize = 1024;
