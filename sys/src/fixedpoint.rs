/// Fixed point beat time, with 31 bits of fractional part.
pub type clap_beattime = i64;
/// Fixed point time in seconds, with 31 bits of fractional part.
pub type clap_sectime = i64;

pub const CLAP_BEATTIME_FACTOR: i64 = 1 << 31;
pub const CLAP_SECTIME_FACTOR: i64 = 1 << 31;
