#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct clap_color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}
