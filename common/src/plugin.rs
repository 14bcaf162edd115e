//! Plugin metadata, shared by plugins exposing it and hosts reading it.

mod descriptor;
pub use descriptor::*;
