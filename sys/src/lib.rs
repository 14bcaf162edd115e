//! Raw C ABI definitions for the CLAP plugin protocol, draft 0.10.
//!
//! Every table in this crate is `#[repr(C)]` and frozen: new capabilities are added as new
//! extension identifiers, never by appending fields to an existing table. Function entries are
//! `Option`s so that a null entry coming from the other side of the boundary is representable.

#![allow(non_camel_case_types)]

pub mod chmap;
pub mod color;
pub mod entry;
pub mod events;
pub mod ext;
pub mod fixedpoint;
pub mod host;
pub mod id;
pub mod plugin;
pub mod process;
pub mod stream;
pub mod string_sizes;
pub mod version;
