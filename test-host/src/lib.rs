//! A minimal, in-process host to drive plugins built with `clasp-plugin` in tests.
//!
//! The host exposes a configurable set of extensions ([`TestHostConfig`]), records every call
//! the plugin makes into it, and keeps a shadow copy of the lifecycle state of the instance it
//! drives ([`TestInstance`]), so tests can check both what the plugin did and what it refused.
//!
//! ```ignore
//! let entry = TestEntry::load(&SinglePluginEntry::<MyPlugin>::DESCRIPTOR)?;
//! let host = TestHost::new(TestHostConfig::new())?;
//! let mut instance = entry.create(&host, c"org.example.my-plugin")?;
//!
//! assert!(instance.init());
//! assert!(instance.activate(48_000));
//! assert!(instance.start_processing());
//! instance.process(64)?;
//! ```

mod config;
mod entry;
mod error;
mod host;
mod instance;

pub use config::{TestHostConfig, ThreadPoolMode};
pub use entry::TestEntry;
pub use error::TestHostError;
pub use host::{AudioThreadGuard, HostCall, LogEntry, TestHost, is_audio_thread};
pub use instance::{ShadowState, TestInstance};
