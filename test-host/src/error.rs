use crate::instance::ShadowState;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum TestHostError {
    ThreadPool(rayon::ThreadPoolBuildError),
    MissingEntryFunction(&'static str),
    EntryInitFailed,
    PluginCreationFailed,
    /// The call was made out of order, and the plugin correctly refused it.
    OutOfOrder {
        method: &'static str,
        state: ShadowState,
    },
    /// The call was made out of order, but the plugin accepted it anyway.
    OrderingNotEnforced {
        method: &'static str,
        state: ShadowState,
    },
    ProcessFailed,
    BlockTooLarge {
        frames: u32,
        max_frames: u32,
    },
}

impl Display for TestHostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TestHostError::ThreadPool(e) => write!(f, "Failed to build the host thread pool: {e}"),
            TestHostError::MissingEntryFunction(name) => {
                write!(f, "Plugin entry is missing the {name} function")
            }
            TestHostError::EntryInitFailed => f.write_str("Plugin entry failed to initialize"),
            TestHostError::PluginCreationFailed => f.write_str("Plugin factory returned no instance"),
            TestHostError::OutOfOrder { method, state } => {
                write!(f, "{method} was called while the instance was {state:?}")
            }
            TestHostError::OrderingNotEnforced { method, state } => write!(
                f,
                "{method} was called while the instance was {state:?}, and the plugin accepted it"
            ),
            TestHostError::ProcessFailed => f.write_str("Plugin failed to process"),
            TestHostError::BlockTooLarge { frames, max_frames } => write!(
                f,
                "Block of {frames} frames exceeds the buffer size of {max_frames} frames"
            ),
        }
    }
}

impl Error for TestHostError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TestHostError::ThreadPool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for TestHostError {
    #[inline]
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Self::ThreadPool(e)
    }
}
