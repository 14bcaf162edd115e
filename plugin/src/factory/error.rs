use crate::plugin::PluginError;
use clasp_common::version::ClapVersion;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors raised while creating a plugin instance.
///
/// Those happen before any host logger is available, so they are printed to the standard error
/// output instead.
#[derive(Debug)]
pub enum FactoryError {
    /// The host pointer was null.
    NulHost,
    /// The plugin ID pointer was null.
    NulPluginId,
    /// The host was built against an incompatible protocol version.
    IncompatibleHostVersion(ClapVersion),
    /// The host's `extension` function was null.
    MissingHostExtensionFunction,
    /// No plugin of this module has the requested ID.
    UnknownPluginId(String),
    /// The plugin's constructor returned an error.
    PluginCreation(PluginError),
    /// The plugin's constructor panicked.
    Panic,
}

impl Display for FactoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FactoryError::NulHost => f.write_str("Host called create_plugin with a null host"),
            FactoryError::NulPluginId => {
                f.write_str("Host called create_plugin with a null plugin ID")
            }
            FactoryError::IncompatibleHostVersion(version) => write!(
                f,
                "Host uses protocol version {version}, which is incompatible with {}",
                ClapVersion::CURRENT
            ),
            FactoryError::MissingHostExtensionFunction => {
                f.write_str("Host has no extension function")
            }
            FactoryError::UnknownPluginId(id) => write!(f, "No plugin with ID {id}"),
            FactoryError::PluginCreation(e) => write!(f, "Failed to create plugin: {e}"),
            FactoryError::Panic => f.write_str("Plugin panicked while being created"),
        }
    }
}

impl Error for FactoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FactoryError::PluginCreation(e) => Some(e),
            _ => None,
        }
    }
}
