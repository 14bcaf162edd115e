use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// An error a plugin can return from any of its methods.
///
/// Errors are logged to the host with the `Error` severity, and the failed operation is reported
/// as such to the host.
#[derive(Debug)]
pub enum PluginError {
    /// A plain error message.
    Message(&'static str),
    /// An I/O error, e.g. while reading or writing a state stream.
    Io(std::io::Error),
    /// Any other error.
    Custom(Box<dyn Error + Send + Sync + 'static>),
}

impl PluginError {
    /// Wraps any error type into a [`PluginError`].
    #[inline]
    pub fn custom<E: Error + Send + Sync + 'static>(error: E) -> Self {
        PluginError::Custom(Box::new(error))
    }
}

impl Display for PluginError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginError::Message(msg) => f.write_str(msg),
            PluginError::Io(e) => Display::fmt(e, f),
            PluginError::Custom(e) => Display::fmt(e, f),
        }
    }
}

impl Error for PluginError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PluginError::Message(_) => None,
            PluginError::Io(e) => Some(e),
            PluginError::Custom(e) => Some(e.as_ref()),
        }
    }
}

impl From<std::io::Error> for PluginError {
    #[inline]
    fn from(e: std::io::Error) -> Self {
        PluginError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_inner_error() {
        let error = PluginError::from(std::io::Error::other("disk on fire"));
        assert_eq!(error.to_string(), "disk on fire");
        assert!(error.source().is_some());

        assert_eq!(PluginError::Message("nope").to_string(), "nope");
    }
}
