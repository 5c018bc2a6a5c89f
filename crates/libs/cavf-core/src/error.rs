//! Error type for cavf.

use std::{
    error::Error,
    fmt::{Debug, Display, Formatter},
};

/// Boxed error used as the cause of a [`CavfError`].
pub type BoxedError = Box<dyn Error + Send + Sync + 'static>;

/// Custom error type for cavf.
#[derive(Debug)]
pub struct CavfError {
    message: String,
    source: Option<BoxedError>,
}

impl Display for CavfError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(cause) => write!(f, "{}, caused by {}", self.message, cause),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for CavfError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

impl CavfError {
    /// Create a new CavfError.
    pub fn new<S>(message: S, source: Option<BoxedError>) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            source,
        }
    }

    /// Returns the cause of the error downcast to `T` if it is one.
    pub fn cause<T: Error + 'static>(&self) -> Option<&T> {
        self.source.as_ref().and_then(|s| s.downcast_ref::<T>())
    }

    /// Creates a new CavfError from a std::io::Error.
    pub fn from_io_error<S>(err: std::io::Error, message: S) -> Self
    where
        S: Into<String>,
    {
        Self::new(message, Some(Box::new(err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CavfError::from_io_error(io, "Failed to read cavity.yaml");
        assert_eq!(
            err.to_string(),
            "Failed to read cavity.yaml, caused by no such file"
        );
        assert!(err.cause::<std::io::Error>().is_some());
        assert!(err.cause::<std::fmt::Error>().is_none());
        assert_eq!(CavfError::new("plain", None).to_string(), "plain");
    }
}
