//! Error type for resource resolution and opening.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of an [`Error`].
///
/// Every failure is either "the thing is not there" or "the thing is there
/// but could not be opened the way it was asked for".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The package or the named resource does not exist.
    NotFound,
    /// The resource exists but could not be opened under the requested options.
    Open,
}

/// Error type for resolving and opening package resources.
///
/// # Example
///
/// ```ignore
/// match registry.resolve(&ResourceRef::new("sample_pkg", "data/hello.txt")) {
///     Ok(path) => println!("{}", path.display()),
///     Err(e) if e.is_not_found() => eprintln!("no such resource: {e}"),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// No registered or discoverable package matches the identifier.
    #[error("package `{package}` not found")]
    PackageNotFound {
        /// The package identifier as given.
        package: String,
    },

    /// The package exists but does not contain the resource.
    #[error("resource `{resource}` not found in package `{package}`")]
    ResourceNotFound {
        /// The package identifier.
        package: String,
        /// The resource path, normalized.
        resource: String,
    },

    /// The resource path can never name something inside a package.
    #[error("invalid resource path `{path}`: {reason}")]
    InvalidResourcePath {
        /// The path as given.
        path: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The resolved file could not be opened.
    #[error("cannot open `{}`: {source}", .path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The requested text encoding is not known.
    #[error("unknown encoding `{0}`")]
    UnknownEncoding(String),

    /// The open options contradict each other.
    #[error("invalid open options: {0}")]
    InvalidOptions(String),

    /// The file content is not valid in the requested encoding.
    #[error("cannot decode `{}` as {encoding}: malformed input at byte {offset}", .path.display())]
    Decode {
        /// Path being decoded.
        path: PathBuf,
        /// Canonical name of the encoding.
        encoding: &'static str,
        /// Byte offset of the malformed sequence.
        offset: u64,
    },

    /// The package archive could not be read.
    #[error("cannot read archive `{}`: {source}", .archive.display())]
    Archive {
        /// Archive file.
        archive: PathBuf,
        /// Underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// Reading a resource or writing its extraction failed.
    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PackageNotFound { .. }
            | Self::ResourceNotFound { .. }
            | Self::InvalidResourcePath { .. } => ErrorKind::NotFound,
            Self::Open { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::Open,
        }
    }

    /// Shorthand for `self.kind() == ErrorKind::NotFound`.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn archive(archive: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            archive: archive.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kinds() {
        let err = Error::PackageNotFound {
            package: "nope".into(),
        };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.is_not_found());

        let err = Error::ResourceNotFound {
            package: "pkg".into(),
            resource: "data/missing.txt".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "resource `data/missing.txt` not found in package `pkg`"
        );
    }

    #[test]
    fn test_open_kinds() {
        assert_eq!(
            Error::UnknownEncoding("klingon".into()).kind(),
            ErrorKind::Open
        );
        let denied = Error::Open {
            path: "/x".into(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(denied.kind(), ErrorKind::Open);
    }

    #[test]
    fn test_open_error_vanished_file_is_not_found() {
        let gone = Error::Open {
            path: "/x".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(gone.kind(), ErrorKind::NotFound);
    }
}
