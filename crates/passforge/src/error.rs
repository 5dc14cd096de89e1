//! Error types for pass bundle operations.
//!
//! This module defines the [`enum@Error`] enum covering all failure cases in
//! descriptor validation, bundle assembly, and manifest signing.
//!
//! # See Also
//!
//! - [`crate::Result`] - Convenience type alias using this error

use thiserror::Error;

/// Error type for pass bundle operations.
///
/// All public functions in this crate return [`crate::Result<T>`], which uses
/// this error type. Match on variants to handle specific failure cases.
///
/// # Examples
///
/// ```
/// use passforge::{Error, Pass};
///
/// let result = Pass::new().validate();
/// match result {
///     Ok(()) => println!("pass is complete"),
///     Err(Error::MissingField(name)) => eprintln!("need {name}"),
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Occurs when reading image files or other bundle inputs from disk.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing failed.
    ///
    /// Occurs when a descriptor document cannot be parsed or the manifest
    /// cannot be rendered.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive operation failed.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Required descriptor attribute is absent.
    ///
    /// Carries the name of the first missing mandatory attribute found by
    /// [`crate::Pass::validate`], or a missing required image kind.
    #[error("{0} is required in a pass")]
    MissingField(String),

    /// Value outside a closed enumeration (pass style or transit type).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Accessor used while required state is not set.
    ///
    /// Raised when style-dependent accessors (transit type, NFC, field
    /// groups) are used on a pass whose style does not permit them.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Certificate or private key absent from the signing configuration.
    ///
    /// Local signing requires both to be configured before a bundle can be
    /// produced; the payload names whichever is missing.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Paired-field invariant violated.
    ///
    /// `webServiceURL` and `authenticationToken` must be present together.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Authentication token shorter than the required minimum.
    ///
    /// Carries the actual token length.
    #[error("authenticationToken must be at least 16 characters long, got {0}")]
    TokenTooShort(usize),

    /// A field is present that its companion does not permit.
    #[error("Unexpected field: {0}")]
    UnexpectedField(String),

    /// Invalid or malformed certificate or private key material.
    #[error("Invalid certificate: {0}")]
    Certificate(String),

    /// Manifest signing failed.
    ///
    /// Covers local signature construction failures as well as remote
    /// signing-service rejections and transport faults, so callers handle
    /// one failure shape regardless of strategy.
    #[error("Signing failed: {0}")]
    Signing(String),
}
