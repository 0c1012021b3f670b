//! # Error Handling
//!
//! This module defines the centralized error type for `composer-expand`. It
//! uses the `thiserror` library to describe every failure the expansion can
//! run into, so the binary can decide which of them deserve a dedicated exit
//! path (an unresolvable patches file) and which simply bubble up.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes: a missing project name, an
//!   unresolvable patches file, an unreadable or malformed project manifest,
//!   structural conflicts while patching the merged manifest, and wrapped
//!   I/O and JSON errors.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.

use thiserror::Error;

/// Main error type for manifest expansion
#[derive(Error, Debug)]
pub enum Error {
    /// Neither the positional argument nor `CI_PROJECT_NAME` named a project.
    #[error("Unable to determine project name.")]
    ProjectNameMissing,

    /// The patches file is neither an existing file (directly or under the
    /// CI config directory) nor a URL.
    #[error("Patch file is not valid: {value}")]
    InvalidPatchesFile { value: String },

    /// The project manifest could not be decoded into a JSON object.
    #[error("Manifest parsing error in {path}: {message}")]
    ManifestParse { path: String, message: String },

    /// The merged manifest has a shape that an adjustment cannot patch.
    #[error("Manifest structure error: {message}")]
    Manifest { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
