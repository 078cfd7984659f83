//! Artifact blob storage.
//!
//! Generated documents are byte blobs written under the `etats/pdfs/` and
//! `etats/excels/` prefixes, behind an OpenDAL operator so the backend is
//! a deployment choice (local filesystem in development, S3-compatible in
//! production).

mod error;
mod service;

pub use error::StorageError;
pub use service::{ArtifactKind, ArtifactStore};
