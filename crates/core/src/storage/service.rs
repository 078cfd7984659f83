//! Artifact store implementation using Apache OpenDAL.

use opendal::{Operator, services};

use tresor_shared::config::ArtifactConfig;

use super::error::StorageError;

/// The two artifact families the engine produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// PDF documents, under `etats/pdfs/`.
    Pdf,
    /// Spreadsheets, under `etats/excels/`.
    Excel,
}

impl ArtifactKind {
    /// Storage prefix for this artifact family.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            Self::Pdf => "etats/pdfs",
            Self::Excel => "etats/excels",
        }
    }

    /// File extension.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }

    /// MIME type served on download.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Parses the URL path segment used by the download endpoint.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pdf" => Some(Self::Pdf),
            "excel" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Blob store for generated report artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    operator: Operator,
}

impl ArtifactStore {
    /// Creates a store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be initialized.
    pub fn from_config(config: &ArtifactConfig) -> Result<Self, StorageError> {
        let operator = match config.provider.as_str() {
            "fs" => {
                let builder = services::Fs::default().root(&config.root);
                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            "s3" => {
                let mut builder = services::S3::default().bucket(&config.root);
                if let Some(endpoint) = &config.endpoint {
                    builder = builder.endpoint(endpoint);
                }
                if let Some(region) = &config.region {
                    builder = builder.region(region);
                }
                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
            }
            other => {
                return Err(StorageError::configuration(format!(
                    "unknown artifact provider: {other}"
                )));
            }
        };

        Ok(Self { operator })
    }

    /// Creates a store over an existing operator. Used by tests.
    #[must_use]
    pub fn from_operator(operator: Operator) -> Self {
        Self { operator }
    }

    /// Full storage key for a filename.
    #[must_use]
    pub fn key(kind: ArtifactKind, filename: &str) -> String {
        format!("{}/{filename}", kind.prefix())
    }

    /// Writes an artifact and returns its storage key.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write(
        &self,
        kind: ArtifactKind,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let key = Self::key(kind, filename);
        self.operator.write(&key, bytes).await?;
        Ok(key)
    }

    /// Reads an artifact by storage key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the blob does not exist.
    pub async fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let buffer = self.operator.read(key).await?;
        Ok(buffer.to_vec())
    }

    /// Deletes an artifact; missing blobs are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the deletion.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self.operator.delete(key).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> ArtifactStore {
        let operator = Operator::new(services::Memory::default())
            .expect("memory backend")
            .finish();
        ArtifactStore::from_operator(operator)
    }

    #[test]
    fn test_key_prefixes() {
        assert_eq!(
            ArtifactStore::key(ArtifactKind::Pdf, "RECETTE_x_20240630_120000.pdf"),
            "etats/pdfs/RECETTE_x_20240630_120000.pdf"
        );
        assert_eq!(
            ArtifactStore::key(ArtifactKind::Excel, "f.xlsx"),
            "etats/excels/f.xlsx"
        );
    }

    #[test]
    fn test_artifact_kind_parse() {
        assert_eq!(ArtifactKind::parse("pdf"), Some(ArtifactKind::Pdf));
        assert_eq!(ArtifactKind::parse("excel"), Some(ArtifactKind::Excel));
        assert_eq!(ArtifactKind::parse("csv"), None);
    }

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let store = memory_store();
        let key = store
            .write(ArtifactKind::Pdf, "essai.pdf", b"%PDF-1.3 test".to_vec())
            .await
            .expect("write");
        let bytes = store.read(&key).await.expect("read");
        assert_eq!(bytes, b"%PDF-1.3 test");
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let store = memory_store();
        let err = store.read("etats/pdfs/absent.pdf").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = memory_store();
        assert!(store.delete("etats/pdfs/absent.pdf").await.is_ok());
    }
}
