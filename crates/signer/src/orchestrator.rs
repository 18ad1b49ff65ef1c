use std::sync::Arc;

use tracing::info;

use crate::archive;
use crate::bundle::CertificateBundle;
use crate::ca::CertificateAuthority;
use crate::cache::CertificateCache;
use crate::error::SigningError;
use crate::signing::{self, SignedDocument};

/// Composes cache, CA client, extractor and signing engine into the
/// end-to-end "sign this document" operation.
///
/// Cache-aside: the cache is read first, and only a miss triggers a CA
/// fetch; the freshly extracted bundle is stored before signing. At most
/// one CA fetch happens per invocation and nothing is retried here.
/// Concurrent misses are not deduplicated — each overlapping invocation
/// fetches and overwrites the cache entry independently.
pub struct DocumentSigningOrchestrator {
    cache: Arc<dyn CertificateCache>,
    authority: Arc<dyn CertificateAuthority>,
}

impl DocumentSigningOrchestrator {
    pub fn new(cache: Arc<dyn CertificateCache>, authority: Arc<dyn CertificateAuthority>) -> Self {
        Self { cache, authority }
    }

    pub async fn sign_document(&self, document: &[u8]) -> Result<SignedDocument, SigningError> {
        info!(bytes = document.len(), "Starting document signing workflow");

        let bundle = match self.cache.get().await? {
            Some(bundle) => bundle,
            None => {
                let bundle = self.fetch_from_authority().await?;
                self.cache.put(&bundle).await?;
                bundle
            }
        };

        let signed = signing::sign(document, &bundle)?;
        info!(signature_type = %signed.signature_type, "Signing workflow completed");
        Ok(signed)
    }

    async fn fetch_from_authority(&self) -> Result<CertificateBundle, SigningError> {
        info!("Certificate cache is empty; retrieving from certificate authority");
        let selected = self.authority.select_certificate().await?;
        let archive_bytes = self.authority.download_archive(selected.id).await?;
        let bundle = archive::extract_bundle(&archive_bytes)?;
        info!("Certificate extracted from authority archive");
        Ok(bundle)
    }
}
