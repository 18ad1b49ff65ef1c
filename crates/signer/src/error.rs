use thiserror::Error;

/// Failure taxonomy for the signing pipeline.
///
/// Every component fails fast and surfaces one of these to its caller;
/// retry and backoff, if any, belong to the caller of the orchestrator.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("Failed to read API credential {name}: {reason}")]
    SecretUnavailable { name: String, reason: String },

    #[error("Certificate authority request failed: {0}")]
    CaRequest(#[from] reqwest::Error),

    #[error("Certificate authority responded with status {status}: {body}")]
    CaStatus { status: u16, body: String },

    #[error("Certificate authority returned an unreadable listing: {0}")]
    CaListingDecode(#[from] serde_json::Error),

    #[error("No certificates returned by the certificate authority listing")]
    NoCertificatesAvailable,

    #[error("No certificate entry found in the downloaded archive")]
    NoCertificateInArchive,

    #[error("Malformed cached certificate bundle: {0}")]
    MalformedBundle(String),

    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    #[error("Unsupported private key format: {0}")]
    UnsupportedKeyFormat(String),

    #[error("Certificate cache store failure: {0}")]
    CacheStore(#[from] redis::RedisError),

    #[error("Failed to read certificate archive: {0}")]
    ArchiveRead(#[from] std::io::Error),
}
