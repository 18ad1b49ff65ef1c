pub mod archive;
pub mod bundle;
pub mod ca;
pub mod cache;
pub mod error;
pub mod orchestrator;
pub mod secrets;
pub mod signing;

pub use archive::extract_bundle;
pub use bundle::CertificateBundle;
pub use ca::{select_from_listing, CaClient, CertificateAuthority, CertificateSummary};
pub use cache::{CertificateCache, RedisCertificateCache};
pub use error::SigningError;
pub use orchestrator::DocumentSigningOrchestrator;
pub use secrets::{EnvSecretProvider, SecretProvider};
pub use signing::{sign, SignatureType, SignedDocument};
