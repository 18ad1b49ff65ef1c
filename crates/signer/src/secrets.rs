use async_trait::async_trait;
use tracing::info;

use crate::error::SigningError;

/// Source of the CA API credential.
///
/// The pipeline only needs one lookup at startup; a secret that cannot be
/// read fails the whole pipeline. Parameter-store backends slot in behind
/// this trait.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn get_api_credential(&self, parameter_name: &str) -> Result<String, SigningError>;
}

/// Reads the credential from the environment variable named by the
/// parameter. Blank values count as unavailable, not as empty credentials.
pub struct EnvSecretProvider;

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn get_api_credential(&self, parameter_name: &str) -> Result<String, SigningError> {
        info!(parameter = parameter_name, "Reading CA API credential");
        let value = std::env::var(parameter_name).map_err(|e| SigningError::SecretUnavailable {
            name: parameter_name.to_string(),
            reason: e.to_string(),
        })?;

        if value.trim().is_empty() {
            return Err(SigningError::SecretUnavailable {
                name: parameter_name.to_string(),
                reason: "parameter is empty".to_string(),
            });
        }
        Ok(value)
    }
}
