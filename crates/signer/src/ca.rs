use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use tracing::info;

use crate::error::SigningError;

/// Header carrying the CA API key on every request.
const API_KEY_HEADER: &str = "X-DC-DEVKEY";
const ACCEPT_CONTENT: &str = "application/json, application/gzip";
const ISSUED_STATUS: &str = "issued";

/// One certificate as reported by the CA listing endpoint. Never persisted.
///
/// The CA reports the country under varying field names depending on the
/// product line, so deserialization accepts each known alias.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateSummary {
    pub id: u64,
    #[serde(default)]
    pub common_name: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "organization_country", alias = "subject_country")]
    pub country: Option<String>,
}

/// Envelope of the listing endpoint; the list field itself is aliased.
#[derive(Debug, Default, Deserialize)]
pub struct ListCertificatesResponse {
    #[serde(default, alias = "items")]
    pub certificates: Vec<CertificateSummary>,
}

/// Deterministic selection policy over a CA listing, in strict priority
/// order: first certificate matching the target country, else first with
/// status "issued", else the first listed. Country and status comparisons
/// ignore ASCII case.
pub fn select_from_listing<'a>(
    listing: &'a [CertificateSummary],
    target_country: &str,
) -> Result<&'a CertificateSummary, SigningError> {
    if let Some(summary) = listing.iter().find(|summary| {
        summary
            .country
            .as_deref()
            .is_some_and(|country| country.eq_ignore_ascii_case(target_country))
    }) {
        info!(
            id = summary.id,
            country = target_country,
            "Selected certificate by country"
        );
        return Ok(summary);
    }

    if let Some(summary) = listing.iter().find(|summary| {
        summary
            .status
            .as_deref()
            .is_some_and(|status| status.eq_ignore_ascii_case(ISSUED_STATUS))
    }) {
        info!(
            id = summary.id,
            status = summary.status.as_deref(),
            "No country match; selected first issued certificate"
        );
        return Ok(summary);
    }

    let summary = listing
        .first()
        .ok_or(SigningError::NoCertificatesAvailable)?;
    info!(
        id = summary.id,
        "No country or status match; selected first listed certificate"
    );
    Ok(summary)
}

/// A certificate authority the orchestrator can draw certificates from.
#[async_trait]
pub trait CertificateAuthority: Send + Sync {
    /// Apply the selection policy to the current listing.
    async fn select_certificate(&self) -> Result<CertificateSummary, SigningError>;

    /// Download the archive holding the chosen certificate's material.
    async fn download_archive(&self, certificate_id: u64) -> Result<Vec<u8>, SigningError>;
}

/// REST client for the CA API.
///
/// Surfaces non-2xx responses as [`SigningError::CaStatus`] with the status
/// code and response payload; never retries on its own.
pub struct CaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    target_country: String,
}

impl CaClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        target_country: impl Into<String>,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, SigningError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(read_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            target_country: target_country.into(),
        })
    }

    pub async fn list_certificates(&self) -> Result<Vec<CertificateSummary>, SigningError> {
        let body = self.get("/certificate").await?;
        let response: ListCertificatesResponse = serde_json::from_slice(&body)?;
        info!(
            count = response.certificates.len(),
            "Certificate authority listing returned"
        );
        Ok(response.certificates)
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, SigningError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(header::ACCEPT, ACCEPT_CONTENT)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(SigningError::CaStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl CertificateAuthority for CaClient {
    async fn select_certificate(&self) -> Result<CertificateSummary, SigningError> {
        let listing = self.list_certificates().await?;
        select_from_listing(&listing, &self.target_country).cloned()
    }

    async fn download_archive(&self, certificate_id: u64) -> Result<Vec<u8>, SigningError> {
        let archive = self
            .get(&format!("/certificate/{certificate_id}/download"))
            .await?;
        info!(
            id = certificate_id,
            bytes = archive.len(),
            "Downloaded certificate archive"
        );
        Ok(archive)
    }
}
