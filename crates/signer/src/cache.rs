use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::bundle::CertificateBundle;
use crate::error::SigningError;

/// Cache-aside store for the one current certificate bundle.
///
/// A miss is an explicit `Ok(None)`, never an error; a put fully replaces
/// whatever was stored before. Expiry belongs to the underlying store.
#[async_trait]
pub trait CertificateCache: Send + Sync {
    async fn get(&self) -> Result<Option<CertificateBundle>, SigningError>;

    async fn put(&self, bundle: &CertificateBundle) -> Result<(), SigningError>;
}

/// Redis-backed certificate cache holding the serialized bundle under one
/// fixed key with a SETEX TTL.
pub struct RedisCertificateCache {
    connection: ConnectionManager,
    cache_key: String,
    ttl_seconds: u64,
}

impl RedisCertificateCache {
    pub async fn connect(
        endpoint: &str,
        port: u16,
        cache_key: impl Into<String>,
        ttl_seconds: u64,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, SigningError> {
        let client = redis::Client::open(format!("redis://{endpoint}:{port}"))?;
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(connect_timeout)
            .set_response_timeout(read_timeout);
        let connection = client.get_connection_manager_with_config(config).await?;

        Ok(Self {
            connection,
            cache_key: cache_key.into(),
            ttl_seconds,
        })
    }
}

#[async_trait]
impl CertificateCache for RedisCertificateCache {
    async fn get(&self) -> Result<Option<CertificateBundle>, SigningError> {
        let mut connection = self.connection.clone();
        let value: Option<String> = connection.get(&self.cache_key).await?;

        match value {
            Some(raw) => {
                debug!(key = %self.cache_key, "Certificate cache hit");
                Ok(Some(CertificateBundle::deserialize(&raw)?))
            }
            None => {
                debug!(key = %self.cache_key, "Certificate cache miss");
                Ok(None)
            }
        }
    }

    async fn put(&self, bundle: &CertificateBundle) -> Result<(), SigningError> {
        let mut connection = self.connection.clone();
        let _: () = connection
            .set_ex(&self.cache_key, bundle.serialize(), self.ttl_seconds)
            .await?;
        info!(
            key = %self.cache_key,
            ttl_seconds = self.ttl_seconds,
            "Stored certificate bundle in cache"
        );
        Ok(())
    }
}
