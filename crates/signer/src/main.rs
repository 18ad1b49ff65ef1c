use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use base64::{prelude::BASE64_STANDARD, Engine};
use clap::Parser;
use doc_signer::{
    CaClient, DocumentSigningOrchestrator, EnvSecretProvider, RedisCertificateCache,
    SecretProvider,
};
use tracing::info;

#[derive(Parser)]
struct Args {
    /// Base URL of the certificate authority REST API
    #[clap(long, env = "CA_BASE_URL")]
    ca_base_url: String,

    /// Name of the parameter holding the CA API key
    #[clap(long, env = "CA_API_KEY_PARAM", default_value = "CA_API_KEY")]
    api_key_param: String,

    /// Country code preferred by the certificate selection policy
    #[clap(long, env = "SIGNING_TARGET_COUNTRY", default_value = "FR")]
    target_country: String,

    #[clap(long, env = "CERT_CACHE_ENDPOINT", default_value = "127.0.0.1")]
    cache_endpoint: String,

    #[clap(long, env = "CERT_CACHE_PORT", default_value = "6379")]
    cache_port: u16,

    #[clap(long, env = "CERT_CACHE_KEY", default_value = "doc-signer/cached-certificate")]
    cache_key: String,

    #[clap(long, env = "CERT_CACHE_TTL_SECONDS", default_value = "3600")]
    cache_ttl_seconds: u64,

    #[clap(long, default_value = "15")]
    connect_timeout_seconds: u64,

    #[clap(long, default_value = "30")]
    read_timeout_seconds: u64,

    /// Document to sign; a built-in sample payload is used when omitted
    #[clap(long)]
    document: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let connect_timeout = Duration::from_secs(args.connect_timeout_seconds);
    let read_timeout = Duration::from_secs(args.read_timeout_seconds);

    let api_key = EnvSecretProvider
        .get_api_credential(&args.api_key_param)
        .await?;

    let authority = CaClient::new(
        args.ca_base_url,
        api_key,
        args.target_country,
        connect_timeout,
        read_timeout,
    )?;

    let cache = RedisCertificateCache::connect(
        &args.cache_endpoint,
        args.cache_port,
        args.cache_key,
        args.cache_ttl_seconds,
        connect_timeout,
        read_timeout,
    )
    .await
    .context("connecting to the certificate cache")?;

    let orchestrator = DocumentSigningOrchestrator::new(Arc::new(cache), Arc::new(authority));

    let document = match args.document {
        Some(path) => std::fs::read(&path)
            .with_context(|| format!("reading document {}", path.display()))?,
        None => b"Sample XML/PDF/XLS bytes".to_vec(),
    };

    let signed = orchestrator.sign_document(&document).await?;

    info!(signature_type = %signed.signature_type, "Signature type");
    info!(
        signature = %BASE64_STANDARD.encode(&signed.signature),
        "Signature payload (base64)"
    );
    Ok(())
}
