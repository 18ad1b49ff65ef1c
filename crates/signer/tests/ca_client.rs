use std::time::Duration;

use doc_signer::{CaClient, CertificateAuthority, SigningError};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn client(server: &MockServer) -> CaClient {
    CaClient::new(
        server.uri(),
        API_KEY,
        "FR",
        Duration::from_secs(5),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn selects_country_match_from_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/certificate"))
        .and(header("X-DC-DEVKEY", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "certificates": [
                {"id": 1, "common_name": "other", "status": "issued"},
                {"id": 2, "common_name": "fr-cert", "country": "fr", "status": "pending"}
            ]
        })))
        .mount(&server)
        .await;

    let selected = client(&server).select_certificate().await.unwrap();
    assert_eq!(selected.id, 2);
}

#[tokio::test]
async fn listing_accepts_aliased_field_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/certificate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": 9, "subject_country": "FR", "status": "issued", "unknown_field": 1}
            ]
        })))
        .mount(&server)
        .await;

    let listing = client(&server).list_certificates().await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].country.as_deref(), Some("FR"));

    let selected = client(&server).select_certificate().await.unwrap();
    assert_eq!(selected.id, 9);
}

#[tokio::test]
async fn empty_listing_is_a_typed_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/certificate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"certificates": []})))
        .mount(&server)
        .await;

    let err = client(&server).select_certificate().await.unwrap_err();
    assert!(matches!(err, SigningError::NoCertificatesAvailable));
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/certificate"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Access denied"))
        .mount(&server)
        .await;

    let err = client(&server).select_certificate().await.unwrap_err();
    match err {
        SigningError::CaStatus { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "Access denied");
        }
        other => panic!("expected CaStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn downloads_raw_archive_bytes() {
    let server = MockServer::start().await;
    let archive = vec![0x1f, 0x8b, 0x08, 0x00, 0xaa, 0xbb];
    Mock::given(method("GET"))
        .and(path("/certificate/7/download"))
        .and(header("X-DC-DEVKEY", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive.clone()))
        .mount(&server)
        .await;

    let downloaded = client(&server).download_archive(7).await.unwrap();
    assert_eq!(downloaded, archive);
}

#[tokio::test]
async fn download_failure_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/certificate/7/download"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server).download_archive(7).await.unwrap_err();
    assert!(matches!(err, SigningError::CaStatus { status: 500, .. }));
}
