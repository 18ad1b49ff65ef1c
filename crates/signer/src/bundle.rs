use base64::{prelude::BASE64_STANDARD, Engine};

use crate::error::SigningError;

/// A certificate plus optional matching private key, as retrieved from the
/// certificate authority or rehydrated from the cache.
///
/// Immutable once constructed. The certificate is never empty in a valid
/// bundle; the key may be absent, which selects the digest fallback when
/// signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateBundle {
    certificate: Vec<u8>,
    private_key: Option<Vec<u8>>,
}

impl CertificateBundle {
    pub fn new(certificate: Vec<u8>, private_key: Option<Vec<u8>>) -> Self {
        Self {
            certificate,
            private_key,
        }
    }

    pub fn certificate(&self) -> &[u8] {
        &self.certificate
    }

    pub fn private_key(&self) -> Option<&[u8]> {
        self.private_key.as_deref()
    }

    /// Flatten to the cache representation: `base64(cert):base64(key)`,
    /// with an empty key segment when no key is present.
    pub fn serialize(&self) -> String {
        let certificate = BASE64_STANDARD.encode(&self.certificate);
        let key = self
            .private_key
            .as_deref()
            .map(|key| BASE64_STANDARD.encode(key))
            .unwrap_or_default();
        format!("{certificate}:{key}")
    }

    /// Rebuild a bundle from the cache representation.
    ///
    /// Only the first two `:`-delimited segments are considered, and an
    /// empty trailing segment is preserved: the presence of a key is
    /// decided by a non-empty second segment, not by segment count.
    pub fn deserialize(value: &str) -> Result<Self, SigningError> {
        let mut segments = value.splitn(3, ':');
        let certificate_segment = segments.next().unwrap_or_default();
        let key_segment = segments.next().unwrap_or_default();

        let certificate = BASE64_STANDARD
            .decode(certificate_segment)
            .map_err(|e| SigningError::MalformedBundle(format!("certificate segment: {e}")))?;
        if certificate.is_empty() {
            return Err(SigningError::MalformedBundle(
                "certificate segment is empty".to_string(),
            ));
        }

        let private_key = if key_segment.is_empty() {
            None
        } else {
            Some(
                BASE64_STANDARD
                    .decode(key_segment)
                    .map_err(|e| SigningError::MalformedBundle(format!("key segment: {e}")))?,
            )
        };

        Ok(Self {
            certificate,
            private_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_with_key() {
        let bundle = CertificateBundle::new(b"CERT".to_vec(), Some(b"KEY".to_vec()));
        let restored = CertificateBundle::deserialize(&bundle.serialize()).unwrap();
        assert_eq!(restored, bundle);
    }

    #[test]
    fn roundtrip_without_key() {
        let bundle = CertificateBundle::new(b"CERT".to_vec(), None);
        let serialized = bundle.serialize();
        assert!(serialized.ends_with(':'), "empty key segment must trail");

        let restored = CertificateBundle::deserialize(&serialized).unwrap();
        assert_eq!(restored, bundle);
        assert!(restored.private_key().is_none());
    }

    #[test]
    fn missing_key_segment_yields_absent_key() {
        let certificate = BASE64_STANDARD.encode(b"CERT");
        let restored = CertificateBundle::deserialize(&certificate).unwrap();
        assert_eq!(restored.certificate(), b"CERT");
        assert!(restored.private_key().is_none());
    }

    #[test]
    fn undecodable_certificate_segment_is_malformed() {
        let err = CertificateBundle::deserialize("not base64!:").unwrap_err();
        assert!(matches!(err, SigningError::MalformedBundle(_)));
    }

    #[test]
    fn empty_certificate_segment_is_malformed() {
        let err = CertificateBundle::deserialize(":").unwrap_err();
        assert!(matches!(err, SigningError::MalformedBundle(_)));
    }

    #[test]
    fn undecodable_key_segment_is_malformed() {
        let certificate = BASE64_STANDARD.encode(b"CERT");
        let err = CertificateBundle::deserialize(&format!("{certificate}:???")).unwrap_err();
        assert!(matches!(err, SigningError::MalformedBundle(_)));
    }
}
