use std::io::Read;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use crate::bundle::CertificateBundle;
use crate::error::SigningError;

const CERTIFICATE_SUFFIX: &str = ".crt";
const KEY_SUFFIXES: [&str; 2] = [".key", ".pem"];

/// Pull the certificate and (optional) private key out of a downloaded
/// gzip-compressed tar archive.
///
/// Entry names are matched case-insensitively by suffix and directories are
/// skipped. When several entries match the same role the last one
/// encountered wins; the archive format promises no ordering, so this is a
/// documented policy rather than a priority.
pub fn extract_bundle(archive_bytes: &[u8]) -> Result<CertificateBundle, SigningError> {
    let mut archive = Archive::new(GzDecoder::new(archive_bytes));

    let mut certificate: Option<Vec<u8>> = None;
    let mut private_key: Option<Vec<u8>> = None;

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let name = entry.path()?.to_string_lossy().to_ascii_lowercase();
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;

        if name.ends_with(CERTIFICATE_SUFFIX) {
            debug!(entry = %name, "Found certificate entry in archive");
            certificate = Some(contents);
        } else if KEY_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            debug!(entry = %name, "Found potential private key entry in archive");
            private_key = Some(contents);
        }
    }

    let certificate = certificate.ok_or(SigningError::NoCertificateInArchive)?;
    Ok(CertificateBundle::new(certificate, private_key))
}
