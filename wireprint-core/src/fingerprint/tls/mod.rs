pub mod cipher_names;
pub mod client_hello;
pub mod grease;
pub mod ja3;
pub mod ja4;
pub mod types;

pub use types::{CipherSuite, TlsExtension, TlsFingerprint};

use crate::error::Result;

/// Parses a raw ClientHello record and derives the full fingerprint,
/// including JA3/JA3-hash and JA4/JA4_r.
pub fn fingerprint_client_hello(data: &[u8]) -> Result<TlsFingerprint> {
    let mut fp = client_hello::parse_client_hello(data)?;
    ja3::apply_ja3(&mut fp);
    ja4::apply_ja4(&mut fp);
    Ok(fp)
}
