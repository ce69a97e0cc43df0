use crate::error::{CoreError, Result};
use crate::fingerprint::tls::cipher_names::{cipher_suite_name, extension_name};
use crate::fingerprint::tls::grease::is_grease;
use crate::fingerprint::tls::types::{CipherSuite, TlsExtension, TlsFingerprint};

const EXT_SERVER_NAME: u16 = 0;
const EXT_SUPPORTED_GROUPS: u16 = 10;
const EXT_EC_POINT_FORMATS: u16 = 11;
const EXT_SIGNATURE_ALGORITHMS: u16 = 13;
const EXT_ALPN: u16 = 16;
const EXT_SUPPORTED_VERSIONS: u16 = 43;

/// A cursor over a byte slice that fails closed: every read that would run
/// past the end of the buffer returns [`CoreError::MalformedWire`] instead of
/// panicking.
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(CoreError::MalformedWire(format!(
                "expected {n} bytes, only {} remaining",
                self.remaining()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u24(&mut self) -> Result<u32> {
        let b = self.take(3)?;
        Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
    }
}

/// Parses a raw TLS record believed to carry a ClientHello handshake message
/// and derives every field of the fingerprint's data model, leaving
/// `ja3`/`ja3_hash`/`ja4`/`ja4_r` blank for the caller to fill in via
/// [`crate::fingerprint::tls::ja3`] and [`crate::fingerprint::tls::ja4`].
///
/// Error conditions (all surfaced as [`CoreError::MalformedWire`]):
/// record content-type is not `22` (handshake), handshake type is not `1`
/// (ClientHello), or any length-prefixed field claims more bytes than remain
/// in the buffer.
pub fn parse_client_hello(data: &[u8]) -> Result<TlsFingerprint> {
    let mut cur = Cursor::new(data);

    let content_type = cur.u8()?;
    if content_type != 22 {
        return Err(CoreError::MalformedWire(format!(
            "expected TLS record content-type 22 (handshake), got {content_type}"
        )));
    }
    let record_version = cur.u16()?;
    let record_len = cur.u16()? as usize;
    if cur.remaining() < record_len {
        return Err(CoreError::MalformedWire(
            "TLS record length exceeds available data".into(),
        ));
    }

    let handshake_type = cur.u8()?;
    if handshake_type != 1 {
        return Err(CoreError::MalformedWire(format!(
            "expected ClientHello handshake type 1, got {handshake_type}"
        )));
    }
    let _handshake_len = cur.u24()?;

    let client_version = cur.u16()?;
    let client_random = hex::encode(cur.take(32)?);

    let session_id_len = cur.u8()? as usize;
    let session_id = hex::encode(cur.take(session_id_len)?);

    let cipher_suites_len = cur.u16()? as usize;
    if cipher_suites_len % 2 != 0 {
        return Err(CoreError::MalformedWire(
            "cipher suites length is not a multiple of 2".into(),
        ));
    }
    let cipher_bytes = cur.take(cipher_suites_len)?;
    let mut cipher_suites = Vec::with_capacity(cipher_suites_len / 2);
    for chunk in cipher_bytes.chunks_exact(2) {
        let id = u16::from_be_bytes([chunk[0], chunk[1]]);
        cipher_suites.push(CipherSuite {
            id,
            name: cipher_suite_name(id),
        });
    }

    let compression_len = cur.u8()? as usize;
    let compression_methods = cur.take(compression_len)?.to_vec();

    let mut fp = TlsFingerprint {
        record_version,
        client_version,
        negotiated_version: None,
        client_random,
        session_id,
        cipher_suites,
        extensions: Vec::new(),
        sni: None,
        alpn: Vec::new(),
        compression_methods,
        supported_groups: Vec::new(),
        ec_point_formats: Vec::new(),
        signature_algorithms: Vec::new(),
        supported_versions: Vec::new(),
        ja3: String::new(),
        ja3_hash: String::new(),
        ja4: String::new(),
        ja4_r: String::new(),
    };

    // A ClientHello with no extensions block (pre-TLS1.2 style) is valid;
    // treat running out of bytes here as "no extensions" rather than an error.
    if cur.remaining() < 2 {
        return Ok(fp);
    }
    let extensions_len = cur.u16()? as usize;
    let ext_bytes = cur.take(extensions_len)?;
    let mut ext_cur = Cursor::new(ext_bytes);

    while ext_cur.remaining() >= 4 {
        let ext_id = ext_cur.u16()?;
        let ext_len = ext_cur.u16()? as usize;
        let payload = ext_cur.take(ext_len)?;
        let mut payload_cur = Cursor::new(payload);

        let rendered = match ext_id {
            EXT_SERVER_NAME => {
                parse_sni(&mut payload_cur).map(|sni| {
                    fp.sni = Some(sni.clone());
                    sni
                })
            }
            EXT_SUPPORTED_GROUPS => parse_u16_list(&mut payload_cur).map(|groups| {
                fp.supported_groups = groups.clone();
                groups.iter().map(|g| format!("{g:04x}")).collect::<Vec<_>>().join("-")
            }),
            EXT_EC_POINT_FORMATS => parse_u8_list(&mut payload_cur).map(|fmts| {
                fp.ec_point_formats = fmts.clone();
                fmts.iter().map(|f| f.to_string()).collect::<Vec<_>>().join("-")
            }),
            EXT_SIGNATURE_ALGORITHMS => parse_u16_list(&mut payload_cur).map(|algs| {
                fp.signature_algorithms = algs.clone();
                algs.iter().map(|a| format!("{a:04x}")).collect::<Vec<_>>().join("-")
            }),
            EXT_ALPN => parse_alpn(&mut payload_cur).map(|protos| {
                fp.alpn = protos.clone();
                protos.join(",")
            }),
            EXT_SUPPORTED_VERSIONS => parse_supported_versions(&mut payload_cur).map(|versions| {
                fp.supported_versions = versions.clone();
                versions.iter().map(|v| format!("{v:04x}")).collect::<Vec<_>>().join("-")
            }),
            _ => None,
        };

        fp.extensions.push(TlsExtension {
            id: ext_id,
            name: extension_name(ext_id),
            payload: rendered,
        });
    }

    fp.negotiated_version = fp
        .supported_versions
        .iter()
        .copied()
        .find(|v| !is_grease(*v))
        .or(Some(client_version));

    Ok(fp)
}

fn parse_sni(cur: &mut Cursor) -> Option<String> {
    let list_len = cur.u16().ok()? as usize;
    let list = cur.take(list_len).ok()?;
    let mut list_cur = Cursor::new(list);
    while list_cur.remaining() >= 3 {
        let name_type = list_cur.u8().ok()?;
        let name_len = list_cur.u16().ok()? as usize;
        let name = list_cur.take(name_len).ok()?;
        if name_type == 0 {
            return Some(String::from_utf8_lossy(name).to_string());
        }
    }
    None
}

fn parse_u16_list(cur: &mut Cursor) -> Option<Vec<u16>> {
    let list_len = cur.u16().ok()? as usize;
    let bytes = cur.take(list_len).ok()?;
    Some(
        bytes
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect(),
    )
}

fn parse_u8_list(cur: &mut Cursor) -> Option<Vec<u8>> {
    let list_len = cur.u8().ok()? as usize;
    Some(cur.take(list_len).ok()?.to_vec())
}

fn parse_alpn(cur: &mut Cursor) -> Option<Vec<String>> {
    let list_len = cur.u16().ok()? as usize;
    let bytes = cur.take(list_len).ok()?;
    let mut list_cur = Cursor::new(bytes);
    let mut protos = Vec::new();
    while list_cur.remaining() >= 1 {
        let len = list_cur.u8().ok()? as usize;
        let proto = list_cur.take(len).ok()?;
        protos.push(String::from_utf8_lossy(proto).to_string());
    }
    Some(protos)
}

fn parse_supported_versions(cur: &mut Cursor) -> Option<Vec<u16>> {
    let list_len = cur.u8().ok()? as usize;
    let bytes = cur.take(list_len).ok()?;
    Some(
        bytes
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect(),
    )
}
