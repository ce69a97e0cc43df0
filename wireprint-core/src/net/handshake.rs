//! Reads the raw bytes of the first TLS record off a freshly accepted
//! socket, grounded in the teacher's
//! `fingerprinting::tls_extractor::read_client_hello`: accumulate until the
//! record length is known and satisfied, capped at 16 KiB (spec §4.3) and a
//! configurable deadline.

use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::error::{CoreError, Result};

const MAX_PREFIX: usize = 16 * 1024;

/// Reads up to the end of the first TLS record (handshake header included)
/// or [`MAX_PREFIX`] bytes, whichever comes first, within `deadline`.
pub async fn read_client_hello_prefix(stream: &mut TcpStream, deadline: Duration) -> Result<Vec<u8>> {
    tokio::time::timeout(deadline, read_prefix(stream))
        .await
        .map_err(|_| CoreError::Timeout)?
}

async fn read_prefix(stream: &mut TcpStream) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(4096);
    loop {
        if buf.len() >= 5 {
            let record_len = u16::from_be_bytes([buf[3], buf[4]]) as usize;
            let needed = record_len.saturating_add(5);
            if buf.len() >= needed {
                break;
            }
            if needed > MAX_PREFIX {
                return Err(CoreError::MalformedWire(
                    "TLS record length exceeds the 16 KiB read cap".to_string(),
                ));
            }
        }
        let read = stream.read_buf(&mut buf).await?;
        if read == 0 {
            return Err(CoreError::HandshakeFailed("connection closed before ClientHello".to_string()));
        }
        if buf.len() >= MAX_PREFIX {
            return Err(CoreError::MalformedWire("no complete TLS record within 16 KiB".to_string()));
        }
    }
    Ok(buf)
}
