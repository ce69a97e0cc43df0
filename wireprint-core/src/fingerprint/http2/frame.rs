use crate::error::{CoreError, Result};
use crate::fingerprint::http2::types::{PriorityFrameInfo, SettingEntry};

/// The exact 24-byte connection preface every HTTP/2 client must send first.
pub const PREFACE: &[u8; 24] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

/// Upper bound on frames inspected while looking for the first complete
/// request; protects against a client that never sends a HEADERS frame.
const MAX_FRAMES: usize = 50;

const FRAME_DATA: u8 = 0x0;
const FRAME_HEADERS: u8 = 0x1;
const FRAME_PRIORITY: u8 = 0x2;
const FRAME_RST_STREAM: u8 = 0x3;
const FRAME_SETTINGS: u8 = 0x4;
const FRAME_PUSH_PROMISE: u8 = 0x5;
const FRAME_PING: u8 = 0x6;
const FRAME_GOAWAY: u8 = 0x7;
const FRAME_WINDOW_UPDATE: u8 = 0x8;
const FRAME_CONTINUATION: u8 = 0x9;

const FLAG_ACK: u8 = 0x1;
const FLAG_END_HEADERS: u8 = 0x4;
const FLAG_PADDED: u8 = 0x8;
const FLAG_PRIORITY: u8 = 0x20;

fn frame_type_name(t: u8) -> &'static str {
    match t {
        FRAME_DATA => "DATA",
        FRAME_HEADERS => "HEADERS",
        FRAME_PRIORITY => "PRIORITY",
        FRAME_RST_STREAM => "RST_STREAM",
        FRAME_SETTINGS => "SETTINGS",
        FRAME_PUSH_PROMISE => "PUSH_PROMISE",
        FRAME_PING => "PING",
        FRAME_GOAWAY => "GOAWAY",
        FRAME_WINDOW_UPDATE => "WINDOW_UPDATE",
        FRAME_CONTINUATION => "CONTINUATION",
        _ => "UNKNOWN",
    }
}

fn setting_name(id: u16) -> String {
    match id {
        1 => "HEADER_TABLE_SIZE",
        2 => "ENABLE_PUSH",
        3 => "MAX_CONCURRENT_STREAMS",
        4 => "INITIAL_WINDOW_SIZE",
        5 => "MAX_FRAME_SIZE",
        6 => "MAX_HEADER_LIST_SIZE",
        _ => return format!("UNKNOWN_{id}"),
    }
    .to_string()
}

/// Output of scanning the raw frame stream: everything the Akamai string and
/// the pseudo-header order need, before HPACK decoding.
#[derive(Default)]
pub struct InterceptedFrames {
    pub settings: Vec<SettingEntry>,
    pub window_update: u32,
    pub priorities: Vec<PriorityFrameInfo>,
    /// Concatenated HEADERS (+ CONTINUATION) payload of the first request,
    /// stripped of HTTP/2 padding and in-frame priority fields, ready for
    /// HPACK decoding. `None` if no complete HEADERS block was observed
    /// within [`MAX_FRAMES`].
    pub header_block: Option<Vec<u8>>,
    pub frame_type_order: Vec<String>,
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(CoreError::MalformedWire(
                "truncated HTTP/2 frame stream".into(),
            ));
        }
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }
}

/// Validates the connection preface and scans frames until the first
/// complete HEADERS block is collected or [`MAX_FRAMES`] is reached.
pub fn intercept(data: &[u8]) -> Result<InterceptedFrames> {
    if data.len() < PREFACE.len() || &data[..PREFACE.len()] != PREFACE {
        return Err(CoreError::MalformedWire(
            "missing HTTP/2 connection preface".into(),
        ));
    }

    let mut reader = Reader::new(&data[PREFACE.len()..]);
    let mut out = InterceptedFrames::default();
    let mut collecting_headers = false;
    let mut headers_stream_id = 0u32;

    for _ in 0..MAX_FRAMES {
        if reader.remaining() < 9 {
            break;
        }
        let header = reader.take(9)?;
        let length = u32::from_be_bytes([0, header[0], header[1], header[2]]) as usize;
        let frame_type = header[3];
        let flags = header[4];
        let stream_id = u32::from_be_bytes([header[5], header[6], header[7], header[8]]) & 0x7fff_ffff;
        let payload = reader.take(length)?;

        out.frame_type_order.push(frame_type_name(frame_type).to_string());

        match frame_type {
            FRAME_SETTINGS if flags & FLAG_ACK == 0 => {
                if payload.len() % 6 != 0 {
                    return Err(CoreError::MalformedWire(
                        "SETTINGS payload not a multiple of 6 bytes".into(),
                    ));
                }
                for chunk in payload.chunks_exact(6) {
                    let id = u16::from_be_bytes([chunk[0], chunk[1]]);
                    let value = u32::from_be_bytes([chunk[2], chunk[3], chunk[4], chunk[5]]);
                    out.settings.push(SettingEntry {
                        id,
                        name: setting_name(id),
                        value,
                    });
                }
            }
            FRAME_WINDOW_UPDATE if stream_id == 0 && out.window_update == 0 => {
                if payload.len() != 4 {
                    return Err(CoreError::MalformedWire(
                        "WINDOW_UPDATE payload must be 4 bytes".into(),
                    ));
                }
                out.window_update =
                    u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) & 0x7fff_ffff;
            }
            FRAME_PRIORITY => {
                if payload.len() != 5 {
                    return Err(CoreError::MalformedWire(
                        "PRIORITY payload must be 5 bytes".into(),
                    ));
                }
                let raw_dep = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
                out.priorities.push(PriorityFrameInfo {
                    stream_id,
                    exclusive: raw_dep & 0x8000_0000 != 0,
                    dependency: raw_dep & 0x7fff_ffff,
                    weight: payload[4],
                });
            }
            FRAME_HEADERS if out.header_block.is_none() => {
                let mut block = strip_headers_padding_and_priority(payload, flags)?;
                if flags & FLAG_END_HEADERS != 0 {
                    out.header_block = Some(block);
                    break;
                }
                collecting_headers = true;
                headers_stream_id = stream_id;
                out.header_block = Some(std::mem::take(&mut block));
            }
            FRAME_CONTINUATION if collecting_headers && stream_id == headers_stream_id => {
                if let Some(block) = out.header_block.as_mut() {
                    block.extend_from_slice(payload);
                }
                if flags & FLAG_END_HEADERS != 0 {
                    collecting_headers = false;
                    break;
                }
            }
            _ => {}
        }
    }

    Ok(out)
}

fn strip_headers_padding_and_priority(payload: &[u8], flags: u8) -> Result<Vec<u8>> {
    let mut cursor = 0usize;
    let mut pad_len = 0usize;
    if flags & FLAG_PADDED != 0 {
        if payload.is_empty() {
            return Err(CoreError::MalformedWire("HEADERS missing pad length".into()));
        }
        pad_len = payload[0] as usize;
        cursor += 1;
    }
    if flags & FLAG_PRIORITY != 0 {
        if payload.len() < cursor + 5 {
            return Err(CoreError::MalformedWire(
                "HEADERS missing in-frame priority fields".into(),
            ));
        }
        cursor += 5;
    }
    if payload.len() < cursor + pad_len {
        return Err(CoreError::MalformedWire("HEADERS padding exceeds frame length".into()));
    }
    Ok(payload[cursor..payload.len() - pad_len].to_vec())
}
