use sha2::{Digest, Sha256};

use crate::fingerprint::http2::frame::InterceptedFrames;
use crate::fingerprint::http2::types::Http2Fingerprint;

const DEFAULT_PSEUDO_ORDER: &str = "m,a,s,p";

/// Decodes the collected HEADERS block with a fresh HPACK decoder (standard
/// 4096-byte dynamic table) and records the emission order of `:method`,
/// `:authority`, `:scheme`, `:path` as their first letters joined by commas.
/// Falls back to [`DEFAULT_PSEUDO_ORDER`] if no block was captured or it
/// fails to decode.
fn pseudo_header_order(header_block: &Option<Vec<u8>>) -> String {
    let Some(block) = header_block else {
        return DEFAULT_PSEUDO_ORDER.to_string();
    };
    let mut decoder = hpack::Decoder::new();
    let Ok(headers) = decoder.decode(block) else {
        return DEFAULT_PSEUDO_ORDER.to_string();
    };

    let mut order = String::new();
    for (name, _value) in &headers {
        let letter = match name.as_slice() {
            b":method" => Some('m'),
            b":authority" => Some('a'),
            b":scheme" => Some('s'),
            b":path" => Some('p'),
            _ => None,
        };
        if let Some(letter) = letter {
            if !order.is_empty() {
                order.push(',');
            }
            order.push(letter);
        }
    }

    if order.is_empty() {
        DEFAULT_PSEUDO_ORDER.to_string()
    } else {
        order
    }
}

/// Assembles the Akamai string `<settings>|<window_update>|<priority>|<pseudo_order>`
/// and its SHA-256 prefix hash from intercepted frames.
pub fn build_fingerprint(mut frames: InterceptedFrames) -> Http2Fingerprint {
    let pseudo_order = pseudo_header_order(&frames.header_block);

    let mut sorted_settings = frames.settings.clone();
    sorted_settings.sort_by_key(|s| s.id);
    let settings_str = if sorted_settings.is_empty() {
        "0".to_string()
    } else {
        sorted_settings
            .iter()
            .map(|s| format!("{}:{}", s.id, s.value))
            .collect::<Vec<_>>()
            .join(";")
    };

    let priority_str = if frames.priorities.is_empty() {
        "0".to_string()
    } else {
        frames
            .priorities
            .iter()
            .map(|p| format!("{}:{}:{}:{}", p.stream_id, p.exclusive as u8, p.dependency, p.weight))
            .collect::<Vec<_>>()
            .join(",")
    };

    let akamai = format!(
        "{}|{}|{}|{}",
        settings_str, frames.window_update, priority_str, pseudo_order
    );

    let mut hasher = Sha256::new();
    hasher.update(akamai.as_bytes());
    let akamai_hash = hex::encode(hasher.finalize())[..32].to_string();

    Http2Fingerprint {
        settings: std::mem::take(&mut frames.settings),
        window_update: frames.window_update,
        priorities: std::mem::take(&mut frames.priorities),
        pseudo_header_order: pseudo_order,
        frame_type_order: std::mem::take(&mut frames.frame_type_order),
        akamai,
        akamai_hash,
    }
}
