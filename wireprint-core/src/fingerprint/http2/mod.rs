pub mod akamai;
pub mod frame;
pub mod types;

pub use types::{Http2Fingerprint, PriorityFrameInfo, SettingEntry};

use crate::error::Result;

/// Intercepts the client's opening HTTP/2 frames and derives the Akamai-style
/// fingerprint from them.
pub fn fingerprint_connection_preface(data: &[u8]) -> Result<Http2Fingerprint> {
    let frames = frame::intercept(data)?;
    Ok(akamai::build_fingerprint(frames))
}
