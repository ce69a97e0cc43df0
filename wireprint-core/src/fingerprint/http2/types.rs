use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SettingEntry {
    pub id: u16,
    pub name: String,
    pub value: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriorityFrameInfo {
    pub stream_id: u32,
    pub exclusive: bool,
    pub dependency: u32,
    pub weight: u8,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Http2Fingerprint {
    /// SETTINGS entries in the order they arrived on the wire.
    pub settings: Vec<SettingEntry>,
    /// Absolute increment of the first connection-level (stream 0)
    /// WINDOW_UPDATE, or 0 if none was observed.
    pub window_update: u32,
    pub priorities: Vec<PriorityFrameInfo>,
    /// `:method`/`:authority`/`:scheme`/`:path` letters joined by commas in
    /// the order they were emitted in the first HEADERS frame. Falls back to
    /// `m,a,s,p` if no HEADERS frame was decoded within the frame window.
    pub pseudo_header_order: String,
    /// Frame type names in arrival order, kept only for debugging.
    pub frame_type_order: Vec<String>,
    pub akamai: String,
    pub akamai_hash: String,
}
