use super::types::TcpOptionEntry;

const OPT_EOL: u8 = 0;
const OPT_NOP: u8 = 1;
const OPT_MSS: u8 = 2;
const OPT_WSCALE: u8 = 3;
const OPT_SACK_PERMITTED: u8 = 4;
const OPT_SACK: u8 = 5;
const OPT_TIMESTAMP: u8 = 8;

fn option_name(kind: u8) -> String {
    match kind {
        OPT_EOL => "EOL",
        OPT_NOP => "NOP",
        OPT_MSS => "MSS",
        OPT_WSCALE => "WindowScale",
        OPT_SACK_PERMITTED => "SackPermitted",
        OPT_SACK => "Sack",
        OPT_TIMESTAMP => "Timestamp",
        _ => return format!("Unknown({kind})"),
    }
    .to_string()
}

/// Parsed result of a single pass over raw TCP option bytes.
#[derive(Debug, Default)]
pub struct ParsedOptions {
    pub entries: Vec<TcpOptionEntry>,
    pub options_str: String,
    pub mss: Option<u16>,
    pub window_scale: Option<u8>,
    pub ts_val: Option<u32>,
    pub ts_ecr: Option<u32>,
    /// Set when the byte stream ran out mid-option (truncated length byte or
    /// payload); the entries collected up to that point are still returned.
    pub malformed: bool,
    tokens: Vec<String>,
}

/// Walks raw TCP option bytes kind-by-kind, mirroring the manual byte-walk
/// used by packet-capture tooling: `EOL`/`NOP` are single bytes with no
/// length field, every other kind is `kind(1) len(1) data(len-2)`.
pub fn parse_options(opts: &[u8]) -> ParsedOptions {
    let mut out = ParsedOptions::default();
    let mut rest = opts;

    while let Some((&kind, tail)) = rest.split_first() {
        match kind {
            OPT_EOL => {
                out.entries.push(TcpOptionEntry { kind, name: option_name(kind), value: None });
                break;
            }
            OPT_NOP => {
                out.entries.push(TcpOptionEntry { kind, name: option_name(kind), value: None });
                out.tokens.push("N".to_string());
                rest = tail;
            }
            _ => {
                let Some((&len_byte, data)) = tail.split_first() else {
                    out.malformed = true;
                    break;
                };
                let len = len_byte as usize;
                let data_len = len.saturating_sub(2);
                let Some(payload) = data.get(..data_len) else {
                    out.malformed = true;
                    break;
                };

                let value = decode_payload(kind, payload, &mut out);
                out.entries.push(TcpOptionEntry { kind, name: option_name(kind), value });

                let Some(next) = data.get(data_len..) else {
                    out.malformed = true;
                    break;
                };
                rest = next;
            }
        }
    }

    out.options_str = out.tokens.join(",");
    out
}

fn decode_payload(kind: u8, payload: &[u8], out: &mut ParsedOptions) -> Option<String> {
    match kind {
        OPT_MSS if payload.len() == 2 => {
            let mss = u16::from_be_bytes([payload[0], payload[1]]);
            out.mss = Some(mss);
            out.tokens.push(format!("M{mss}"));
            Some(mss.to_string())
        }
        OPT_WSCALE if payload.len() == 1 => {
            let scale = payload[0];
            out.window_scale = Some(scale);
            out.tokens.push(format!("W{scale}"));
            Some(scale.to_string())
        }
        OPT_SACK_PERMITTED => {
            out.tokens.push("S".to_string());
            None
        }
        OPT_SACK => {
            out.tokens.push("K".to_string());
            None
        }
        OPT_TIMESTAMP if payload.len() == 8 => {
            let ts_val = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
            let ts_ecr = u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]);
            out.ts_val = Some(ts_val);
            out.ts_ecr = Some(ts_ecr);
            out.tokens.push("T".to_string());
            Some(format!("{ts_val},{ts_ecr}"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mss_wscale_sack_permitted_timestamp_nop() {
        let mut opts = Vec::new();
        opts.extend_from_slice(&[OPT_MSS, 4, 0x05, 0xb4]); // MSS=1460
        opts.push(OPT_NOP);
        opts.extend_from_slice(&[OPT_WSCALE, 3, 7]);
        opts.extend_from_slice(&[OPT_SACK_PERMITTED, 2]);
        opts.extend_from_slice(&[OPT_TIMESTAMP, 10, 0, 0, 0, 1, 0, 0, 0, 0]);

        let parsed = parse_options(&opts);
        assert!(!parsed.malformed);
        assert_eq!(parsed.mss, Some(1460));
        assert_eq!(parsed.window_scale, Some(7));
        assert_eq!(parsed.ts_val, Some(1));
        assert_eq!(parsed.options_str, "M1460,N,W7,S,T");
    }

    #[test]
    fn empty_options_produce_empty_string() {
        let parsed = parse_options(&[]);
        assert_eq!(parsed.options_str, "");
        assert!(!parsed.malformed);
    }

    #[test]
    fn truncated_option_is_malformed_not_panicking() {
        let parsed = parse_options(&[OPT_MSS, 4, 0x05]); // missing last byte
        assert!(parsed.malformed);
    }
}
