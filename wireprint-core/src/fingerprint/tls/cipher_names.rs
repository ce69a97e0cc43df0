/// Best-effort cipher suite name lookup for the commonly observed IDs.
/// Unknown IDs are rendered as `UNKNOWN_0x<hex>`.
pub fn cipher_suite_name(id: u16) -> String {
    match id {
        0x1301 => "TLS_AES_128_GCM_SHA256",
        0x1302 => "TLS_AES_256_GCM_SHA384",
        0x1303 => "TLS_CHACHA20_POLY1305_SHA256",
        0xc02b => "TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256",
        0xc02c => "TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384",
        0xc02f => "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
        0xc030 => "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384",
        0xcca8 => "TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256",
        0xcca9 => "TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256",
        0xc013 => "TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA",
        0xc014 => "TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA",
        0x009c => "TLS_RSA_WITH_AES_128_GCM_SHA256",
        0x009d => "TLS_RSA_WITH_AES_256_GCM_SHA384",
        0x002f => "TLS_RSA_WITH_AES_128_CBC_SHA",
        0x0035 => "TLS_RSA_WITH_AES_256_CBC_SHA",
        0x000a => "TLS_RSA_WITH_3DES_EDE_CBC_SHA",
        0x0004 => "TLS_RSA_WITH_RC4_128_MD5",
        0x0005 => "TLS_RSA_WITH_RC4_128_SHA",
        0x0000 => "TLS_NULL_WITH_NULL_NULL",
        _ => return format!("UNKNOWN_0x{id:04x}"),
    }
    .to_string()
}

/// Cipher suites considered weak for the analyzer's cipher-strength verdict.
pub fn is_weak_cipher_name(name: &str) -> bool {
    name.contains("RC4")
        || name.contains("DES")
        || name.contains("EXPORT")
        || name.contains("NULL")
}

pub fn is_strong_cipher_name(name: &str) -> bool {
    (name.contains("AES_256") || name.contains("CHACHA20") || name.contains("GCM"))
        && !is_weak_cipher_name(name)
}

pub fn extension_name(id: u16) -> String {
    match id {
        0 => "server_name",
        10 => "supported_groups",
        11 => "ec_point_formats",
        13 => "signature_algorithms",
        16 => "application_layer_protocol_negotiation",
        43 => "supported_versions",
        35 => "session_ticket",
        51 => "key_share",
        45 => "psk_key_exchange_modes",
        23 => "extended_master_secret",
        65281 => "renegotiation_info",
        18 => "signed_certificate_timestamp",
        5 => "status_request",
        17513 => "application_settings",
        65037 => "encrypted_client_hello",
        27 => "compress_certificate",
        _ => return format!("ext_0x{id:04x}"),
    }
    .to_string()
}
