use super::types::Http2Analysis;
use crate::db::http2::{Http2Catalog, ReferenceSignature};
use crate::fingerprint::http2::Http2Fingerprint;

fn settings_str(fp: &Http2Fingerprint) -> String {
    let mut sorted = fp.settings.clone();
    sorted.sort_by_key(|s| s.id);
    sorted.iter().map(|s| format!("{}:{}", s.id, s.value)).collect::<Vec<_>>().join(";")
}

/// A fingerprint's SETTINGS "matches" a reference signature when every one
/// of the reference's indicative `(id, value)` pairs is present, and (when
/// the reference specifies it) the sorted SETTINGS string starts with a
/// fixed prefix — this is how Safari's "starts with `2:0`" rule is encoded.
fn settings_match(fp: &Http2Fingerprint, reference: &ReferenceSignature) -> bool {
    let settings_str = settings_str(fp);
    if let Some(prefix) = &reference.starts_with {
        if !settings_str.starts_with(prefix.as_str()) {
            return false;
        }
    }
    reference.settings_keys.iter().all(|(id, value)| {
        fp.settings.iter().any(|s| s.id == *id && s.value == *value)
    })
}

/// Evaluates the database-driven impersonator rule set: the literal
/// Chrome/Safari/Firefox SETTINGS/WINDOW_UPDATE/pseudo-header constants live
/// in the loaded HTTP/2 catalog, not here.
fn evaluate_rules(fp: &Http2Fingerprint, catalog: &Http2Catalog) -> (u8, Vec<String>) {
    let mut signal = 0u8;
    let mut observations = Vec::new();

    let chrome = catalog.reference("chrome");
    let safari = catalog.reference("safari");
    let firefox = catalog.reference("firefox");

    let chrome_like = chrome.map(|r| settings_match(fp, r)).unwrap_or(false);
    let safari_like = safari.map(|r| settings_match(fp, r)).unwrap_or(false);
    let firefox_like = firefox.map(|r| settings_match(fp, r)).unwrap_or(false);

    let pseudo = fp.pseudo_header_order.as_str();

    if let Some(chrome) = chrome.filter(|_| chrome_like) {
        if fp.window_update == chrome.window_update && pseudo != chrome.pseudo_header_order {
            signal += 3;
            observations.push(format!(
                "R1: Chrome SETTINGS+WU but pseudo_header_order='{pseudo}'"
            ));
        } else if fp.window_update != 0 && fp.window_update != chrome.window_update {
            signal += 1;
            observations.push("R2: Chrome SETTINGS with non-Chrome WINDOW_UPDATE".to_string());
        }
        if pseudo == "m,a,s" {
            signal += 2;
            observations.push("R5: Chrome SETTINGS with pseudo_header_order='m,a,s'".to_string());
        }
        if let Some(safari) = safari {
            if fp.window_update == safari.window_update {
                signal += 2;
                observations.push("R6: Chrome SETTINGS with Safari WINDOW_UPDATE".to_string());
            }
        }
    }

    if let Some(safari) = safari.filter(|_| safari_like) {
        let pseudo_ok = pseudo == "m,s,a" || pseudo == "m,s,p,a";
        if fp.window_update == safari.window_update && !pseudo_ok {
            signal += 3;
            observations.push(format!(
                "R3: Safari SETTINGS+WU but pseudo_header_order='{pseudo}'"
            ));
        }
        if let Some(chrome) = chrome {
            if fp.window_update == chrome.window_update {
                signal += 2;
                observations.push("R7: Safari SETTINGS with Chrome WINDOW_UPDATE".to_string());
            }
        }
    }

    if let Some(firefox) = firefox.filter(|_| firefox_like) {
        if fp.window_update == firefox.window_update && pseudo != firefox.pseudo_header_order {
            signal += 3;
            observations.push(format!(
                "R4: Firefox SETTINGS+WU but pseudo_header_order='{pseudo}'"
            ));
        }
    }

    (signal, observations)
}

pub fn analyze_http2(fp: &Http2Fingerprint, catalog: &Http2Catalog) -> Http2Analysis {
    let client_match = catalog.lookup(&fp.akamai).map(|e| e.name.clone());
    let (signal, observations) = evaluate_rules(fp, catalog);

    let is_impersonator = signal >= 3;
    let impersonator_type = is_impersonator.then(|| "curl-impersonate/curl_cffi".to_string());

    Http2Analysis {
        detected: true,
        client_match,
        is_impersonator,
        impersonator_type,
        observations,
    }
}
