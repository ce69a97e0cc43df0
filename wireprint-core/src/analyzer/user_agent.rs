use super::types::ParsedUserAgent;

/// Substrings that mark a User-Agent as a non-browser client library, not a
/// real browser impersonating one. Checked before the browser table so a
/// string like `python-requests` never gets misread as a generic client.
const LIBRARY_MARKERS: &[&str] = &[
    "python", "curl", "go-http", "node", "java", "urllib", "axios", "requests", "httpx",
    "aiohttp", "scrapy",
];

/// Browser markers, checked in order — first match wins. `Edg/` must be
/// checked before `Chrome` since Edge's UA also contains `Chrome`.
const BROWSER_MARKERS: &[(&str, &str)] = &[
    ("Edg/", "Edge"),
    ("OPR/", "Opera"),
    ("Firefox/", "Firefox"),
    ("Chrome/", "Chrome"),
    ("CriOS/", "Chrome"),
    ("Safari/", "Safari"),
];

const OS_MARKERS: &[(&str, &str)] = &[
    ("Windows NT", "Windows"),
    ("Android", "Android"),
    ("iPhone", "iOS"),
    ("iPad", "iOS"),
    ("Mac OS X", "macOS"),
    ("CrOS", "ChromeOS"),
    ("Linux", "Linux"),
];

const BOT_MARKERS: &[&str] = &["bot", "spider", "crawler", "headless"];

/// Deterministic matcher over ordered `(substring, label)` pairs — not a
/// grammar. Populates `ParsedUserAgent`, consumed only by the analyzer.
pub fn parse_user_agent(ua: Option<&str>) -> ParsedUserAgent {
    let Some(ua) = ua else {
        return ParsedUserAgent::default();
    };

    let mut parsed = ParsedUserAgent { raw: Some(ua.to_string()), ..Default::default() };
    let lower = ua.to_lowercase();

    if let Some(marker) = LIBRARY_MARKERS.iter().find(|m| lower.contains(*m)) {
        parsed.is_library = true;
        parsed.library_name = Some(marker.to_string());
    } else if let Some((marker, name)) = BROWSER_MARKERS.iter().find(|(m, _)| ua.contains(m)) {
        parsed.browser = Some(name.to_string());
        let _ = marker;
    }

    if let Some((_, os)) = OS_MARKERS.iter().find(|(m, _)| ua.contains(m)) {
        parsed.os = Some(os.to_string());
    }

    parsed.is_mobile = lower.contains("mobile") || lower.contains("android") || lower.contains("iphone");
    parsed.self_identifies_as_bot = BOT_MARKERS.iter().any(|m| lower.contains(m));

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_ua_yields_empty_parsed() {
        let parsed = parse_user_agent(None);
        assert!(parsed.browser.is_none());
        assert!(!parsed.is_library);
    }

    #[test]
    fn edge_is_detected_before_chrome() {
        let ua = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0";
        let parsed = parse_user_agent(Some(ua));
        assert_eq!(parsed.browser.as_deref(), Some("Edge"));
        assert_eq!(parsed.os.as_deref(), Some("Windows"));
    }

    #[test]
    fn python_requests_is_a_library_not_a_browser() {
        let parsed = parse_user_agent(Some("python-requests/2.32.0"));
        assert!(parsed.is_library);
        assert!(parsed.browser.is_none());
    }

    #[test]
    fn android_chrome_reports_mobile_os() {
        let ua = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/124.0 Mobile Safari/537.36";
        let parsed = parse_user_agent(Some(ua));
        assert_eq!(parsed.browser.as_deref(), Some("Chrome"));
        assert_eq!(parsed.os.as_deref(), Some("Android"));
        assert!(parsed.is_mobile);
    }
}
