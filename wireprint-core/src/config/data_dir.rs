use std::path::PathBuf;

/// Resolve the directory holding the JA3/JA4/HTTP2 reference catalogs.
///
/// Resolution order, per the environment contract: next to the running
/// executable, the current working directory, then two fixed fallbacks.
/// `override_dir` (from `FingerprintConfig::data_dir`) always wins when set.
pub fn resolve(override_dir: Option<&str>) -> PathBuf {
    if let Some(dir) = override_dir {
        return PathBuf::from(dir);
    }

    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("data");
            if candidate.is_dir() {
                return candidate;
            }
        }
    }

    let cwd_candidate = PathBuf::from("data");
    if cwd_candidate.is_dir() {
        return cwd_candidate;
    }

    for fallback in ["/usr/share/wireprint/data", "/etc/wireprint/data"] {
        let candidate = PathBuf::from(fallback);
        if candidate.is_dir() {
            return candidate;
        }
    }

    cwd_candidate
}
