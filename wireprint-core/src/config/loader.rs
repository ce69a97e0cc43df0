use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::{CoreError, Result};

pub fn load_from_path<P: AsRef<Path>>(p: P) -> Result<Config> {
    let txt = fs::read_to_string(p)
        .map_err(|e| CoreError::Config(format!("failed to read config file: {e}")))?;
    let cfg: Config = toml::from_str(&txt)
        .map_err(|e| CoreError::Config(format!("failed to parse config: {e}")))?;

    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> Result<()> {
    if !Path::new(&cfg.tls.cert_path).exists() {
        return Err(CoreError::Config(format!(
            "certificate file not found: {}",
            cfg.tls.cert_path
        )));
    }
    if !Path::new(&cfg.tls.key_path).exists() {
        return Err(CoreError::Config(format!("key file not found: {}", cfg.tls.key_path)));
    }
    if cfg.timeout.first_read_secs == 0 || cfg.timeout.subsequent_read_secs == 0 {
        return Err(CoreError::Config("read timeouts must be > 0".to_string()));
    }
    Ok(())
}
