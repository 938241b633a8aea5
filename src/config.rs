// Configuration module for deadreq
// Reads from environment variables with sensible defaults

use std::env;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Worker threads for candidate classification (DEADREQ_THREADS)
    pub threads: Option<usize>,

    /// Documents above this size are skipped (DEADREQ_MAX_FILE_SIZE_MB)
    pub max_file_size_mb: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: None,
            max_file_size_mb: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(val) = env::var("DEADREQ_THREADS") {
            if let Ok(parsed) = val.parse::<usize>() {
                if parsed > 0 {
                    config.threads = Some(parsed);
                }
            } else {
                eprintln!(
                    "deadreq: Warning: Invalid DEADREQ_THREADS value: {val}, using automatic thread count"
                );
            }
        }

        if let Ok(val) = env::var("DEADREQ_MAX_FILE_SIZE_MB") {
            if let Ok(parsed) = val.parse() {
                config.max_file_size_mb = parsed;
            } else {
                eprintln!(
                    "deadreq: Warning: Invalid DEADREQ_MAX_FILE_SIZE_MB value: {}, using default: {}",
                    val, config.max_file_size_mb
                );
            }
        }

        config
    }

    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::Config;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.threads, None);
        assert_eq!(config.max_file_size_mb, 10);
        assert_eq!(config.max_file_size_bytes(), 10 * 1024 * 1024);
    }
}
