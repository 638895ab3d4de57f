use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub log_level: String,
    pub api_base_url: String,
    pub thumbnails_preload: usize,
    pub preload_threads: usize,
    pub cache_path: PathBuf,
}

#[derive(Debug, Default)]
pub struct AppConfigOverrides {
    pub log_level: Option<String>,
    pub api_base_url: Option<String>,
    pub thumbnails_preload: Option<usize>,
    pub preload_threads: Option<usize>,
    pub cache_path: Option<PathBuf>,
}

fn base_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".photomind")
}

fn default_config_path() -> PathBuf {
    base_dir().join("config.toml")
}

impl AppConfig {
    /// Read `path` (default `~/.photomind/config.toml`) and `PHOTOMIND_*`
    /// environment variables. Missing or malformed values fall back to defaults.
    pub fn load_from(path: Option<PathBuf>) -> Self {
        let path = path.unwrap_or_else(default_config_path);
        let cfg = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix("PHOTOMIND"))
            .build()
            .unwrap_or_else(|e| {
                eprintln!("Ignoring unreadable configuration: {}", e);
                config::Config::default()
            });

        let log_level = cfg
            .get_string("log_level")
            .unwrap_or_else(|_| "info".to_string());
        let api_base_url = cfg
            .get_string("api_base_url")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let thumbnails_preload = cfg
            .get_int("thumbnails_preload")
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .unwrap_or(40);
        let preload_threads = cfg
            .get_int("preload_threads")
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(4);
        let cache_path = cfg
            .get_string("cache_path")
            .map(PathBuf::from)
            .unwrap_or_else(|_| base_dir());

        Self {
            log_level,
            api_base_url,
            thumbnails_preload,
            preload_threads,
            cache_path,
        }
    }

    pub fn apply_overrides(mut self, ov: &AppConfigOverrides) -> Self {
        if let Some(l) = &ov.log_level {
            self.log_level = l.clone();
        }
        if let Some(url) = &ov.api_base_url {
            self.api_base_url = url.clone();
        }
        if let Some(t) = ov.thumbnails_preload {
            self.thumbnails_preload = t;
        }
        if let Some(pt) = ov.preload_threads {
            self.preload_threads = pt;
        }
        if let Some(p) = &ov.cache_path {
            self.cache_path = p.clone();
        }
        self
    }

    #[allow(dead_code)]
    pub fn save_to(&self, path: Option<PathBuf>) -> std::io::Result<()> {
        let path = path.unwrap_or_else(default_config_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = toml::to_string(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn clear_env() {
        for key in [
            "PHOTOMIND_LOG_LEVEL",
            "PHOTOMIND_API_BASE_URL",
            "PHOTOMIND_THUMBNAILS_PRELOAD",
            "PHOTOMIND_PRELOAD_THREADS",
            "PHOTOMIND_CACHE_PATH",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_file() {
        clear_env();
        let dir = tempdir().unwrap();
        let cfg = AppConfig::load_from(Some(dir.path().join("missing.toml")));
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.api_base_url, "http://localhost:5000");
        assert_eq!(cfg.thumbnails_preload, 40);
        assert_eq!(cfg.preload_threads, 4);
        assert!(cfg.cache_path.ends_with(".photomind"));
    }

    #[test]
    #[serial]
    fn test_save_and_reload() {
        clear_env();
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = AppConfig {
            log_level: "debug".into(),
            api_base_url: "http://photos.local:8080".into(),
            thumbnails_preload: 12,
            preload_threads: 2,
            cache_path: dir.path().join("cache"),
        };
        cfg.save_to(Some(path.clone())).unwrap();
        assert_eq!(AppConfig::load_from(Some(path)), cfg);
    }

    #[test]
    #[serial]
    fn test_environment_beats_file() {
        clear_env();
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = \"warn\"\napi_base_url = \"http://file:1\"\n").unwrap();
        std::env::set_var("PHOTOMIND_API_BASE_URL", "http://env:2");

        let cfg = AppConfig::load_from(Some(path));
        clear_env();
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.api_base_url, "http://env:2");
    }

    #[test]
    #[serial]
    fn test_overrides_win() {
        clear_env();
        let dir = tempdir().unwrap();
        let cfg = AppConfig::load_from(Some(dir.path().join("none.toml"))).apply_overrides(
            &AppConfigOverrides {
                log_level: Some("trace".into()),
                api_base_url: Some("http://cli:3".into()),
                preload_threads: Some(8),
                ..Default::default()
            },
        );
        assert_eq!(cfg.log_level, "trace");
        assert_eq!(cfg.api_base_url, "http://cli:3");
        assert_eq!(cfg.preload_threads, 8);
        assert_eq!(cfg.thumbnails_preload, 40);
    }
}
