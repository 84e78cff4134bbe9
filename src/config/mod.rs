use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use directories::BaseDirs;

pub const DEFAULT_BACKEND_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    /// Defaults, then the rc file at `config_path`, then environment variables.
    pub fn load_from(config_path: &Path) -> Self {
        let mut map = default_map();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Environment takes precedence over the rc file
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path: config_path.to_path_buf() }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    /// Set a value for this process only; used for CLI overrides.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from)
    }

    pub fn backend_base_url(&self) -> String {
        self.get("BACKEND_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND_BASE_URL.to_string())
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.get_u64("REQUEST_TIMEOUT").unwrap_or(60)
    }

    /// Files in flight at once; never zero.
    pub fn upload_concurrency(&self) -> usize {
        self.get_usize("UPLOAD_CONCURRENCY").unwrap_or(4).max(1)
    }

    pub fn indicators_path(&self) -> Option<PathBuf> {
        self.get_path("INDICATORS_PATH")
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "BACKEND_BASE_URL",
        "BACKEND_API_TOKEN",
        "REQUEST_TIMEOUT",
        "UPLOAD_CONCURRENCY",
        "INDICATORS_PATH",
        "PREFER_PDFTOTEXT",
        "PRETTIFY_MARKDOWN",
        "LOG_LEVEL",
    ];

    KEYS.contains(&k) || k.starts_with("BILLSORT_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("billsort").join(".billsortrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert("BACKEND_BASE_URL".into(), DEFAULT_BACKEND_BASE_URL.into());
    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m.insert("UPLOAD_CONCURRENCY".into(), "4".into());
    m.insert("LOG_LEVEL".into(), "warn".into());

    m.insert("PREFER_PDFTOTEXT".into(), "true".into());
    m.insert("PRETTIFY_MARKDOWN".into(), "true".into());

    m
}
