use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub catalog_path: PathBuf,
    pub cache_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub max_total_bytes: Option<u64>,
    pub log_level: String,
}

impl AppConfig {
    pub fn resources_dir(&self) -> PathBuf {
        self.cache_dir.join("resources")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("shelf.sqlite3"),
            cache_dir: PathBuf::from("cache"),
            downloads_dir: PathBuf::from("downloads"),
            max_total_bytes: None,
            log_level: "info".to_string(),
        }
    }
}
