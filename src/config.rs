use std::path::PathBuf;
use std::{env, fs};

use serde::Deserialize;

use crate::util::dates;
use crate::Error;

#[derive(Debug, Deserialize, Clone)]
struct FileConfig {
    pub storage_dir: String,
    pub log: FileLogConfig,
    pub caption: CaptionConfig,
}

#[derive(Debug, Deserialize, Clone)]
struct FileLogConfig {
    pub level: String,
    pub path: String,
    pub json_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaptionConfig {
    pub default_duration_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: String,
    pub path: PathBuf,
    pub json_path: PathBuf,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_dir: PathBuf,
    pub log: LogConfig,
    pub caption: CaptionConfig,
}

fn expand_tilde(path: &str) -> Result<PathBuf, Error> {
    if path.starts_with("~/") {
        let home = env::var("HOME")?;
        Ok(PathBuf::from(path.replacen("~", &home, 1)))
    } else {
        Ok(PathBuf::from(path))
    }
}

pub fn load_config() -> Result<AppConfig, Error> {
    let exe_path = env::current_exe()?;
    let config_path = match exe_path.parent() {
        Some(dir) => dir.join("eduverse.toml"),
        _ => return Err("failed to determine executable directory".into()),
    };

    if !config_path.exists() || !config_path.is_file() {
        return Err(format!(
            "Config file does not exist or is not a file: {}",
            config_path.display()
        )
        .into());
    }
    let s = fs::read_to_string(&config_path)?;
    let cfg: FileConfig = toml::from_str(&s)?;

    let storage_dir = expand_tilde(&cfg.storage_dir)?;
    fs::create_dir_all(&storage_dir)?;

    Ok(AppConfig {
        storage_dir,
        log: build_log_config(cfg.log)?,
        caption: cfg.caption,
    })
}

fn build_log_config(file_log: FileLogConfig) -> Result<LogConfig, Error> {
    let path = log_file_replacements(&file_log.path)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    if path.exists() && !path.is_file() {
        return Err(format!("Log path exists but is not a file: {}", &file_log.path).into());
    }

    let json_path = log_file_replacements(&file_log.json_path)?;
    if let Some(parent) = json_path.parent() {
        fs::create_dir_all(parent)?;
    }
    if json_path.exists() && !json_path.is_file() {
        return Err(format!("Log path exists but is not a file: {}", &file_log.json_path).into());
    }

    Ok(LogConfig {
        level: file_log.level,
        path,
        json_path,
    })
}

fn log_file_replacements(cfg_path: &str) -> Result<PathBuf, Error> {
    let date_str = dates::local_date_yyyy_mm_dd();
    let replaced = cfg_path.replace("{DATE}", &date_str);
    expand_tilde(&replaced)
}
