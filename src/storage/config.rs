//! 应用配置持久化
//!
//! Non-secret settings live in `config.toml` under the data directory.
//! Secrets (session secret, OAuth credentials) come from the environment,
//! which `dotenvy` fills from `.env.local` / `.env` at startup.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::taskdeck_dir;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub items: ItemsConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Web 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Open the dashboard in a browser once the server is up
    #[serde(default = "default_true")]
    pub open_browser: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_true() -> bool {
    true
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open_browser: true,
        }
    }
}

/// 看板配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Snapshot key the task store persists under
    #[serde(default = "default_store_name")]
    pub store_name: String,
}

fn default_store_name() -> String {
    "admin-dashboard-tasks".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            store_name: default_store_name(),
        }
    }
}

/// Simulated latency of the mock items service, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsConfig {
    #[serde(default = "default_list_latency")]
    pub list_latency_ms: u64,
    #[serde(default = "default_get_latency")]
    pub get_latency_ms: u64,
    #[serde(default = "default_write_latency")]
    pub write_latency_ms: u64,
}

fn default_list_latency() -> u64 {
    500
}

fn default_get_latency() -> u64 {
    300
}

fn default_write_latency() -> u64 {
    500
}

impl Default for ItemsConfig {
    fn default() -> Self {
        Self {
            list_latency_ms: default_list_latency(),
            get_latency_ms: default_get_latency(),
            write_latency_ms: default_write_latency(),
        }
    }
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Name of the cookie that carries the session token
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    /// Days a signed-in session stays valid
    #[serde(default = "default_session_ttl_days")]
    pub session_ttl_days: i64,
}

fn default_session_cookie() -> String {
    "taskdeck.session-token".to_string()
}

fn default_session_ttl_days() -> i64 {
    30
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie: default_session_cookie(),
            session_ttl_days: default_session_ttl_days(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// 获取配置文件路径
pub fn config_path() -> PathBuf {
    taskdeck_dir().join("config.toml")
}

/// 加载配置（不存在则返回默认值）
pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// Same as [`load_config`] for an explicit path; unreadable files fall back to defaults
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match fs::read_to_string(path) {
        Ok(s) => toml::from_str(&s).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            Config::default()
        }),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
            Config::default()
        }
    }
}

/// 保存配置
pub fn save_config(config: &Config) -> io::Result<()> {
    // 确保 ~/.taskdeck 目录存在
    let dir = taskdeck_dir();
    fs::create_dir_all(&dir)?;
    super::save_toml(&config_path(), config)
}
