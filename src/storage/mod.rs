pub mod config;
pub mod snapshot;

use std::io;
use std::path::{Path, PathBuf};

/// Environment variable that relocates the data directory (tests, containers)
pub const HOME_ENV: &str = "TASKDECK_HOME";

/// 获取 ~/.taskdeck/ 目录路径
pub fn taskdeck_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".taskdeck")
}

/// 确保快照目录存在: {root}/state/
pub fn ensure_state_dir(root: &Path) -> io::Result<PathBuf> {
    let path = root.join("state");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// 从 TOML 文件加载反序列化数据
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> io::Result<T> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// 将数据序列化后保存到 TOML 文件
///
/// Writes to a sibling temp file first so a crash never leaves a half-written
/// snapshot behind.
pub fn save_toml<T: serde::Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let content =
        toml::to_string_pretty(data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)
}
