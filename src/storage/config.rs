//! 应用配置持久化

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::{expand_home, load_toml, save_toml, sprig_dir};
use crate::error::Result;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// 数据文件配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// 数据文件路径，默认 ~/.sprig/todo.toml
    #[serde(default)]
    pub data_file: Option<String>,
    /// 退出菜单时自动保存（一次性命令有改动即保存）
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

fn default_autosave() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            autosave: default_autosave(),
        }
    }
}

/// 撤销历史配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HistoryConfig {
    /// 撤销栈最大深度，不设置表示不限
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl Config {
    /// 数据文件路径
    pub fn data_path(&self) -> PathBuf {
        match self.storage.data_file.as_deref() {
            Some(path) if !path.trim().is_empty() => expand_home(path.trim()),
            _ => sprig_dir().join("todo.toml"),
        }
    }
}

/// 获取配置文件路径
pub fn config_path() -> PathBuf {
    sprig_dir().join("config.toml")
}

/// 加载配置（不存在则返回默认值）
pub fn load_config() -> Config {
    load_config_from(&config_path())
}

/// 从指定路径加载配置；文件无效时记录警告并使用默认值
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match load_toml(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            Config::default()
        }
    }
}

/// 保存配置
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    save_toml(path, config)
}
