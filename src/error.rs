//! sprig 统一错误类型定义
//!
//! 使用 `thiserror` 库提供统一的错误处理，支持错误链式传播。

use std::io;
use thiserror::Error;

use crate::model::TaskId;

/// sprig 错误类型
#[derive(Debug, Error)]
pub enum SprigError {
    /// 任务 id 不存在
    #[error("Task not found: #{0}")]
    NotFound(TaskId),

    /// 没有可撤销的操作
    #[error("Nothing to undo")]
    EmptyHistory,

    /// 项目已存在
    #[error("Project '{0}' already exists")]
    ProjectExists(String),

    /// 项目不存在
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    /// 受保护的项目（default 不可删除）
    #[error("Cannot delete {0} project")]
    ProtectedProject(String),

    /// 用户输入无效
    #[error("{0}")]
    InvalidInput(String),

    /// I/O 错误（文件读写、目录操作等）
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// TOML 解析错误
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML 序列化错误
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// sprig Result 类型别名
pub type Result<T> = std::result::Result<T, SprigError>;

impl SprigError {
    /// 创建 InvalidInput 错误
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// 是否为可在菜单内直接恢复的领域错误
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Io(_) | Self::TomlParse(_) | Self::TomlSerialize(_)
        )
    }
}
