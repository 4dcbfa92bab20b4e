use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::model::{Project, Workspace};
use crate::storage::{config::Config, tasks};

/// 应用状态：Workspace 和它的数据文件
///
/// 菜单和一次性命令都通过它访问任务，不存在进程级全局状态。
#[derive(Debug)]
pub struct App {
    pub workspace: Workspace,
    /// 数据文件路径
    data_path: PathBuf,
    /// 退出时是否自动保存
    autosave: bool,
    /// 自上次保存后是否有改动
    dirty: bool,
}

impl App {
    /// 从数据文件加载
    pub fn load(data_path: PathBuf, config: &Config) -> Result<Self> {
        let workspace = tasks::load_workspace(&data_path, config.history.max_depth)?;
        Ok(Self::with_workspace(
            workspace,
            data_path,
            config.storage.autosave,
        ))
    }

    pub fn with_workspace(workspace: Workspace, data_path: PathBuf, autosave: bool) -> Self {
        Self {
            workspace,
            data_path,
            autosave,
            dirty: false,
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn autosave(&self) -> bool {
        self.autosave
    }

    pub fn set_autosave(&mut self, autosave: bool) {
        self.autosave = autosave;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 当前项目（可变），并标记为有改动
    pub fn project_mut(&mut self) -> &mut Project {
        self.dirty = true;
        self.workspace.current_mut()
    }

    /// 标记为有改动（项目增删、切换）
    pub fn touch(&mut self) {
        self.dirty = true;
    }

    /// 保存到数据文件
    pub fn save(&mut self) -> Result<()> {
        tasks::save_workspace(&self.data_path, &self.workspace)?;
        self.dirty = false;
        info!(path = %self.data_path.display(), "saved");
        Ok(())
    }

    /// 开启 autosave 且有改动时保存；返回是否写入了文件
    pub fn autosave_if_dirty(&mut self) -> Result<bool> {
        if self.autosave && self.dirty {
            self.save()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
