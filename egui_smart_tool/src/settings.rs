//! 设置文件模块
//!
//! 区域尺寸、当前工具和编辑模式的保存与加载（JSON）。

use crate::edit_mode::EditMode;
use crate::tool::ExplicitTool;
use crate::zone::ZoneConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmartToolSettings {
    pub zones: ZoneConfig,
    pub tool: ExplicitTool,
    pub edit_mode: EditMode,
}

impl SmartToolSettings {
    /// 保存设置到指定路径，父目录不存在时自动创建
    pub fn save_to_path(&self, path: &Path) -> Result<(), io::Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json_content = serde_json::to_string_pretty(self)?;
        fs::write(path, json_content)?;
        Ok(())
    }

    /// 从指定路径加载设置，缺失的字段使用默认值
    pub fn load_from_path(path: &Path) -> Result<Self, io::Error> {
        let json_content = fs::read_to_string(path)?;
        serde_json::from_str(&json_content).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("JSON parse error: {}", e))
        })
    }
}
