//! 分发器配置。
//!
//! 配置以 TOML 提供，例如：
//!
//! ```toml
//! pretty_json = true
//! fallback_format = "yaml"
//! preview_limit = 32
//! ```
//!
//! 嗅探窗口长度是固定常量，不在配置范围内。

use serde::{Deserialize, Serialize};
use sniff_core::{FormatId, PREVIEW_LIMIT};

use crate::error::ContentError;

/// [`FormatRegistry`](crate::FormatRegistry) 的可调项。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySettings {
    /// JSON 写出是否带缩进。
    pub pretty_json: bool,
    /// 无法判定格式时改用的格式名称；为空则直接报错。
    pub fallback_format: Option<String>,
    /// 嗅探失败时错误信息中最多渲染的输入单元数。
    pub preview_limit: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            pretty_json: false,
            fallback_format: None,
            preview_limit: PREVIEW_LIMIT,
        }
    }
}

impl RegistrySettings {
    /// 解析 TOML 配置，并校验其中的格式名称。
    pub fn from_toml_str(source: &str) -> Result<Self, ContentError> {
        let settings: RegistrySettings =
            toml::from_str(source).map_err(|err| ContentError::Settings {
                detail: err.to_string(),
            })?;
        settings.fallback()?;
        Ok(settings)
    }

    /// 解析后的回退格式。
    ///
    /// 名称不在封闭集合内时返回 [`ContentError::UnrecognizedFormat`]。
    pub fn fallback(&self) -> Result<Option<FormatId>, ContentError> {
        self.fallback_format
            .as_deref()
            .map(str::parse::<FormatId>)
            .transpose()
            .map_err(ContentError::from)
    }
}
