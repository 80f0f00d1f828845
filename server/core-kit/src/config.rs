use anyhow::{Result, anyhow};
use std::path::Path;

use serde::Deserialize;

use crate::{error::GestureError, gesture::Button, inner_const};

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub enum LogLevel {
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// 每个设备选用的提取方式，两者不能共用同一份记忆
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
pub enum ExtractionMode {
    /// 完整的多指手势
    #[serde(rename = "gestures")]
    Gestures,
    /// 单指模拟鼠标
    #[serde(rename = "simple-pointer")]
    SimplePointer,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GestureConfig {
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "default_mode")]
    pub mode: ExtractionMode,
    /// 同时跟踪的触控点上限，tracking_id 必须小于该值
    #[serde(default = "default_max_identities")]
    pub max_identities: usize,
    /// 去抖动滤波的重置阈值（距离平方）
    #[serde(default = "default_jitter_reset")]
    pub jitter_reset_dist2: i32,
    #[serde(default = "default_button_hold_ms")]
    pub button_hold_ms: u64,
    #[serde(default = "default_thumb_ms")]
    pub thumb_ms: u64,
    #[serde(default = "default_tap_timeout_ms")]
    pub tap_timeout_ms: u64,
    /// 压力不小于该值的触控点视为拇指，不配置则不识别拇指
    #[serde(default)]
    pub thumb_pressure: Option<u32>,
    /// 第 n 项为 n 指按下时对应的按键
    #[serde(default = "default_button_map")]
    pub button_map: Vec<Button>,
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_mode() -> ExtractionMode {
    ExtractionMode::Gestures
}

fn default_max_identities() -> usize {
    inner_const::MAX_IDENTITIES
}

fn default_jitter_reset() -> i32 {
    inner_const::JITTER_RESET_DIST2
}

fn default_button_hold_ms() -> u64 {
    inner_const::BUTTON_HOLD_MS
}

fn default_thumb_ms() -> u64 {
    inner_const::FINGER_THUMB_MS
}

fn default_tap_timeout_ms() -> u64 {
    inner_const::TAP_TIMEOUT_MS
}

fn default_button_map() -> Vec<Button> {
    vec![Button::Left, Button::Right, Button::Middle]
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            mode: default_mode(),
            max_identities: default_max_identities(),
            jitter_reset_dist2: default_jitter_reset(),
            button_hold_ms: default_button_hold_ms(),
            thumb_ms: default_thumb_ms(),
            tap_timeout_ms: default_tap_timeout_ms(),
            thumb_pressure: None,
            button_map: default_button_map(),
        }
    }
}

impl GestureConfig {
    pub fn from(file_path: &impl AsRef<Path>) -> Result<Self> {
        let config_path = Path::new(file_path.as_ref());
        let ext = config_path.extension().and_then(|e| e.to_str());
        if ![Some("yaml"), Some("yml")].contains(&ext) {
            return Err(anyhow!(GestureError::UnsupportedConfig(
                config_path.to_path_buf()
            )));
        }
        if !config_path.exists() {
            return Err(anyhow!(GestureError::ConfigNotFound(
                config_path.to_path_buf()
            )));
        }
        let config_path = if config_path.is_relative() {
            config_path.canonicalize()?
        } else {
            config_path.to_path_buf()
        };
        let config: GestureConfig = config::Config::builder()
            .add_source(config::File::from(config_path))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GestureError> {
        if self.max_identities == 0 || self.max_identities > inner_const::IDENTITY_LIMIT {
            return Err(GestureError::InvalidConfig {
                field: "max_identities",
                reason: format!(
                    "must be within 1..={}, got {}",
                    inner_const::IDENTITY_LIMIT,
                    self.max_identities
                ),
            });
        }
        if self.jitter_reset_dist2 < 0 {
            return Err(GestureError::InvalidConfig {
                field: "jitter_reset_dist2",
                reason: format!("must not be negative, got {}", self.jitter_reset_dist2),
            });
        }
        Ok(())
    }

    /// 按下手指数量对应的按键，超出映射范围时返回 None
    pub fn button_for_pointing(&self, count: usize) -> Option<Button> {
        count
            .checked_sub(1)
            .and_then(|index| self.button_map.get(index))
            .copied()
    }
}
