use crate::limits::{Bounds, BreakFlow, Limits, Variant};
use crate::task::{AccentColor, Task};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub task: TaskConfig,
    #[serde(default, rename = "break")]
    pub break_: BreakConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "GeneralConfig::default_variant")]
    pub variant: Variant,
    /// Countdown tick interval. One tick takes one second off the clock.
    #[serde(default = "GeneralConfig::default_tick")]
    pub tick_ms: u64,
    /// How long the delete button must be held to confirm.
    #[serde(default = "GeneralConfig::default_hold")]
    pub hold_ms: u64,
}

impl GeneralConfig {
    fn default_variant() -> Variant { Variant::Stack }
    fn default_tick() -> u64 { 1000 }
    fn default_hold() -> u64 { 600 }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Stack,
            tick_ms: 1000,
            hold_ms: 600,
        }
    }
}

/// Task rules. Unset bounds fall back to the variant preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consume_on_finish: Option<bool>,
    #[serde(default = "TaskConfig::default_name")]
    pub default_name: String,
    #[serde(default = "TaskConfig::default_minutes")]
    pub default_minutes: u32,
    #[serde(default = "TaskConfig::default_emoji")]
    pub default_emoji: String,
    #[serde(default = "TaskConfig::default_color")]
    pub default_color: AccentColor,
}

impl TaskConfig {
    fn default_name() -> String { Task::default().name }
    fn default_minutes() -> u32 { Task::default().duration_minutes }
    fn default_emoji() -> String { Task::default().emoji }
    fn default_color() -> AccentColor { Task::default().color }
}

impl Default for TaskConfig {
    fn default() -> Self {
        let task = Task::default();
        Self {
            min_minutes: None,
            max_minutes: None,
            step_minutes: None,
            consume_on_finish: None,
            default_name: task.name,
            default_minutes: task.duration_minutes,
            default_emoji: task.emoji,
            default_color: task.color,
        }
    }
}

/// Break rules. Unset fields fall back to the variant preset.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BreakConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<BreakFlow>,
}

impl Config {
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stacktimer")
    }

    /// STACKTIMER_CONFIG overrides the default location.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("STACKTIMER_CONFIG") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "parsing config TOML")
    }

    /// The variant preset with every configured override applied.
    pub fn limits(&self) -> Limits {
        let mut limits = self.general.variant.limits();

        let task_min = self.task.min_minutes.unwrap_or(limits.task.min).max(1);
        let task_max = self
            .task
            .max_minutes
            .or(limits.task.max)
            .unwrap_or(u32::MAX)
            .max(task_min);
        limits.task = Bounds::new(task_min, task_max);
        if let Some(step) = self.task.step_minutes {
            limits.task_step = step.max(1);
        }
        if let Some(consume) = self.task.consume_on_finish {
            limits.consume_on_finish = consume;
        }

        let break_min = self.break_.min_minutes.unwrap_or(limits.break_bounds.min).max(1);
        let break_max = self
            .break_
            .max_minutes
            .or(limits.break_bounds.max)
            .map(|max| max.max(break_min));
        limits.break_bounds = Bounds { min: break_min, max: break_max };
        if let Some(step) = self.break_.step_minutes {
            limits.break_step = step.max(1);
        }
        if let Some(flow) = self.break_.flow {
            limits.break_flow = flow;
        }
        let break_default = self.break_.default_minutes.unwrap_or(limits.break_default);
        limits.break_default = limits.break_bounds.clamp(break_default);

        limits
    }

    /// The task installed at start-up and by "add task" from the empty state.
    pub fn default_task(&self) -> Task {
        Task {
            name: self.task.default_name.clone(),
            duration_minutes: self.limits().task.clamp(self.task.default_minutes),
            emoji: self.task.default_emoji.clone(),
            color: self.task.default_color,
        }
    }
}
