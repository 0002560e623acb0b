// Panel geometry, sizing constants and window filtering rules
use crate::errors::{PreviewError, PreviewResult};
use crate::window::info::Size;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Width:height ratio used for slots that have no live content size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub num: i32,
    pub den: i32,
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self { num: 4, den: 3 }
    }
}

impl AspectRatio {
    pub fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// Parse "16:9" style strings
    pub fn parse(value: &str) -> Option<Self> {
        let (num, den) = value.split_once(':')?;
        let num = num.trim().parse::<i32>().ok()?;
        let den = den.trim().parse::<i32>().ok()?;
        if num > 0 && den > 0 {
            Some(Self { num, den })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Height of the thumbnail row in pixels
    pub preview_height: i32,
    /// Height of the selector row above the thumbnails
    pub drop_height: i32,
    /// Fallback aspect ratio for slots without a live source size
    pub aspect: AspectRatio,
    /// Hard upper bound on the number of slots
    pub capacity: usize,
    /// Slot count used when no settings were persisted
    pub default_slot_count: usize,
    /// Interval of the passive refresh tick
    pub tick_interval_ms: u64,
    /// Skip windows that have an owner window
    pub exclude_owned_windows: bool,
    /// Windows whose title contains any of these are never offered
    pub excluded_title_substrings: Vec<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            preview_height: 300,
            drop_height: 25,
            aspect: AspectRatio::default(),
            capacity: 32,
            default_slot_count: 3,
            tick_interval_ms: 500,
            exclude_owned_windows: false,
            excluded_title_substrings: default_excluded_substrings(),
        }
    }
}

fn default_excluded_substrings() -> Vec<String> {
    [
        // Korean shell surfaces
        "설정",
        "Windows 입력",
        "팝업 호스트",
        "위젯",
        "작업 전환",
        // English shell surfaces
        "Windows Input Experience",
        "Popup Host",
        "Widgets",
        "Task Switching",
        "Program Manager",
        "GeForce Overlay",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl PanelConfig {
    /// Load configuration from file
    pub fn load_from_file(path: &str) -> PreviewResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: PanelConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &str) -> PreviewResult<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(height) = std::env::var("WINVIEW_PREVIEW_HEIGHT") {
            if let Ok(height) = height.parse::<i32>() {
                config.preview_height = height;
            }
        }
        if let Ok(capacity) = std::env::var("WINVIEW_SLOT_CAPACITY") {
            if let Ok(capacity) = capacity.parse::<usize>() {
                config.capacity = capacity;
            }
        }
        if let Ok(tick) = std::env::var("WINVIEW_TICK_MS") {
            if let Ok(tick) = tick.parse::<u64>() {
                config.tick_interval_ms = tick;
            }
        }
        if let Ok(aspect) = std::env::var("WINVIEW_ASPECT") {
            if let Some(aspect) = AspectRatio::parse(&aspect) {
                config.aspect = aspect;
            }
        }
        if let Ok(owned) = std::env::var("WINVIEW_EXCLUDE_OWNED") {
            config.exclude_owned_windows = owned.to_lowercase() == "true";
        }

        config
    }

    /// Validate configuration values
    pub fn validate(&self) -> PreviewResult<()> {
        if self.preview_height <= 0 || self.drop_height < 0 {
            return Err(PreviewError::Config(
                "preview height must be positive".to_string(),
            ));
        }
        if self.aspect.num <= 0 || self.aspect.den <= 0 {
            return Err(PreviewError::Config(format!(
                "aspect ratio {}:{} must have positive terms",
                self.aspect.num, self.aspect.den
            )));
        }
        if self.preview_height.checked_add(self.drop_height).is_none() {
            return Err(PreviewError::Config(format!(
                "panel height {} + {} does not fit",
                self.drop_height, self.preview_height
            )));
        }
        let fallback_width = self.fallback_width();
        if fallback_width < 1 || fallback_width > i32::MAX as i64 {
            return Err(PreviewError::Config(format!(
                "aspect ratio {}:{} at height {} gives an unusable fallback width {}",
                self.aspect.num, self.aspect.den, self.preview_height, fallback_width
            )));
        }
        if self.capacity == 0 {
            return Err(PreviewError::Config("capacity must be positive".to_string()));
        }
        if self.default_slot_count == 0 || self.default_slot_count > self.capacity {
            return Err(PreviewError::Config(format!(
                "default slot count {} must be within 1..={}",
                self.default_slot_count, self.capacity
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(PreviewError::Config(
                "tick interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Size of a slot whose content size cannot be determined
    pub fn fallback_size(&self) -> Size {
        let width = self.fallback_width().clamp(0, i32::MAX as i64) as i32;
        Size::new(width, self.preview_height)
    }

    fn fallback_width(&self) -> i64 {
        if self.aspect.den == 0 {
            return 0;
        }
        self.preview_height as i64 * self.aspect.num as i64 / self.aspect.den as i64
    }

    /// Client height of the whole panel
    pub fn panel_height(&self) -> i32 {
        self.drop_height + self.preview_height
    }

    /// Number of fallback-sized slots that fit on a screen, bounded by `capacity`
    pub fn effective_capacity(&self, screen_width: i32) -> usize {
        let fallback = self.fallback_size().width.max(1);
        let fitting = (screen_width / fallback).max(1) as usize;
        fitting.min(self.capacity).max(1)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
