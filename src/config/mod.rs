// Configuration: tunable panel geometry and the persisted settings record

pub mod panel_config;
pub mod settings;

pub use panel_config::{AspectRatio, PanelConfig};
pub use settings::{default_store, JsonSettingsStore, NullSettingsStore, Settings, SettingsStore};
