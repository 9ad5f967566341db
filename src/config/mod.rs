//! Generator configuration: settings model, builder, validation and settings files

pub mod builder;
pub mod file;
pub mod settings;
pub mod validation;

pub use builder::GeneratorSettingsBuilder;
pub use file::{ConfigError, SETTINGS_EXTENSION, load_settings_file};
pub use settings::*;
pub use validation::{ConfigWarning, ValidatedSettings, validate};
