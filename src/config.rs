pub mod range_types;

use crate::errors::{ShorelineError, ShorelineResult};
use crate::resources::RenderSettings;
use bevy::log::warn;
use std::fs;
use std::path::{Path, PathBuf};

pub fn get_config_path() -> ShorelineResult<PathBuf> {
    let mut path = dirs::config_dir().ok_or(ShorelineError::ConfigDirNotFound)?;
    path.push("shoreline");
    fs::create_dir_all(&path)?;
    path.push("config.toml");
    Ok(path)
}

/// Settings from the user config file, or defaults when it is missing or unusable
pub fn load_settings() -> RenderSettings {
    let loaded = get_config_path().and_then(|path| load_settings_from(&path));
    match loaded {
        Ok(settings) => settings,
        Err(ShorelineError::ConfigFileNotFound { .. }) => RenderSettings::default(),
        Err(e) => {
            warn!("Using default render settings: {e}");
            RenderSettings::default()
        }
    }
}

pub fn load_settings_from(path: &Path) -> ShorelineResult<RenderSettings> {
    if !path.exists() {
        return Err(ShorelineError::ConfigFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path)?;
    let settings: RenderSettings = toml::from_str(&contents)?;
    settings.validated()
}

pub fn save_settings(settings: &RenderSettings) -> ShorelineResult<()> {
    save_settings_to(&get_config_path()?, settings)
}

pub fn save_settings_to(path: &Path, settings: &RenderSettings) -> ShorelineResult<()> {
    let contents = toml::to_string_pretty(settings)?;
    fs::write(path, contents)?;
    Ok(())
}
