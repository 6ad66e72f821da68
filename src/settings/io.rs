// src/settings/io.rs
// Settings file in the per-user config dir, e.g.
// `~/.config/aquagriddigitizer/settings.json` on Linux.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use bevy::log::{info, warn};
use directories_next::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "Aquagrid";
const APPLICATION: &str = "AquagridDigitizer";
const SETTINGS_FILE: &str = "settings.json";

pub fn settings_path() -> io::Result<PathBuf> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "no home directory for settings"))
}

/// Reads settings, or their defaults when nothing has been saved yet.
/// A file that is not valid JSON for `T` is an `InvalidData` error.
pub fn load_settings_from_file<T: DeserializeOwned + Default>() -> io::Result<T> {
    read_settings(&settings_path()?)
}

pub fn save_settings_to_file<T: Serialize>(settings: &T) -> io::Result<()> {
    write_settings(&settings_path()?, settings)
}

fn read_settings<T: DeserializeOwned + Default>(path: &Path) -> io::Result<T> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Settings: nothing saved at {}, starting from defaults", path.display());
            return Ok(T::default());
        }
        Err(e) => return Err(e),
    };
    let settings = serde_json::from_str(&text).map_err(|e| {
        warn!("Settings: {} is not usable ({})", path.display(), e);
        io::Error::new(ErrorKind::InvalidData, e)
    })?;
    info!("Settings: read {}", path.display());
    Ok(settings)
}

// Staged next to the target, then renamed over it. The file is never truncated.
fn write_settings<T: Serialize>(path: &Path, settings: &T) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(io::Error::other)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, json)?;
    fs::rename(&staging, path)?;
    info!("Settings: wrote {}", path.display());
    Ok(())
}
