use std::path::Path;

use crate::{
    error::{TuneError, TuneResult},
    settings::SettingsMap,
};

/// Loads a settings document, degrading to an empty map.
///
/// A missing file, an empty file, and a parse failure all yield an empty
/// `SettingsMap` so the caller can keep working with defaults; parse and
/// read failures are logged, never raised.
pub fn load_settings(path: &Path) -> SettingsMap {
    if !path.exists() {
        return SettingsMap::new();
    }

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to read settings file");
            return SettingsMap::new();
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return SettingsMap::new();
    }

    match serde_json::from_slice(&bytes) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to parse settings file, using defaults");
            SettingsMap::new()
        }
    }
}

/// Writes a settings document, overwriting any existing file.
///
/// Entries are emitted in the map's insertion order. Failures are logged and
/// returned so callers can decide whether to surface them.
pub fn save_settings(path: &Path, settings: &SettingsMap) -> TuneResult<()> {
    let text = serde_json::to_string_pretty(settings)
        .map_err(|err| TuneError::settings(format!("serialize settings: {err}")))?;

    if let Err(err) = std::fs::write(path, text) {
        tracing::warn!(path = %path.display(), %err, "failed to write settings file");
        return Err(TuneError::settings(format!(
            "write '{}': {err}",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "alphatune_store_{name}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn missing_file_yields_empty_map() {
        let settings = load_settings(Path::new("no/such/settings.json"));
        assert!(settings.is_empty());
    }

    #[test]
    fn empty_file_yields_empty_map() {
        let path = temp_path("empty.json");
        std::fs::write(&path, "  \n").unwrap();
        assert!(load_settings(&path).is_empty());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn corrupt_file_yields_empty_map() {
        let path = temp_path("corrupt.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_settings(&path).is_empty());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path("roundtrip.json");
        let mut settings = SettingsMap::new();
        settings.insert(
            "transparency",
            serde_json::json!({ "enabled": true, "alpha": -25.0 }),
        );
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path), settings);
        std::fs::remove_file(&path).unwrap();
    }
}
