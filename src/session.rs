use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{
    buffer::PixelBuffer,
    codec,
    error::{TuneError, TuneResult},
    pipeline::run_pipeline,
    registry::OperationRegistry,
    settings::SettingsMap,
    store,
};

/// Suffix appended to the image path for the sidecar settings document.
pub const SETTINGS_SUFFIX: &str = ".json";

/// Suffix appended to the image path for the one-time backup copy.
pub const BACKUP_SUFFIX: &str = ".bak";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Fit,
    Actual,
    Custom,
}

/// Non-fatal findings from an `open` call, e.g. a failed backup copy.
#[derive(Debug, Default)]
pub struct OpenReport {
    pub warnings: Vec<String>,
}

/// The single active editing context: one image, one settings map, one
/// processed buffer.
///
/// `processed` is strictly a cache: it is always recomputed wholesale from
/// `original` plus the current settings, and any failure along the way
/// clears the whole session rather than leaving the two out of sync.
pub struct Session {
    registry: OperationRegistry,
    image_path: Option<PathBuf>,
    backup_path: Option<PathBuf>,
    settings_path: Option<PathBuf>,
    original: Option<PixelBuffer>,
    processed: Option<PixelBuffer>,
    settings: SettingsMap,
    display_scale: f32,
    display_mode: DisplayMode,
}

impl Session {
    pub fn new(registry: OperationRegistry) -> Self {
        Self {
            registry,
            image_path: None,
            backup_path: None,
            settings_path: None,
            original: None,
            processed: None,
            settings: SettingsMap::new(),
            display_scale: 1.0,
            display_mode: DisplayMode::Fit,
        }
    }

    /// Opens `path`, replacing the session state wholesale.
    ///
    /// Creates `<path>.bak` on the first open of a given path (never
    /// overwritten afterwards), loads the sidecar settings document if one
    /// exists, and runs the pipeline. A failed backup is reported as a
    /// warning; decode and pipeline failures clear the session and
    /// propagate.
    pub fn open(&mut self, path: &Path) -> TuneResult<OpenReport> {
        self.clear();
        let mut report = OpenReport::default();

        let backup_path = derive_path(path, BACKUP_SUFFIX);
        if path.exists() && !backup_path.exists() {
            if let Err(err) = std::fs::copy(path, &backup_path) {
                let warning = format!("could not create backup '{}': {err}", backup_path.display());
                tracing::warn!(%warning);
                report.warnings.push(warning);
            }
        }

        let original = match codec::load_image(path) {
            Ok(buffer) => buffer,
            Err(err) => {
                self.clear();
                return Err(err);
            }
        };

        let settings_path = derive_path(path, SETTINGS_SUFFIX);
        let settings = store::load_settings(&settings_path);

        let processed = match run_pipeline(&original, &settings, &self.registry) {
            Ok(buffer) => buffer,
            Err(err) => {
                self.clear();
                return Err(err);
            }
        };

        self.image_path = Some(path.to_path_buf());
        self.backup_path = backup_path.exists().then_some(backup_path);
        self.settings_path = Some(settings_path);
        self.original = Some(original);
        self.processed = Some(processed);
        self.settings = settings;
        self.display_mode = DisplayMode::Fit;
        self.display_scale = 1.0;

        Ok(report)
    }

    /// Stores one operation's settings fragment and re-runs the pipeline.
    pub fn apply_setting(
        &mut self,
        key: &str,
        fragment: serde_json::Value,
    ) -> TuneResult<&PixelBuffer> {
        if !self.is_loaded() {
            return Err(TuneError::session("no image loaded"));
        }
        self.settings.insert(key, fragment);
        self.reprocess()?;
        self.processed
            .as_ref()
            .ok_or_else(|| TuneError::session("no processed image"))
    }

    /// Replaces the whole settings map (e.g. loaded from an arbitrary path)
    /// and re-runs the pipeline. The session's sidecar settings path is not
    /// changed.
    pub fn load_settings_from(&mut self, path: &Path) -> TuneResult<&PixelBuffer> {
        if !self.is_loaded() {
            return Err(TuneError::session("no image loaded"));
        }
        self.settings = store::load_settings(path);
        self.reprocess()?;
        self.processed
            .as_ref()
            .ok_or_else(|| TuneError::session("no processed image"))
    }

    /// Writes the processed image and its settings document.
    ///
    /// With no explicit path this saves in place. Saving to a different
    /// path writes both files there and then fully reopens the new path,
    /// re-deriving backup and settings paths from the new location.
    pub fn save(&mut self, path: Option<&Path>) -> TuneResult<()> {
        let image_path = self
            .image_path
            .clone()
            .ok_or_else(|| TuneError::session("no image to save"))?;
        let processed = self
            .processed
            .as_ref()
            .ok_or_else(|| TuneError::session("no processed image to save"))?;

        let target = path.unwrap_or(&image_path).to_path_buf();
        codec::save_image(&target, processed)?;
        store::save_settings(&derive_path(&target, SETTINGS_SUFFIX), &self.settings)?;

        if target != image_path {
            self.open(&target)?;
        }
        Ok(())
    }

    /// Writes only the settings document, to `path` or the sidecar path.
    pub fn save_settings(&self, path: Option<&Path>) -> TuneResult<()> {
        let sidecar = self
            .settings_path
            .as_deref()
            .ok_or_else(|| TuneError::session("no image loaded to save settings for"))?;
        store::save_settings(path.unwrap_or(sidecar), &self.settings)
    }

    /// Restores the image file from its `.bak` copy and reopens it.
    pub fn reset(&mut self) -> TuneResult<OpenReport> {
        let image_path = self
            .image_path
            .clone()
            .ok_or_else(|| TuneError::session("no image loaded"))?;
        let backup_path = self
            .backup_path
            .clone()
            .filter(|p| p.exists())
            .ok_or_else(|| TuneError::backup("no backup available"))?;

        std::fs::copy(&backup_path, &image_path).map_err(|err| {
            TuneError::backup(format!("restore '{}': {err}", image_path.display()))
        })?;
        self.open(&image_path)
    }

    /// Resets to the no-image state.
    pub fn clear(&mut self) {
        self.image_path = None;
        self.backup_path = None;
        self.settings_path = None;
        self.original = None;
        self.processed = None;
        self.settings = SettingsMap::new();
        self.display_scale = 1.0;
        self.display_mode = DisplayMode::Fit;
    }

    fn reprocess(&mut self) -> TuneResult<()> {
        let Some(original) = &self.original else {
            self.processed = None;
            return Ok(());
        };
        match run_pipeline(original, &self.settings, &self.registry) {
            Ok(buffer) => {
                self.processed = Some(buffer);
                Ok(())
            }
            Err(err) => {
                self.clear();
                Err(err)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.original.is_some()
    }

    pub fn original(&self) -> Option<&PixelBuffer> {
        self.original.as_ref()
    }

    pub fn processed(&self) -> Option<&PixelBuffer> {
        self.processed.as_ref()
    }

    pub fn settings(&self) -> &SettingsMap {
        &self.settings
    }

    pub fn image_path(&self) -> Option<&Path> {
        self.image_path.as_deref()
    }

    pub fn backup_path(&self) -> Option<&Path> {
        self.backup_path.as_deref()
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    /// File name of the current image, for window titles and save dialogs.
    pub fn image_file_name(&self) -> String {
        self.image_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled.png".to_string())
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn display_scale(&self) -> f32 {
        self.display_scale
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if !self.is_loaded() {
            return;
        }
        self.display_mode = mode;
        if mode == DisplayMode::Actual {
            self.display_scale = 1.0;
        }
    }

    pub fn zoom_in(&mut self) {
        if !self.is_loaded() {
            return;
        }
        self.display_mode = DisplayMode::Custom;
        self.display_scale *= 1.25;
    }

    pub fn zoom_out(&mut self) {
        if !self.is_loaded() {
            return;
        }
        self.display_mode = DisplayMode::Custom;
        self.display_scale /= 1.25;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(OperationRegistry::with_builtins())
    }
}

/// `<path> + suffix`, keeping the original extension in place
/// (`img.png` -> `img.png.bak`).
fn derive_path(path: &Path, suffix: &str) -> PathBuf {
    let mut os = OsString::from(path.as_os_str());
    os.push(suffix);
    PathBuf::from(os)
}
