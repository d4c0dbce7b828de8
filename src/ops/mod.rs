pub mod color;
pub mod transparency;

pub use color::ColorOp;
pub use transparency::TransparencyOp;

use crate::{buffer::PixelBuffer, error::TuneResult};

/// A named, settings-driven pixel transform.
///
/// Implementations are stateless between calls: `apply` is a pure function
/// of the buffer and the settings fragment, never mutates its input, and
/// returns the input unchanged when the fragment is disabled/absent or the
/// buffer carries no alpha channel.
pub trait Operation {
    /// Stable identifier, used as the key into the settings map.
    fn key(&self) -> &'static str;

    /// The fragment an untouched control surface would produce.
    fn default_settings(&self) -> serde_json::Value;

    fn apply(&self, buffer: &PixelBuffer, settings: &serde_json::Value) -> TuneResult<PixelBuffer>;
}

/// Fragment field getters. Fragments come from hand-editable sidecar files,
/// so a missing or ill-typed field falls back to the operation's default
/// rather than failing the whole pipeline. Unknown keys are simply never
/// asked for.
pub(crate) fn get_bool(fragment: &serde_json::Value, key: &str, default: bool) -> bool {
    fragment
        .get(key)
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(default)
}

pub(crate) fn get_f32(fragment: &serde_json::Value, key: &str, default: f32) -> f32 {
    fragment
        .get(key)
        .and_then(serde_json::Value::as_f64)
        .map(|v| v as f32)
        .unwrap_or(default)
}

pub(crate) fn get_i32(fragment: &serde_json::Value, key: &str, default: i32) -> i32 {
    fragment
        .get(key)
        .and_then(serde_json::Value::as_i64)
        .map(|v| v as i32)
        .unwrap_or(default)
}
