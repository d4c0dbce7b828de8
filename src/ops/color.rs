use serde_json::json;

use crate::{
    buffer::PixelBuffer,
    error::TuneResult,
    ops::{Operation, get_bool, get_f32, get_i32},
};

pub const KEY: &str = "color";

/// Recolors the RGB plane from a synthetic HSV triple while passing alpha
/// through byte-identical.
///
/// `hue` is folded into the conventional 0-179 range, `saturation` is a
/// percentage (0-200 clamped), and `value` is an absolute 0-255 brightness
/// level, so the whole RGB plane becomes one flat color.
pub struct ColorOp;

impl Operation for ColorOp {
    fn key(&self) -> &'static str {
        KEY
    }

    fn default_settings(&self) -> serde_json::Value {
        json!({
            "enabled": false,
            "hue": 0,
            "saturation": 100.0,
            "value": 127.0,
        })
    }

    fn apply(&self, buffer: &PixelBuffer, settings: &serde_json::Value) -> TuneResult<PixelBuffer> {
        if !get_bool(settings, "enabled", false) {
            return Ok(buffer.clone());
        }
        if !buffer.has_alpha() {
            return Ok(buffer.clone());
        }

        let hue = get_i32(settings, "hue", 0).clamp(-90, 90);
        let saturation = get_f32(settings, "saturation", 100.0);
        let value = get_f32(settings, "value", 127.0);

        let h = hue.rem_euclid(180) as u8;
        let s = ((saturation.clamp(0.0, 200.0) / 100.0) * 255.0)
            .round()
            .clamp(0.0, 255.0) as u8;
        let v = value.clamp(0.0, 255.0).round() as u8;

        // V is held flat at the configured level; the source luma (luma8)
        // no longer modulates it, so the whole plane collapses to one color.
        // TODO: earlier builds set V per pixel from the Rec.601 luma of the
        // source RGB; decide whether that behavior should come back.
        let (r, g, b) = hsv_to_rgb(h, s, v);

        let mut out = buffer.clone();
        for px in out.data_mut().chunks_exact_mut(4) {
            px[0] = r;
            px[1] = g;
            px[2] = b;
            // px[3] untouched: alpha passes through byte-identical.
        }
        Ok(out)
    }
}

/// Rec.601 luma reduction of an RGB triple.
pub fn luma8(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * f32::from(r) + 0.587 * f32::from(g) + 0.114 * f32::from(b);
    y.round().clamp(0.0, 255.0) as u8
}

/// HSV to RGB with H in the half-degree 0-179 range and S, V in 0-255.
fn hsv_to_rgb(h: u8, s: u8, v: u8) -> (u8, u8, u8) {
    let h_deg = f32::from(h) * 2.0;
    let s = f32::from(s) / 255.0;
    let v = f32::from(v);

    let c = v * s;
    let x = c * (1.0 - ((h_deg / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r1, g1, b1) = match (h_deg / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        (r1 + m).round().clamp(0.0, 255.0) as u8,
        (g1 + m).round().clamp(0.0, 255.0) as u8,
        (b1 + m).round().clamp(0.0, 255.0) as u8,
    )
}
