use serde_json::json;

use crate::{
    buffer::PixelBuffer,
    error::TuneResult,
    ops::{Operation, get_bool, get_f32},
};

pub const KEY: &str = "transparency";

/// Remaps the alpha channel. RGB is never touched.
///
/// Negative `alpha` fades the whole plane linearly toward zero. Positive
/// `alpha` boosts partially-transparent pixels toward opaque, with `falloff`
/// controlling how strongly low-alpha pixels resist the boost. A positive
/// `alpha_offset` then lifts every non-zero pixel, shrunk image-wide so the
/// brightest pixel lands at exactly 255 instead of clipping.
pub struct TransparencyOp;

impl Operation for TransparencyOp {
    fn key(&self) -> &'static str {
        KEY
    }

    fn default_settings(&self) -> serde_json::Value {
        json!({
            "enabled": false,
            "alpha": 0.0,
            "falloff": 1.0,
            "alpha_offset": 0.0,
        })
    }

    fn apply(&self, buffer: &PixelBuffer, settings: &serde_json::Value) -> TuneResult<PixelBuffer> {
        if !get_bool(settings, "enabled", false) {
            return Ok(buffer.clone());
        }
        if !buffer.has_alpha() {
            tracing::warn!("transparency requested on a buffer without an alpha channel");
            return Ok(buffer.clone());
        }

        let alpha_adjust = get_f32(settings, "alpha", 0.0).clamp(-100.0, 100.0);
        let falloff = get_f32(settings, "falloff", 1.0).clamp(0.01, 2.0);
        let mut alpha_offset = get_f32(settings, "alpha_offset", 0.0).clamp(0.0, 255.0);

        let mut alphas: Vec<f32> = buffer
            .data()
            .chunks_exact(4)
            .map(|px| f32::from(px[3]))
            .collect();

        if alpha_adjust < 0.0 {
            // Uniform fade-out: scale runs 1 -> 0 as alpha runs 0 -> -100.
            let scale = 1.0 + alpha_adjust / 100.0;
            for a in &mut alphas {
                *a *= scale;
            }
        } else {
            let scale = alpha_adjust / 100.0;
            for a in &mut alphas {
                let normalized = *a / 255.0;
                let boosted = normalized + (1.0 - normalized) * scale * normalized.powf(falloff);
                *a = boosted * 255.0;
            }
        }

        if alpha_offset > 0.0 {
            // Shrink the offset so the brightest pixel lands at 255 instead
            // of a whole band clipping there.
            let max_alpha = alphas.iter().copied().fold(0.0f32, f32::max);
            if max_alpha + alpha_offset > 255.0 {
                alpha_offset = 255.0 - max_alpha;
            }
            // Fully transparent pixels stay fully transparent.
            for a in &mut alphas {
                if *a > 0.0 {
                    *a += alpha_offset;
                }
            }
        }

        let mut out = buffer.clone();
        for (px, a) in out.data_mut().chunks_exact_mut(4).zip(&alphas) {
            px[3] = a.round().clamp(0.0, 255.0) as u8;
        }
        Ok(out)
    }
}
