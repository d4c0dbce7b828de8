use crate::{
    buffer::PixelBuffer, error::TuneResult, registry::OperationRegistry, settings::SettingsMap,
};

/// Applies every registered operation whose key appears in `settings`, in
/// registry order, to a running copy of `original`.
///
/// Operations absent from the settings map are skipped outright, not applied
/// with defaults, so an empty map yields a plain copy of the input. The
/// original is never mutated; each run recomputes from it wholesale.
///
/// The two built-in operations happen to commute on the alpha channel
/// (color passes alpha through untouched), but the sequencing is still part
/// of the contract for any future operation that reads RGB and alpha
/// jointly.
#[tracing::instrument(skip_all, fields(ops = registry.len(), keys = settings.len()))]
pub fn run_pipeline(
    original: &PixelBuffer,
    settings: &SettingsMap,
    registry: &OperationRegistry,
) -> TuneResult<PixelBuffer> {
    let mut current = original.clone();
    for op in registry.iter() {
        if let Some(fragment) = settings.get(op.key()) {
            current = op.apply(&current, fragment)?;
        }
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::Operation;
    use serde_json::json;

    #[test]
    fn empty_settings_is_identity() {
        let original = PixelBuffer::filled(4, 4, [10, 20, 30, 40]);
        let registry = OperationRegistry::with_builtins();
        let out = run_pipeline(&original, &SettingsMap::new(), &registry).unwrap();
        assert_eq!(out, original);
    }

    #[test]
    fn absent_key_skips_operation_entirely() {
        let original = PixelBuffer::filled(4, 4, [10, 20, 30, 40]);
        let registry = OperationRegistry::with_builtins();

        let mut settings = SettingsMap::new();
        settings.insert("color", json!({ "enabled": true, "saturation": 0.0 }));

        let out = run_pipeline(&original, &settings, &registry).unwrap();
        // Color ran, transparency did not.
        assert!(out.alphas().all(|a| a == 40));
        assert_eq!(&out.data()[..3], [127, 127, 127]);
    }

    #[test]
    fn run_matches_manual_chain_in_registry_order() {
        let original = PixelBuffer::filled(3, 3, [200, 40, 40, 180]);
        let registry = OperationRegistry::with_builtins();

        let transparency = json!({ "enabled": true, "alpha": -50.0 });
        let color = json!({ "enabled": true, "hue": 60, "value": 255.0 });

        let mut settings = SettingsMap::new();
        settings.insert("transparency", transparency.clone());
        settings.insert("color", color.clone());

        let piped = run_pipeline(&original, &settings, &registry).unwrap();

        let step1 = crate::ops::TransparencyOp
            .apply(&original, &transparency)
            .unwrap();
        let step2 = crate::ops::ColorOp.apply(&step1, &color).unwrap();
        assert_eq!(piped, step2);
    }

    #[test]
    fn settings_map_order_does_not_affect_application_order() {
        let original = PixelBuffer::filled(2, 2, [90, 90, 90, 200]);
        let registry = OperationRegistry::with_builtins();

        let mut forward = SettingsMap::new();
        forward.insert("transparency", json!({ "enabled": true, "alpha": -50.0 }));
        forward.insert("color", json!({ "enabled": true }));

        let mut reversed = SettingsMap::new();
        reversed.insert("color", json!({ "enabled": true }));
        reversed.insert("transparency", json!({ "enabled": true, "alpha": -50.0 }));

        assert_eq!(
            run_pipeline(&original, &forward, &registry).unwrap(),
            run_pipeline(&original, &reversed, &registry).unwrap()
        );
    }

    #[test]
    fn original_is_never_mutated() {
        let original = PixelBuffer::filled(2, 2, [1, 2, 3, 200]);
        let pristine = original.clone();
        let registry = OperationRegistry::with_builtins();

        let mut settings = SettingsMap::new();
        settings.insert("transparency", json!({ "enabled": true, "alpha": -100.0 }));

        let _ = run_pipeline(&original, &settings, &registry).unwrap();
        assert_eq!(original, pristine);
    }
}
