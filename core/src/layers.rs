//! VIIRS layer allow-list

use crate::error::CommandError;

/// Layers the analysis process knows how to check.
pub const VIIRS_LAYERS: [&str; 3] = [
    "VIIRS_SNPP_CorrectedReflectance_TrueColor",
    "VIIRS_SNPP_CorrectedReflectance_BandsM3-I3-M11",
    "VIIRS_SNPP_CorrectedReflectance_BandsM11-I2-I1",
];

/// Check an optional layer token against [`VIIRS_LAYERS`].
///
/// `None` is accepted and means every layer. Matching is exact.
pub fn validate_layer(layer: Option<&str>) -> Result<Option<String>, CommandError> {
    match layer {
        None => Ok(None),
        Some(name) if VIIRS_LAYERS.contains(&name) => Ok(Some(name.to_string())),
        Some(name) => Err(CommandError::InvalidLayer {
            layer: name.to_string(),
        }),
    }
}

/// `"A", "B", or "C"` rendering of the allow-list for help text.
pub fn quoted_layer_list() -> String {
    let quoted: Vec<String> = VIIRS_LAYERS.iter().map(|l| format!("\"{}\"", l)).collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_layers_accepted() {
        for layer in VIIRS_LAYERS {
            assert_eq!(validate_layer(Some(layer)).unwrap(), Some(layer.to_string()));
        }
    }

    #[test]
    fn test_absent_layer_means_all() {
        assert_eq!(validate_layer(None).unwrap(), None);
    }

    #[test]
    fn test_unknown_layers_rejected() {
        for layer in [
            "BadLayerName",
            "viirs_snpp_correctedreflectance_truecolor",
            "VIIRS_SNPP_CorrectedReflectance_TrueColor ",
            "",
        ] {
            assert!(matches!(
                validate_layer(Some(layer)),
                Err(CommandError::InvalidLayer { .. })
            ));
        }
    }

    #[test]
    fn test_quoted_layer_list() {
        assert_eq!(
            quoted_layer_list(),
            "\"VIIRS_SNPP_CorrectedReflectance_TrueColor\", \
             \"VIIRS_SNPP_CorrectedReflectance_BandsM3-I3-M11\", or \
             \"VIIRS_SNPP_CorrectedReflectance_BandsM11-I2-I1\""
        );
    }
}
