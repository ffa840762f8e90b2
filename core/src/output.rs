//! Analysis output parsing
//!
//! Each stdout line is classified by prefix/content, first rule wins:
//! 1. `https:` prefix -> image URL
//! 2. `VIIRS_SNPP` prefix -> layer name
//! 3. contains `MISCOLOR` -> miscolor note
//! 4. anything else -> missing-data note
//!
//! Within a category the last line wins. Rule 4 catches every leftover line,
//! blank ones included, so stray output can replace a real missing-data note.

use tracing::debug;

use crate::types::AnalysisResult;

const URL_PREFIX: &str = "https:";
const LAYER_PREFIX: &str = "VIIRS_SNPP";
const MISCOLOR_MARKER: &str = "MISCOLOR";

/// Category a single output line falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    ImageUrl,
    LayerName,
    Miscolor,
    MissingData,
}

/// Classify one line of analysis output.
pub fn classify_line(line: &str) -> LineKind {
    if line.starts_with(URL_PREFIX) {
        LineKind::ImageUrl
    } else if line.starts_with(LAYER_PREFIX) {
        LineKind::LayerName
    } else if line.contains(MISCOLOR_MARKER) {
        LineKind::Miscolor
    } else {
        LineKind::MissingData
    }
}

/// Build an [`AnalysisResult`] from the analysis output lines.
pub fn parse_output<S: AsRef<str>>(lines: &[S]) -> AnalysisResult {
    let mut result = AnalysisResult::default();

    for line in lines {
        let line = line.as_ref();
        match classify_line(line) {
            LineKind::ImageUrl => result.image_url = line.to_string(),
            LineKind::LayerName => result.layer_name = line.to_string(),
            LineKind::Miscolor => result.miscolor_note = line.to_string(),
            LineKind::MissingData => {
                if !result.missing_data_note.is_empty() && result.missing_data_note != line {
                    debug!(
                        previous = %result.missing_data_note,
                        replacement = %line,
                        "Unclassified line overwrites missing-data note"
                    );
                }
                result.missing_data_note = line.to_string();
            }
        }
    }

    result
}

/// Split raw stdout into lines: trim the whole buffer, split on `\n`, and
/// trim each line. Interior blank lines are kept.
pub fn split_output(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('\n').map(|l| l.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_four_fields() {
        let result = parse_output(&[
            "https://example.com/img.png",
            "VIIRS_SNPP_CorrectedReflectance_TrueColor",
            "MISCOLOR detected",
            "no data found",
        ]);
        assert_eq!(
            result,
            AnalysisResult {
                layer_name: "VIIRS_SNPP_CorrectedReflectance_TrueColor".into(),
                image_url: "https://example.com/img.png".into(),
                miscolor_note: "MISCOLOR detected".into(),
                missing_data_note: "no data found".into(),
            }
        );
    }

    #[test]
    fn test_last_url_wins() {
        let result = parse_output(&["https://a.example/1.png", "https://b.example/2.png"]);
        assert_eq!(result.image_url, "https://b.example/2.png");
    }

    #[test]
    fn test_precedence_of_rules() {
        // URL beats MISCOLOR, layer prefix beats MISCOLOR.
        assert_eq!(classify_line("https://x/MISCOLOR.png"), LineKind::ImageUrl);
        assert_eq!(classify_line("VIIRS_SNPP MISCOLOR"), LineKind::LayerName);
        assert_eq!(classify_line("http://insecure"), LineKind::MissingData);
        assert_eq!(classify_line("layer has MISCOLOR"), LineKind::Miscolor);
    }

    #[test]
    fn test_blank_line_overwrites_missing_data() {
        let result = parse_output(&["MISSING DATA in tile 4", ""]);
        assert_eq!(result.missing_data_note, "");
    }

    #[test]
    fn test_empty_output_yields_empty_fields() {
        let result = parse_output::<&str>(&[]);
        assert_eq!(result, AnalysisResult::default());
    }

    #[test]
    fn test_split_output() {
        assert_eq!(
            split_output("\n  https://x/img.png \r\nVIIRS_SNPP_a\n\nnote\n\n"),
            vec!["https://x/img.png", "VIIRS_SNPP_a", "", "note"]
        );
        assert!(split_output("  \n ").is_empty());
    }
}
