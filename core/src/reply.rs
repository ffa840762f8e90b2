//! Reply formatting

use crate::error::CommandError;
use crate::layers::quoted_layer_list;
use crate::types::{AnalysisResult, Attachment, NormalizedQuery, ReplyPayload};

/// Multi-line usage help for `command`.
pub fn usage_reply(command: &str) -> Vec<ReplyPayload> {
    vec![
        ReplyPayload::text(format!("{} [date_string] [layer_name]", command)),
        ReplyPayload::text(
            "-- [date_string] must be \"YYYY-MM-DD\" or \"today\" to check yesterday",
        ),
        ReplyPayload::text(format!(
            "-- optional: [layer_name] must be empty, {}",
            quoted_layer_list()
        )),
    ]
}

/// Two-line rejection for a layer outside the allow-list.
pub fn invalid_layer_reply() -> Vec<ReplyPayload> {
    vec![
        ReplyPayload::text("Invalid layer_name"),
        ReplyPayload::text(format!("-- [layer_name] must be {}", quoted_layer_list())),
    ]
}

/// Two-line rejection for a malformed date (strict mode only).
pub fn invalid_date_reply() -> Vec<ReplyPayload> {
    vec![
        ReplyPayload::text("Invalid date_string"),
        ReplyPayload::text("-- [date_string] must be \"YYYY-MM-DD\" or \"today\""),
    ]
}

/// Acknowledgement sent before the analysis process finishes.
pub fn acknowledgement(query: &NormalizedQuery) -> ReplyPayload {
    match &query.layer {
        Some(layer) => ReplyPayload::text(format!("Checking *{}* on *{}*", layer, query.date)),
        None => ReplyPayload::text(format!("Checking *ALL* VIIRS layers on *{}*", query.date)),
    }
}

/// Attachment reply for a completed analysis.
pub fn analysis_reply(result: &AnalysisResult) -> ReplyPayload {
    ReplyPayload::Attachments {
        attachments: vec![Attachment {
            title: result.layer_name.clone(),
            image_url: result.image_url.clone(),
            text: format!("{}\n{}", result.missing_data_note, result.miscolor_note),
        }],
    }
}

/// Reply for an analysis run that never produced output.
pub fn failure_reply(cause: &str) -> ReplyPayload {
    ReplyPayload::text(format!("VIIRS check failed: {}", cause))
}

/// Replies for a command rejected before any process was launched.
///
/// Returns `None` for errors that are not surfaced as help text.
pub fn rejection_reply(command: &str, error: &CommandError) -> Option<Vec<ReplyPayload>> {
    match error {
        CommandError::Usage => Some(usage_reply(command)),
        CommandError::InvalidLayer { .. } => Some(invalid_layer_reply()),
        CommandError::InvalidDate { .. } => Some(invalid_date_reply()),
        _ => None,
    }
}
