//! Pipeline tests: command text -> query -> (fake) analysis output -> replies

use chrono::NaiveDate;
use viirsbot_core::reply::{acknowledgement, analysis_reply, rejection_reply};
use viirsbot_core::{
    normalize_query, parse_arguments, parse_output, split_output, CommandError, CommandRequest,
    NormalizedQuery, ReplyPayload,
};

fn prepare(text: &str, today: NaiveDate) -> Result<NormalizedQuery, CommandError> {
    let args = parse_arguments(&CommandRequest::new(text))?;
    normalize_query(&args, today, false)
}

#[test]
fn test_today_checks_all_layers_for_yesterday() {
    let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
    let query = prepare("viirs_check today", today).unwrap();

    assert_eq!(query.date, "2024-06-30");
    assert_eq!(query.layer_arg(), "");
    assert_eq!(
        acknowledgement(&query).as_text(),
        Some("Checking *ALL* VIIRS layers on *2024-06-30*")
    );
}

#[test]
fn test_bad_layer_produces_exact_rejection() {
    let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
    let err = prepare("viirs_check 2024-01-01 BadLayerName", today).unwrap_err();
    let replies = rejection_reply("viirs_check", &err).unwrap();

    let lines: Vec<&str> = replies.iter().filter_map(ReplyPayload::as_text).collect();
    assert_eq!(
        lines,
        vec![
            "Invalid layer_name",
            "-- [layer_name] must be \"VIIRS_SNPP_CorrectedReflectance_TrueColor\", \
             \"VIIRS_SNPP_CorrectedReflectance_BandsM3-I3-M11\", or \
             \"VIIRS_SNPP_CorrectedReflectance_BandsM11-I2-I1\"",
        ]
    );
}

#[test]
fn test_single_token_is_usage() {
    let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
    let err = prepare("viirs_check", today).unwrap_err();
    assert!(matches!(err, CommandError::Usage));
    assert_eq!(rejection_reply("viirs_check", &err).unwrap().len(), 3);
}

#[test]
fn test_stdout_to_attachment() {
    let stdout = "VIIRS_SNPP_CorrectedReflectance_BandsM3-I3-M11\n\
                  https://gibs.example/snapshot.png\n\
                  No MISSING DATA detected\n\
                  Possible MISCOLOR in 2 tiles\n";
    let result = parse_output(&split_output(stdout));

    match analysis_reply(&result) {
        ReplyPayload::Attachments { attachments } => {
            assert_eq!(
                attachments[0].title,
                "VIIRS_SNPP_CorrectedReflectance_BandsM3-I3-M11"
            );
            assert_eq!(attachments[0].image_url, "https://gibs.example/snapshot.png");
            assert_eq!(
                attachments[0].text,
                "No MISSING DATA detected\nPossible MISCOLOR in 2 tiles"
            );
        }
        other => panic!("expected attachments, got {:?}", other),
    }
}
