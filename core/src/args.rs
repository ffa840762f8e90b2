//! Command argument parsing
//!
//! `viirs_check <date_or_today> [layer_name]`: token 0 is the command name,
//! token 1 the date, token 2 the optional layer. Anything after that is ignored.

use chrono::NaiveDate;
use tracing::debug;

use crate::date::{is_valid_date, normalize_date_on, TODAY_KEYWORD};
use crate::error::CommandError;
use crate::layers::validate_layer;
use crate::types::{CommandRequest, NormalizedQuery, ParsedArguments};

/// Split a command into its date and layer tokens.
///
/// # Errors
/// Returns `CommandError::Usage` when no date token follows the command name.
pub fn parse_arguments(request: &CommandRequest) -> Result<ParsedArguments, CommandError> {
    let mut tokens = request.raw_text.split_whitespace().skip(1);

    let date_token = tokens.next().ok_or(CommandError::Usage)?.to_string();
    let layer_name = tokens.next().map(str::to_string);

    if tokens.next().is_some() {
        debug!(text = %request.raw_text, "Ignoring extra command tokens");
    }

    Ok(ParsedArguments {
        date_token,
        layer_name,
    })
}

/// Resolve the date and validate the layer of parsed arguments.
///
/// With `strict_dates`, a date that is neither `today` nor a real
/// `YYYY-MM-DD` date is rejected instead of passed through.
///
/// # Errors
/// `CommandError::InvalidDate` or `CommandError::InvalidLayer`.
pub fn normalize_query(
    args: &ParsedArguments,
    today: NaiveDate,
    strict_dates: bool,
) -> Result<NormalizedQuery, CommandError> {
    if strict_dates
        && !args.date_token.eq_ignore_ascii_case(TODAY_KEYWORD)
        && !is_valid_date(&args.date_token)
    {
        return Err(CommandError::InvalidDate {
            date: args.date_token.clone(),
        });
    }

    let layer = validate_layer(args.layer_name.as_deref())?;
    let date = normalize_date_on(&args.date_token, today);

    Ok(NormalizedQuery { date, layer })
}
