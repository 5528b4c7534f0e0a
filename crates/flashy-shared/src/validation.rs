//! Normalisation of user-supplied text fields.
//!
//! Required fields are trimmed and must be non-empty afterwards. The server
//! applies [`deck_title`] and [`card_sides`]; the client additionally applies
//! [`card_sides_for_submit`], which enforces the display length ceiling.

use crate::constants::MAX_CARD_TEXT_LEN;
use crate::error::ValidationError;

fn required(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Trimmed, non-empty deck title.
pub fn deck_title(title: Option<&str>) -> Result<String, ValidationError> {
    required(title).ok_or(ValidationError::TitleRequired)
}

/// Trimmed, non-empty card front and back.
pub fn card_sides(
    front: Option<&str>,
    back: Option<&str>,
) -> Result<(String, String), ValidationError> {
    match (required(front), required(back)) {
        (Some(front), Some(back)) => Ok((front, back)),
        _ => Err(ValidationError::FrontBackRequired),
    }
}

/// [`card_sides`] plus the [`MAX_CARD_TEXT_LEN`] ceiling the UI enforces.
pub fn card_sides_for_submit(front: &str, back: &str) -> Result<(String, String), ValidationError> {
    let (front, back) = card_sides(Some(front), Some(back))?;
    if front.chars().count() > MAX_CARD_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: "front",
            max: MAX_CARD_TEXT_LEN,
        });
    }
    if back.chars().count() > MAX_CARD_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: "back",
            max: MAX_CARD_TEXT_LEN,
        });
    }
    Ok((front, back))
}
