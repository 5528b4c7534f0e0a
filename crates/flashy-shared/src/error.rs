use thiserror::Error;

/// A required request field failed validation.
///
/// The `Display` output is the message returned to clients, so it names the
/// offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title required")]
    TitleRequired,

    #[error("Front/back required")]
    FrontBackRequired,

    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Device id is reserved")]
    ReservedDeviceId,
}
