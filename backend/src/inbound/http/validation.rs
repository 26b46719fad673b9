//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, Platform, ReservationToken};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidPlatform,
    InvalidToken,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidPlatform => "invalid_platform",
            ErrorCode::InvalidToken => "invalid_token",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode, value: Option<&str>) -> Error {
    let mut details = json!({
        "field": field.as_str(),
        "code": code.as_str(),
    });
    if let (Some(object), Some(value)) = (details.as_object_mut(), value) {
        object.insert("value".to_owned(), json!(value));
    }
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ErrorCode::MissingField,
        None,
    )
}

/// Resolve the request platform: absent or blank input falls back to the
/// configured default; anything else must be a valid platform tag.
pub(crate) fn resolve_platform(
    raw: Option<&str>,
    default_platform: &Platform,
    field: FieldName,
) -> Result<Platform, Error> {
    let Some(tag) = raw else {
        return Ok(default_platform.clone());
    };
    if tag.trim().is_empty() {
        return Ok(default_platform.clone());
    }
    Platform::new(tag).map_err(|err| {
        field_error(
            field,
            format!("{}: {err}", field.as_str()),
            ErrorCode::InvalidPlatform,
            Some(tag),
        )
    })
}

pub(crate) fn parse_token(raw: &str, field: FieldName) -> Result<ReservationToken, Error> {
    ReservationToken::parse(raw).map_err(|err| {
        field_error(
            field,
            format!("{}: {err}", field.as_str()),
            ErrorCode::InvalidToken,
            None,
        )
    })
}

pub(crate) fn require_non_empty(raw: &str, field: FieldName) -> Result<String, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(missing_field_error(field));
    }
    Ok(trimmed.to_owned())
}
