//! Consultant roster entities.
//!
//! A consultant is a person eligible to receive redirected contacts for
//! exactly one platform. The roster itself is administered externally; this
//! core reads it for selection and only ever mutates the last-used
//! timestamp (at issuance) and the lifetime usage counter (at confirmed
//! use).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Platform;

/// Validation errors returned by [`Consultant::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsultantValidationError {
    /// Display name was empty after trimming.
    EmptyName,
    /// Contact number was empty after trimming.
    EmptyContactNumber,
    /// Contact number contained characters other than digits, `+`, spaces,
    /// or separators.
    InvalidContactNumber,
    /// Matching key was empty after normalization.
    EmptyMatchKey,
}

impl fmt::Display for ConsultantValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "consultant name must not be empty"),
            Self::EmptyContactNumber => write!(f, "contact number must not be empty"),
            Self::InvalidContactNumber => write!(
                f,
                "contact number may only contain digits, '+', spaces, '-', '(' or ')'",
            ),
            Self::EmptyMatchKey => write!(f, "matching key must not be empty"),
        }
    }
}

impl std::error::Error for ConsultantValidationError {}

/// Stable consultant identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsultantId(Uuid);

impl ConsultantId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`ConsultantId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConsultantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized key correlating a consultant with inbound-contact attribution
/// records.
///
/// Both the roster and the attribution source carry this as independently
/// entered free text, so the join has to be case-insensitive and
/// whitespace-tolerant. Normalization happens once, at construction.
///
/// # Examples
/// ```
/// use backend::domain::MatchKey;
///
/// let a = MatchKey::new("  Ana Souza ");
/// let b = MatchKey::new("ana souza");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MatchKey(String);

impl MatchKey {
    /// Normalize free text into a matching key (trim + lowercase).
    ///
    /// An all-whitespace input yields an empty key; [`Consultant::new`]
    /// rejects that case for roster entries.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_lowercase())
    }

    /// Access the normalized key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the normalized key is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for MatchKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<MatchKey> for String {
    fn from(value: MatchKey) -> Self {
        value.0
    }
}

/// Input payload for [`Consultant::new`].
#[derive(Debug, Clone)]
pub struct ConsultantDraft {
    pub id: ConsultantId,
    pub platform: Platform,
    pub display_name: String,
    pub email: Option<String>,
    pub contact_number: String,
    pub match_key: MatchKey,
    pub active: bool,
    pub lifetime_uses: i64,
    pub last_used_at: Option<DateTime<Utc>>,
}

fn is_contact_number_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '+' | ' ' | '-' | '(' | ')')
}

/// A validated roster entry.
///
/// # Examples
/// ```rust,ignore
/// # let draft = sample_consultant_draft();
/// let consultant = backend::domain::Consultant::new(draft)?;
/// assert!(consultant.active());
/// # Ok::<(), backend::domain::ConsultantValidationError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Consultant {
    id: ConsultantId,
    platform: Platform,
    display_name: String,
    email: Option<String>,
    contact_number: String,
    match_key: MatchKey,
    active: bool,
    lifetime_uses: i64,
    last_used_at: Option<DateTime<Utc>>,
}

impl Consultant {
    /// Creates a validated consultant.
    pub fn new(draft: ConsultantDraft) -> Result<Self, ConsultantValidationError> {
        let display_name = draft.display_name.trim().to_owned();
        if display_name.is_empty() {
            return Err(ConsultantValidationError::EmptyName);
        }
        let contact_number = draft.contact_number.trim().to_owned();
        if contact_number.is_empty() {
            return Err(ConsultantValidationError::EmptyContactNumber);
        }
        if !contact_number.chars().all(is_contact_number_char) {
            return Err(ConsultantValidationError::InvalidContactNumber);
        }
        if draft.match_key.is_empty() {
            return Err(ConsultantValidationError::EmptyMatchKey);
        }
        Ok(Self {
            id: draft.id,
            platform: draft.platform,
            display_name,
            email: draft.email,
            contact_number,
            match_key: draft.match_key,
            active: draft.active,
            lifetime_uses: draft.lifetime_uses,
            last_used_at: draft.last_used_at,
        })
    }

    /// Returns the consultant id.
    pub fn id(&self) -> ConsultantId {
        self.id
    }

    /// Returns the platform this consultant serves.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the e-mail address, when known.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the contact number handed out to visitors.
    pub fn contact_number(&self) -> &str {
        self.contact_number.as_str()
    }

    /// Returns the normalized attribution matching key.
    pub fn match_key(&self) -> &MatchKey {
        &self.match_key
    }

    /// Whether the consultant currently receives traffic.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Returns the lifetime count of confirmed hand-offs.
    pub fn lifetime_uses(&self) -> i64 {
        self.lifetime_uses
    }

    /// Returns the timestamp of the most recent issuance, if any.
    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }
}
