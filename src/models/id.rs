use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Length of every identifier handed out by the store.
pub const ID_LEN: usize = 24;

/// Store-assigned record identifier: 24 lowercase hex characters.
///
/// The first eight digits are the creation time in seconds, the rest are random,
/// so identifiers sort roughly by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn generate() -> Self {
        Self::generate_at(Utc::now().timestamp())
    }

    /// The first eight hex digits hold `seconds`, clamped to what fits in them.
    fn generate_at(seconds: i64) -> Self {
        let seconds = u32::try_from(seconds.max(0)).unwrap_or(u32::MAX);
        let random = Uuid::new_v4().simple().to_string();
        RecordId(format!("{:08x}{}", seconds, &random[..ID_LEN - 8]))
    }

    /// Accepts only well-formed identifiers; anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let well_formed = raw.len() == ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit());
        well_formed.then(|| RecordId(raw.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
