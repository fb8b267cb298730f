//! Record model: one remote user entity plus the locally-owned bookmark flag.

use serde::{Deserialize, Serialize};

/// Stable identifier of a record, as assigned by the upstream source.
pub type RecordId = i64;

/// A user record as exposed to views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub login: String,
    pub avatar_url: String,
    /// Not part of the upstream payload; starts out `false` on every load.
    pub bookmarked: bool,
}

impl Record {
    /// Copy of this record with the bookmark flag set to `bookmarked`.
    pub fn with_bookmarked(&self, bookmarked: bool) -> Self {
        Self {
            bookmarked,
            ..self.clone()
        }
    }
}

/// Upstream element shape. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub id: RecordId,
    pub login: String,
    #[serde(alias = "avatarUrl")]
    pub avatar_url: String,
}

impl From<RawRecord> for Record {
    fn from(raw: RawRecord) -> Self {
        Self {
            id: raw.id,
            login: raw.login,
            avatar_url: raw.avatar_url,
            bookmarked: false,
        }
    }
}
