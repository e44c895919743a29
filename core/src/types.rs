//! Shared data structures exchanged between the resolver, the HTTP layer, and the view model.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One browsable content folder as reported by the folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSummary {
    pub name: String,
    /// Timestamp parsed from the newest markdown filename, if it follows the dated pattern.
    #[serde(default, with = "utc_millis")]
    pub latest_date: Option<DateTime<FixedOffset>>,
}

/// Raw markdown body of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    pub content: String,
}

/// Token identifying an in-flight asynchronous request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// `latestDate` travels as a UTC instant with millisecond precision (`...T00:00:00.000Z`).
mod utc_millis {
    use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(
        value: &Option<DateTime<FixedOffset>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_some(
                &date.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| DateTime::parse_from_rfc3339(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}
