//! Parcel domain model.
//!
//! # Responsibility
//! - Define the tracked parcel record and its closed status domain.
//! - Own the text encoding of statuses and creation timestamps.
//!
//! # Invariants
//! - `number` is assigned by storage and never reused for another parcel.
//! - `client` and `created_at` do not change after creation.
//! - `created_at` is an RFC3339 timestamp.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned parcel number.
pub type ParcelId = i64;

/// Opaque identifier of the client owning a parcel.
pub type ClientId = i64;

/// Lifecycle stage of a parcel.
///
/// The store accepts any value on update; transition rules belong to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted for delivery, not yet dispatched.
    Registered,
    /// Handed over to the carrier.
    Sent,
    /// Received by the addressee.
    Delivered,
}

impl ParcelStatus {
    /// Returns the stable text form used in storage and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a known parcel status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatusError(pub String);

impl Display for UnknownStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown parcel status `{}`; expected registered|sent|delivered",
            self.0
        )
    }
}

impl Error for UnknownStatusError {}

impl FromStr for ParcelStatus {
    type Err = UnknownStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "registered" => Ok(Self::Registered),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            other => Err(UnknownStatusError(other.to_string())),
        }
    }
}

/// Tracked parcel record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Storage-assigned number. `0` until the parcel is stored.
    pub number: ParcelId,
    pub client: ClientId,
    pub status: ParcelStatus,
    /// Free-text delivery address.
    pub address: String,
    /// RFC3339 creation timestamp.
    pub created_at: String,
}

impl Parcel {
    /// Creates an unsaved parcel in `Registered` status stamped with the
    /// current UTC time.
    pub fn new(client: ClientId, address: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: format_timestamp(Utc::now()),
        }
    }

    /// Parses `created_at` back into a UTC instant.
    ///
    /// Returns `None` when the stored text is not valid RFC3339.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|value| value.with_timezone(&Utc))
    }
}

/// Formats an instant the way parcel timestamps are persisted.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, Parcel, ParcelStatus};
    use chrono::{TimeZone, Utc};

    #[test]
    fn status_text_form_roundtrips_for_every_variant() {
        for status in [
            ParcelStatus::Registered,
            ParcelStatus::Sent,
            ParcelStatus::Delivered,
        ] {
            assert_eq!(status.as_str().parse::<ParcelStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = "lost".parse::<ParcelStatus>().unwrap_err();
        assert!(err.to_string().contains("lost"));
    }

    #[test]
    fn format_timestamp_uses_second_precision_and_z_suffix() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-09T14:05:00Z");
    }

    #[test]
    fn new_parcel_parses_its_own_timestamp() {
        let parcel = Parcel::new(7, "somewhere");
        assert!(parcel.created_at_utc().is_some());
    }
}
