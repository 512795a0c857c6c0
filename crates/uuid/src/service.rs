//! Internal implementation of identifier services.

use crate::{UuidError, UuidResult};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::sync::Mutex;
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Canonical case identifier (32 lowercase hex characters, no hyphens).
///
/// Once constructed, the contained UUID is guaranteed to be in canonical form, so it can be
/// compared, displayed and embedded in URLs without further normalisation.
///
/// # Construction
/// - [`CaseUuid::new`] generates a new identifier (for a freshly created case).
/// - [`CaseUuid::parse`] validates an externally supplied identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaseUuid(Uuid);

impl Default for CaseUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseUuid {
    /// Generates a new random (v4) identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses an identifier that must already be in canonical form.
    ///
    /// This does **not** normalise other common UUID forms (for example, hyphenated or
    /// uppercase). Callers must provide the canonical representation.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "UUID must be 32 lowercase hex characters without hyphens, got: '{}'",
                input
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(format!("invalid UUID '{}': {}", input, e)))
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Returns true if `input` is in canonical form.
    ///
    /// This is a purely syntactic check: exactly 32 bytes of lowercase hex.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }
}

impl fmt::Display for CaseUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for CaseUuid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CaseUuid::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CaseUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CaseUuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CaseUuid::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// A time-prefixed unique identifier.
///
/// Format:
/// `YYYYMMDDTHHMMSS.mmmZ-<canonical_uuid>`
///
/// Example:
/// `20260111T143522.045Z-550e8400e29b41d4a716446655440000`
///
/// The format contains no path separators or colons, so it can be used directly as a file
/// name. Because the timestamp is fixed-width, lexicographic order equals chronological order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimestampId {
    timestamp: DateTime<Utc>,
    uuid: CaseUuid,
}

impl TimestampId {
    /// Generate a new timestamp id.
    ///
    /// If `last` is provided, the timestamp is guaranteed to be strictly greater than the
    /// last one (by at least 1 ms).
    pub fn generate(last: Option<&TimestampId>) -> Self {
        // Keys are rendered at millisecond precision, so compare at that precision too.
        let now = Utc::now().trunc_subsecs(3);

        let timestamp = match last {
            Some(prev) if now <= prev.timestamp => prev.timestamp + Duration::milliseconds(1),
            _ => now,
        };

        Self {
            timestamp,
            uuid: CaseUuid::new(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn uuid(&self) -> &CaseUuid {
        &self.uuid
    }
}

impl FromStr for TimestampId {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (ts_str, uuid_str) = s.split_once('-').ok_or_else(|| {
            UuidError::InvalidInput(format!("Invalid timestamp id format: '{}'", s))
        })?;

        let ts_no_z = ts_str.strip_suffix('Z').ok_or_else(|| {
            UuidError::InvalidInput(format!("Timestamp must end with 'Z': '{}'", ts_str))
        })?;

        let naive =
            chrono::NaiveDateTime::parse_from_str(ts_no_z, "%Y%m%dT%H%M%S%.3f").map_err(|e| {
                UuidError::InvalidInput(format!("Invalid timestamp format '{}': {}", ts_str, e))
            })?;

        Ok(Self {
            timestamp: DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc),
            uuid: CaseUuid::parse(uuid_str)?,
        })
    }
}

impl fmt::Display for TimestampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.timestamp.format("%Y%m%dT%H%M%S%.3fZ"),
            self.uuid
        )
    }
}

/// Produces strictly increasing [`TimestampId`]s.
///
/// The generator remembers the last id it handed out, so two ids generated within the same
/// millisecond still sort in generation order.
#[derive(Debug, Default)]
pub struct TimestampIdGenerator {
    last: Mutex<Option<TimestampId>>,
}

impl TimestampIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the generator with an id produced elsewhere (for example, the newest key found
    /// on disk at startup).
    pub fn starting_after(last: TimestampId) -> Self {
        Self {
            last: Mutex::new(Some(last)),
        }
    }

    pub fn next_id(&self) -> TimestampId {
        let mut last = self
            .last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let id = TimestampId::generate(last.as_ref());
        *last = Some(id.clone());
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_canonical_uuid() {
        let id = CaseUuid::new();
        let canonical = id.to_string();

        assert_eq!(canonical.len(), 32);
        assert!(CaseUuid::is_canonical(&canonical));
    }

    #[test]
    fn test_parse_valid_canonical_uuid() {
        let canonical = "550e8400e29b41d4a716446655440000";
        let parsed = CaseUuid::parse(canonical).unwrap();

        assert_eq!(parsed.to_string(), canonical);
    }

    #[test]
    fn test_parse_rejects_hyphenated_uuid() {
        let result = CaseUuid::parse("550e8400-e29b-41d4-a716-446655440000");

        match result {
            Err(UuidError::InvalidInput(msg)) => {
                assert!(msg.contains("32 lowercase hex characters"));
            }
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_parse_rejects_uppercase_uuid() {
        assert!(CaseUuid::parse("550E8400E29B41D4A716446655440000").is_err());
    }

    #[test]
    fn test_is_canonical_invalid() {
        assert!(!CaseUuid::is_canonical("550e8400e29b41d4a71644665544000"));
        assert!(!CaseUuid::is_canonical("550e8400e29b41d4a7164466554400000"));
        assert!(!CaseUuid::is_canonical("550e8400e29b41d4a716446655440zzz"));
        assert!(!CaseUuid::is_canonical(""));
    }

    #[test]
    fn test_new_ids_are_distinct() {
        assert_ne!(CaseUuid::new(), CaseUuid::new());
    }

    #[test]
    fn test_case_uuid_serialises_as_canonical_string() {
        let id = CaseUuid::parse("550e8400e29b41d4a716446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, "\"550e8400e29b41d4a716446655440000\"");
        let back: CaseUuid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_case_uuid_deserialise_rejects_hyphenated() {
        let result: Result<CaseUuid, _> =
            serde_json::from_str("\"550e8400-e29b-41d4-a716-446655440000\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_timestamp_id_generate_monotonic_same_instant() {
        let first = TimestampId::generate(None);
        let second = TimestampId::generate(Some(&first));

        assert!(second.timestamp() > first.timestamp());
    }

    #[test]
    fn test_timestamp_id_parse_valid() {
        let valid = "20260111T143522.045Z-550e8400e29b41d4a716446655440000";
        let id = TimestampId::from_str(valid).unwrap();

        assert_eq!(id.uuid().to_string(), "550e8400e29b41d4a716446655440000");
        assert_eq!(id.to_string(), valid);
    }

    #[test]
    fn test_timestamp_id_parse_missing_z_suffix() {
        let invalid = "20260111T143522.045-550e8400e29b41d4a716446655440000";

        match TimestampId::from_str(invalid) {
            Err(UuidError::InvalidInput(msg)) => assert!(msg.contains("must end with 'Z'")),
            _ => panic!("Expected InvalidInput error"),
        }
    }

    #[test]
    fn test_timestamp_id_parse_invalid_timestamp() {
        let invalid = "20260199T143522.045Z-550e8400e29b41d4a716446655440000";
        assert!(TimestampId::from_str(invalid).is_err());
    }

    #[test]
    fn test_generator_ids_strictly_increase_as_strings() {
        let generator = TimestampIdGenerator::new();
        let ids: Vec<String> = (0..50).map(|_| generator.next_id().to_string()).collect();

        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_generator_starting_after_future_id() {
        let future = TimestampId::from_str("29990101T000000.000Z-550e8400e29b41d4a716446655440000")
            .unwrap();
        let generator = TimestampIdGenerator::starting_after(future.clone());

        assert!(generator.next_id().timestamp() > future.timestamp());
    }
}
