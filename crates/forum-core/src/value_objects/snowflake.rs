//! Snowflake ID - time-ordered 64-bit unique identifier
//!
//! Structure:
//! - Bits 63-22: Timestamp (milliseconds since custom epoch)
//! - Bits 21-12: Worker ID (0-1023)
//! - Bits 11-0:  Sequence number (0-4095)
//!
//! Ids sort by creation time, which reply tie-breaking and notification
//! feeds rely on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Time-ordered Snowflake ID (64-bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// Custom epoch: 2023-06-01 00:00:00 UTC (milliseconds)
    pub const EPOCH: i64 = 1_685_577_600_000;

    /// Create a new Snowflake from a raw i64 value
    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner i64 value
    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Check if the Snowflake is zero (uninitialized)
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Extract timestamp (milliseconds since Unix epoch)
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> 22) + Self::EPOCH
    }

    /// Extract worker ID (0-1023)
    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> 12) & 0x3FF) as u16
    }

    /// Convert timestamp to DateTime<Utc>
    pub fn created_at(&self) -> chrono::DateTime<chrono::Utc> {
        use chrono::{TimeZone, Utc};
        Utc.timestamp_millis_opt(self.timestamp())
            .single()
            .unwrap_or_default()
    }

    /// Parse from string representation
    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.parse::<i64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }
}

/// Error when parsing a Snowflake from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid snowflake format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Serialize as string for JSON (JavaScript BigInt safety)
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

// Deserialize from string or number
impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing a snowflake ID")
            }

            fn visit_i64<E>(self, value: i64) -> Result<Snowflake, E>
            where
                E: de::Error,
            {
                Ok(Snowflake(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Snowflake, E>
            where
                E: de::Error,
            {
                Ok(Snowflake(value as i64))
            }

            fn visit_str<E>(self, value: &str) -> Result<Snowflake, E>
            where
                E: de::Error,
            {
                value
                    .parse::<i64>()
                    .map(Snowflake)
                    .map_err(|_| de::Error::custom("invalid snowflake string"))
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

const SEQUENCE_MAX: i64 = 0xFFF;

/// Thread-safe Snowflake ID generator
///
/// Generates unique ids at up to 4096 per millisecond per worker. The
/// generator packs (timestamp, sequence) into a single atomic word and
/// advances it with compare-and-swap, so no locks are taken.
pub struct SnowflakeGenerator {
    worker_id: u16,
    // (millis since Unix epoch) << 12 | sequence
    state: AtomicI64,
}

impl SnowflakeGenerator {
    /// Create a new generator with the given worker ID
    ///
    /// # Panics
    /// Panics if worker_id >= 1024
    pub fn new(worker_id: u16) -> Self {
        assert!(worker_id < 1024, "Worker ID must be < 1024");
        Self {
            worker_id,
            state: AtomicI64::new(0),
        }
    }

    /// Generate a new unique Snowflake ID
    pub fn generate(&self) -> Snowflake {
        loop {
            let now = current_millis();
            let prev = self.state.load(Ordering::Acquire);
            let (last_millis, last_seq) = (prev >> 12, prev & SEQUENCE_MAX);

            // If the clock went backwards we keep minting on the last
            // observed millisecond until real time catches up.
            let (millis, seq) = if now > last_millis {
                (now, 0)
            } else if last_seq < SEQUENCE_MAX {
                (last_millis, last_seq + 1)
            } else {
                // Sequence exhausted for this millisecond
                std::hint::spin_loop();
                continue;
            };

            let next = (millis << 12) | seq;
            if self
                .state
                .compare_exchange(prev, next, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                let id = ((millis - Snowflake::EPOCH) << 22)
                    | (i64::from(self.worker_id) << 12)
                    | seq;
                return Snowflake::new(id);
            }
            // Lost the race, retry with fresh state
        }
    }

    /// Get the worker ID of this generator
    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

#[inline]
fn current_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
