// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Minimum number of digits in the sequence part of a ticket code.
///
/// Sequences are zero-padded up to this width and are allowed to grow
/// beyond it (`2026-9999` is followed by `2026-10000`).
pub const MIN_SEQUENCE_WIDTH: usize = 4;

/// Maximum length of a partition key.
const MAX_PARTITION_KEY_LEN: usize = 32;

/// Separator between the partition and the sequence in a ticket code.
pub const CODE_SEPARATOR: char = '-';

/// The partition a ticket code is allocated in.
///
/// Each partition owns an independent sequence starting at 1. Tickets are
/// partitioned by calendar year, but any key made of ASCII letters and
/// digits is accepted.
///
/// The character set excludes the code separator as well as the SQL `LIKE`
/// wildcards `%` and `_`, so a partition can always be used verbatim as a
/// prefix pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartitionKey(String);

impl PartitionKey {
    /// Creates a partition key from arbitrary text.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty, longer than 32 characters,
    /// or contains anything other than ASCII letters and digits.
    pub fn new(key: &str) -> Result<Self, DomainError> {
        if key.is_empty() {
            return Err(DomainError::InvalidPartitionKey(String::from(
                "Partition key cannot be empty",
            )));
        }
        if key.len() > MAX_PARTITION_KEY_LEN {
            return Err(DomainError::InvalidPartitionKey(format!(
                "Partition key cannot exceed {MAX_PARTITION_KEY_LEN} characters"
            )));
        }
        if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidPartitionKey(format!(
                "'{key}' may only contain ASCII letters and digits"
            )));
        }
        Ok(Self(key.to_string()))
    }

    /// Creates the partition key for a calendar year.
    ///
    /// # Errors
    ///
    /// Returns an error if the year does not have exactly four digits.
    pub fn for_year(year: i32) -> Result<Self, DomainError> {
        if !(1000..=9999).contains(&year) {
            return Err(DomainError::InvalidYear(year));
        }
        Ok(Self(year.to_string()))
    }

    /// Creates the partition key for the current UTC calendar year.
    ///
    /// # Errors
    ///
    /// Returns an error if the system clock reports a year outside
    /// the four-digit range.
    pub fn current_year() -> Result<Self, DomainError> {
        Self::for_year(time::OffsetDateTime::now_utc().year())
    }

    /// Returns the key as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the prefix every code in this partition starts with.
    #[must_use]
    pub fn code_prefix(&self) -> String {
        format!("{}{CODE_SEPARATOR}", self.0)
    }
}

impl std::fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PartitionKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PartitionKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PartitionKey> for String {
    fn from(value: PartitionKey) -> Self {
        value.0
    }
}

/// A human-readable ticket identifier such as `2026-0042`.
///
/// The sequence is a positive integer. Two codes are equal when their
/// partition and numeric sequence are equal, so `2026-0010` and
/// `2026-00010` parse to the same code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketCode {
    partition: PartitionKey,
    sequence: u64,
}

impl TicketCode {
    /// Creates a code from its parts.
    ///
    /// # Errors
    ///
    /// Returns an error if `sequence` is zero.
    pub fn new(partition: PartitionKey, sequence: u64) -> Result<Self, DomainError> {
        if sequence == 0 {
            return Err(DomainError::InvalidTicketCode {
                code: format!("{}{CODE_SEPARATOR}0", partition.as_str()),
                reason: String::from("sequence numbers start at 1"),
            });
        }
        Ok(Self {
            partition,
            sequence,
        })
    }

    /// Returns the code that follows `high_water` in `partition`.
    ///
    /// A `high_water` of zero (an empty partition) yields sequence 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the partition has exhausted the `u64` range.
    pub fn next_after(partition: PartitionKey, high_water: u64) -> Result<Self, DomainError> {
        let Some(sequence) = high_water.checked_add(1) else {
            return Err(DomainError::SequenceOverflow {
                partition: partition.as_str().to_string(),
            });
        };
        Ok(Self {
            partition,
            sequence,
        })
    }

    /// Returns the partition this code belongs to.
    #[must_use]
    pub const fn partition(&self) -> &PartitionKey {
        &self.partition
    }

    /// Returns the numeric sequence.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl std::fmt::Display for TicketCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{CODE_SEPARATOR}{:0width$}",
            self.partition,
            self.sequence,
            width = MIN_SEQUENCE_WIDTH
        )
    }
}

impl FromStr for TicketCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidTicketCode {
            code: s.to_string(),
            reason: reason.to_string(),
        };

        let (partition, digits) = s
            .rsplit_once(CODE_SEPARATOR)
            .ok_or_else(|| invalid("missing separator"))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("sequence must be decimal digits"));
        }

        let partition: PartitionKey =
            PartitionKey::new(partition).map_err(|e| invalid(&e.to_string()))?;
        let sequence: u64 = digits
            .parse()
            .map_err(|_| invalid("sequence does not fit in 64 bits"))?;

        Self::new(partition, sequence).map_err(|_| invalid("sequence numbers start at 1"))
    }
}

impl TryFrom<String> for TicketCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TicketCode> for String {
    fn from(value: TicketCode) -> Self {
        value.to_string()
    }
}

/// Returns the highest sequence number issued in `partition`.
///
/// Sequences are compared as integers, never as strings, so `2026-10000`
/// ranks above `2026-9999`. Codes belonging to other partitions and strings
/// that are not valid codes are skipped. An empty partition yields zero.
pub fn max_issued_sequence<'a, I>(partition: &PartitionKey, codes: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    codes
        .into_iter()
        .filter_map(|raw| raw.parse::<TicketCode>().ok())
        .filter(|code| code.partition() == partition)
        .map(|code| code.sequence())
        .max()
        .unwrap_or(0)
}
