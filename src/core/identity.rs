//! Entity identity - prefixed ULID identifiers

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Entity type prefixes used in identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityPrefix {
    /// Catalog entry (raw material or hardware)
    Mat,
    /// Cut piece
    Pce,
    /// Project hardware line (copied from the catalog)
    Hw,
    /// Fixed hardware line (entered manually)
    Fhw,
    /// Labor rate
    Lab,
    /// Fixed monthly cost
    Fcst,
    /// Card-rate tier
    Rate,
    /// Additional service
    Svc,
    /// Product category
    Cat,
    /// Saved proposal
    Prop,
}

impl EntityPrefix {
    /// All known prefixes
    pub fn all() -> &'static [EntityPrefix] {
        &[
            EntityPrefix::Mat,
            EntityPrefix::Pce,
            EntityPrefix::Hw,
            EntityPrefix::Fhw,
            EntityPrefix::Lab,
            EntityPrefix::Fcst,
            EntityPrefix::Rate,
            EntityPrefix::Svc,
            EntityPrefix::Cat,
            EntityPrefix::Prop,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Mat => "MAT",
            EntityPrefix::Pce => "PCE",
            EntityPrefix::Hw => "HW",
            EntityPrefix::Fhw => "FHW",
            EntityPrefix::Lab => "LAB",
            EntityPrefix::Fcst => "FCST",
            EntityPrefix::Rate => "RATE",
            EntityPrefix::Svc => "SVC",
            EntityPrefix::Cat => "CAT",
            EntityPrefix::Prop => "PROP",
        }
    }
}

impl fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityPrefix::all()
            .iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| IdParseError::UnknownPrefix(s.to_string()))
    }
}

/// Errors raised while parsing an entity ID
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdParseError {
    #[error("Missing '-' separator in ID: {0}")]
    MissingSeparator(String),

    #[error("Unknown entity prefix: {0}")]
    UnknownPrefix(String),

    #[error("Invalid ULID in ID: {0}")]
    InvalidUlid(String),
}

/// A unique entity identifier: `PREFIX-<ULID>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    prefix: EntityPrefix,
    ulid: Ulid,
}

impl EntityId {
    /// Generate a fresh ID for the given entity type
    pub fn new(prefix: EntityPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    pub fn prefix(&self) -> EntityPrefix {
        self.prefix
    }

    pub fn ulid(&self) -> Ulid {
        self.ulid
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingSeparator(s.to_string()))?;
        let prefix: EntityPrefix = prefix.parse()?;
        let ulid = Ulid::from_string(ulid).map_err(|_| IdParseError::InvalidUlid(s.to_string()))?;
        Ok(Self { prefix, ulid })
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
