//! Identifier types used throughout the patchtrail core.
//!
//! Patch records use UUID v7 identifiers, which embed a timestamp and are
//! therefore naturally insertion-ordered — that ordering is the tiebreak
//! when two records of the same entity carry the same date.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a patch record.
/// Uses UUID v7 which embeds a timestamp for natural ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchId(Uuid);

impl PatchId {
    /// Creates a new patch ID with the current timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a patch ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses a patch ID from a string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The kind of identifier an instrumented entity type uses.
///
/// Mirrors the host store's primary-key type so patch records can reference
/// their owning entity without a lossy conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    /// Arbitrary string keys.
    Text,
    /// Signed 64-bit integer keys.
    Int,
    /// UUID keys.
    Uuid,
}

/// A reference to an owning entity, typed to match the entity's identifier.
///
/// All variants have a canonical string form (`Display`) that is lossless
/// and comparison-stable, so references embedded in entity documents can be
/// normalized to plain strings before structural diffing.
///
/// Equality and hashing follow the canonical form, not the variant. The
/// untagged wire form cannot preserve the variant of a UUID-shaped text key
/// (it deserializes as `Uuid`), so a reference that crosses a serde
/// boundary must still compare equal to the value it was minted as.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RefId {
    Int(i64),
    Uuid(Uuid),
    Text(String),
}

impl PartialEq for RefId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => self.canonical() == other.canonical(),
        }
    }
}

impl Eq for RefId {}

impl Hash for RefId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl RefId {
    /// Generates a fresh reference of the given kind.
    ///
    /// Text and UUID keys are minted as UUID v7 (text keys in canonical
    /// hyphenated form); integer keys cannot be generated here and must be
    /// assigned by the host store.
    pub fn generate(kind: RefKind) -> crate::Result<Self> {
        match kind {
            RefKind::Uuid => Ok(Self::Uuid(Uuid::now_v7())),
            RefKind::Text => Ok(Self::Text(Uuid::now_v7().to_string())),
            RefKind::Int => Err(crate::Error::InvalidRef(
                "integer references must be assigned by the store".into(),
            )),
        }
    }

    /// Returns the kind of this reference.
    #[must_use]
    pub fn kind(&self) -> RefKind {
        match self {
            Self::Text(_) => RefKind::Text,
            Self::Int(_) => RefKind::Int,
            Self::Uuid(_) => RefKind::Uuid,
        }
    }

    /// Returns the canonical string form of this reference.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Uuid(u) => write!(f, "{u}"),
        }
    }
}

impl From<&str> for RefId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RefId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for RefId {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<Uuid> for RefId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}
