//! Typed Identifiers
//!
//! Records are keyed by 12-byte identifiers rendered as 24 hexadecimal
//! characters, the same shape the storefront clients already hold.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
    str::FromStr,
};

use jiff::Timestamp;
use rand::{RngCore, rngs::OsRng};
use thiserror::Error;

/// Number of raw bytes in an identifier.
pub const ID_BYTES: usize = 12;

/// Length of the hexadecimal rendering of an identifier.
pub const ID_HEX_LEN: usize = ID_BYTES * 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("identifier must be {ID_HEX_LEN} characters, got {0}")]
    InvalidLength(usize),

    #[error("identifier must be hexadecimal")]
    InvalidHex,
}

pub struct TypedId<T>([u8; ID_BYTES], PhantomData<T>);

impl<T> TypedId<T> {
    pub const fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
        Self(bytes, PhantomData)
    }

    /// Generate a fresh identifier: 4 bytes of big-endian Unix seconds
    /// followed by 8 random bytes.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; ID_BYTES];

        let seconds = u32::try_from(Timestamp::now().as_second()).unwrap_or(u32::MAX);
        let (head, tail) = bytes.split_at_mut(4);

        head.copy_from_slice(&seconds.to_be_bytes());
        OsRng.fill_bytes(tail);

        Self::from_bytes(bytes)
    }
}

impl<T> FromStr for TypedId<T> {
    type Err = IdParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.len() != ID_HEX_LEN {
            return Err(IdParseError::InvalidLength(value.len()));
        }

        let mut bytes = [0_u8; ID_BYTES];

        hex::decode_to_slice(value, &mut bytes).map_err(|_| IdParseError::InvalidHex)?;

        Ok(Self::from_bytes(bytes))
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedId<T> {}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "TypedId({self})")
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&hex::encode(self.0))
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}
