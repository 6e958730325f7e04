//! ID with type-safe markers for each resource.
//!
//! When IDs are simple integers then it may be easy to accidentally use the
//! ID of a user in the place of an ID of a message. This is a programmatic
//! error; it's logically invalid.
//!
//! By using IDs with typed markers, it can be ensured that only an ID with a
//! [`UserMarker`] can be used where an ID of a user is required.
//!
//! [`UserMarker`]: marker::UserMarker

pub mod marker;

use serde::{
    de::{Deserializer, Error as DeError, Unexpected, Visitor},
    Deserialize, Serialize, Serializer,
};
use std::{
    cmp::Ordering,
    error::Error,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
    num::NonZeroU64,
    str::FromStr,
};

/// Parsing an ID from a string failed.
#[derive(Debug)]
pub struct IdParseError {
    kind: IdParseErrorType,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl IdParseError {
    /// Immutable reference to the type of error that occurred.
    #[must_use = "retrieving the type has no effect if left unused"]
    pub const fn kind(&self) -> &IdParseErrorType {
        &self.kind
    }

    /// Consume the error, returning the source error if there is any.
    #[must_use = "consuming the error and retrieving the source has no effect if left unused"]
    pub fn into_source(self) -> Option<Box<dyn Error + Send + Sync>> {
        self.source
    }

    /// Consume the error, returning the owned error type and the source error.
    #[must_use = "consuming the error into its parts has no effect if left unused"]
    pub fn into_parts(self) -> (IdParseErrorType, Option<Box<dyn Error + Send + Sync>>) {
        (self.kind, self.source)
    }
}

impl Display for IdParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match &self.kind {
            IdParseErrorType::Empty => f.write_str("value is empty"),
            IdParseErrorType::InvalidCharacter { index } => {
                f.write_str("value contains a non ASCII digit character at index ")?;

                Display::fmt(index, f)
            }
            IdParseErrorType::Value => f.write_str("value is not a valid nonzero integer"),
        }
    }
}

impl Error for IdParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn Error + 'static))
    }
}

/// Type of [`IdParseError`] that occurred.
#[derive(Debug)]
#[non_exhaustive]
pub enum IdParseErrorType {
    /// Provided string is empty.
    Empty,
    /// Provided string contains a character other than an ASCII digit.
    InvalidCharacter {
        /// Byte index of the offending character.
        index: usize,
    },
    /// Provided string is composed of digits but is zero or out of range.
    Value,
}

/// ID of a resource, such as the ID of a [channel] or [user].
///
/// Markers themselves perform no logical action and are only used to ensure
/// that IDs of incorrect types aren't used. IDs can be converted to one
/// another via [`cast`].
///
/// [`cast`]: Self::cast
/// [channel]: marker::ChannelMarker
/// [user]: marker::UserMarker
#[repr(transparent)]
pub struct Id<T> {
    phantom: PhantomData<fn(T) -> T>,
    value: NonZeroU64,
}

impl<T> Id<T> {
    const fn from_nonzero(value: NonZeroU64) -> Self {
        Self {
            phantom: PhantomData,
            value,
        }
    }

    /// Create a new ID, panicking if the value is zero.
    ///
    /// This is primarily useful in const contexts where the value is known to
    /// be non-zero.
    ///
    /// # Panics
    ///
    /// Panics if the value is 0.
    #[track_caller]
    pub const fn new(n: u64) -> Self {
        if let Some(id) = Self::new_checked(n) {
            id
        } else {
            panic!("value is zero");
        }
    }

    /// Create a new ID if the value is not zero.
    pub const fn new_checked(n: u64) -> Option<Self> {
        if let Some(value) = NonZeroU64::new(n) {
            Some(Self::from_nonzero(value))
        } else {
            None
        }
    }

    /// Return the inner primitive value.
    pub const fn get(self) -> u64 {
        self.value.get()
    }

    /// Cast an ID from one type to another.
    pub const fn cast<New>(self) -> Id<New> {
        Id::from_nonzero(self.value)
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("Id")?;
        let type_name = std::any::type_name::<T>();

        // `any::type_name` includes the full module path; print only the
        // marker's base name.
        if let Some(position) = type_name.rfind("::") {
            if let Some(slice) = type_name.get(position + 2..) {
                f.write_str("<")?;
                f.write_str(slice)?;
                f.write_str(">")?;
            }
        }

        f.write_str("(")?;
        Debug::fmt(&self.value, f)?;

        f.write_str(")")
    }
}

impl<T> Display for Id<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.value, f)
    }
}

impl<T> Eq for Id<T> {}

impl<T> From<NonZeroU64> for Id<T> {
    fn from(value: NonZeroU64) -> Self {
        Self::from_nonzero(value)
    }
}

impl<T> From<Id<T>> for u64 {
    fn from(id: Id<T>) -> Self {
        id.get()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdParseError;

    /// Parse an ID from a string.
    ///
    /// Only non-empty strings composed entirely of ASCII digits are accepted;
    /// signs, whitespace, and other characters are rejected, since server
    /// identifiers are plain digit strings.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err(IdParseError {
                kind: IdParseErrorType::Empty,
                source: None,
            });
        }

        if let Some(index) = value.bytes().position(|byte| !byte.is_ascii_digit()) {
            return Err(IdParseError {
                kind: IdParseErrorType::InvalidCharacter { index },
                source: None,
            });
        }

        let parsed = value.parse::<u64>().map_err(|source| IdParseError {
            kind: IdParseErrorType::Value,
            source: Some(Box::new(source)),
        })?;

        Self::new_checked(parsed).ok_or(IdParseError {
            kind: IdParseErrorType::Value,
            source: None,
        })
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> PartialEq<u64> for Id<T> {
    fn eq(&self, other: &u64) -> bool {
        self.value.get() == *other
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor<T> {
            phantom: PhantomData<T>,
        }

        impl<'de, T> Visitor<'de> for IdVisitor<T> {
            type Value = Id<T>;

            fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str("an id as a string or integer")
            }

            fn visit_u64<E: DeError>(self, value: u64) -> Result<Self::Value, E> {
                Id::new_checked(value)
                    .ok_or_else(|| DeError::invalid_value(Unexpected::Unsigned(value), &self))
            }

            fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                value
                    .parse()
                    .map_err(|_| DeError::invalid_value(Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_any(IdVisitor {
            phantom: PhantomData,
        })
    }
}

impl<T> Serialize for Id<T> {
    /// Serialize as a string to avoid loss of precision in consumers that
    /// treat JSON numbers as doubles.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        marker::{
            ApplicationMarker, ChannelMarker, CommandMarker, GuildMarker, MessageMarker, UserMarker,
        },
        Id, IdParseError, IdParseErrorType,
    };
    use serde::{Deserialize, Serialize};
    use serde_test::Token;
    use static_assertions::assert_impl_all;
    use std::{
        collections::hash_map::DefaultHasher,
        error::Error,
        fmt::Debug,
        hash::{Hash, Hasher},
        num::NonZeroU64,
        str::FromStr,
    };

    assert_impl_all!(
        Id<ChannelMarker>: Clone,
        Copy,
        Debug,
        Deserialize<'static>,
        Eq,
        From<NonZeroU64>,
        FromStr,
        Hash,
        Ord,
        PartialEq,
        PartialOrd,
        Send,
        Serialize,
        Sync,
    );
    assert_impl_all!(IdParseError: Error, Send, Sync);
    assert_impl_all!(IdParseErrorType: Debug, Send, Sync);

    #[test]
    fn getters() {
        assert_eq!(123, Id::<UserMarker>::new(123).get());
        assert!(Id::<UserMarker>::new_checked(0).is_none());
    }

    #[test]
    fn cast() {
        let user = Id::<UserMarker>::new(12);
        let application: Id<ApplicationMarker> = user.cast();
        assert_eq!(application.get(), user.get());
    }

    #[test]
    fn parse() {
        assert_eq!(64, Id::<GuildMarker>::from_str("64").unwrap().get());

        assert!(matches!(
            Id::<GuildMarker>::from_str("").unwrap_err().kind(),
            IdParseErrorType::Empty,
        ));
        assert!(matches!(
            Id::<GuildMarker>::from_str("+64").unwrap_err().kind(),
            IdParseErrorType::InvalidCharacter { index: 0 },
        ));
        assert!(matches!(
            Id::<GuildMarker>::from_str("12a4").unwrap_err().kind(),
            IdParseErrorType::InvalidCharacter { index: 2 },
        ));
        assert!(matches!(
            Id::<GuildMarker>::from_str("0").unwrap_err().kind(),
            IdParseErrorType::Value,
        ));
        // Overflowing u64 is rejected through the same variant.
        assert!(matches!(
            Id::<GuildMarker>::from_str("99999999999999999999")
                .unwrap_err()
                .kind(),
            IdParseErrorType::Value,
        ));
    }

    #[test]
    fn serde() {
        let id = Id::<MessageMarker>::new(114_941_315_417_899_012);
        serde_test::assert_tokens(&id, &[Token::Str("114941315417899012")]);
        serde_test::assert_de_tokens(&id, &[Token::U64(114_941_315_417_899_012)]);
    }

    #[test]
    fn hash_and_eq() {
        let a = Id::<CommandMarker>::new(5);
        let b = Id::<CommandMarker>::new(5);
        assert_eq!(a, b);
        assert_eq!(a, 5);

        let mut hasher_a = DefaultHasher::new();
        let mut hasher_b = DefaultHasher::new();
        a.hash(&mut hasher_a);
        b.hash(&mut hasher_b);
        assert_eq!(hasher_a.finish(), hasher_b.finish());
    }

    #[test]
    fn debug() {
        let id = Id::<MessageMarker>::new(2);

        assert_eq!("Id<MessageMarker>(2)", format!("{id:?}"));
    }
}
