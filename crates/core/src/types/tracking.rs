//! Customer-facing order tracking identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A 12-character uppercase hexadecimal order tracking identifier.
///
/// Generated once at order creation from a random 128-bit value and never
/// reassigned. Uniqueness is enforced by the database constraint on the
/// orders table; at 48 bits of entropy a collision is treated as negligible
/// rather than retried.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TrackingId(String);

impl TrackingId {
    /// Length of a tracking identifier in characters.
    pub const LENGTH: usize = 12;

    /// Generate a fresh tracking identifier.
    #[must_use]
    pub fn generate() -> Self {
        let hex = format!("{:032X}", uuid::Uuid::new_v4().as_u128());
        let mut hex = hex;
        hex.truncate(Self::LENGTH);
        Self(hex)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for TrackingId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for TrackingId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for TrackingId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_format() {
        let id = TrackingId::generate();
        assert_eq!(id.as_str().len(), TrackingId::LENGTH);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase())
        );
    }

    #[test]
    fn test_generate_is_random() {
        assert_ne!(TrackingId::generate(), TrackingId::generate());
    }

    #[test]
    fn test_serde_transparent() {
        let id = TrackingId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_str()));
    }
}
