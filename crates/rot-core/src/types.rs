//! Shared constants, type aliases and serde helpers

/// Security parameter: bytes of every pad, commitment and challenge
pub const OT_BYTES: usize = 32;

/// Length of the per-execution nonce keying the random oracle
pub const NONCE_BYTES: usize = 32;

/// Length of a SEC1 compressed secp256k1 point
pub const POINT_BYTES: usize = 33;

/// Length of a canonical secp256k1 scalar
pub const SCALAR_BYTES: usize = 32;

/// A random pad produced by an OT execution
pub type Pad = [u8; OT_BYTES];

/// Per-execution nonce
pub type Nonce = [u8; NONCE_BYTES];

/// Fixed-size byte arrays as hex strings
pub(crate) mod hex_array {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let bytes = hex::decode(&encoded).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("Invalid byte array length"))
    }
}

/// Scalars as canonical big-endian hex
pub(crate) mod scalar_serde {
    use crate::curve::decode_scalar;
    use k256::Scalar;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(scalar: &Scalar, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(scalar.to_bytes()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Scalar, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let bytes = hex::decode(&encoded).map_err(serde::de::Error::custom)?;
        decode_scalar(&bytes).map_err(serde::de::Error::custom)
    }
}

/// Points as compressed SEC1 hex
pub(crate) mod point_serde {
    use crate::curve::{decode_point, encode_point};
    use k256::ProjectivePoint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(point: &ProjectivePoint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(encode_point(point)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ProjectivePoint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let bytes = hex::decode(&encoded).map_err(serde::de::Error::custom)?;
        decode_point(&bytes).map_err(serde::de::Error::custom)
    }
}
