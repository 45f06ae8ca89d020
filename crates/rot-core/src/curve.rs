//! secp256k1 helpers shared by the OT and signature code
//!
//! Group arithmetic itself comes from `k256`; this module only fixes the
//! encodings the protocols agree on.

use crate::types::{POINT_BYTES, SCALAR_BYTES};
use crate::{Error, Result};
use k256::{
    elliptic_curve::{
        bigint::U256, group::GroupEncoding, ops::Reduce, point::AffineCoordinates,
        sec1::FromEncodedPoint, Group, PrimeField,
    },
    AffinePoint, FieldBytes, ProjectivePoint, Scalar,
};
use subtle::Choice;

/// Encode a point in SEC1 compressed form
pub fn encode_point(point: &ProjectivePoint) -> [u8; POINT_BYTES] {
    let mut out = [0u8; POINT_BYTES];
    out.copy_from_slice(&point.to_bytes());
    out
}

/// Decode a SEC1 point, rejecting the identity
pub fn decode_point(bytes: &[u8]) -> Result<ProjectivePoint> {
    let encoded =
        k256::EncodedPoint::from_bytes(bytes).map_err(|e| Error::Deserialization(e.to_string()))?;
    let affine_opt = AffinePoint::from_encoded_point(&encoded);
    let affine: AffinePoint = Option::<AffinePoint>::from(affine_opt)
        .ok_or_else(|| Error::Deserialization("Invalid curve point".into()))?;
    let point = ProjectivePoint::from(affine);

    if bool::from(point.is_identity()) {
        return Err(Error::Deserialization("Identity point".into()));
    }

    Ok(point)
}

/// Decode a canonical big-endian scalar
pub fn decode_scalar(bytes: &[u8]) -> Result<Scalar> {
    let array: [u8; SCALAR_BYTES] = bytes
        .try_into()
        .map_err(|_| Error::Deserialization("Invalid scalar length".into()))?;
    Option::<Scalar>::from(Scalar::from_repr(array.into()))
        .ok_or_else(|| Error::Deserialization("Scalar out of range".into()))
}

/// Encode a scalar as 32 big-endian bytes
pub fn encode_scalar(scalar: &Scalar) -> [u8; SCALAR_BYTES] {
    let mut out = [0u8; SCALAR_BYTES];
    out.copy_from_slice(&scalar.to_bytes());
    out
}

/// Big-endian X coordinate of a point
pub fn x_bytes(point: &ProjectivePoint) -> [u8; SCALAR_BYTES] {
    let mut out = [0u8; SCALAR_BYTES];
    out.copy_from_slice(&point.to_affine().x());
    out
}

/// X coordinate of a point, reduced mod n
pub fn x_scalar(point: &ProjectivePoint) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&point.to_affine().x())
}

/// Parity of the Y coordinate
pub fn is_odd_y(point: &ProjectivePoint) -> Choice {
    point.to_affine().y_is_odd()
}

/// Interpret a message hash as a scalar.
///
/// Uses the leftmost 32 bytes, left-padding shorter hashes, reduced mod n.
pub fn scalar_from_hash(hash: &[u8]) -> Scalar {
    let mut bytes = FieldBytes::default();
    let len = hash.len().min(SCALAR_BYTES);
    bytes[SCALAR_BYTES - len..].copy_from_slice(&hash[..len]);
    <Scalar as Reduce<U256>>::reduce_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::elliptic_curve::Field;
    use rand::rngs::OsRng;

    #[test]
    fn test_point_encoding() {
        let point = ProjectivePoint::GENERATOR * Scalar::random(&mut OsRng);
        let bytes = encode_point(&point);

        assert!(bytes[0] == 0x02 || bytes[0] == 0x03);
        assert_eq!(decode_point(&bytes).unwrap(), point);
    }

    #[test]
    fn test_decode_rejects_identity_and_garbage() {
        let identity = encode_point(&ProjectivePoint::IDENTITY);
        assert!(decode_point(&identity).is_err());
        assert!(decode_point(&[0u8]).is_err());
        assert!(decode_point(&[0x05; POINT_BYTES]).is_err());
    }

    #[test]
    fn test_decode_scalar_range() {
        assert!(decode_scalar(&[0xff; SCALAR_BYTES]).is_err());
        assert!(decode_scalar(&[1u8; 31]).is_err());

        let scalar = Scalar::random(&mut OsRng);
        assert_eq!(decode_scalar(&scalar.to_bytes()).unwrap(), scalar);
    }

    #[test]
    fn test_scalar_from_short_hash() {
        assert_eq!(scalar_from_hash(&[0x01]), Scalar::ONE);
        assert_eq!(scalar_from_hash(&[]), Scalar::ZERO);

        let mut long = [0u8; 40];
        long[31] = 7;
        long[39] = 0xff;
        assert_eq!(scalar_from_hash(&long), Scalar::from(7u64));
    }

    #[test]
    fn test_x_scalar_matches_x_bytes() {
        let point = ProjectivePoint::GENERATOR * Scalar::from(12345u64);
        assert_eq!(scalar_from_hash(&x_bytes(&point)), x_scalar(&point));
    }
}
