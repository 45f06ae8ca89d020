//! Threshold-friendly ECDSA signatures
//!
//! A signature keeps the full nonce point `R` instead of only `r = R.x`, so
//! verification compares curve points. This is the form produced by
//! threshold signing, where `R` is known to every signer.

use crate::curve::{
    decode_point, decode_scalar, encode_point, encode_scalar, is_odd_y, scalar_from_hash,
    x_bytes, x_scalar,
};
use crate::types::{point_serde, scalar_serde, POINT_BYTES, SCALAR_BYTES};
use crate::{Error, Result};
use k256::{
    elliptic_curve::{scalar::IsHigh, Group},
    ProjectivePoint, Scalar,
};
use serde::{Deserialize, Serialize};
use subtle::ConditionallySelectable;

/// Length of the `R || S` encoding
pub const SIGNATURE_BYTES: usize = POINT_BYTES + SCALAR_BYTES;

/// Length of the Ethereum `[R.x || S || V]` encoding
pub const COMPACT_SIGNATURE_BYTES: usize = 65;

/// ECDSA signature (R, S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Nonce point
    #[serde(with = "point_serde")]
    pub r: ProjectivePoint,
    /// S component
    #[serde(with = "scalar_serde")]
    pub s: Scalar,
}

impl Signature {
    /// Create a new signature
    pub fn new(r: ProjectivePoint, s: Scalar) -> Self {
        Self { r, s }
    }

    /// Verify against a public key and message hash.
    ///
    /// Checks `s⁻¹·(m·G + r·X) == R` with `r = R.x mod n`.
    pub fn verify(&self, public_key: &ProjectivePoint, hash: &[u8]) -> bool {
        let Some(s_inv) = Option::<Scalar>::from(self.s.invert()) else {
            return false;
        };
        if bool::from(self.r.is_identity()) || bool::from(public_key.is_identity()) {
            return false;
        }

        let m = scalar_from_hash(hash);
        let r = x_scalar(&self.r);
        let candidate = (ProjectivePoint::GENERATOR * m + *public_key * r) * s_inv;

        candidate == self.r
    }

    /// Serialize to the compact `[R.x || S || V]` format used by Ethereum.
    ///
    /// `S` is normalized to the lower half of the order; `V` is the parity
    /// of `R.y`, flipped when `S` was negated.
    pub fn to_compact_eth(&self) -> [u8; COMPACT_SIGNATURE_BYTES] {
        let high = self.s.is_high();
        let s = Scalar::conditional_select(&self.s, &-self.s, high);
        let recovery_id = is_odd_y(&self.r).unwrap_u8() ^ high.unwrap_u8();

        let mut out = [0u8; COMPACT_SIGNATURE_BYTES];
        out[..32].copy_from_slice(&x_bytes(&self.r));
        out[32..64].copy_from_slice(&encode_scalar(&s));
        out[64] = recovery_id;
        out
    }

    /// Encode as compressed `R` followed by `S`
    pub fn to_bytes(&self) -> [u8; SIGNATURE_BYTES] {
        let mut out = [0u8; SIGNATURE_BYTES];
        out[..POINT_BYTES].copy_from_slice(&encode_point(&self.r));
        out[POINT_BYTES..].copy_from_slice(&encode_scalar(&self.s));
        out
    }

    /// Decode from compressed `R` followed by `S`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_BYTES {
            return Err(Error::InvalidSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_BYTES,
                bytes.len()
            )));
        }

        let r = decode_point(&bytes[..POINT_BYTES])
            .map_err(|e| Error::InvalidSignature(e.to_string()))?;
        let s = decode_scalar(&bytes[POINT_BYTES..])
            .map_err(|e| Error::InvalidSignature(e.to_string()))?;

        Ok(Self { r, s })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
    use k256::elliptic_curve::{point::DecompressPoint, Field};
    use k256::AffinePoint;
    use rand::rngs::OsRng;
    use sha3::{Digest, Keccak256};
    use subtle::Choice;

    /// Sign with an explicit nonce: R = k·G, s = k⁻¹·(m + r·x)
    fn sign(secret: &Scalar, k: &Scalar, hash: &[u8]) -> Signature {
        let r_point = ProjectivePoint::GENERATOR * k;
        let r = x_scalar(&r_point);
        let m = scalar_from_hash(hash);
        let s = k.invert().unwrap() * (m + r * secret);
        Signature::new(r_point, s)
    }

    fn fixture() -> (ProjectivePoint, Vec<u8>, Signature) {
        let secret = Scalar::random(&mut OsRng);
        let k = Scalar::random(&mut OsRng);
        let hash = Keccak256::digest(b"threshold signing").to_vec();
        let sig = sign(&secret, &k, &hash);
        (ProjectivePoint::GENERATOR * secret, hash, sig)
    }

    #[test]
    fn test_verify_known_good() {
        let (public_key, hash, sig) = fixture();
        assert!(sig.verify(&public_key, &hash));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let (_, hash, sig) = fixture();
        let other = ProjectivePoint::GENERATOR * Scalar::random(&mut OsRng);
        assert!(!sig.verify(&other, &hash));
    }

    #[test]
    fn test_verify_rejects_zero_s() {
        let (public_key, hash, sig) = fixture();
        let zero = Signature::new(sig.r, Scalar::ZERO);
        assert!(!zero.verify(&public_key, &hash));
    }

    #[test]
    fn test_hash_bit_flips() {
        let (public_key, hash, sig) = fixture();

        for i in 0..hash.len() * 8 {
            let mut flipped = hash.clone();
            flipped[i / 8] ^= 1 << (i % 8);
            assert!(!sig.verify(&public_key, &flipped), "hash bit {}", i);
        }
    }

    #[test]
    fn test_signature_bit_flips() {
        let (public_key, hash, sig) = fixture();
        let bytes = sig.to_bytes();

        for i in 0..SIGNATURE_BYTES * 8 {
            let mut flipped = bytes;
            flipped[i / 8] ^= 1 << (i % 8);
            if let Ok(candidate) = Signature::from_bytes(&flipped) {
                assert!(!candidate.verify(&public_key, &hash), "signature bit {}", i);
            }
        }
    }

    #[test]
    fn test_compact_normalizes_s() {
        let (public_key, hash, sig) = fixture();

        // (-R, -S) verifies as well and must encode identically
        let mirrored = Signature::new(-sig.r, -sig.s);
        assert!(mirrored.verify(&public_key, &hash));
        assert_eq!(sig.to_compact_eth(), mirrored.to_compact_eth());

        let compact = sig.to_compact_eth();
        let s = decode_scalar(&compact[32..64]).unwrap();
        assert!(!bool::from(s.is_high()));
        assert!(compact[64] <= 1);
    }

    #[test]
    fn test_compact_recovers_public_key() {
        let (public_key, hash, sig) = fixture();
        let compact = sig.to_compact_eth();

        let ecdsa_sig = EcdsaSignature::from_slice(&compact[..64]).unwrap();
        let recovery_id = RecoveryId::from_byte(compact[64]).unwrap();
        let recovered = VerifyingKey::recover_from_prehash(&hash, &ecdsa_sig, recovery_id).unwrap();

        assert_eq!(recovered, VerifyingKey::from_affine(public_key.to_affine()).unwrap());
    }

    #[test]
    fn test_matches_k256_recoverable_signature() {
        let signing_key = SigningKey::random(&mut OsRng);
        let public_key = ProjectivePoint::from(*signing_key.verifying_key().as_affine());
        let hash = Keccak256::digest(b"eth message").to_vec();

        let (ecdsa_sig, recovery_id) = signing_key.sign_prehash_recoverable(&hash).unwrap();
        let y_is_odd = Choice::from(recovery_id.is_y_odd() as u8);
        let r_point = AffinePoint::decompress(&ecdsa_sig.r().to_bytes(), y_is_odd).unwrap();
        let sig = Signature::new(r_point.into(), *ecdsa_sig.s());

        assert!(sig.verify(&public_key, &hash));

        let compact = sig.to_compact_eth();
        assert_eq!(&compact[..64], ecdsa_sig.to_bytes().as_slice());
        assert_eq!(compact[64], recovery_id.to_byte());
    }

    #[test]
    fn test_from_bytes_rejects_malformed() {
        let (_, _, sig) = fixture();
        let bytes = sig.to_bytes();

        assert!(matches!(
            Signature::from_bytes(&bytes[..64]),
            Err(Error::InvalidSignature(_))
        ));

        let mut high = bytes;
        high[POINT_BYTES..].copy_from_slice(&[0xff; SCALAR_BYTES]);
        assert!(Signature::from_bytes(&high).is_err());

        assert_eq!(Signature::from_bytes(&bytes).unwrap(), sig);
    }

    #[test]
    fn test_json() {
        let (_, _, sig) = fixture();
        let json = serde_json::to_string(&sig).unwrap();
        let decoded: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, sig);
    }
}
