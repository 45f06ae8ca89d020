//! Schnorr proof of knowledge of a discrete log
//!
//! Non-interactive via Fiat-Shamir over a `merlin` transcript. The prover
//! shows knowledge of `x` with `X = x·G`:
//! 1. commit `T = k·G` for a random `k`
//! 2. derive `c` from the transcript, the context, `X` and `T`
//! 3. respond `z = k + c·x`
//!
//! The verifier checks `z·G == T + c·X`.

use crate::curve::{decode_point, decode_scalar, encode_point, encode_scalar};
use crate::types::{hex_array, POINT_BYTES, SCALAR_BYTES};
use crate::{Error, Result};
use k256::{
    elliptic_curve::{bigint::U256, ops::Reduce, Field},
    ProjectivePoint, Scalar,
};
use merlin::Transcript;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Encoded proof length: commitment point followed by response scalar
pub const PROOF_BYTES: usize = POINT_BYTES + SCALAR_BYTES;

/// Proof of knowledge of a discrete log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DLogProof {
    /// Commitment `T = k·G`
    #[serde(with = "hex_array")]
    pub commitment: [u8; POINT_BYTES],
    /// Response `z = k + c·x`
    #[serde(with = "hex_array")]
    pub response: [u8; SCALAR_BYTES],
}

impl DLogProof {
    /// Prove knowledge of `secret` for `public = secret·G`
    pub fn prove<R: CryptoRngCore>(
        transcript: &mut Transcript,
        public: &ProjectivePoint,
        secret: &Scalar,
        context: &[u8],
        rng: &mut R,
    ) -> Self {
        let mut k = Scalar::random(&mut *rng);
        let commitment = encode_point(&(ProjectivePoint::GENERATOR * k));

        let c = challenge(transcript, public, &commitment, context);
        let response = encode_scalar(&(k + c * secret));
        k.zeroize();

        Self {
            commitment,
            response,
        }
    }

    /// Verify the proof against `public` under the same transcript state and context
    pub fn verify(&self, transcript: &mut Transcript, public: &ProjectivePoint, context: &[u8]) -> bool {
        let (commitment, response) = match (
            decode_point(&self.commitment),
            decode_scalar(&self.response),
        ) {
            (Ok(commitment), Ok(response)) => (commitment, response),
            _ => return false,
        };

        let c = challenge(transcript, public, &self.commitment, context);
        ProjectivePoint::GENERATOR * response == commitment + *public * c
    }

    /// Encode as `commitment || response`
    pub fn to_bytes(&self) -> [u8; PROOF_BYTES] {
        let mut out = [0u8; PROOF_BYTES];
        out[..POINT_BYTES].copy_from_slice(&self.commitment);
        out[POINT_BYTES..].copy_from_slice(&self.response);
        out
    }

    /// Decode from `commitment || response`.
    ///
    /// Only the length is checked here; point and scalar validity are
    /// checked by [`DLogProof::verify`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PROOF_BYTES {
            return Err(Error::Deserialization(format!(
                "Invalid proof length: expected {}, got {}",
                PROOF_BYTES,
                bytes.len()
            )));
        }

        let mut commitment = [0u8; POINT_BYTES];
        let mut response = [0u8; SCALAR_BYTES];
        commitment.copy_from_slice(&bytes[..POINT_BYTES]);
        response.copy_from_slice(&bytes[POINT_BYTES..]);

        Ok(Self {
            commitment,
            response,
        })
    }
}

fn challenge(
    transcript: &mut Transcript,
    public: &ProjectivePoint,
    commitment: &[u8; POINT_BYTES],
    context: &[u8],
) -> Scalar {
    transcript.append_message(b"dlog-proof/context", context);
    transcript.append_message(b"dlog-proof/public-key", &encode_point(public));
    transcript.append_message(b"dlog-proof/commitment", commitment);

    let mut bytes = [0u8; SCALAR_BYTES];
    transcript.challenge_bytes(b"dlog-proof/challenge", &mut bytes);
    <Scalar as Reduce<U256>>::reduce_bytes(&bytes.into())
}
