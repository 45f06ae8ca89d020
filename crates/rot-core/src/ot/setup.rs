//! One-time setup for random OT
//!
//! The sender publishes `B = b·G` with a proof of knowledge of `b`. Both
//! results can be persisted and reused for any number of executions, each
//! with its own nonce.

use super::messages::SetupMessage;
use crate::curve::{decode_point, encode_point};
use crate::schnorr::DLogProof;
use crate::types::{point_serde, scalar_serde};
use crate::{Error, Result};
use k256::{elliptic_curve::Field, ProjectivePoint, Scalar};
use merlin::Transcript;
use rand_core::CryptoRngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, instrument, warn};
use zeroize::Zeroize;

const SETUP_TRANSCRIPT_LABEL: &[u8] = b"rot-core/random-ot/setup";

fn setup_transcript() -> Transcript {
    Transcript::new(SETUP_TRANSCRIPT_LABEL)
}

/// Sender state kept after setup.
///
/// Owns the secret `b`; not `Clone`, and `b` is zeroed on drop.
#[derive(Serialize, Deserialize)]
pub struct SenderSetup {
    #[serde(with = "scalar_serde")]
    pub(super) b: Scalar,
    #[serde(with = "point_serde")]
    pub(super) public_key: ProjectivePoint,
    /// `b·B`
    #[serde(with = "point_serde")]
    pub(super) b_public_key: ProjectivePoint,
}

impl SenderSetup {
    /// The public key `B`
    pub fn public_key(&self) -> ProjectivePoint {
        self.public_key
    }
}

impl fmt::Debug for SenderSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderSetup")
            .field("public_key", &hex::encode(encode_point(&self.public_key)))
            .finish_non_exhaustive()
    }
}

impl Drop for SenderSetup {
    fn drop(&mut self) {
        self.b.zeroize();
    }
}

/// Receiver state kept after setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverSetup {
    #[serde(with = "point_serde")]
    pub(super) public_key: ProjectivePoint,
}

impl ReceiverSetup {
    /// The sender's public key `B`
    pub fn public_key(&self) -> ProjectivePoint {
        self.public_key
    }
}

/// Run the sender's side of the setup.
///
/// `context` binds the proof to the surrounding protocol.
#[instrument(skip_all)]
pub fn setup_send<R: CryptoRngCore>(context: &[u8], rng: &mut R) -> (SetupMessage, SenderSetup) {
    let b = Scalar::random(&mut *rng);
    let public_key = ProjectivePoint::GENERATOR * b;
    let proof = DLogProof::prove(&mut setup_transcript(), &public_key, &b, context, rng);

    let msg = SetupMessage {
        public_key: encode_point(&public_key),
        proof,
    };

    info!(
        public_key = hex::encode(msg.public_key),
        "Random OT setup created"
    );

    let setup = SenderSetup {
        b,
        public_key,
        b_public_key: public_key * b,
    };

    (msg, setup)
}

/// Run the receiver's side of the setup, verifying the sender's proof.
///
/// Any malformed point or proof is reported as [`Error::ProofInvalid`].
#[instrument(skip_all)]
pub fn setup_receive(context: &[u8], msg: &SetupMessage) -> Result<ReceiverSetup> {
    let public_key = decode_point(&msg.public_key).map_err(|e| {
        warn!(error = %e, "Setup public key failed to decode");
        Error::ProofInvalid
    })?;

    if !msg.proof.verify(&mut setup_transcript(), &public_key, context) {
        warn!("Setup proof failed to verify");
        return Err(Error::ProofInvalid);
    }

    info!(
        public_key = hex::encode(msg.public_key),
        "Random OT setup accepted"
    );

    Ok(ReceiverSetup { public_key })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::POINT_BYTES;
    use rand::rngs::OsRng;
    use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};

    #[test]
    fn test_setup_roundtrip() {
        let (msg, sender) = setup_send(b"ctx", &mut OsRng);
        let receiver = setup_receive(b"ctx", &msg).unwrap();

        assert_eq!(receiver.public_key(), sender.public_key());
        assert_eq!(sender.b_public_key, sender.public_key * sender.b);
        assert_eq!(ProjectivePoint::GENERATOR * sender.b, sender.public_key);
    }

    #[test]
    fn test_setup_wrong_context() {
        let (msg, _sender) = setup_send(b"ctx", &mut OsRng);

        assert!(matches!(
            setup_receive(b"other", &msg),
            Err(Error::ProofInvalid)
        ));
    }

    #[test]
    fn test_setup_corrupted_proof() {
        let (msg, _sender) = setup_send(b"ctx", &mut OsRng);

        let mut bad = msg.clone();
        bad.proof.response[31] ^= 0x01;
        assert!(matches!(setup_receive(b"ctx", &bad), Err(Error::ProofInvalid)));

        let mut bad = msg;
        bad.proof.commitment[0] ^= 0x01;
        assert!(matches!(setup_receive(b"ctx", &bad), Err(Error::ProofInvalid)));
    }

    #[test]
    fn test_setup_corrupted_point() {
        let (msg, _sender) = setup_send(b"ctx", &mut OsRng);

        for i in [0, 1, POINT_BYTES / 2, POINT_BYTES - 1] {
            let mut bad = msg.clone();
            bad.public_key[i] ^= 0x01;
            assert!(matches!(setup_receive(b"ctx", &bad), Err(Error::ProofInvalid)));
        }
    }

    #[test]
    fn test_setup_message_bytes() {
        let (msg, _sender) = setup_send(b"ctx", &mut OsRng);
        let decoded = SetupMessage::from_bytes(&msg.to_bytes()).unwrap();

        assert_eq!(decoded, msg);
        assert!(setup_receive(b"ctx", &decoded).is_ok());
    }

    #[test]
    fn test_setup_persistence() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let (msg, sender) = setup_send(b"ctx", &mut rng);
        let receiver = setup_receive(b"ctx", &msg).unwrap();

        let sender_json = serde_json::to_string(&sender).unwrap();
        let receiver_json = serde_json::to_string(&receiver).unwrap();

        let restored: SenderSetup = serde_json::from_str(&sender_json).unwrap();
        let restored_receiver: ReceiverSetup = serde_json::from_str(&receiver_json).unwrap();

        assert_eq!(restored.b, sender.b);
        assert_eq!(restored.b_public_key, sender.b_public_key);
        assert_eq!(restored_receiver, receiver);
    }

    #[test]
    fn test_debug_hides_secret() {
        let (_msg, sender) = setup_send(b"ctx", &mut OsRng);
        let debug = format!("{:?}", sender);

        assert!(!debug.contains(&hex::encode(sender.b.to_bytes())));
    }
}
