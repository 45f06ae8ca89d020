//! Random OT wire messages
//!
//! Every message has a fixed size, independent of the receiver's choice bit.

use crate::schnorr::{DLogProof, PROOF_BYTES};
use crate::types::{hex_array, Pad, OT_BYTES, POINT_BYTES};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Encoded length of a [`SetupMessage`]
pub const SETUP_MESSAGE_BYTES: usize = POINT_BYTES + PROOF_BYTES;

/// Encoded length of a [`SenderRound2Message`]
pub const DECOMMITMENT_BYTES: usize = 2 * OT_BYTES;

fn fixed<const N: usize>(bytes: &[u8], what: &str) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        Error::Deserialization(format!(
            "Invalid {} length: expected {}, got {}",
            what,
            N,
            bytes.len()
        ))
    })
}

/// Setup message: sender -> receiver, sent once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupMessage {
    /// Sender public key `B = b·G`
    #[serde(with = "hex_array")]
    pub public_key: [u8; POINT_BYTES],
    /// Proof of knowledge of `b`
    pub proof: DLogProof,
}

impl SetupMessage {
    pub fn to_bytes(&self) -> [u8; SETUP_MESSAGE_BYTES] {
        let mut out = [0u8; SETUP_MESSAGE_BYTES];
        out[..POINT_BYTES].copy_from_slice(&self.public_key);
        out[POINT_BYTES..].copy_from_slice(&self.proof.to_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; SETUP_MESSAGE_BYTES] = fixed(bytes, "setup message")?;
        Ok(Self {
            public_key: fixed(&bytes[..POINT_BYTES], "public key")?,
            proof: DLogProof::from_bytes(&bytes[POINT_BYTES..])?,
        })
    }
}

/// Round 1 message: receiver -> sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverRound1Message {
    /// Either `A` or `A + B`, depending on the choice bit
    #[serde(with = "hex_array")]
    pub point: [u8; POINT_BYTES],
}

impl ReceiverRound1Message {
    pub fn to_bytes(&self) -> [u8; POINT_BYTES] {
        self.point
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            point: fixed(bytes, "round 1 point")?,
        })
    }
}

/// Round 1 reply: sender -> receiver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderRound1Message {
    /// `H(H(rand1)) ^ H(H(rand0))`
    #[serde(with = "hex_array")]
    pub challenge: Pad,
}

impl SenderRound1Message {
    pub fn to_bytes(&self) -> Pad {
        self.challenge
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            challenge: fixed(bytes, "challenge")?,
        })
    }
}

/// Round 2 message: receiver -> sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverRound2Message {
    /// Answer to the challenge, equal to `H(H(rand0))` for an honest receiver
    #[serde(with = "hex_array")]
    pub response: Pad,
}

impl ReceiverRound2Message {
    pub fn to_bytes(&self) -> Pad {
        self.response
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            response: fixed(bytes, "response")?,
        })
    }
}

/// Round 2 reply: sender -> receiver, opening the challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderRound2Message {
    /// `H(rand0)`
    #[serde(with = "hex_array")]
    pub decommit0: Pad,
    /// `H(rand1)`
    #[serde(with = "hex_array")]
    pub decommit1: Pad,
}

impl SenderRound2Message {
    pub fn to_bytes(&self) -> [u8; DECOMMITMENT_BYTES] {
        let mut out = [0u8; DECOMMITMENT_BYTES];
        out[..OT_BYTES].copy_from_slice(&self.decommit0);
        out[OT_BYTES..].copy_from_slice(&self.decommit1);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; DECOMMITMENT_BYTES] = fixed(bytes, "decommitment")?;
        Ok(Self {
            decommit0: fixed(&bytes[..OT_BYTES], "decommitment")?,
            decommit1: fixed(&bytes[OT_BYTES..], "decommitment")?,
        })
    }
}
