//! Receiver side of a random OT execution

use super::messages::{
    ReceiverRound1Message, ReceiverRound2Message, SenderRound1Message, SenderRound2Message,
};
use super::setup::ReceiverSetup;
use super::{xor, Phase};
use crate::curve::encode_point;
use crate::oracle::RandomOracle;
use crate::types::{Pad, POINT_BYTES};
use crate::{Error, Result};
use k256::{elliptic_curve::Field, ProjectivePoint, Scalar};
use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use tracing::{debug, instrument, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Zeroize, ZeroizeOnDrop)]
struct Round1State {
    /// `H(a·B)`
    rand_choice: Pad,
}

#[derive(Zeroize, ZeroizeOnDrop)]
struct Round2State {
    rand_choice: Pad,
    received_challenge: Pad,
    /// `H(H(rand_choice))`
    hh_rand_choice: Pad,
}

enum ReceiverState {
    AwaitingRound1,
    AwaitingRound2(Round1State),
    AwaitingRound3(Round2State),
    Done,
}

/// Receiver state for a single random OT execution.
///
/// Every step that depends on the choice bit uses constant-time selection.
pub struct RandomOtReceiver {
    public_key: ProjectivePoint,
    oracle: RandomOracle,
    choice: Choice,
    state: ReceiverState,
}

impl RandomOtReceiver {
    /// Start an execution keyed by `nonce` (32 bytes, unique per execution).
    ///
    /// `choice` selects which of the sender's two pads is received.
    pub fn new(nonce: &[u8], setup: &ReceiverSetup, choice: Choice) -> Result<Self> {
        Ok(Self {
            public_key: setup.public_key,
            oracle: RandomOracle::new(nonce)?,
            choice,
            state: ReceiverState::AwaitingRound1,
        })
    }

    /// Current phase of the session
    pub fn phase(&self) -> Phase {
        match self.state {
            ReceiverState::AwaitingRound1 => Phase::AwaitingRound1,
            ReceiverState::AwaitingRound2(_) => Phase::AwaitingRound2,
            ReceiverState::AwaitingRound3(_) => Phase::AwaitingRound3,
            ReceiverState::Done => Phase::Done,
        }
    }

    fn unexpected(&self, operation: &'static str) -> Error {
        Error::UnexpectedRound {
            phase: self.phase(),
            operation,
        }
    }

    /// Start the execution: send `A` for choice 0 or `A + B` for choice 1
    #[instrument(skip_all)]
    pub fn round1<R: CryptoRngCore>(&mut self, rng: &mut R) -> Result<ReceiverRound1Message> {
        if !matches!(self.state, ReceiverState::AwaitingRound1) {
            return Err(self.unexpected("receiver round1"));
        }

        let mut a = Scalar::random(&mut *rng);
        let big_a = ProjectivePoint::GENERATOR * a;

        let a_bytes = encode_point(&big_a);
        let a_plus_b_bytes = encode_point(&(big_a + self.public_key));
        let point = <[u8; POINT_BYTES]>::conditional_select(&a_bytes, &a_plus_b_bytes, self.choice);

        let rand_choice = self.oracle.digest(&encode_point(&(self.public_key * a)));
        a.zeroize();

        self.state = ReceiverState::AwaitingRound2(Round1State { rand_choice });

        debug!("Receiver round 1 completed");
        Ok(ReceiverRound1Message { point })
    }

    /// Answer the sender's challenge
    #[instrument(skip_all)]
    pub fn round2(&mut self, msg: &SenderRound1Message) -> Result<ReceiverRound2Message> {
        let round1 = match std::mem::replace(&mut self.state, ReceiverState::Done) {
            ReceiverState::AwaitingRound2(round1) => round1,
            other => {
                self.state = other;
                return Err(self.unexpected("receiver round2"));
            }
        };

        // response = H(H(rand_choice)) ^ (choice · challenge)
        let h_rand_choice = self.oracle.digest(&round1.rand_choice);
        let hh_rand_choice = self.oracle.digest(&h_rand_choice);
        let response = <Pad>::conditional_select(
            &hh_rand_choice,
            &xor(&hh_rand_choice, &msg.challenge),
            self.choice,
        );

        self.state = ReceiverState::AwaitingRound3(Round2State {
            rand_choice: round1.rand_choice,
            received_challenge: msg.challenge,
            hh_rand_choice,
        });

        debug!("Receiver round 2 completed");
        Ok(ReceiverRound2Message { response })
    }

    /// Verify the sender's openings and return the chosen pad.
    ///
    /// Both checks are always evaluated and fail with the same error.
    #[instrument(skip_all)]
    pub fn round3(&mut self, msg: &SenderRound2Message) -> Result<Pad> {
        let round2 = match std::mem::replace(&mut self.state, ReceiverState::Done) {
            ReceiverState::AwaitingRound3(round2) => round2,
            other => {
                self.state = other;
                return Err(self.unexpected("receiver round3"));
            }
        };

        let h_decommit0 = self.oracle.digest(&msg.decommit0);
        let h_decommit1 = self.oracle.digest(&msg.decommit1);

        let actual_challenge = xor(&h_decommit0, &h_decommit1);
        let challenge_ok = round2.received_challenge[..].ct_eq(&actual_challenge[..]);

        let h_decommit_choice = <Pad>::conditional_select(&h_decommit0, &h_decommit1, self.choice);
        let choice_ok = h_decommit_choice[..].ct_eq(&round2.hh_rand_choice[..]);

        if !bool::from(challenge_ok & choice_ok) {
            warn!("Sender decommitment does not match challenge");
            return Err(Error::DecommitmentMismatch);
        }

        debug!("Receiver round 3 completed");
        Ok(round2.rand_choice)
    }
}
