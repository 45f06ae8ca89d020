//! Sender side of a random OT execution

use super::messages::{
    ReceiverRound1Message, ReceiverRound2Message, SenderRound1Message, SenderRound2Message,
};
use super::setup::SenderSetup;
use super::{xor, Phase};
use crate::curve::{decode_point, encode_point};
use crate::oracle::RandomOracle;
use crate::types::Pad;
use crate::{Error, Result};
use subtle::ConstantTimeEq;
use tracing::{debug, instrument, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Sender's output: both random pads
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RandomOtSendResult {
    /// Pad learned by a receiver with choice 0
    pub rand0: Pad,
    /// Pad learned by a receiver with choice 1
    pub rand1: Pad,
}

/// Values fixed in round 1 and opened in round 2
#[derive(Zeroize, ZeroizeOnDrop)]
struct Commitments {
    rand0: Pad,
    rand1: Pad,
    decommit0: Pad,
    decommit1: Pad,
    /// `H(H(rand0))`, the only response an honest receiver can produce
    h_decommit0: Pad,
}

enum SenderState {
    AwaitingRound1,
    AwaitingRound2(Commitments),
    Done,
}

/// Sender state for a single random OT execution.
///
/// Borrows the long-lived [`SenderSetup`]; create one per execution.
pub struct RandomOtSender<'a> {
    setup: &'a SenderSetup,
    oracle: RandomOracle,
    state: SenderState,
}

impl<'a> RandomOtSender<'a> {
    /// Start an execution keyed by `nonce` (32 bytes, unique per execution)
    pub fn new(nonce: &[u8], setup: &'a SenderSetup) -> Result<Self> {
        Ok(Self {
            setup,
            oracle: RandomOracle::new(nonce)?,
            state: SenderState::AwaitingRound1,
        })
    }

    /// Current phase of the session
    pub fn phase(&self) -> Phase {
        match self.state {
            SenderState::AwaitingRound1 => Phase::AwaitingRound1,
            SenderState::AwaitingRound2(_) => Phase::AwaitingRound2,
            SenderState::Done => Phase::Done,
        }
    }

    fn unexpected(&self, operation: &'static str) -> Error {
        Error::UnexpectedRound {
            phase: self.phase(),
            operation,
        }
    }

    /// Derive both pads from the receiver's point and commit to them
    #[instrument(skip_all)]
    pub fn round1(&mut self, msg: &ReceiverRound1Message) -> Result<SenderRound1Message> {
        if !matches!(self.state, SenderState::AwaitingRound1) {
            return Err(self.unexpected("sender round1"));
        }
        self.state = SenderState::Done;

        // rand0 = H(b·A'), rand1 = H(b·(A' - B))
        let point = decode_point(&msg.point)?;
        let b_point = point * self.setup.b;

        let rand0 = self.oracle.digest(&encode_point(&b_point));
        let rand1 = self
            .oracle
            .digest(&encode_point(&(b_point - self.setup.b_public_key)));

        // challenge = H(H(rand1)) ^ H(H(rand0))
        let decommit0 = self.oracle.digest(&rand0);
        let decommit1 = self.oracle.digest(&rand1);
        let h_decommit0 = self.oracle.digest(&decommit0);
        let challenge = xor(&self.oracle.digest(&decommit1), &h_decommit0);

        self.state = SenderState::AwaitingRound2(Commitments {
            rand0,
            rand1,
            decommit0,
            decommit1,
            h_decommit0,
        });

        debug!("Sender round 1 completed");
        Ok(SenderRound1Message { challenge })
    }

    /// Check the receiver's response and open the commitments
    #[instrument(skip_all)]
    pub fn round2(
        &mut self,
        msg: &ReceiverRound2Message,
    ) -> Result<(SenderRound2Message, RandomOtSendResult)> {
        let commitments = match std::mem::replace(&mut self.state, SenderState::Done) {
            SenderState::AwaitingRound2(commitments) => commitments,
            other => {
                self.state = other;
                return Err(self.unexpected("sender round2"));
            }
        };

        if !bool::from(msg.response[..].ct_eq(&commitments.h_decommit0[..])) {
            warn!("Receiver response does not match commitment");
            return Err(Error::InvalidResponse);
        }

        debug!("Sender round 2 completed");
        Ok((
            SenderRound2Message {
                decommit0: commitments.decommit0,
                decommit1: commitments.decommit1,
            },
            RandomOtSendResult {
                rand0: commitments.rand0,
                rand1: commitments.rand1,
            },
        ))
    }
}
