//! Random oblivious transfer
//!
//! A two-party, three-round 1-of-2 random OT secure against a malicious
//! peer on either side:
//! - [`setup`]: one-time key exchange, reusable across executions
//! - [`RandomOtReceiver`] / [`RandomOtSender`]: per-execution state machines
//!
//! Round order is fixed: receiver round 1, sender round 1, receiver
//! round 2, sender round 2, receiver round 3. The sender ends with two
//! random pads, the receiver with the one selected by its choice bit.
//!
//! Each execution must use a fresh nonce. Reusing a nonce with the same
//! setup breaks security and is not detected here.

pub mod messages;
mod receiver;
mod sender;
pub mod setup;

pub use messages::*;
pub use receiver::RandomOtReceiver;
pub use sender::{RandomOtSendResult, RandomOtSender};
pub use setup::{setup_receive, setup_send, ReceiverSetup, SenderSetup};

use crate::types::Pad;
use crate::Result;
use rand_core::CryptoRngCore;
use subtle::Choice;
use tracing::{debug, instrument};

/// Progress of an OT session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingRound1,
    AwaitingRound2,
    AwaitingRound3,
    /// Finished or aborted; the session cannot be used again
    Done,
}

pub(crate) fn xor(a: &Pad, b: &Pad) -> Pad {
    let mut out = *a;
    for (o, b) in out.iter_mut().zip(b.iter()) {
        *o ^= b;
    }
    out
}

/// Run one complete execution with both parties in-process.
///
/// Returns the sender's pads and the receiver's chosen pad.
#[instrument(skip_all, fields(nonce = %hex::encode(nonce)))]
pub fn execute<R: CryptoRngCore>(
    nonce: &[u8],
    sender_setup: &SenderSetup,
    receiver_setup: &ReceiverSetup,
    choice: Choice,
    rng: &mut R,
) -> Result<(RandomOtSendResult, Pad)> {
    let mut sender = RandomOtSender::new(nonce, sender_setup)?;
    let mut receiver = RandomOtReceiver::new(nonce, receiver_setup, choice)?;

    let receiver_round1 = receiver.round1(rng)?;
    let sender_round1 = sender.round1(&receiver_round1)?;
    let receiver_round2 = receiver.round2(&sender_round1)?;
    let (sender_round2, sent) = sender.round2(&receiver_round2)?;
    let received = receiver.round3(&sender_round2)?;

    debug!("Random OT execution completed");

    Ok((sent, received))
}

#[cfg(test)]
pub(crate) fn test_setups<R: CryptoRngCore>(rng: &mut R) -> (SenderSetup, ReceiverSetup) {
    let (msg, sender) = setup_send(b"test-context", rng);
    let receiver = setup_receive(b"test-context", &msg).expect("honest setup verifies");
    (sender, receiver)
}
