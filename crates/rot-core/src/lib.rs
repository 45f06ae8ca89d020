//! # rot-core
//!
//! Cryptographic sub-protocols used as building blocks for threshold ECDSA
//! signing over secp256k1:
//! - Random Oblivious Transfer (one-time setup + three-round execution)
//! - Schnorr proof of knowledge of a discrete log
//! - Threshold-friendly ECDSA signatures with Ethereum compact encoding
//!
//! ## Protocol Overview
//!
//! The random OT setup runs once. Its results are persisted and reused for
//! any number of executions, each keyed by a fresh 32-byte nonce. An
//! execution gives the sender two random pads and the receiver the pad
//! selected by its secret choice bit. Each party aborts if the other
//! deviates from the protocol.
//!
//! ## Example
//!
//! ```rust
//! use rand::rngs::OsRng;
//! use rot_core::ot::{setup_receive, setup_send, RandomOtReceiver, RandomOtSender};
//! use subtle::Choice;
//!
//! let (msg, sender_setup) = setup_send(b"ctx", &mut OsRng);
//! let receiver_setup = setup_receive(b"ctx", &msg)?;
//!
//! let nonce = [7u8; 32];
//! let mut sender = RandomOtSender::new(&nonce, &sender_setup)?;
//! let mut receiver = RandomOtReceiver::new(&nonce, &receiver_setup, Choice::from(1))?;
//!
//! let r1 = receiver.round1(&mut OsRng)?;
//! let s1 = sender.round1(&r1)?;
//! let r2 = receiver.round2(&s1)?;
//! let (s2, pads) = sender.round2(&r2)?;
//! let pad = receiver.round3(&s2)?;
//!
//! assert_eq!(pad, pads.rand1);
//! # Ok::<(), rot_core::Error>(())
//! ```

pub mod curve;
pub mod error;
pub mod oracle;
pub mod ot;
pub mod schnorr;
pub mod signature;
pub mod types;

pub use error::{Error, Result};
pub use ot::Phase;
pub use schnorr::DLogProof;
pub use signature::Signature;
pub use types::{Nonce, Pad, NONCE_BYTES, OT_BYTES};

/// Protocol version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
