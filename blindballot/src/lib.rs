//! Client side of a blind-signature, zero-knowledge-proven ballot protocol.
//!
//! A voter encrypts a vote variant under a Paillier-style key, proves the ciphertext
//! encrypts one of the ballot's valid variants, has the registrar blind-sign a label
//! binding the ciphertext to the voter, and submits the lot to the tally service.

#[macro_use]
extern crate serde;

#[macro_use]
extern crate log;

mod arith;
mod ballot;
mod blind;
mod codec;
mod election;
mod error;
mod hash;
mod paillier;
pub mod serde_base64;
mod session;
mod store;
mod zkp;

pub use arith::*;
pub use ballot::*;
pub use blind::*;
pub use codec::*;
pub use election::*;
pub use error::*;
pub use hash::*;
pub use paillier::*;
pub use session::*;
pub use store::*;
pub use zkp::*;
