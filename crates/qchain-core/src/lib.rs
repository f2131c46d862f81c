//! Core engine of the quantum-linked blockchain: blocks carrying classical
//! payloads plus a quantum fingerprint, proof-of-work mining, and chain
//! validation with an entanglement diagnostic between neighboring blocks.
//!
//! The numerics come in through the [`QuantumProvider`] seam so the chain
//! logic stays independent of any particular simulation backend; the default
//! [`Simulator`] delegates to `qchain-sim`.

pub mod block;
pub mod chain;
pub mod constants;
pub mod error;
pub mod mine;
pub mod provider;

pub use block::Block;
pub use chain::{Chain, ChainInfo};
pub use error::ChainError;
pub use provider::{QuantumProvider, Simulator};
