//! Statevector simulation primitives for the qchain workspace.
//!
//! Everything here is plain in-memory numerics: normalized complex state
//! vectors, dense gate application, density matrices with partial trace and
//! Hermitian eigendecomposition, Pauli-string expectation values, and the
//! `QuantumTag` annotation primitive. All operations are deterministic; the
//! only entropy enters through the `Rng` handed to [`StateVector::random`].

pub mod density;
pub mod error;
pub mod gate;
pub mod observable;
pub mod state;
pub mod tag;

pub use density::DensityMatrix;
pub use error::{Result, SimError};
pub use gate::Gate;
pub use observable::{Pauli, PauliString};
pub use state::StateVector;
pub use tag::QuantumTag;
