use qchain_sim::{gate, DensityMatrix, Gate, PauliString, SimError, StateVector};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Mutex;

/// Operations the chain needs from a quantum simulation backend.
///
/// The trait lives in `qchain-core` so blocks and chains can be exercised
/// against a deterministic provider in tests. All operations are pure given
/// identical inputs except [`random_state`](QuantumProvider::random_state),
/// which draws from the provider's entropy source.
pub trait QuantumProvider: Send + Sync {
    /// A uniformly random normalized state over `num_qubits` qubits.
    fn random_state(&self, num_qubits: usize) -> Result<StateVector, SimError>;

    /// Measurement probability per basis outcome, in index order.
    fn probabilities(&self, state: &StateVector) -> Result<Vec<f64>, SimError>;

    /// Joint register with `lower` on the low-order qubits and `upper`
    /// stacked above it, then `gates` applied in order.
    fn compose(
        &self,
        lower: &StateVector,
        upper: &StateVector,
        gates: &[Gate],
    ) -> Result<StateVector, SimError>;

    /// Reduced density matrix after discarding `qubits`.
    fn trace_out(&self, state: &StateVector, qubits: &[usize]) -> Result<DensityMatrix, SimError>;

    /// Dominant eigenvector of `rho`, renormalized, with its eigenvalue.
    fn principal_component(&self, rho: &DensityMatrix) -> Result<(StateVector, f64), SimError>;

    /// Real spectrum of `rho`.
    fn eigenvalues(&self, rho: &DensityMatrix) -> Result<Vec<f64>, SimError>;

    /// ⟨ψ|P|ψ⟩ for the Pauli string named by `label` (e.g. "XX", "ZZ").
    fn expectation(&self, state: &StateVector, label: &str) -> Result<f64, SimError>;
}

/// Default provider backed by `qchain-sim`.
pub struct Simulator {
    rng: Mutex<StdRng>,
}

impl Simulator {
    /// Provider seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Provider with a fixed seed; every random draw is reproducible.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumProvider for Simulator {
    fn random_state(&self, num_qubits: usize) -> Result<StateVector, SimError> {
        let mut rng = self.rng.lock().expect("rng lock poisoned");
        Ok(StateVector::random(num_qubits, &mut *rng))
    }

    fn probabilities(&self, state: &StateVector) -> Result<Vec<f64>, SimError> {
        Ok(state.probabilities())
    }

    fn compose(
        &self,
        lower: &StateVector,
        upper: &StateVector,
        gates: &[Gate],
    ) -> Result<StateVector, SimError> {
        let mut joint = lower.tensor(upper);
        for g in gates {
            gate::apply(&mut joint, *g)?;
        }
        Ok(joint)
    }

    fn trace_out(&self, state: &StateVector, qubits: &[usize]) -> Result<DensityMatrix, SimError> {
        DensityMatrix::from_state(state).partial_trace(qubits)
    }

    fn principal_component(&self, rho: &DensityMatrix) -> Result<(StateVector, f64), SimError> {
        rho.principal_component()
    }

    fn eigenvalues(&self, rho: &DensityMatrix) -> Result<Vec<f64>, SimError> {
        Ok(rho.eigenvalues())
    }

    fn expectation(&self, state: &StateVector, label: &str) -> Result<f64, SimError> {
        PauliString::parse(label)?.expectation(state)
    }
}
