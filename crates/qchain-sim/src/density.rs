//! Density matrices: partial trace and Hermitian eigendecomposition.

use crate::error::{Result, SimError};
use crate::state::StateVector;
use nalgebra::{DMatrix, SymmetricEigen};
use num_complex::Complex64;
use std::fmt;

/// Row-major `2^n × 2^n` density matrix.
///
/// Obtained from a pure state as ρ = |ψ⟩⟨ψ| or from a larger system via
/// [`DensityMatrix::partial_trace`]. Hermitian with unit trace by
/// construction.
#[derive(Clone, PartialEq)]
pub struct DensityMatrix {
    num_qubits: usize,
    dimension: usize,
    matrix: Vec<Complex64>,
}

impl DensityMatrix {
    /// ρ = |ψ⟩⟨ψ| for a pure state.
    pub fn from_state(state: &StateVector) -> Self {
        let dimension = state.dimension();
        let amps = state.amplitudes();
        let mut matrix = vec![Complex64::new(0.0, 0.0); dimension * dimension];
        for i in 0..dimension {
            for j in 0..dimension {
                matrix[i * dimension + j] = amps[i] * amps[j].conj();
            }
        }
        Self {
            num_qubits: state.num_qubits(),
            dimension,
            matrix,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.matrix[row * self.dimension + col]
    }

    /// Tr(ρ). 1 for any valid density matrix.
    pub fn trace(&self) -> f64 {
        (0..self.dimension).map(|i| self.get(i, i).re).sum()
    }

    /// Tr(ρ²). 1 for pure states, 1/d for the maximally mixed state.
    pub fn purity(&self) -> f64 {
        self.matrix.iter().map(|e| e.norm_sqr()).sum()
    }

    /// Traces out `trace_qubits`, returning the reduced matrix over the
    /// remaining qubits (reindexed compactly from qubit 0).
    pub fn partial_trace(&self, trace_qubits: &[usize]) -> Result<Self> {
        if trace_qubits.is_empty() || trace_qubits.len() >= self.num_qubits {
            return Err(SimError::InvalidDimension {
                dimension: self.dimension,
            });
        }
        for &q in trace_qubits {
            if q >= self.num_qubits {
                return Err(SimError::InvalidQubitIndex {
                    index: q,
                    num_qubits: self.num_qubits,
                });
            }
        }

        let kept = self.num_qubits - trace_qubits.len();
        let reduced_dim = 1usize << kept;
        let mut reduced = vec![Complex64::new(0.0, 0.0); reduced_dim * reduced_dim];

        for i in 0..self.dimension {
            for j in 0..self.dimension {
                // Off-diagonal in any traced-out qubit contributes nothing.
                if trace_qubits.iter().any(|&q| (i ^ j) & (1 << q) != 0) {
                    continue;
                }
                let ri = self.reduced_index(i, trace_qubits);
                let rj = self.reduced_index(j, trace_qubits);
                reduced[ri * reduced_dim + rj] += self.matrix[i * self.dimension + j];
            }
        }

        Ok(Self {
            num_qubits: kept,
            dimension: reduced_dim,
            matrix: reduced,
        })
    }

    fn reduced_index(&self, index: usize, trace_qubits: &[usize]) -> usize {
        let mut out = 0;
        let mut shift = 0;
        for q in 0..self.num_qubits {
            if trace_qubits.contains(&q) {
                continue;
            }
            if index & (1 << q) != 0 {
                out |= 1 << shift;
            }
            shift += 1;
        }
        out
    }

    fn to_nalgebra(&self) -> DMatrix<Complex64> {
        DMatrix::from_fn(self.dimension, self.dimension, |r, c| self.get(r, c))
    }

    /// Real spectrum of the matrix. Small negative values can appear from
    /// round-off; callers filter against their own noise floor.
    pub fn eigenvalues(&self) -> Vec<f64> {
        SymmetricEigen::new(self.to_nalgebra())
            .eigenvalues
            .iter()
            .copied()
            .collect()
    }

    /// Dominant eigenvector renormalized to unit length, with its
    /// eigenvalue. The best pure-state approximation of a mixed ρ.
    pub fn principal_component(&self) -> Result<(StateVector, f64)> {
        let eigen = SymmetricEigen::new(self.to_nalgebra());
        let mut top = 0;
        for k in 1..eigen.eigenvalues.len() {
            if eigen.eigenvalues[k] > eigen.eigenvalues[top] {
                top = k;
            }
        }
        let column = eigen.eigenvectors.column(top);
        let norm = column.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
        if norm <= 0.0 {
            return Err(SimError::NotNormalized { norm });
        }
        let amps: Vec<Complex64> = column.iter().map(|a| *a / norm).collect();
        let state = StateVector::from_amplitudes(amps)?;
        Ok((state, eigen.eigenvalues[top]))
    }
}

impl fmt::Debug for DensityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DensityMatrix {{ qubits: {}, dim: {}, purity: {:.4} }}",
            self.num_qubits,
            self.dimension,
            self.purity()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const TOL: f64 = 1e-10;

    fn bell() -> StateVector {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        StateVector::from_amplitudes(vec![
            Complex64::new(h, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(h, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn pure_state_density_matrix() {
        let dm = DensityMatrix::from_state(&bell());
        assert_eq!(dm.num_qubits(), 2);
        assert_eq!(dm.dimension(), 4);
        assert!((dm.trace() - 1.0).abs() < TOL);
        assert!((dm.purity() - 1.0).abs() < TOL);
    }

    #[test]
    fn bell_reduction_is_maximally_mixed() {
        let dm = DensityMatrix::from_state(&bell());
        let reduced = dm.partial_trace(&[1]).unwrap();
        assert_eq!(reduced.dimension(), 2);
        assert!((reduced.get(0, 0).re - 0.5).abs() < TOL);
        assert!((reduced.get(1, 1).re - 0.5).abs() < TOL);
        assert!(reduced.get(0, 1).norm() < TOL);
        assert!((reduced.purity() - 0.5).abs() < TOL);
    }

    #[test]
    fn bell_reduction_spectrum() {
        let dm = DensityMatrix::from_state(&bell());
        let mut evs = dm.partial_trace(&[0]).unwrap().eigenvalues();
        evs.sort_by(|a, b| a.total_cmp(b));
        assert!((evs[0] - 0.5).abs() < TOL);
        assert!((evs[1] - 0.5).abs() < TOL);
    }

    #[test]
    fn product_state_reduction_stays_pure() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = StateVector::random(2, &mut rng);
        let b = StateVector::random(2, &mut rng);
        let joint = DensityMatrix::from_state(&a.tensor(&b));
        let reduced = joint.partial_trace(&[2, 3]).unwrap();
        assert_eq!(reduced.num_qubits(), 2);
        assert!((reduced.purity() - 1.0).abs() < 1e-9);
        // The kept half is the lower state.
        for (i, amp) in a.amplitudes().iter().enumerate() {
            assert!((reduced.get(i, i).re - amp.norm_sqr()).abs() < 1e-9);
        }
    }

    #[test]
    fn principal_component_recovers_pure_state() {
        let mut rng = StdRng::seed_from_u64(9);
        let state = StateVector::random(2, &mut rng);
        let dm = DensityMatrix::from_state(&state);
        let (recovered, weight) = dm.principal_component().unwrap();
        assert!((weight - 1.0).abs() < 1e-9);
        // Equal up to global phase, so compare probability vectors.
        for (p, q) in state
            .probabilities()
            .iter()
            .zip(recovered.probabilities().iter())
        {
            assert!((p - q).abs() < 1e-9);
        }
    }

    #[test]
    fn partial_trace_rejects_bad_input() {
        let dm = DensityMatrix::from_state(&bell());
        assert!(dm.partial_trace(&[]).is_err());
        assert!(dm.partial_trace(&[0, 1]).is_err());
        assert!(dm.partial_trace(&[5]).is_err());
    }
}
