//! Normalized complex state vectors with little-endian qubit indexing.

use crate::error::{Result, SimError};
use num_complex::Complex64;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Tolerance for the unit-norm check in [`StateVector::from_amplitudes`].
pub const NORM_TOLERANCE: f64 = 1e-6;

/// A normalized quantum state over `2^n` basis states.
///
/// Bit `q` of a basis index addresses qubit `q`, so the amplitude of
/// |q1=1, q0=0⟩ on a two-qubit state lives at index `0b10`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateVector {
    amps: Vec<Complex64>,
}

impl StateVector {
    /// Builds a state from raw amplitudes.
    ///
    /// The length must be a power of two and the vector must already be
    /// normalized to within [`NORM_TOLERANCE`].
    pub fn from_amplitudes(amps: Vec<Complex64>) -> Result<Self> {
        if amps.is_empty() || !amps.len().is_power_of_two() {
            return Err(SimError::InvalidDimension {
                dimension: amps.len(),
            });
        }
        let norm = amps.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
        if (norm - 1.0).abs() > NORM_TOLERANCE {
            return Err(SimError::NotNormalized { norm });
        }
        Ok(Self { amps })
    }

    /// Draws a Haar-random state: independent standard-normal real and
    /// imaginary parts per amplitude, renormalized to unit length.
    pub fn random<R: Rng + ?Sized>(num_qubits: usize, rng: &mut R) -> Self {
        let dimension = 1usize << num_qubits;
        let mut amps: Vec<Complex64> = (0..dimension)
            .map(|_| Complex64::new(rng.sample(StandardNormal), rng.sample(StandardNormal)))
            .collect();
        let norm = amps.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
        for a in &mut amps {
            *a /= norm;
        }
        Self { amps }
    }

    pub fn num_qubits(&self) -> usize {
        self.amps.len().trailing_zeros() as usize
    }

    pub fn dimension(&self) -> usize {
        self.amps.len()
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amps
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amps
    }

    /// Measurement probability of each basis outcome, in index order.
    /// Sums to 1 for any normalized state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(|a| a.norm_sqr()).collect()
    }

    pub fn norm(&self) -> f64 {
        self.amps.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
    }

    /// Tensor product with `self` occupying the low-order qubits and `upper`
    /// stacked above it.
    pub fn tensor(&self, upper: &Self) -> Self {
        let shift = self.num_qubits();
        let mut amps = vec![Complex64::new(0.0, 0.0); self.amps.len() * upper.amps.len()];
        for (j, hi) in upper.amps.iter().enumerate() {
            for (i, lo) in self.amps.iter().enumerate() {
                amps[(j << shift) | i] = hi * lo;
            }
        }
        Self { amps }
    }
}
