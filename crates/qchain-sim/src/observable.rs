//! Pauli-string observables and expectation values.

use crate::error::{Result, SimError};
use crate::state::StateVector;
use num_complex::Complex64;
use std::fmt;

/// Single-qubit Pauli operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'I' => Ok(Pauli::I),
            'X' => Ok(Pauli::X),
            'Y' => Ok(Pauli::Y),
            'Z' => Ok(Pauli::Z),
            _ => Err(SimError::InvalidObservable {
                label: c.to_string(),
            }),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A tensor product of Pauli operators, e.g. "XX" or "ZZ".
///
/// The rightmost character of the label acts on qubit 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PauliString {
    paulis: Vec<Pauli>,
}

impl PauliString {
    pub fn parse(label: &str) -> Result<Self> {
        if label.is_empty() {
            return Err(SimError::InvalidObservable {
                label: label.to_string(),
            });
        }
        let paulis: Result<Vec<_>> = label.chars().rev().map(Pauli::from_char).collect();
        Ok(Self { paulis: paulis? })
    }

    pub fn num_qubits(&self) -> usize {
        self.paulis.len()
    }

    /// ⟨ψ|P|ψ⟩, the real part of the matrix element. Bounded by ±1 for any
    /// normalized state since every Pauli string is unitary and Hermitian.
    pub fn expectation(&self, state: &StateVector) -> Result<f64> {
        if self.paulis.len() != state.num_qubits() {
            return Err(SimError::DimensionMismatch {
                expected: 1 << self.paulis.len(),
                actual: state.dimension(),
            });
        }

        let amps = state.amplitudes();
        let mut acc = Complex64::new(0.0, 0.0);
        for (i, amp) in amps.iter().enumerate() {
            // P|i⟩ = coeff |j⟩
            let mut j = i;
            let mut coeff = Complex64::new(1.0, 0.0);
            for (q, p) in self.paulis.iter().enumerate() {
                let bit = (i >> q) & 1;
                match p {
                    Pauli::I => {}
                    Pauli::X => j ^= 1 << q,
                    Pauli::Y => {
                        j ^= 1 << q;
                        coeff *= if bit == 0 {
                            Complex64::new(0.0, 1.0)
                        } else {
                            Complex64::new(0.0, -1.0)
                        };
                    }
                    Pauli::Z => {
                        if bit == 1 {
                            coeff = -coeff;
                        }
                    }
                }
            }
            acc += amps[j].conj() * coeff * amp;
        }
        Ok(acc.re)
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in self.paulis.iter().rev() {
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const TOL: f64 = 1e-12;

    fn basis(dim: usize, index: usize) -> StateVector {
        let mut amps = vec![Complex64::new(0.0, 0.0); dim];
        amps[index] = Complex64::new(1.0, 0.0);
        StateVector::from_amplitudes(amps).unwrap()
    }

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
    fn parse_round_trips() {
        let p = PauliString::parse("XZ").unwrap();
        assert_eq!(p.num_qubits(), 2);
        assert_eq!(p.to_string(), "XZ");
        assert!(PauliString::parse("").is_err());
        assert!(PauliString::parse("XQ").is_err());
    }

    #[test]
    fn zz_on_basis_states() {
        let zz = PauliString::parse("ZZ").unwrap();
        assert!((zz.expectation(&basis(4, 0b00)).unwrap() - 1.0).abs() < TOL);
        assert!((zz.expectation(&basis(4, 0b01)).unwrap() + 1.0).abs() < TOL);
        assert!((zz.expectation(&basis(4, 0b10)).unwrap() + 1.0).abs() < TOL);
        assert!((zz.expectation(&basis(4, 0b11)).unwrap() - 1.0).abs() < TOL);
    }

    #[test]
    fn xx_on_bell_state_is_one() {
        let xx = PauliString::parse("XX").unwrap();
        assert!((xx.expectation(&bell()).unwrap() - 1.0).abs() < TOL);
        let zz = PauliString::parse("ZZ").unwrap();
        assert!((zz.expectation(&bell()).unwrap() - 1.0).abs() < TOL);
    }

    #[test]
    fn xx_on_computational_basis_is_zero() {
        let xx = PauliString::parse("XX").unwrap();
        assert!(xx.expectation(&basis(4, 0b00)).unwrap().abs() < TOL);
    }

    #[test]
    fn expectations_stay_physical_on_random_states() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..20 {
            let state = StateVector::random(2, &mut rng);
            for label in ["XX", "ZZ", "XZ", "YY", "IZ"] {
                let value = PauliString::parse(label)
                    .unwrap()
                    .expectation(&state)
                    .unwrap();
                assert!(value.abs() <= 1.0 + 1e-9, "{label} gave {value}");
            }
        }
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let xxx = PauliString::parse("XXX").unwrap();
        assert!(matches!(
            xxx.expectation(&bell()),
            Err(SimError::DimensionMismatch { .. })
        ));
    }
}
