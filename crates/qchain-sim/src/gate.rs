//! Dense application of the coupling gates used for block linkage.

use crate::error::{Result, SimError};
use crate::state::StateVector;

/// A single gate in a coupling sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gate {
    /// Controlled-NOT: flips `target` where `control` is set.
    Cx { control: usize, target: usize },
    /// Rotation about the Y axis by `angle` radians.
    Ry { qubit: usize, angle: f64 },
}

/// Applies `gate` to `state` in place.
pub fn apply(state: &mut StateVector, gate: Gate) -> Result<()> {
    match gate {
        Gate::Cx { control, target } => apply_cx(state, control, target),
        Gate::Ry { qubit, angle } => apply_ry(state, qubit, angle),
    }
}

fn check_qubit(index: usize, num_qubits: usize) -> Result<()> {
    if index >= num_qubits {
        return Err(SimError::InvalidQubitIndex { index, num_qubits });
    }
    Ok(())
}

fn apply_cx(state: &mut StateVector, control: usize, target: usize) -> Result<()> {
    let n = state.num_qubits();
    check_qubit(control, n)?;
    check_qubit(target, n)?;
    if control == target {
        return Err(SimError::InvalidQubitIndex {
            index: target,
            num_qubits: n,
        });
    }
    let control_mask = 1usize << control;
    let target_mask = 1usize << target;
    let amps = state.amplitudes_mut();
    for i in 0..amps.len() {
        if i & control_mask != 0 && i & target_mask == 0 {
            amps.swap(i, i | target_mask);
        }
    }
    Ok(())
}

fn apply_ry(state: &mut StateVector, qubit: usize, angle: f64) -> Result<()> {
    check_qubit(qubit, state.num_qubits())?;
    let (sin, cos) = (angle / 2.0).sin_cos();
    let mask = 1usize << qubit;
    let amps = state.amplitudes_mut();
    for i in 0..amps.len() {
        if i & mask != 0 {
            continue;
        }
        let j = i | mask;
        let a0 = amps[i];
        let a1 = amps[j];
        amps[i] = a0 * cos - a1 * sin;
        amps[j] = a0 * sin + a1 * cos;
    }
    Ok(())
}
