use crate::block::Block;
use crate::constants::{EIGENVALUE_FLOOR, ENTROPY_EPSILON, GENESIS_DATA, GENESIS_PREVIOUS_HASH};
use crate::error::ChainError;
use crate::provider::{QuantumProvider, Simulator};
use serde::Serialize;
use tracing::debug;

/// Append-only sequence of blocks sharing one proof-of-work difficulty.
///
/// Index 0 is the genesis block, mined at construction. `append` is the only
/// mutating operation and takes `&mut self`, so appends are serialized by
/// the borrow checker; concurrent writers need an outer lock.
pub struct Chain<P: QuantumProvider = Simulator> {
    /// Blocks in append order. Public so out-of-band tampering can be
    /// simulated against `validate`; the chain itself never mutates a block
    /// after appending it.
    pub blocks: Vec<Block>,
    /// Leading zero hex characters required of every block hash.
    pub difficulty: usize,
    provider: P,
}

/// Summary statistics over a chain.
#[derive(Clone, Debug, Serialize)]
pub struct ChainInfo {
    pub chain_length: usize,
    pub difficulty: usize,
    pub is_valid: bool,
    pub total_entanglement: f64,
    pub average_entanglement: f64,
}

impl Chain<Simulator> {
    /// Chain with a freshly mined genesis block, drawing entropy from the OS.
    pub fn new(difficulty: usize) -> Result<Self, ChainError> {
        Self::with_provider(difficulty, Simulator::new())
    }
}

impl<P: QuantumProvider> Chain<P> {
    /// Chain with a freshly mined genesis block on a caller-supplied
    /// provider.
    pub fn with_provider(difficulty: usize, provider: P) -> Result<Self, ChainError> {
        let mut genesis = Block::new(GENESIS_DATA, GENESIS_PREVIOUS_HASH, None, &provider)?;
        genesis.mine(difficulty);
        Ok(Self {
            blocks: vec![genesis],
            difficulty,
            provider,
        })
    }

    pub fn latest(&self) -> &Block {
        self.blocks.last().expect("chain never empty")
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Builds, entangles, mines, and appends a block carrying `data`.
    ///
    /// The candidate references the latest block's hash, replaces its random
    /// fingerprint with one entangled against the predecessor's, refreshes
    /// both hashes to cover the new state, and is then mined to the chain
    /// difficulty.
    pub fn append(&mut self, data: impl Into<String>) -> Result<&Block, ChainError> {
        let previous = self.latest();
        let previous_hash = previous.hash.clone();
        let previous_state = previous.quantum_state.clone();

        let mut block = Block::new(data, previous_hash, None, &self.provider)?;
        block.quantum_state = block.entangle(&previous_state, &self.provider)?;
        block.quantum_hash = block.compute_quantum_hash(&self.provider)?;
        block.hash = block.compute_hash();
        block.mine(self.difficulty);

        debug!(index = self.blocks.len(), hash = %block.hash, "appended block");
        self.blocks.push(block);
        Ok(self.latest())
    }

    /// Recompute-and-compare integrity check over the whole chain.
    ///
    /// For every block past genesis: the stored classical hash must match a
    /// recomputation from the current fields, the predecessor link must hold,
    /// the stored quantum hash must match a recomputation from the current
    /// fingerprint, and the hash must still meet the difficulty target.
    /// Cached values are never trusted as ground truth.
    pub fn validate(&self) -> Result<bool, ChainError> {
        for i in 1..self.blocks.len() {
            let current = &self.blocks[i];
            let previous = &self.blocks[i - 1];

            if current.hash != current.compute_hash() {
                return Ok(false);
            }
            if current.previous_hash != previous.hash {
                return Ok(false);
            }
            if current.quantum_hash != current.compute_quantum_hash(&self.provider)? {
                return Ok(false);
            }
            if !current.meets_difficulty(self.difficulty) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Correlation diagnostic between block `index` and its predecessor: the
    /// von Neumann entropy of the predecessor's half of the juxtaposed pair
    /// of fingerprints. Zero for genesis and out-of-range indices.
    ///
    /// Deliberately *not* the inverse of the entangling step: the two states
    /// are composed without coupling gates and evaluated as stored.
    pub fn entanglement_measure(&self, index: usize) -> Result<f64, ChainError> {
        if index == 0 || index >= self.blocks.len() {
            return Ok(0.0);
        }
        let previous = &self.blocks[index - 1];
        let current = &self.blocks[index];

        let joint = self
            .provider
            .compose(&previous.quantum_state, &current.quantum_state, &[])?;
        let reduced = self.provider.trace_out(&joint, &[2, 3])?;

        let entropy: f64 = self
            .provider
            .eigenvalues(&reduced)?
            .into_iter()
            .filter(|p| *p > EIGENVALUE_FLOOR)
            .map(|p| -p * (p + ENTROPY_EPSILON).log2())
            .sum();
        Ok(entropy.max(0.0))
    }

    /// Length, difficulty, validity, and aggregate entanglement statistics.
    pub fn info(&self) -> Result<ChainInfo, ChainError> {
        let mut total = 0.0;
        for i in 1..self.blocks.len() {
            total += self.entanglement_measure(i)?;
        }
        let average = if self.blocks.len() > 1 {
            total / (self.blocks.len() - 1) as f64
        } else {
            0.0
        };
        Ok(ChainInfo {
            chain_length: self.blocks.len(),
            difficulty: self.difficulty,
            is_valid: self.validate()?,
            total_entanglement: total,
            average_entanglement: average,
        })
    }

    /// Block-level consistency check: the XX and ZZ expectation values of
    /// the fingerprint must stay within physical bounds, and the stored
    /// quantum hash must match a recomputation. Any measurement failure is
    /// contained here and reported as `false`, never propagated.
    pub fn verify_block(&self, index: usize) -> bool {
        let Some(block) = self.blocks.get(index) else {
            return false;
        };
        self.measure_and_check(block).unwrap_or(false)
    }

    fn measure_and_check(&self, block: &Block) -> Result<bool, ChainError> {
        let xx = self.provider.expectation(&block.quantum_state, "XX")?;
        let zz = self.provider.expectation(&block.quantum_state, "ZZ")?;
        if xx.abs() > 1.0 || zz.abs() > 1.0 {
            return Ok(false);
        }
        Ok(block.compute_quantum_hash(&self.provider)? == block.quantum_hash)
    }
}
