use crate::constants::{PROBABILITY_DECIMALS, STATE_QUBITS};
use crate::error::ChainError;
use crate::provider::QuantumProvider;
use qchain_sim::{Gate, StateVector};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::f64::consts::FRAC_PI_4;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// One ledger entry: a classical payload, a link to its predecessor, and a
/// 2-qubit quantum fingerprint.
///
/// `hash` and `quantum_hash` are cached derived values. Nothing here
/// auto-invalidates them on mutation; integrity checking always recomputes
/// from the source fields and compares (see [`Chain::validate`]).
///
/// [`Chain::validate`]: crate::chain::Chain::validate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    /// Creation time, unix seconds.
    pub timestamp: u64,
    /// Opaque classical payload.
    pub data: String,
    /// Hash of the logical predecessor; `"0"` for genesis.
    pub previous_hash: String,
    /// Normalized 2-qubit fingerprint. Random at construction, replaced by
    /// an entangled derivative once linked to a predecessor.
    pub quantum_state: StateVector,
    /// Proof-of-work search counter.
    pub nonce: u64,
    /// SHA-256 over the fingerprint's probability distribution.
    pub quantum_hash: String,
    /// SHA-256 over (timestamp, data, previous_hash, quantum_hash, nonce).
    pub hash: String,
}

/// The fixed coupling sequence linking a predecessor's qubits {0,1} to a
/// successor's {2,3}: pairwise CX across the halves, then a quarter-turn RY
/// on each half's first qubit.
pub fn coupling_gates() -> [Gate; 4] {
    [
        Gate::Cx { control: 0, target: 2 },
        Gate::Cx { control: 1, target: 3 },
        Gate::Ry { qubit: 0, angle: FRAC_PI_4 },
        Gate::Ry { qubit: 2, angle: FRAC_PI_4 },
    ]
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs()
}

impl Block {
    /// Builds a block, drawing a fresh random fingerprint from the provider
    /// when none is supplied, and computes both hashes.
    pub fn new<P: QuantumProvider>(
        data: impl Into<String>,
        previous_hash: impl Into<String>,
        quantum_state: Option<StateVector>,
        provider: &P,
    ) -> Result<Self, ChainError> {
        let quantum_state = match quantum_state {
            Some(state) => state,
            None => provider.random_state(STATE_QUBITS)?,
        };
        let mut block = Self {
            timestamp: unix_now(),
            data: data.into(),
            previous_hash: previous_hash.into(),
            quantum_state,
            nonce: 0,
            quantum_hash: String::new(),
            hash: String::new(),
        };
        block.quantum_hash = block.compute_quantum_hash(provider)?;
        block.hash = block.compute_hash();
        Ok(block)
    }

    /// Digest of the fingerprint's measurement probabilities: each formatted
    /// to a fixed number of decimals (stable under float jitter beyond that
    /// precision, and invariant to global phase), concatenated in index
    /// order, SHA-256, lowercase hex.
    pub fn compute_quantum_hash<P: QuantumProvider>(
        &self,
        provider: &P,
    ) -> Result<String, ChainError> {
        let probs = provider.probabilities(&self.quantum_state)?;
        let preimage: String = probs
            .iter()
            .map(|p| format!("{:.*}", PROBABILITY_DECIMALS, p))
            .collect();
        Ok(hex::encode(Sha256::digest(preimage.as_bytes())))
    }

    /// Digest over the five hashed fields in fixed order, lowercase hex.
    pub fn compute_hash(&self) -> String {
        let preimage = format!(
            "{}{}{}{}{}",
            self.timestamp, self.data, self.previous_hash, self.quantum_hash, self.nonce
        );
        hex::encode(Sha256::digest(preimage.as_bytes()))
    }

    /// Whether the cached hash carries `difficulty` leading zero hex chars.
    pub fn meets_difficulty(&self, difficulty: usize) -> bool {
        difficulty <= self.hash.len()
            && self.hash.as_bytes()[..difficulty].iter().all(|&b| b == b'0')
    }

    /// Increments the nonce and rehashes until the difficulty target is met.
    /// Unbounded; see [`try_mine`](Block::try_mine) for the bounded variant.
    pub fn mine(&mut self, difficulty: usize) {
        while !self.meets_difficulty(difficulty) {
            self.nonce += 1;
            self.hash = self.compute_hash();
        }
        debug!(nonce = self.nonce, hash = %self.hash, "mined block");
    }

    /// Like [`mine`](Block::mine) but gives up after `max_attempts` nonce
    /// increments, reporting [`ChainError::MiningExhausted`].
    pub fn try_mine(&mut self, difficulty: usize, max_attempts: u64) -> Result<(), ChainError> {
        let mut attempts = 0u64;
        while !self.meets_difficulty(difficulty) {
            if attempts == max_attempts {
                return Err(ChainError::MiningExhausted {
                    difficulty,
                    attempts,
                });
            }
            self.nonce += 1;
            self.hash = self.compute_hash();
            attempts += 1;
        }
        Ok(())
    }

    /// Searches the nonce space in parallel instead of serially. Same
    /// postcondition as [`mine`](Block::mine); the winning nonce is whichever
    /// worker finds one first, not necessarily the smallest.
    pub fn mine_parallel(&mut self, difficulty: usize) {
        let (nonce, hash) = crate::mine::find_nonce_parallel(self, difficulty);
        self.nonce = nonce;
        self.hash = hash;
    }

    /// Derives this block's entangled fingerprint from the predecessor's:
    /// compose the two states into a joint register, run the coupling
    /// sequence, discard the predecessor's qubits, and approximate the
    /// (generally mixed) remainder by its dominant eigenvector.
    ///
    /// Pure with respect to this block; the caller overwrites
    /// `quantum_state` and recomputes both hashes with the new value.
    pub fn entangle<P: QuantumProvider>(
        &self,
        previous_state: &StateVector,
        provider: &P,
    ) -> Result<StateVector, ChainError> {
        let joint = provider.compose(previous_state, &self.quantum_state, &coupling_gates())?;
        let reduced = provider.trace_out(&joint, &[0, 1])?;
        let (state, _weight) = provider.principal_component(&reduced)?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GENESIS_PREVIOUS_HASH, STATE_DIM};
    use crate::provider::Simulator;

    #[test]
    fn block_creation_populates_derived_fields() {
        let sim = Simulator::seeded(42);
        let block = Block::new("Test data", GENESIS_PREVIOUS_HASH, None, &sim).unwrap();
        assert_eq!(block.data, "Test data");
        assert_eq!(block.previous_hash, "0");
        assert_eq!(block.nonce, 0);
        assert!(block.timestamp > 0);
        assert_eq!(block.quantum_state.dimension(), STATE_DIM);
        assert_eq!(block.quantum_hash.len(), 64);
        assert_eq!(block.hash.len(), 64);
    }

    #[test]
    fn quantum_hash_recompute_matches_stored() {
        let sim = Simulator::seeded(42);
        let block = Block::new("Test data", "0", None, &sim).unwrap();
        assert_eq!(block.compute_quantum_hash(&sim).unwrap(), block.quantum_hash);
    }

    #[test]
    fn hash_recompute_is_deterministic() {
        let sim = Simulator::seeded(42);
        let block = Block::new("payload", "0", None, &sim).unwrap();
        assert_eq!(block.compute_hash(), block.hash);
        assert_eq!(block.compute_hash(), block.compute_hash());
    }

    #[test]
    fn hash_changes_with_nonce() {
        let sim = Simulator::seeded(42);
        let mut block = Block::new("payload", "0", None, &sim).unwrap();
        let before = block.hash.clone();
        block.nonce += 1;
        assert_ne!(block.compute_hash(), before);
    }

    #[test]
    fn hash_changes_with_data() {
        let sim = Simulator::seeded(42);
        let mut block = Block::new("payload", "0", None, &sim).unwrap();
        let before = block.compute_hash();
        block.data = "tampered".into();
        assert_ne!(block.compute_hash(), before);
    }

    #[test]
    fn identical_states_share_a_quantum_hash() {
        let sim = Simulator::seeded(42);
        let first = Block::new("a", "0", None, &sim).unwrap();
        let second = Block::new("b", "0", Some(first.quantum_state.clone()), &sim).unwrap();
        assert_eq!(first.quantum_hash, second.quantum_hash);
    }

    #[test]
    fn mining_reaches_the_target() {
        let sim = Simulator::seeded(42);
        let mut block = Block::new("Test mining", "0", None, &sim).unwrap();
        let nonce_before = block.nonce;
        block.mine(2);
        assert!(block.hash.starts_with("00"));
        assert!(block.nonce >= nonce_before);
        assert_eq!(block.hash, block.compute_hash());
    }

    #[test]
    fn parallel_mining_reaches_the_target() {
        let sim = Simulator::seeded(7);
        let mut block = Block::new("Test mining", "0", None, &sim).unwrap();
        block.mine_parallel(2);
        assert!(block.meets_difficulty(2));
        assert_eq!(block.hash, block.compute_hash());
    }

    #[test]
    fn try_mine_succeeds_within_limit() {
        let sim = Simulator::seeded(42);
        let mut block = Block::new("bounded", "0", None, &sim).unwrap();
        block.try_mine(1, 1_000_000).unwrap();
        assert!(block.meets_difficulty(1));
    }

    #[test]
    fn try_mine_reports_exhaustion() {
        let sim = Simulator::seeded(42);
        let mut block = Block::new("bounded", "0", None, &sim).unwrap();
        let err = block.try_mine(8, 3).unwrap_err();
        assert!(matches!(err, ChainError::MiningExhausted { attempts: 3, .. }));
    }

    #[test]
    fn zero_difficulty_needs_no_work() {
        let sim = Simulator::seeded(42);
        let mut block = Block::new("free", "0", None, &sim).unwrap();
        block.mine(0);
        assert_eq!(block.nonce, 0);
    }

    #[test]
    fn entangled_state_is_a_normalized_fingerprint() {
        let sim = Simulator::seeded(42);
        let first = Block::new("Block 1", "0", None, &sim).unwrap();
        let second = Block::new("Block 2", first.hash.clone(), None, &sim).unwrap();
        let entangled = second.entangle(&first.quantum_state, &sim).unwrap();
        assert_eq!(entangled.dimension(), STATE_DIM);
        assert!((entangled.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn entangle_is_deterministic_in_its_inputs() {
        let sim = Simulator::seeded(42);
        let first = Block::new("Block 1", "0", None, &sim).unwrap();
        let second = Block::new("Block 2", first.hash.clone(), None, &sim).unwrap();
        let once = second.entangle(&first.quantum_state, &sim).unwrap();
        let twice = second.entangle(&first.quantum_state, &sim).unwrap();
        assert_eq!(once, twice);
    }
}
