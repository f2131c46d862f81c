/// Qubits per block fingerprint.
pub const STATE_QUBITS: usize = 2;
/// Amplitudes per block fingerprint.
pub const STATE_DIM: usize = 1 << STATE_QUBITS;
/// Payload of the first block of every chain.
pub const GENESIS_DATA: &str = "Genesis Block";
/// Sentinel predecessor hash of a genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";
/// Decimal places kept when folding probabilities into the quantum hash.
pub const PROBABILITY_DECIMALS: usize = 10;
/// Reduced-matrix eigenvalues at or below this are round-off, not signal.
pub const EIGENVALUE_FLOOR: f64 = 1e-10;
/// Offset inside the entropy logarithm, keeping log2(0) out of reach.
pub const ENTROPY_EPSILON: f64 = 1e-10;
/// Leading zero hex characters required of a block hash by default.
pub const DEFAULT_DIFFICULTY: usize = 2;
