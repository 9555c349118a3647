use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic noise streams for sensors.
///
/// Every stream is keyed by a component's property path, so adding a sensor
/// never perturbs another one. Stream seeds use a fixed FNV-1a hash and stay
/// the same across toolchains and platforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngManager {
    master_seed: u64,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self { master_seed: seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Seed of the stream named `name`.
    pub fn stream_seed(&self, name: &str) -> u64 {
        self.master_seed
            .to_le_bytes()
            .iter()
            .chain(name.as_bytes())
            .fold(FNV_OFFSET, |hash, byte| {
                (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
            })
    }

    pub fn get_rng(&self, name: &str) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.stream_seed(name))
    }
}
