//! Proc roll sources for the rotation.
//!
//! [Rng] is a SplitMix64 generator: fast, deterministic for a given seed, not
//! cryptographically secure. Anything implementing [ProcRoll] can stand in
//! for it, which is how tests pin proc outcomes.

const SPLITMIX64_GOLDEN: u64 = 0x9e3779b97f4a7c15;
const SPLITMIX64_M1: u64 = 0xbf58476d1ce4e5b9;
const SPLITMIX64_M2: u64 = 0x94d049bb133111eb;

/// Source of uniform integer rolls in `1..=100`.
pub trait ProcRoll {
    fn roll_percent(&mut self) -> u32;

    /// True when a roll lands at or under `chance_percent`.
    fn procs(&mut self, chance_percent: u32) -> bool {
        self.roll_percent() <= chance_percent
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(SPLITMIX64_GOLDEN);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(SPLITMIX64_M1);
        z = (z ^ (z >> 27)).wrapping_mul(SPLITMIX64_M2);
        z ^ (z >> 31)
    }

    /// Uniform value in `0..bound` using Lemire's multiply-shift reduction.
    #[inline]
    pub fn next_below(&mut self, bound: u32) -> u32 {
        ((self.next_u64() >> 32).wrapping_mul(u64::from(bound)) >> 32) as u32
    }
}

impl ProcRoll for Rng {
    #[inline]
    fn roll_percent(&mut self) -> u32 {
        self.next_below(100) + 1
    }
}

impl<R: ProcRoll + ?Sized> ProcRoll for &mut R {
    fn roll_percent(&mut self) -> u32 {
        (**self).roll_percent()
    }
}

/// Seed from the operating system, for runs where no seed was requested.
pub fn entropy_seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(err) => {
            log::warn!("os entropy unavailable ({err}), seeding from the clock");
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or(SPLITMIX64_GOLDEN)
        }
    }
}
