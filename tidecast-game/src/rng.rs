//! Seedable random streams for deterministic replay.
//!
//! A single user-visible seed fans out into independent, domain-separated
//! streams so that consuming extra draws in one subsystem (for example a
//! longer reel) never shifts the outcomes of another (the catch roll).

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::Sha256;

/// The concrete stream type used throughout the engine.
pub type StreamRng = CountingRng<SmallRng>;

/// Per-session bundle of RNG streams.
#[derive(Debug, Clone)]
pub struct RngBundle {
    seed: u64,
    catch: StreamRng,
    bite: StreamRng,
    reel_seed: u64,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            seed,
            catch: CountingRng::seeded(derive_stream_seed(seed, b"catch")),
            bite: CountingRng::seeded(derive_stream_seed(seed, b"bite")),
            reel_seed: derive_stream_seed(seed, b"reel"),
        }
    }

    /// Seed the bundle was derived from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Stream used for species selection and the golden roll.
    pub const fn catch(&mut self) -> &mut StreamRng {
        &mut self.catch
    }

    /// Stream used for the bite-time variance draw.
    pub const fn bite(&mut self) -> &mut StreamRng {
        &mut self.bite
    }

    /// Fresh stream handed to the reel minigame; the session owns it outright.
    #[must_use]
    pub fn reel(&self) -> StreamRng {
        CountingRng::seeded(self.reel_seed)
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    /// Seed a small, fast stream directly.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: rand::RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
