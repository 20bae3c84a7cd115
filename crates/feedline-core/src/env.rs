//! Environment abstraction for deterministic testing.
//!
//! Decouples domain logic from system resources (time, randomness). Enables
//! deterministic simulation with a seeded RNG and virtual clock, and
//! production use with real system resources.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Characters used for generated identifiers (lowercase base-36).
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of generated identifiers.
const ID_LEN: usize = 8;

/// Abstract environment providing time, randomness, and async primitives.
///
/// # Invariants
///
/// Implementations MUST guarantee:
///
/// - `now()` never goes backwards within a single execution context
/// - `random_bytes()` is seeded deterministically in simulation environments
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`, while simulation
    /// environments use virtual time.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current monotonic time.
    fn now(&self) -> Self::Instant;

    /// Current wall-clock time (UTC).
    ///
    /// Used for user-visible timestamps on chat messages and query history
    /// records. Unlike [`Environment::now`], this is allowed to jump.
    fn wall_clock(&self) -> DateTime<Utc>;

    /// Sleeps for the specified duration.
    ///
    /// This is the ONLY async method in the trait, and it should only be
    /// used by driver code (not domain logic).
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a short opaque identifier.
    ///
    /// Used for chat message ids and query history record ids. Identifiers
    /// are lowercase alphanumeric and unique in practice, not
    /// cryptographically meaningful.
    fn random_id(&self) -> String {
        let mut bytes = [0u8; ID_LEN];
        self.random_bytes(&mut bytes);
        bytes.iter().map(|b| char::from(ID_ALPHABET[usize::from(*b) % ID_ALPHABET.len()])).collect()
    }

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }
}
