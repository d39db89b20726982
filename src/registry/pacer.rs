// src/registry/pacer.rs

use rand::Rng;
use std::time::Duration;

/// Inter-call delay for registry fetches. The government APIs are rate
/// limited per service key, so the pipeline sleeps between consecutive calls
/// to the same upstream host. Injected so tests can run with no delay.
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
}

const JITTER_MAX_MS: u64 = 100;

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No-op pacer for tests.
    pub fn none() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    pub fn pause(&self) {
        if self.delay.is_zero() {
            return;
        }
        let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_MS);
        std::thread::sleep(self.delay + Duration::from_millis(jitter));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_pacer_does_not_sleep() {
        let start = std::time::Instant::now();
        Pacer::none().pause();
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
