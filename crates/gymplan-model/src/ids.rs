use std::collections::HashSet;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Short random base-36 ids for items and stored images.
///
/// Not cryptographic; only needs to avoid collisions inside one plan, which
/// `next_unique` checks explicitly.
#[derive(Clone, Debug)]
pub struct IdGen {
    rng: SmallRng,
}

impl Default for IdGen {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl IdGen {
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn next_id(&mut self) -> String {
        to_base36(self.rng.random::<u64>())
    }

    pub fn next_unique(&mut self, taken: &HashSet<String>) -> String {
        loop {
            let id = self.next_id();
            if !taken.contains(&id) {
                return id;
            }
        }
    }
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut buf = Vec::with_capacity(13);
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_is_deterministic() {
        let mut a = IdGen::seeded(7);
        let mut b = IdGen::seeded(7);
        assert_eq!(a.next_id(), b.next_id());
        assert_eq!(a.next_id(), b.next_id());
    }

    #[test]
    fn different_seeds_and_entropy_diverge() {
        assert_ne!(IdGen::seeded(1).next_id(), IdGen::seeded(2).next_id());
        assert_ne!(IdGen::from_entropy().next_id(), IdGen::from_entropy().next_id());
    }

    #[test]
    fn ids_are_base36() {
        let mut g = IdGen::seeded(42);
        for _ in 0..100 {
            let id = g.next_id();
            assert!(!id.is_empty());
            assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn next_unique_skips_taken() {
        let mut twin = IdGen::seeded(3);
        let first = twin.next_id();
        let mut g = IdGen::seeded(3);
        let taken: HashSet<String> = [first.clone()].into_iter().collect();
        assert_ne!(g.next_unique(&taken), first);
    }
}
