//! Seedable card ordering for study sessions.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Visiting order over `len` cards: identity, or a uniform Fisher–Yates
/// permutation drawn from `rng`.
pub fn card_order(len: usize, shuffle: bool, rng: &mut StdRng) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    if shuffle {
        order.shuffle(rng);
    }
    order
}
