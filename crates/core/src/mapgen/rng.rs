//! Bounded draws and shuffles over an injected random source.

use rand_chacha::rand_core::Rng;

pub(super) fn random_between<R: Rng + ?Sized>(
    rng: &mut R,
    min_value: usize,
    max_value: usize,
) -> usize {
    debug_assert!(min_value <= max_value);
    let range_size = (max_value - min_value) as u64 + 1;
    min_value + (rng.next_u64() % range_size) as usize
}

pub(super) fn choose<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(random_between(rng, 0, items.len() - 1))
}

/// Fisher-Yates shuffle in place.
pub(super) fn shuffle<T, R: Rng + ?Sized>(rng: &mut R, items: &mut [T]) {
    for upper in (1..items.len()).rev() {
        let swap_with = random_between(rng, 0, upper);
        items.swap(upper, swap_with);
    }
}
