use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Keeps a reproducible share of `items`.
///
/// Percentages outside `0..=100` are treated as 100. Only a percentage strictly between 0 and
/// 100 samples; `floor(len × percentage / 100)` items are picked with an RNG seeded by `seed`
/// and returned in their original order.
pub fn sample_percentage<T>(items: Vec<T>, percentage: Decimal, seed: u64) -> Vec<T> {
    let percentage = if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        tracing::warn!(%percentage, "Sampling percentage out of range; returning every match.");
        Decimal::ONE_HUNDRED
    } else {
        percentage
    };
    if percentage.is_zero() || percentage == Decimal::ONE_HUNDRED {
        return items;
    }

    let len = items.len();
    let amount = (Decimal::from(len) * percentage / Decimal::ONE_HUNDRED)
        .floor()
        .to_usize()
        .unwrap_or(len)
        .min(len);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut keep = vec![false; len];
    for index in rand::seq::index::sample(&mut rng, len, amount).into_iter() {
        keep[index] = true;
    }

    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, kept)| kept.then_some(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sample_size_rounds_down() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(sample_percentage(items.clone(), dec!(30), 42).len(), 3);
        assert_eq!(sample_percentage(items, dec!(45), 42).len(), 4);
    }

    #[test]
    fn same_seed_same_sample() {
        let items: Vec<u32> = (0..100).collect();
        let first = sample_percentage(items.clone(), dec!(25), 42);
        let second = sample_percentage(items, dec!(25), 42);
        assert_eq!(first, second);
    }

    #[test]
    fn sample_keeps_original_order() {
        let items: Vec<u32> = (0..50).collect();
        let sampled = sample_percentage(items, dec!(40), 7);
        assert!(sampled.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn boundary_and_invalid_percentages_keep_everything() {
        let items: Vec<u32> = (0..10).collect();
        for percentage in [dec!(0), dec!(100), dec!(-5), dec!(150)] {
            assert_eq!(sample_percentage(items.clone(), percentage, 42), items);
        }
    }
}
