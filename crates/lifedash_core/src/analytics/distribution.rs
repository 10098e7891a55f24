//! Share-of-total slices for the time distribution charts.

use serde::{Deserialize, Serialize};

/// One named slice of a distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSlice {
    pub name: String,
    /// Raw amount, in minutes for time distributions.
    pub value: u64,
    /// Whole-number share of the total.
    pub percentage: u8,
}

/// Builds slices whose percentages sum to exactly 100 when the total is
/// positive, and are all 0 otherwise.
///
/// Uses largest-remainder apportionment: every slice gets the floor of its
/// exact share, then leftover points go to the largest remainders, earlier
/// slices winning ties.
pub fn apportion(values: Vec<(String, u64)>) -> Vec<DistributionSlice> {
    let total: u64 = values.iter().map(|(_, value)| value).sum();
    if total == 0 {
        return values
            .into_iter()
            .map(|(name, value)| DistributionSlice {
                name,
                value,
                percentage: 0,
            })
            .collect();
    }

    let mut floors: Vec<u64> = Vec::with_capacity(values.len());
    let mut remainders: Vec<(usize, u64)> = Vec::with_capacity(values.len());
    for (index, (_, value)) in values.iter().enumerate() {
        let scaled = u128::from(*value) * 100;
        let total = u128::from(total);
        floors.push((scaled / total) as u64);
        remainders.push((index, (scaled % total) as u64));
    }

    let assigned: u64 = floors.iter().sum();
    let leftover = 100u64.saturating_sub(assigned) as usize;
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (index, _) in remainders.into_iter().take(leftover) {
        floors[index] += 1;
    }

    values
        .into_iter()
        .zip(floors)
        .map(|((name, value), percentage)| DistributionSlice {
            name,
            value,
            percentage: percentage.min(100) as u8,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::apportion;

    fn slices(values: &[(&str, u64)]) -> Vec<u8> {
        apportion(
            values
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        )
        .into_iter()
        .map(|slice| slice.percentage)
        .collect()
    }

    #[test]
    fn thirds_sum_to_one_hundred() {
        let percentages = slices(&[("a", 1), ("b", 1), ("c", 1)]);
        assert_eq!(percentages, vec![34, 33, 33]);
    }

    #[test]
    fn zero_total_yields_all_zero() {
        assert_eq!(slices(&[("a", 0), ("b", 0)]), vec![0, 0]);
        assert!(slices(&[]).is_empty());
    }

    #[test]
    fn exact_shares_are_untouched() {
        assert_eq!(slices(&[("a", 30), ("b", 90), ("c", 0)]), vec![25, 75, 0]);
    }
}
