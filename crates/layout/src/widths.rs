//! Percentage width distribution for split panels.

use std::collections::BTreeMap;

/// Smallest share a panel flanking a dragged divider may shrink to.
pub const MIN_PANEL_PERCENT: f64 = 10.0;
/// Largest share a panel flanking a dragged divider may grow to.
pub const MAX_PANEL_PERCENT: f64 = 90.0;

/// Mapping from a panel's position among all layout children to its width
/// in percent of the container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidthDistribution {
    widths: BTreeMap<usize, f64>,
}

impl WidthDistribution {
    /// Equal split over the given panel slots (`100 / n` each).
    pub fn equal_split(slots: &[usize]) -> Self {
        if slots.is_empty() {
            return Self::default();
        }
        let share = 100.0 / slots.len() as f64;
        Self {
            widths: slots.iter().map(|&slot| (slot, share)).collect(),
        }
    }

    /// Width of the panel at `slot`.
    pub fn get(&self, slot: usize) -> Option<f64> {
        self.widths.get(&slot).copied()
    }

    /// Set the width of the panel at `slot`.
    pub fn set(&mut self, slot: usize, percent: f64) {
        self.widths.insert(slot, percent);
    }

    /// Whether `slot` holds a panel width.
    pub fn contains(&self, slot: usize) -> bool {
        self.widths.contains_key(&slot)
    }

    /// Number of panels tracked.
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Check if no panel is tracked.
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Sum of all panel widths.
    pub fn total(&self) -> f64 {
        self.widths.values().sum()
    }

    /// Iterate `(slot, percent)` in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.widths.iter().map(|(&slot, &pct)| (slot, pct))
    }

    /// Distribution after moving the divider at `divider`: its left neighbour
    /// grows by `delta_percent` from its current width, clamped, and its right
    /// neighbour takes the complement to 100.
    ///
    /// Only `divider - 1` and `divider + 1` change. Returns `None` when either
    /// flanking slot is not a panel.
    pub fn resized_pair(&self, divider: usize, delta_percent: f64) -> Option<Self> {
        let left_slot = divider.checked_sub(1)?;
        let right_slot = divider + 1;
        let previous_left = self.get(left_slot)?;
        if !self.contains(right_slot) {
            return None;
        }

        let left = clamp_share(previous_left + delta_percent);
        let right = 100.0 - left;

        let mut next = self.clone();
        next.set(left_slot, left);
        next.set(right_slot, right);
        Some(next)
    }
}

/// Clamp a panel share to `[MIN_PANEL_PERCENT, MAX_PANEL_PERCENT]`.
///
/// NaN (zero-width container with zero delta) clamps to the minimum.
pub fn clamp_share(percent: f64) -> f64 {
    if percent.is_nan() {
        return MIN_PANEL_PERCENT;
    }
    percent.clamp(MIN_PANEL_PERCENT, MAX_PANEL_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_equal_split_sums_to_hundred() {
        for n in 1..=12 {
            let slots: Vec<usize> = (0..n).map(|i| i * 2).collect();
            let dist = WidthDistribution::equal_split(&slots);
            assert_eq!(dist.len(), n);
            for &slot in &slots {
                let w = dist.get(slot).unwrap();
                assert!((w - 100.0 / n as f64).abs() < EPS);
            }
            assert!((dist.total() - 100.0).abs() < EPS, "n = {}", n);
        }
    }

    #[test]
    fn test_equal_split_empty() {
        let dist = WidthDistribution::equal_split(&[]);
        assert!(dist.is_empty());
        assert_eq!(dist.total(), 0.0);
    }

    #[test]
    fn test_resized_pair_stays_in_bounds() {
        let dist = WidthDistribution::equal_split(&[0, 2]);
        for delta in [-5000.0, -1000.0, -45.0, -40.0, 0.0, 12.5, 40.0, 1000.0, 5000.0] {
            let next = dist.resized_pair(1, delta).unwrap();
            let left = next.get(0).unwrap();
            let right = next.get(2).unwrap();
            assert!((MIN_PANEL_PERCENT..=MAX_PANEL_PERCENT).contains(&left));
            assert!((MIN_PANEL_PERCENT..=MAX_PANEL_PERCENT).contains(&right));
            assert_eq!(left + right, 100.0);
        }
    }

    #[test]
    fn test_resized_pair_zero_delta_is_identity() {
        let dist = WidthDistribution::equal_split(&[0, 2]);
        let next = dist.resized_pair(1, 0.0).unwrap();
        assert_eq!(next, dist);
    }

    #[test]
    fn test_resized_pair_requires_panels_on_both_sides() {
        let dist = WidthDistribution::equal_split(&[0, 2]);
        assert!(dist.resized_pair(0, 10.0).is_none());
        assert!(dist.resized_pair(3, 10.0).is_none());
    }

    #[test]
    fn test_resized_pair_leaves_other_panels_alone() {
        let dist = WidthDistribution::equal_split(&[0, 2, 4]);
        let third = dist.get(4).unwrap();
        let next = dist.resized_pair(1, 20.0).unwrap();
        assert!((next.get(0).unwrap() - (third + 20.0)).abs() < EPS);
        assert_eq!(next.get(4), Some(third));
    }

    #[test]
    fn test_resized_pair_builds_on_current_width() {
        let dist = WidthDistribution::equal_split(&[0, 2]);
        let moved = dist.resized_pair(1, 10.0).unwrap();
        assert_eq!(moved.get(0), Some(60.0));

        let again = moved.resized_pair(1, 0.0).unwrap();
        assert_eq!(again, moved);
        let further = moved.resized_pair(1, 10.0).unwrap();
        assert_eq!(further.get(0), Some(70.0));
        assert_eq!(further.get(2), Some(30.0));
    }

    #[test]
    fn test_clamp_share_nan() {
        assert_eq!(clamp_share(f64::NAN), MIN_PANEL_PERCENT);
        assert_eq!(clamp_share(f64::INFINITY), MAX_PANEL_PERCENT);
        assert_eq!(clamp_share(f64::NEG_INFINITY), MIN_PANEL_PERCENT);
    }
}
