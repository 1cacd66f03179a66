//! Configuration management for the topology modifier

use crate::error::TopologyError;

/// Parameters of one modification run
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierConfig {
    /// Multiplier applied to the current edge count to get the target
    pub change_factor: f64,

    /// Lower bound on the target edge count
    pub min_edges: Option<usize>,

    /// Upper bound on the target edge count, applied after `min_edges`
    pub max_edges: Option<usize>,
}

impl Default for ModifierConfig {
    fn default() -> Self {
        Self {
            change_factor: 1.2,
            min_edges: None,
            max_edges: None,
        }
    }
}

impl ModifierConfig {
    /// Create a new configuration with custom values
    pub fn new(change_factor: f64, min_edges: Option<usize>, max_edges: Option<usize>) -> Self {
        Self {
            change_factor,
            min_edges,
            max_edges,
        }
    }

    /// Reject change factors that cannot produce a meaningful target
    pub fn validate(&self) -> Result<(), TopologyError> {
        if !self.change_factor.is_finite() || self.change_factor <= 0.0 {
            return Err(TopologyError::InvalidChangeFactor(self.change_factor));
        }
        Ok(())
    }

    /// Target edge count for a graph currently holding `current_edges` edges.
    ///
    /// The scaled count is rounded, raised to `min_edges` and then capped at
    /// `max_edges`, so `max_edges` wins when the bounds are inverted.
    pub fn target_edge_count(&self, current_edges: usize) -> usize {
        let mut target = (current_edges as f64 * self.change_factor).round() as usize;

        if let Some(min_edges) = self.min_edges {
            target = target.max(min_edges);
        }
        if let Some(max_edges) = self.max_edges {
            target = target.min(max_edges);
        }

        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(4, 1.5, None, None, 6)]
    #[case(4, 0.5, None, None, 2)]
    #[case(4, 1.0, None, None, 4)]
    #[case(10, 1.25, None, None, 13)]
    #[case(5, 0.5, None, None, 3)]
    #[case(4, 0.5, Some(3), None, 3)]
    #[case(4, 2.0, None, Some(7), 7)]
    #[case(4, 1.0, Some(10), Some(5), 5)]
    fn target_is_rounded_then_clamped(
        #[case] current: usize,
        #[case] factor: f64,
        #[case] min_edges: Option<usize>,
        #[case] max_edges: Option<usize>,
        #[case] expected: usize,
    ) {
        let config = ModifierConfig::new(factor, min_edges, max_edges);
        assert_eq!(config.target_edge_count(current), expected);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.5)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn rejects_unusable_change_factors(#[case] factor: f64) {
        let config = ModifierConfig::new(factor, None, None);
        assert!(matches!(
            config.validate(),
            Err(TopologyError::InvalidChangeFactor(_))
        ));
    }

    #[test]
    fn default_grows_by_a_fifth() {
        let config = ModifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_edge_count(10), 12);
    }
}
