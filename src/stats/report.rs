//! Before/after comparison of two statistics snapshots

use std::fmt;

use serde::{Serialize, Serializer};

use crate::stats::StatsSnapshot;

/// One metric value, typed so the report knows what arithmetic is allowed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Count(usize),
    Real(f64),
    Flag(bool),
}

impl StatValue {
    /// Numeric value usable in a relative change, if any
    fn as_finite(&self) -> Option<f64> {
        match *self {
            StatValue::Count(count) => Some(count as f64),
            StatValue::Real(value) if value.is_finite() => Some(value),
            StatValue::Real(_) | StatValue::Flag(_) => None,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StatValue::Count(count) => write!(f, "{}", count),
            StatValue::Flag(flag) => write!(f, "{}", flag),
            StatValue::Real(value) if value.is_nan() => write!(f, "N/A"),
            StatValue::Real(value) if value.is_infinite() => {
                write!(f, "{}", if value > 0.0 { "inf" } else { "-inf" })
            }
            StatValue::Real(value) => write!(f, "{:.6}", value),
        }
    }
}

impl Serialize for StatValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            StatValue::Count(count) => serializer.serialize_u64(count as u64),
            StatValue::Flag(flag) => serializer.serialize_bool(flag),
            StatValue::Real(value) if value.is_finite() => serializer.serialize_f64(value),
            StatValue::Real(_) => serializer.collect_str(self),
        }
    }
}

/// A metric before and after modification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatComparison {
    pub metric: &'static str,
    pub original: StatValue,
    pub modified: StatValue,

    /// Relative change, present only when it is arithmetically meaningful
    pub change: Option<f64>,
}

impl StatComparison {
    /// Change as a percentage with two decimals, or `N/A`
    pub fn change_display(&self) -> String {
        match self.change {
            Some(change) => format!("{:.2}%", change * 100.0),
            None => "N/A".to_string(),
        }
    }
}

/// Relative change between two values; sentinels and zero baselines give `None`
pub fn relative_change(original: StatValue, modified: StatValue) -> Option<f64> {
    let before = original.as_finite()?;
    let after = modified.as_finite()?;
    if before == 0.0 {
        return None;
    }
    Some((after - before) / before)
}

/// Pair up every metric of the two snapshots
pub fn compare(original: &StatsSnapshot, modified: &StatsSnapshot) -> Vec<StatComparison> {
    original
        .entries()
        .into_iter()
        .zip(modified.entries())
        .map(|((metric, before), (_, after))| StatComparison {
            metric,
            original: before,
            modified: after,
            change: relative_change(before, after),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(edge_count: usize, assortativity: f64, path: f64) -> StatsSnapshot {
        StatsSnapshot {
            node_count: 4,
            edge_count,
            avg_degree: 2.0 * edge_count as f64 / 4.0,
            density: edge_count as f64 / 6.0,
            is_connected: path.is_finite(),
            avg_clustering: 0.0,
            degree_assortativity: assortativity,
            avg_shortest_path: path,
        }
    }

    #[test]
    fn sentinels_and_flags_have_no_change() {
        let before = snapshot(4, f64::NAN, 1.5);
        let after = snapshot(3, -0.5, f64::INFINITY);
        let rows = compare(&before, &after);

        let by_metric = |name: &str| rows.iter().find(|row| row.metric == name).unwrap().clone();

        assert_eq!(by_metric("num_edges").change_display(), "-25.00%");
        assert_eq!(by_metric("num_nodes").change, Some(0.0));
        assert_eq!(by_metric("is_connected").change, None);
        assert_eq!(by_metric("degree_assortativity").change_display(), "N/A");
        assert_eq!(by_metric("avg_shortest_path").change, None);
        // Zero baseline
        assert_eq!(by_metric("avg_clustering").change, None);
    }

    #[test]
    fn display_renders_sentinels() {
        assert_eq!(StatValue::Real(f64::NAN).to_string(), "N/A");
        assert_eq!(StatValue::Real(f64::INFINITY).to_string(), "inf");
        assert_eq!(StatValue::Real(0.5).to_string(), "0.500000");
        assert_eq!(StatValue::Count(7).to_string(), "7");
        assert_eq!(StatValue::Flag(true).to_string(), "true");
    }

    #[test]
    fn serializes_sentinels_as_strings() {
        let row = StatComparison {
            metric: "avg_shortest_path",
            original: StatValue::Real(1.25),
            modified: StatValue::Real(f64::INFINITY),
            change: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["original"], serde_json::json!(1.25));
        assert_eq!(json["modified"], serde_json::json!("inf"));
        assert!(json["change"].is_null());
    }
}
