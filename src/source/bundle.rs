//! Shared types for the dashboard data bundle.
//!
//! These types match the JSON resources produced by the KPI pipeline:
//! a metric catalog, an influence graph, and an alert list. They are the
//! common format between the data producer and this dashboard consumer,
//! validated once at the load boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// File/path name of the metric catalog resource.
pub const CATALOG_RESOURCE: &str = "kpi_data.json";
/// File/path name of the relationship graph resource.
pub const RELATIONSHIPS_RESOURCE: &str = "kpi_relationships.json";
/// File/path name of the alert list resource.
pub const ALERTS_RESOURCE: &str = "alerts.json";

/// The full metric catalog: hospital name → department name → KPI name →
/// [`MetricRecord`].
pub type KpiCatalog = BTreeMap<String, BTreeMap<String, BTreeMap<String, MetricRecord>>>;

/// Directed influence edges between KPIs, keyed by source KPI name.
///
/// Entries are not guaranteed symmetric: an edge may appear only on the
/// `impacts` side of one KPI without a matching `affected_by` on the other.
pub type RelationshipGraph = BTreeMap<String, RelationEntry>;

/// One measured indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Latest observed reading.
    pub current_value: f64,

    /// Target expression: a comparison operator followed by a numeric
    /// threshold, e.g. `"< 30"` or `"> 4.0"`.
    pub target: String,

    /// Display unit. Not used in evaluation.
    pub unit: String,

    /// Which direction of deviation is good.
    #[serde(rename = "type")]
    pub kind: MetricKind,

    /// Historical readings, oldest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Vec<f64>>,
}

/// Whether a KPI should sit below or above its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    LowerBetter,
    HigherBetter,
    /// Catch-all for metric types this version does not know about.
    #[serde(other)]
    Other,
}

/// Influence edges for a single KPI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationEntry {
    /// KPIs this one influences.
    #[serde(default)]
    pub impacts: Vec<InfluenceEdge>,

    /// KPIs that influence this one. May be absent entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_by: Option<Vec<InfluenceEdge>>,
}

/// A single directed influence on another KPI.
///
/// The sign of `strength` is the direction of influence (positive pushes
/// the target up, negative pushes it down); the magnitude is the weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceEdge {
    pub kpi: String,
    pub strength: f64,
    pub description: String,
}

/// One entry of the alert list. Load order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub hospital: String,
    pub department: String,
    pub kpi: String,
    pub level: AlertLevel,
    pub message: String,

    #[serde(rename = "rootCause", default, skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}

impl AlertLevel {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            AlertLevel::Info => "INFO",
            AlertLevel::Warning => "WARN",
            AlertLevel::Critical => "CRIT",
        }
    }
}

/// The three resources of one load, deserialized as a unit.
///
/// A bundle only exists complete: if any resource fails to load or parse,
/// the whole bundle is discarded rather than delivered partially.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataBundle {
    pub catalog: KpiCatalog,
    pub relationships: RelationshipGraph,
    pub alerts: Vec<Alert>,
}

impl DataBundle {
    /// Parse a bundle from the raw JSON text of the three resources.
    pub fn parse(catalog: &str, relationships: &str, alerts: &str) -> serde_json::Result<Self> {
        Ok(Self {
            catalog: serde_json::from_str(catalog)?,
            relationships: serde_json::from_str(relationships)?,
            alerts: serde_json::from_str(alerts)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog() {
        let json = r#"{
            "General Medical Center": {
                "Emergency Department": {
                    "Average Wait Time": {
                        "current_value": 27.2,
                        "target": "< 30",
                        "unit": "minutes",
                        "type": "lower_better",
                        "trend": [29, 28.2, 27.9, 27.3, 27.2]
                    }
                }
            }
        }"#;

        let catalog: KpiCatalog = serde_json::from_str(json).unwrap();
        let record = &catalog["General Medical Center"]["Emergency Department"]["Average Wait Time"];
        assert_eq!(record.current_value, 27.2);
        assert_eq!(record.target, "< 30");
        assert_eq!(record.kind, MetricKind::LowerBetter);
        assert_eq!(record.trend.as_deref(), Some(&[29.0, 28.2, 27.9, 27.3, 27.2][..]));
    }

    #[test]
    fn test_unknown_metric_type_is_tolerated() {
        let json = r#"{
            "current_value": 5.0,
            "target": "< 10",
            "unit": "%",
            "type": "stable_best"
        }"#;

        let record: MetricRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, MetricKind::Other);
        assert!(record.trend.is_none());
    }

    #[test]
    fn test_deserialize_relationships() {
        let json = r#"{
            "Average Wait Time": {
                "impacts": [
                    { "kpi": "Patient Satisfaction", "strength": -0.8, "description": "Longer waits reduce satisfaction." }
                ]
            }
        }"#;

        let graph: RelationshipGraph = serde_json::from_str(json).unwrap();
        let entry = &graph["Average Wait Time"];
        assert_eq!(entry.impacts.len(), 1);
        assert_eq!(entry.impacts[0].kpi, "Patient Satisfaction");
        assert_eq!(entry.impacts[0].strength, -0.8);
        assert!(entry.affected_by.is_none());
    }

    #[test]
    fn test_deserialize_alert_with_camel_case_fields() {
        let json = r#"[{
            "hospital": "General Medical Center",
            "department": "Emergency Department",
            "kpi": "Patient Satisfaction",
            "level": "warning",
            "message": "Patient satisfaction below target (3.9 vs >4.0)",
            "rootCause": "Extended average wait times",
            "recommendation": "Reduce queue times by optimizing triage"
        }]"#;

        let alerts: Vec<Alert> = serde_json::from_str(json).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Warning);
        assert_eq!(alerts[0].root_cause.as_deref(), Some("Extended average wait times"));
    }

    #[test]
    fn test_alert_optional_fields_absent() {
        let json = r#"[{
            "hospital": "H",
            "department": "D",
            "kpi": "K",
            "level": "info",
            "message": "m"
        }]"#;

        let alerts: Vec<Alert> = serde_json::from_str(json).unwrap();
        assert!(alerts[0].root_cause.is_none());
        assert!(alerts[0].recommendation.is_none());
    }

    #[test]
    fn test_parse_bundle_fails_on_any_bad_resource() {
        let result = DataBundle::parse("{}", "{}", "not json");
        assert!(result.is_err());
    }
}
