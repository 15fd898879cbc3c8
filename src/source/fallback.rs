//! Built-in sample data.
//!
//! When any of the three external resources fails to load or parse, the
//! whole load is abandoned and this complete substitute takes its place.
//! The substitution is all-or-nothing: callers never see a partial merge
//! of fetched and built-in data.

use std::collections::BTreeMap;

use super::bundle::{
    Alert, AlertLevel, DataBundle, InfluenceEdge, MetricKind, MetricRecord, RelationEntry,
};

/// The complete fallback data set: a small catalog, one influence edge,
/// and one active alert.
pub fn sample_bundle() -> DataBundle {
    let mut metrics = BTreeMap::new();
    metrics.insert(
        "Average Wait Time".to_string(),
        MetricRecord {
            current_value: 27.2,
            target: "< 30".to_string(),
            unit: "minutes".to_string(),
            kind: MetricKind::LowerBetter,
            trend: Some(vec![29.0, 28.2, 27.9, 27.3, 27.2]),
        },
    );
    metrics.insert(
        "Patient Satisfaction".to_string(),
        MetricRecord {
            current_value: 3.9,
            target: "> 4.0".to_string(),
            unit: "score/5".to_string(),
            kind: MetricKind::HigherBetter,
            trend: Some(vec![3.7, 3.8, 3.9]),
        },
    );

    let mut departments = BTreeMap::new();
    departments.insert("Emergency Department".to_string(), metrics);

    let mut catalog = BTreeMap::new();
    catalog.insert("General Medical Center".to_string(), departments);

    let mut relationships = BTreeMap::new();
    relationships.insert(
        "Average Wait Time".to_string(),
        RelationEntry {
            impacts: vec![InfluenceEdge {
                kpi: "Patient Satisfaction".to_string(),
                strength: -0.8,
                description: "Longer waits reduce satisfaction.".to_string(),
            }],
            affected_by: None,
        },
    );

    let alerts = vec![Alert {
        hospital: "General Medical Center".to_string(),
        department: "Emergency Department".to_string(),
        kpi: "Patient Satisfaction".to_string(),
        level: AlertLevel::Warning,
        message: "Patient satisfaction below target (3.9 vs >4.0)".to_string(),
        root_cause: Some("Extended average wait times".to_string()),
        recommendation: Some("Reduce queue times by optimizing triage".to_string()),
    }];

    DataBundle {
        catalog,
        relationships,
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_bundle_is_complete() {
        let bundle = sample_bundle();
        assert_eq!(bundle.catalog.len(), 1);
        assert_eq!(bundle.relationships.len(), 1);
        assert_eq!(bundle.alerts.len(), 1);

        let record =
            &bundle.catalog["General Medical Center"]["Emergency Department"]["Average Wait Time"];
        assert_eq!(record.current_value, 27.2);
        assert_eq!(record.kind, MetricKind::LowerBetter);
    }

    #[test]
    fn test_sample_bundle_round_trips_through_json() {
        let bundle = sample_bundle();
        let catalog = serde_json::to_string(&bundle.catalog).unwrap();
        let relationships = serde_json::to_string(&bundle.relationships).unwrap();
        let alerts = serde_json::to_string(&bundle.alerts).unwrap();

        let parsed = DataBundle::parse(&catalog, &relationships, &alerts).unwrap();
        assert_eq!(parsed, bundle);
    }
}
