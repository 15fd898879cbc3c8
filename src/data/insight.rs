//! Derived insights.
//!
//! Connects KPIs that are currently outside their target to the KPIs that
//! influence them, so the alerts view can surface likely causes next to
//! the raw alert list.

use std::cmp::Ordering;

use crate::source::RelationshipGraph;

use super::board::DashboardData;
use super::status::KpiStatus;

/// A derived observation linking a warning KPI to its influences.
#[derive(Debug, Clone)]
pub struct Insight {
    /// KPI currently outside its target.
    pub kpi: String,
    pub hospital: String,
    pub department: String,
    /// Influencing KPIs, strongest first. Empty when the graph knows no
    /// influences for this KPI.
    pub influences: Vec<InfluenceRef>,
}

/// One influence on a KPI, with the signed strength from the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct InfluenceRef {
    pub kpi: String,
    pub strength: f64,
    pub description: String,
}

/// Collect the KPIs that influence `name`.
///
/// Both directions of the graph are read independently: the KPI's own
/// `affected_by` edges, and any entry whose `impacts` reach it. The graph
/// is not assumed symmetric, so an influence recorded either way is found;
/// one recorded both ways is reported once (first occurrence wins).
pub fn influencers(graph: &RelationshipGraph, name: &str) -> Vec<InfluenceRef> {
    let mut found: Vec<InfluenceRef> = Vec::new();

    if let Some(entry) = graph.get(name) {
        for edge in entry.affected_by.iter().flatten() {
            push_unique(
                &mut found,
                InfluenceRef {
                    kpi: edge.kpi.clone(),
                    strength: edge.strength,
                    description: edge.description.clone(),
                },
            );
        }
    }

    for (source, entry) in graph {
        if source == name {
            continue;
        }
        for edge in &entry.impacts {
            if edge.kpi == name {
                push_unique(
                    &mut found,
                    InfluenceRef {
                        kpi: source.clone(),
                        strength: edge.strength,
                        description: edge.description.clone(),
                    },
                );
            }
        }
    }

    found.sort_by(|a, b| {
        b.strength
            .abs()
            .partial_cmp(&a.strength.abs())
            .unwrap_or(Ordering::Equal)
    });
    found
}

fn push_unique(list: &mut Vec<InfluenceRef>, candidate: InfluenceRef) {
    if !list.iter().any(|i| i.kpi == candidate.kpi) {
        list.push(candidate);
    }
}

/// Derive one insight per KPI currently in warning status.
pub fn derive(data: &DashboardData) -> Vec<Insight> {
    data.kpis
        .iter()
        .filter(|k| k.status == KpiStatus::Warning)
        .map(|k| Insight {
            kpi: k.name.clone(),
            hospital: k.hospital.clone(),
            department: k.department.clone(),
            influences: influencers(&data.relationships, &k.name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DashboardData;
    use crate::source::{sample_bundle, InfluenceEdge, RelationEntry};
    use std::collections::BTreeMap;

    #[test]
    fn test_influencers_found_via_impacts_of_other_entries() {
        let bundle = sample_bundle();
        // The sample graph records only "Average Wait Time" impacts
        // "Patient Satisfaction", with no affected_by on the other side.
        let found = influencers(&bundle.relationships, "Patient Satisfaction");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kpi, "Average Wait Time");
        assert_eq!(found[0].strength, -0.8);
    }

    #[test]
    fn test_influencers_merge_both_directions_without_duplicates() {
        let mut graph = BTreeMap::new();
        graph.insert(
            "A".to_string(),
            RelationEntry {
                impacts: vec![InfluenceEdge {
                    kpi: "B".to_string(),
                    strength: -0.4,
                    description: "from impacts".to_string(),
                }],
                affected_by: None,
            },
        );
        graph.insert(
            "B".to_string(),
            RelationEntry {
                impacts: vec![],
                affected_by: Some(vec![
                    InfluenceEdge {
                        kpi: "A".to_string(),
                        strength: -0.4,
                        description: "from affected_by".to_string(),
                    },
                    InfluenceEdge {
                        kpi: "C".to_string(),
                        strength: 0.9,
                        description: String::new(),
                    },
                ]),
            },
        );

        let found = influencers(&graph, "B");
        let names: Vec<&str> = found.iter().map(|i| i.kpi.as_str()).collect();
        // Strongest first, "A" reported once
        assert_eq!(names, vec!["C", "A"]);
    }

    #[test]
    fn test_derive_covers_each_warning_kpi() {
        let data = DashboardData::from_bundle(sample_bundle());
        let insights = derive(&data);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kpi, "Patient Satisfaction");
        assert_eq!(insights[0].influences[0].kpi, "Average Wait Time");
    }

    #[test]
    fn test_derive_empty_influences_for_unconnected_kpi() {
        let mut bundle = sample_bundle();
        bundle.relationships.clear();

        let data = DashboardData::from_bundle(bundle);
        let insights = derive(&data);

        assert_eq!(insights.len(), 1);
        assert!(insights[0].influences.is_empty());
    }
}
