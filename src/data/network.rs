//! One-hop influence network construction.

use std::collections::HashSet;

use crate::source::RelationshipGraph;

/// A node in the influence network.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkNode {
    pub name: String,
    pub value: f64,
}

/// A directed influence edge with its absolute weight.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// The one-hop subgraph centered on a selected KPI.
///
/// Node order is discovery order: the center first, then the KPIs it
/// impacts, then the KPIs it is affected by. The result is handed to the
/// rendering layer verbatim; no layout happens here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Neighborhood {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

impl Neighborhood {
    /// Build the neighborhood of `center`.
    ///
    /// Only one hop is explored, keeping the view a star around the
    /// selected KPI. Nodes are deduplicated by name; a KPI reached through
    /// several edges appears once, while every edge is kept. A center with
    /// no graph entry yields just the center node and no edges.
    pub fn around<F>(center: &str, graph: &RelationshipGraph, value_of: F) -> Self
    where
        F: Fn(&str) -> f64,
    {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        nodes.push(NetworkNode {
            name: center.to_string(),
            value: value_of(center),
        });
        seen.insert(center.to_string());

        if let Some(entry) = graph.get(center) {
            for edge in &entry.impacts {
                if seen.insert(edge.kpi.clone()) {
                    nodes.push(NetworkNode {
                        name: edge.kpi.clone(),
                        value: value_of(&edge.kpi),
                    });
                }
                edges.push(NetworkEdge {
                    source: center.to_string(),
                    target: edge.kpi.clone(),
                    weight: edge.strength.abs(),
                });
            }

            for edge in entry.affected_by.iter().flatten() {
                if seen.insert(edge.kpi.clone()) {
                    nodes.push(NetworkNode {
                        name: edge.kpi.clone(),
                        value: value_of(&edge.kpi),
                    });
                }
                edges.push(NetworkEdge {
                    source: edge.kpi.clone(),
                    target: center.to_string(),
                    weight: edge.strength.abs(),
                });
            }
        }

        Self { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{InfluenceEdge, RelationEntry};
    use std::collections::BTreeMap;

    fn edge(kpi: &str, strength: f64) -> InfluenceEdge {
        InfluenceEdge {
            kpi: kpi.to_string(),
            strength,
            description: String::new(),
        }
    }

    fn graph_with(center: &str, entry: RelationEntry) -> RelationshipGraph {
        let mut graph = BTreeMap::new();
        graph.insert(center.to_string(), entry);
        graph
    }

    #[test]
    fn test_worked_example() {
        let graph = graph_with(
            "Average Wait Time",
            RelationEntry {
                impacts: vec![InfluenceEdge {
                    kpi: "Patient Satisfaction".to_string(),
                    strength: -0.8,
                    description: "Longer waits reduce satisfaction.".to_string(),
                }],
                affected_by: None,
            },
        );

        let lookup = |name: &str| match name {
            "Average Wait Time" => 27.2,
            "Patient Satisfaction" => 3.9,
            _ => 0.0,
        };

        let hood = Neighborhood::around("Average Wait Time", &graph, lookup);

        assert_eq!(
            hood.nodes,
            vec![
                NetworkNode { name: "Average Wait Time".to_string(), value: 27.2 },
                NetworkNode { name: "Patient Satisfaction".to_string(), value: 3.9 },
            ]
        );
        assert_eq!(
            hood.edges,
            vec![NetworkEdge {
                source: "Average Wait Time".to_string(),
                target: "Patient Satisfaction".to_string(),
                weight: 0.8,
            }]
        );
    }

    #[test]
    fn test_missing_entry_yields_center_only() {
        let graph = RelationshipGraph::new();
        let hood = Neighborhood::around("Unknown KPI", &graph, |_| 5.0);

        assert_eq!(hood.nodes.len(), 1);
        assert_eq!(hood.nodes[0].name, "Unknown KPI");
        assert_eq!(hood.nodes[0].value, 5.0);
        assert!(hood.edges.is_empty());
    }

    #[test]
    fn test_repeated_edges_dedup_nodes_but_keep_edges() {
        let graph = graph_with(
            "A",
            RelationEntry {
                impacts: vec![edge("B", 0.5), edge("B", -0.3)],
                affected_by: Some(vec![edge("B", 0.9)]),
            },
        );

        let hood = Neighborhood::around("A", &graph, |_| 0.0);

        let names: Vec<&str> = hood.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(hood.edges.len(), 3);
    }

    #[test]
    fn test_affected_by_edges_point_at_center() {
        let graph = graph_with(
            "Readmission Rate",
            RelationEntry {
                impacts: vec![],
                affected_by: Some(vec![edge("Staff Utilization", -0.6)]),
            },
        );

        let hood = Neighborhood::around("Readmission Rate", &graph, |_| 0.0);

        assert_eq!(hood.edges.len(), 1);
        assert_eq!(hood.edges[0].source, "Staff Utilization");
        assert_eq!(hood.edges[0].target, "Readmission Rate");
        assert_eq!(hood.edges[0].weight, 0.6);
    }

    #[test]
    fn test_discovery_order_impacts_before_affected_by() {
        let graph = graph_with(
            "A",
            RelationEntry {
                impacts: vec![edge("B", 0.1), edge("C", 0.2)],
                affected_by: Some(vec![edge("D", 0.3)]),
            },
        );

        let hood = Neighborhood::around("A", &graph, |_| 0.0);
        let names: Vec<&str> = hood.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_one_hop_only() {
        let mut graph = graph_with(
            "A",
            RelationEntry {
                impacts: vec![edge("B", 0.5)],
                affected_by: None,
            },
        );
        // B has its own neighbors, which must not be traversed
        graph.insert(
            "B".to_string(),
            RelationEntry {
                impacts: vec![edge("C", 0.5)],
                affected_by: None,
            },
        );

        let hood = Neighborhood::around("A", &graph, |_| 0.0);
        assert!(!hood.nodes.iter().any(|n| n.name == "C"));
        assert_eq!(hood.edges.len(), 1);
    }
}
