//! Dashboard data assembly.
//!
//! This module transforms a raw [`DataBundle`] into processed data with
//! KPI status computed for every catalog entry. The resulting
//! [`DashboardData`] owns the catalog, the relationship graph and the
//! alert list for the session; a reload replaces it wholesale, nothing
//! mutates it in place.

use std::time::Instant;

use crate::source::{Alert, AlertLevel, DataBundle, KpiCatalog, MetricKind, RelationshipGraph};

use super::network::Neighborhood;
use super::status::{evaluate, KpiStatus};

/// One KPI flattened out of the catalog with its computed status.
#[derive(Debug, Clone)]
pub struct KpiEntry {
    pub hospital: String,
    pub department: String,
    pub name: String,
    pub value: f64,
    pub target: String,
    pub unit: String,
    pub kind: MetricKind,
    pub trend: Vec<f64>,
    pub status: KpiStatus,
}

/// Complete processed dashboard state ready for display.
#[derive(Debug, Clone)]
pub struct DashboardData {
    /// Flattened KPI rows, warnings first, then by name.
    pub kpis: Vec<KpiEntry>,
    /// The raw catalog, kept for name lookups.
    pub catalog: KpiCatalog,
    pub relationships: RelationshipGraph,
    /// Alerts in load order, which is display order.
    pub alerts: Vec<Alert>,
    pub last_updated: Instant,
}

impl DashboardData {
    /// Convert a raw bundle into processed dashboard data.
    ///
    /// This is the single conversion point used by all data sources.
    pub fn from_bundle(bundle: DataBundle) -> Self {
        let mut kpis: Vec<KpiEntry> = Vec::new();
        for (hospital, departments) in &bundle.catalog {
            for (department, metrics) in departments {
                for (name, record) in metrics {
                    kpis.push(KpiEntry {
                        hospital: hospital.clone(),
                        department: department.clone(),
                        name: name.clone(),
                        value: record.current_value,
                        target: record.target.clone(),
                        unit: record.unit.clone(),
                        kind: record.kind,
                        trend: record.trend.clone().unwrap_or_default(),
                        status: evaluate(record.current_value, &record.target, record.kind),
                    });
                }
            }
        }

        // Sort by status (warnings first), then by name
        kpis.sort_by(|a, b| b.status.cmp(&a.status).then_with(|| a.name.cmp(&b.name)));

        Self {
            kpis,
            catalog: bundle.catalog,
            relationships: bundle.relationships,
            alerts: bundle.alerts,
            last_updated: Instant::now(),
        }
    }

    /// Current value for a KPI name anywhere in the catalog.
    pub fn lookup_value(&self, name: &str) -> f64 {
        lookup_value(&self.catalog, name)
    }

    /// One-hop influence neighborhood of the given KPI.
    pub fn neighborhood(&self, center: &str) -> Neighborhood {
        Neighborhood::around(center, &self.relationships, |name| self.lookup_value(name))
    }

    /// All KPIs currently outside their target.
    pub fn warning_kpis(&self) -> Vec<&KpiEntry> {
        self.kpis.iter().filter(|k| k.status == KpiStatus::Warning).collect()
    }

    /// Counts of (good, warning) KPIs.
    pub fn status_counts(&self) -> (usize, usize) {
        let warning = self.kpis.iter().filter(|k| k.status == KpiStatus::Warning).count();
        (self.kpis.len() - warning, warning)
    }

    /// Counts of (info, warning, critical) alerts.
    pub fn alert_counts(&self) -> (usize, usize, usize) {
        let mut info = 0;
        let mut warning = 0;
        let mut critical = 0;
        for alert in &self.alerts {
            match alert.level {
                AlertLevel::Info => info += 1,
                AlertLevel::Warning => warning += 1,
                AlertLevel::Critical => critical += 1,
            }
        }
        (info, warning, critical)
    }
}

/// Scan the catalog depth-first for a KPI by name.
///
/// The first match wins; KPI names are treated as globally unique for
/// lookup purposes. Returns `0.0` when the name is absent anywhere.
pub fn lookup_value(catalog: &KpiCatalog, name: &str) -> f64 {
    for departments in catalog.values() {
        for metrics in departments.values() {
            if let Some(record) = metrics.get(name) {
                return record.current_value;
            }
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::sample_bundle;

    #[test]
    fn test_from_bundle_flattens_and_evaluates() {
        let data = DashboardData::from_bundle(sample_bundle());

        assert_eq!(data.kpis.len(), 2);

        // Warnings sort first
        assert_eq!(data.kpis[0].name, "Patient Satisfaction");
        assert_eq!(data.kpis[0].status, KpiStatus::Warning);
        assert_eq!(data.kpis[1].name, "Average Wait Time");
        assert_eq!(data.kpis[1].status, KpiStatus::Good);
    }

    #[test]
    fn test_lookup_value_finds_first_match() {
        let data = DashboardData::from_bundle(sample_bundle());
        assert_eq!(data.lookup_value("Average Wait Time"), 27.2);
        assert_eq!(data.lookup_value("Patient Satisfaction"), 3.9);
    }

    #[test]
    fn test_lookup_value_missing_is_zero() {
        let data = DashboardData::from_bundle(sample_bundle());
        assert_eq!(data.lookup_value("Bed Occupancy"), 0.0);
    }

    #[test]
    fn test_counts() {
        let data = DashboardData::from_bundle(sample_bundle());
        assert_eq!(data.status_counts(), (1, 1));
        assert_eq!(data.alert_counts(), (0, 1, 0));
        assert_eq!(data.warning_kpis().len(), 1);
    }

    #[test]
    fn test_alert_order_is_preserved() {
        let mut bundle = sample_bundle();
        let mut second = bundle.alerts[0].clone();
        second.kpi = "Average Wait Time".to_string();
        second.level = crate::source::AlertLevel::Critical;
        bundle.alerts.push(second);

        let data = DashboardData::from_bundle(bundle);
        // Load order, not severity order
        assert_eq!(data.alerts[0].kpi, "Patient Satisfaction");
        assert_eq!(data.alerts[1].kpi, "Average Wait Time");
    }
}
