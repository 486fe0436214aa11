use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentImpact {
    pub name: String,
    pub value: f64,
    pub color: String,
}

/// A climate pathway. `change` is relative to the static baseline, which has none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub key: String,
    pub label: String,
    pub color: String,
    pub cumulative: f64,
    pub change: Option<f64>,
}

impl Scenario {
    pub fn is_baseline(&self) -> bool {
        self.change.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub year: u16,
    pub values: HashMap<String, f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImpactCategoryChange {
    pub category: String,
    pub changes: HashMap<String, f64>,
}

impl ImpactCategoryChange {
    pub fn change(&self, scenario_key: &str) -> Option<f64> {
        self.changes.get(scenario_key).copied()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationShare {
    pub source: String,
    pub share: f64,
    pub impact: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElectricityMix {
    pub label: String,
    pub year: u16,
    pub scenario: Option<String>,
    pub total_g_co2e_per_kwh: f64,
    pub grid_share: f64,
    pub generation: Vec<GenerationShare>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyFinding {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub title: String,
    pub source: String,
    pub status_quo_year: u16,
    pub status_quo_intensity_note: String,
    pub status_quo_components: Vec<ComponentImpact>,
    pub scenarios: Vec<Scenario>,
    pub expansion_timeline: Vec<TimelinePoint>,
    pub impact_categories: Vec<ImpactCategoryChange>,
    pub electricity_mix: Vec<ElectricityMix>,
    pub generation_colors: HashMap<String, String>,
    pub key_findings: Vec<KeyFinding>,
}
