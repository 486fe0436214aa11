mod model;

use std::cmp::Ordering;

use anyhow::{Context, Result, anyhow, bail};

pub use model::{
    ComponentImpact, Dataset, ElectricityMix, GenerationShare, ImpactCategoryChange, KeyFinding,
    Scenario, TimelinePoint,
};

const EMBEDDED_DASHBOARD: &str = include_str!("../../data/dashboard.json");

pub const GRID_INFRASTRUCTURE: &str = "Grid infrastructure";

#[derive(Clone, Debug, PartialEq)]
pub struct DonutSlice {
    pub name: String,
    pub value: f64,
}

/// Color bucket for a relative change against the baseline.
pub fn change_color(change: f64) -> &'static str {
    if change > 0.05 {
        "#d62728"
    } else if change > 0.0 {
        "#ff7f0e"
    } else if change > -0.1 {
        "#98df8a"
    } else {
        "#2ca02c"
    }
}

impl Dataset {
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_DASHBOARD).context("embedded dashboard data is invalid")
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let dataset: Self = serde_json::from_str(raw).context("invalid dashboard JSON")?;
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<()> {
        if self.scenarios.is_empty() {
            bail!("dashboard data defines no scenarios");
        }

        for point in &self.expansion_timeline {
            for scenario in &self.scenarios {
                if !point.values.contains_key(&scenario.key) {
                    bail!(
                        "timeline year {} has no value for scenario {}",
                        point.year,
                        scenario.key
                    );
                }
            }
        }

        for impact in &self.impact_categories {
            for scenario in self.scenarios.iter().filter(|scenario| !scenario.is_baseline()) {
                if impact.change(&scenario.key).is_none() {
                    bail!(
                        "impact category {:?} has no change for scenario {}",
                        impact.category,
                        scenario.key
                    );
                }
            }
        }

        for mix in &self.electricity_mix {
            if let Some(entry) = mix
                .generation
                .iter()
                .find(|entry| entry.impact < 0.0 || entry.share < 0.0)
            {
                return Err(anyhow!(
                    "generation entry {} in {} has a negative share or impact",
                    entry.source,
                    mix.label
                ));
            }
        }

        Ok(())
    }

    pub fn status_quo_total(&self) -> f64 {
        self.status_quo_components
            .iter()
            .map(|component| component.value)
            .sum()
    }

    pub fn scenario(&self, key: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.key == key)
    }

    /// Scenarios compared against the baseline, in declaration order.
    pub fn compared_scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter().filter(|scenario| !scenario.is_baseline())
    }

    /// The last declared scenario, the most ambitious pathway.
    pub fn most_ambitious(&self) -> Option<&Scenario> {
        self.compared_scenarios().last()
    }

    pub fn timeline_series(&self, key: &str) -> Vec<(u16, f64)> {
        self.expansion_timeline
            .iter()
            .filter_map(|point| point.values.get(key).map(|value| (point.year, *value)))
            .collect()
    }

    pub fn timeline_max(&self) -> f64 {
        self.expansion_timeline
            .iter()
            .flat_map(|point| point.values.values().copied())
            .fold(0.0, f64::max)
    }

    /// Categories with the strongest reduction under `scenario_key`, largest first.
    pub fn most_improved(&self, scenario_key: &str, limit: usize) -> Vec<(&str, f64)> {
        let mut ranked = self
            .impact_categories
            .iter()
            .filter_map(|impact| {
                impact
                    .change(scenario_key)
                    .filter(|change| *change < 0.0)
                    .map(|change| (impact.category.as_str(), change))
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(limit);
        ranked
    }

    /// Categories that get worse under `scenario_key`, largest increase first.
    pub fn trade_offs(&self, scenario_key: &str) -> Vec<(&str, f64)> {
        let mut ranked = self
            .impact_categories
            .iter()
            .filter_map(|impact| {
                impact
                    .change(scenario_key)
                    .filter(|change| *change > 0.0)
                    .map(|change| (impact.category.as_str(), change))
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Grid share of electricity impact in the first and last mix.
    pub fn grid_share_shift(&self) -> Option<(f64, f64)> {
        let first = self.electricity_mix.first()?;
        let last = self.electricity_mix.last()?;
        Some((first.grid_share, last.grid_share))
    }

    pub fn generation_color(&self, source: &str) -> Option<&str> {
        self.generation_colors.get(source).map(String::as_str)
    }
}

impl ElectricityMix {
    /// Generation impacts sorted descending, followed by the grid share.
    pub fn donut_slices(&self) -> Vec<DonutSlice> {
        let mut slices = self
            .generation
            .iter()
            .map(|entry| DonutSlice {
                name: entry.source.clone(),
                value: entry.impact,
            })
            .collect::<Vec<_>>();
        slices.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
        slices.push(DonutSlice {
            name: GRID_INFRASTRUCTURE.to_owned(),
            value: self.grid_share,
        });
        slices
    }
}
