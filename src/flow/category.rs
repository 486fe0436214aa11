use serde::Serialize;

use super::record::FlowRecord;

const SINK_NAMES: [&str; 1] = ["grid status quo"];

const COMPONENT_NAMES: [&str; 5] = [
    "cables",
    "overhead lines",
    "transformers",
    "substations",
    "switchgears",
];

const MATERIAL_NAMES: [&str; 7] = [
    "aluminum",
    "copper",
    "iron & steel",
    "plastics",
    "concrete",
    "SF6",
    "other materials",
];

const PROCESS_NAMES: [&str; 8] = [
    "electricity",
    "heat",
    "transport",
    "coal",
    "clinker",
    "aluminum (process emissions)",
    "iron & steel (process emissions)",
    "other processes",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NodeCategory {
    Process,
    Material,
    Component,
    Sink,
}

impl NodeCategory {
    pub const ALL: [Self; 4] = [Self::Process, Self::Material, Self::Component, Self::Sink];

    pub fn label(self) -> &'static str {
        match self {
            Self::Process => "Processes",
            Self::Material => "Materials",
            Self::Component => "Components",
            Self::Sink => "Grid",
        }
    }

    /// Left-to-right position of the category in a flow diagram.
    pub fn rank(self) -> usize {
        match self {
            Self::Process => 0,
            Self::Material => 1,
            Self::Component => 2,
            Self::Sink => 3,
        }
    }

    /// Category from the fixed grid vocabulary, if the name is part of it.
    pub fn from_vocabulary(name: &str) -> Option<Self> {
        if SINK_NAMES.contains(&name) {
            Some(Self::Sink)
        } else if COMPONENT_NAMES.contains(&name) {
            Some(Self::Component)
        } else if MATERIAL_NAMES.contains(&name) {
            Some(Self::Material)
        } else if PROCESS_NAMES.contains(&name) {
            Some(Self::Process)
        } else {
            None
        }
    }
}

/// Assigns a category to every name in `names` using the full record set.
///
/// Vocabulary names keep their fixed category. Other names are placed by the
/// role they play: never a target is a process, never a source is a sink, fed
/// by a process is a material, anything else is a component.
pub(crate) fn classify_nodes(names: &[String], records: &[FlowRecord]) -> Vec<NodeCategory> {
    let mut categories = names
        .iter()
        .map(|name| {
            NodeCategory::from_vocabulary(name).or_else(|| {
                let is_target = records.iter().any(|record| &record.target == name);
                (!is_target).then_some(NodeCategory::Process)
            })
        })
        .collect::<Vec<_>>();

    for index in 0..names.len() {
        if categories[index].is_some() {
            continue;
        }

        let name = &names[index];
        let is_source = records.iter().any(|record| &record.source == name);
        let fed_by_process = records.iter().any(|record| {
            &record.target == name
                && names
                    .iter()
                    .position(|candidate| candidate == &record.source)
                    .and_then(|source_index| categories[source_index])
                    == Some(NodeCategory::Process)
        });

        categories[index] = Some(if !is_source {
            NodeCategory::Sink
        } else if fed_by_process {
            NodeCategory::Material
        } else {
            NodeCategory::Component
        });
    }

    categories
        .into_iter()
        .map(|category| category.unwrap_or(NodeCategory::Component))
        .collect()
}
