mod catalog;
mod category;
mod graph;
mod palette;
mod record;

pub use catalog::{CatalogError, FlowCatalog};
pub use category::NodeCategory;
pub use graph::{ContributionMatrix, DEFAULT_MIN_FLOW, FlowGraph, FlowLink, FlowNode};
pub use palette::{ColorPalette, DEFAULT_NODE_COLOR};
pub use record::FlowRecord;
