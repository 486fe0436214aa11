//! Flow graph construction and precomputed data behind the grid LCA dashboard.

pub mod dataset;
pub mod export;
pub mod flow;
pub mod layout;
pub mod util;
