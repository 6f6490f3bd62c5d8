mod component;
mod encode;
mod render;
mod sample;
mod simulation;
mod state;
mod types;

pub use component::GraphCanvas;
pub use encode::{NodeKind, VisualEdge, VisualGraph, VisualNode, encode};
pub use sample::{EDGE_CAP, NODE_CAP, SampledGraph, sample};
pub use types::{
	HighlightSet, PathEntity, PathRelation, RawGraph, RawNode, RawRelationship, SearchPath,
};
