use std::collections::HashMap;

use serde_json::Value;

use super::sample::SampledGraph;
use super::types::HighlightSet;

/// Labels are only drawn for nodes bigger than this radius.
pub const LABEL_MIN_RADIUS: f64 = 10.0;
const LABEL_MAX_CHARS: usize = 20;
const LABEL_TRUNC_CHARS: usize = 17;

pub const NODE_OPACITY_PLAIN: f64 = 0.9;
pub const NODE_OPACITY_LIT: f64 = 1.0;
pub const NODE_OPACITY_DIM: f64 = 0.25;
pub const EDGE_OPACITY_PLAIN: f64 = 0.55;
pub const EDGE_OPACITY_LIT: f64 = 0.9;
pub const EDGE_OPACITY_DIM: f64 = 0.2;

/// Canonical entity type. The upstream extractor emits both English and
/// French spellings for the same type, so lookup goes through
/// [`NodeKind::from_label`] instead of a string table with aliased keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Person,
	Place,
	Event,
	Concept,
	Organization,
	Book,
	Other,
}

impl NodeKind {
	pub fn from_label(label: &str) -> Self {
		match label.trim().to_lowercase().as_str() {
			"person" | "personne" => Self::Person,
			"place" | "lieu" => Self::Place,
			"event" | "événement" | "evenement" => Self::Event,
			"concept" => Self::Concept,
			"organization" | "organisation" => Self::Organization,
			"book" | "livre" => Self::Book,
			_ => Self::Other,
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			Self::Person => "#1f77b4",
			Self::Place => "#2ca02c",
			Self::Event => "#ff7f0e",
			Self::Concept => "#9467bd",
			Self::Organization => "#d62728",
			Self::Book => "#8c564b",
			Self::Other => "#7f7f7f",
		}
	}
}

/// Drawable node attributes. Live positions are owned by the simulation; the
/// `x`/`y` here are stamped when a snapshot is handed to a callback.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualNode {
	pub id: String,
	pub label: String,
	pub kind: NodeKind,
	pub type_name: String,
	pub degree: u32,
	pub centrality_score: f64,
	pub color: &'static str,
	pub radius: f64,
	pub opacity: f64,
	pub highlighted: bool,
	pub x: f64,
	pub y: f64,
	pub pinned_position: Option<(f64, f64)>,
}

impl VisualNode {
	pub fn shows_label(&self) -> bool {
		self.radius > LABEL_MIN_RADIUS
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct VisualEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub source_idx: usize,
	pub target_idx: usize,
	pub relation: String,
	pub weight: f64,
	pub highlighted: bool,
	pub opacity: f64,
}

#[derive(Clone, Debug, Default)]
pub struct VisualGraph {
	pub nodes: Vec<VisualNode>,
	pub edges: Vec<VisualEdge>,
}

/// `max(ln(degree + 1) * 4 + 5, 8)`: a visible floor at degree 0 and
/// sub-linear growth so hubs don't swallow the canvas.
pub fn node_radius(degree: u32) -> f64 {
	((f64::from(degree) + 1.0).ln() * 4.0 + 5.0).max(8.0)
}

fn property_str<'a>(properties: &'a HashMap<String, Value>, key: &str) -> Option<&'a str> {
	properties.get(key).and_then(Value::as_str)
}

pub fn truncate_label(label: &str) -> String {
	if label.chars().count() > LABEL_MAX_CHARS {
		let mut short: String = label.chars().take(LABEL_TRUNC_CHARS).collect();
		short.push('…');
		short
	} else {
		label.to_owned()
	}
}

/// Pure derivation of the drawable graph from (sample, highlight). Recomputed
/// wholesale on every input change rather than patched incrementally.
pub fn encode(sampled: &SampledGraph, highlight: &HighlightSet) -> VisualGraph {
	let active = highlight.is_active();

	let nodes: Vec<VisualNode> = sampled
		.nodes
		.iter()
		.map(|n| {
			let type_name = n.labels.first().map(String::as_str).unwrap_or("").to_owned();
			let kind = NodeKind::from_label(&type_name);
			let label = property_str(&n.properties, "name")
				.or_else(|| property_str(&n.properties, "title"))
				.unwrap_or(&n.id);
			let highlighted = highlight.contains_entity(&n.id);
			let opacity = if !active {
				NODE_OPACITY_PLAIN
			} else if highlighted {
				NODE_OPACITY_LIT
			} else {
				NODE_OPACITY_DIM
			};
			VisualNode {
				id: n.id.clone(),
				label: truncate_label(label),
				kind,
				type_name,
				degree: n.degree,
				centrality_score: n.centrality_score,
				color: kind.color(),
				radius: node_radius(n.degree),
				opacity,
				highlighted,
				x: 0.0,
				y: 0.0,
				pinned_position: None,
			}
		})
		.collect();

	let index: HashMap<&str, usize> = nodes
		.iter()
		.enumerate()
		.map(|(i, n)| (n.id.as_str(), i))
		.collect();

	let edges = sampled
		.edges
		.iter()
		.filter_map(|r| {
			// The sampler already guarantees both endpoints; filter_map keeps
			// the no-dangling-edge invariant local to this function too.
			let source_idx = *index.get(r.source.as_str())?;
			let target_idx = *index.get(r.target.as_str())?;
			let highlighted = highlight.contains_pair(&r.source, &r.target);
			let opacity = if !active {
				EDGE_OPACITY_PLAIN
			} else if highlighted {
				EDGE_OPACITY_LIT
			} else {
				EDGE_OPACITY_DIM
			};
			Some(VisualEdge {
				id: r.id.clone(),
				source: r.source.clone(),
				target: r.target.clone(),
				source_idx,
				target_idx,
				relation: r.rel_type.clone(),
				weight: r.properties.get("weight").and_then(Value::as_f64).unwrap_or(1.0),
				highlighted,
				opacity,
			})
		})
		.collect();

	VisualGraph { nodes, edges }
}
