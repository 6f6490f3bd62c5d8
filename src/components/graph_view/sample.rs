use std::collections::HashSet;

use super::types::{RawGraph, RawNode, RawRelationship};

pub const NODE_CAP: usize = 300;
pub const EDGE_CAP: usize = 800;

/// Bounded working subset of a [`RawGraph`], small enough to simulate and
/// draw at interactive frame rates.
#[derive(Clone, Debug, Default)]
pub struct SampledGraph {
	pub nodes: Vec<RawNode>,
	pub edges: Vec<RawRelationship>,
}

/// Keep the `node_cap` highest-degree nodes (stable sort, so ties keep input
/// order), then the first `edge_cap` relationships whose endpoints both
/// survived. Edges touching a sampled-out node are dropped silently.
pub fn sample(raw: &RawGraph, node_cap: usize, edge_cap: usize) -> SampledGraph {
	let mut nodes = raw.nodes.clone();
	nodes.sort_by(|a, b| b.degree.cmp(&a.degree));
	nodes.truncate(node_cap);

	let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	let edges = raw
		.relationships
		.iter()
		.filter(|r| ids.contains(r.source.as_str()) && ids.contains(r.target.as_str()))
		.take(edge_cap)
		.cloned()
		.collect();

	SampledGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, degree: u32) -> RawNode {
		RawNode {
			id: id.into(),
			labels: vec![],
			properties: Default::default(),
			degree,
			centrality_score: 0.0,
		}
	}

	fn rel(id: &str, source: &str, target: &str) -> RawRelationship {
		RawRelationship {
			id: id.into(),
			rel_type: "RELATED_TO".into(),
			source: source.into(),
			target: target.into(),
			properties: Default::default(),
		}
	}

	#[test]
	fn keeps_highest_degree_nodes() {
		let raw = RawGraph {
			nodes: vec![node("a", 5), node("b", 2), node("c", 9)],
			relationships: vec![],
		};
		let sampled = sample(&raw, 2, EDGE_CAP);
		let ids: Vec<&str> = sampled.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["c", "a"]);
	}

	#[test]
	fn ties_keep_input_order() {
		let raw = RawGraph {
			nodes: vec![node("x", 3), node("y", 3), node("z", 3)],
			relationships: vec![],
		};
		let sampled = sample(&raw, 2, EDGE_CAP);
		let ids: Vec<&str> = sampled.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["x", "y"]);
	}

	#[test]
	fn returns_all_nodes_when_under_cap() {
		let raw = RawGraph {
			nodes: vec![node("a", 1)],
			relationships: vec![],
		};
		assert_eq!(sample(&raw, NODE_CAP, EDGE_CAP).nodes.len(), 1);
	}

	#[test]
	fn drops_edges_touching_sampled_out_nodes() {
		let raw = RawGraph {
			nodes: vec![node("a", 5), node("b", 2), node("c", 9)],
			relationships: vec![
				rel("r1", "c", "a"),
				rel("r2", "a", "b"),
				rel("r3", "b", "c"),
			],
		};
		let sampled = sample(&raw, 2, EDGE_CAP);
		assert_eq!(sampled.edges.len(), 1);
		assert_eq!(sampled.edges[0].id, "r1");
	}

	#[test]
	fn truncates_edges_in_input_order() {
		let raw = RawGraph {
			nodes: vec![node("a", 1), node("b", 1)],
			relationships: vec![rel("r1", "a", "b"), rel("r2", "b", "a"), rel("r3", "a", "b")],
		};
		let sampled = sample(&raw, NODE_CAP, 2);
		let ids: Vec<&str> = sampled.edges.iter().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, vec!["r1", "r2"]);
	}

	#[test]
	fn empty_graph_samples_empty() {
		let sampled = sample(&RawGraph::default(), NODE_CAP, EDGE_CAP);
		assert!(sampled.nodes.is_empty());
		assert!(sampled.edges.is_empty());
	}

	#[test]
	fn no_dangling_edges_for_any_cap() {
		let raw = RawGraph {
			nodes: (0..20).map(|i| node(&i.to_string(), i)).collect(),
			relationships: (0..19)
				.map(|i| rel(&format!("r{i}"), &i.to_string(), &(i + 1).to_string()))
				.collect(),
		};
		for cap in [1, 5, 10, 20] {
			let sampled = sample(&raw, cap, EDGE_CAP);
			let ids: HashSet<&str> = sampled.nodes.iter().map(|n| n.id.as_str()).collect();
			for edge in &sampled.edges {
				assert!(ids.contains(edge.source.as_str()));
				assert!(ids.contains(edge.target.as_str()));
			}
		}
	}
}
