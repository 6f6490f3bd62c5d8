use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

/// A node as delivered by the upstream retrieval service. `labels` is ordered,
/// the first entry being the primary type; `degree` and `centrality_score` are
/// precomputed server-side.
#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
	pub id: String,
	#[serde(default)]
	pub labels: Vec<String>,
	#[serde(default)]
	pub properties: HashMap<String, Value>,
	#[serde(default)]
	pub degree: u32,
	#[serde(default)]
	pub centrality_score: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawRelationship {
	pub id: String,
	#[serde(rename = "type")]
	pub rel_type: String,
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub properties: HashMap<String, Value>,
}

/// Unfiltered entity/relationship graph for one query result.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawGraph {
	#[serde(default)]
	pub nodes: Vec<RawNode>,
	#[serde(default)]
	pub relationships: Vec<RawRelationship>,
}

impl RawGraph {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct PathEntity {
	pub id: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PathRelation {
	pub source: String,
	pub target: String,
}

/// The entities and relations actually used to answer a query. Both fields
/// default to empty so a malformed payload decodes to a no-op path.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchPath {
	#[serde(default)]
	pub entities: Vec<PathEntity>,
	#[serde(default)]
	pub relations: Vec<PathRelation>,
}

/// Membership sets derived from a [`SearchPath`]. Relation pairs are stored
/// canonically ordered so (A,B) and (B,A) match the same edge.
#[derive(Clone, Debug, Default)]
pub struct HighlightSet {
	entity_ids: HashSet<String>,
	relation_pairs: HashSet<(String, String)>,
}

fn canonical_pair(a: &str, b: &str) -> (String, String) {
	if a <= b {
		(a.to_owned(), b.to_owned())
	} else {
		(b.to_owned(), a.to_owned())
	}
}

impl HighlightSet {
	pub fn from_path(path: Option<&SearchPath>) -> Self {
		let Some(path) = path else {
			return Self::default();
		};
		Self {
			entity_ids: path.entities.iter().map(|e| e.id.clone()).collect(),
			relation_pairs: path
				.relations
				.iter()
				.map(|r| canonical_pair(&r.source, &r.target))
				.collect(),
		}
	}

	/// Dimming only kicks in once at least one entity is highlighted.
	pub fn is_active(&self) -> bool {
		!self.entity_ids.is_empty()
	}

	pub fn contains_entity(&self, id: &str) -> bool {
		self.entity_ids.contains(id)
	}

	pub fn contains_pair(&self, a: &str, b: &str) -> bool {
		self.relation_pairs.contains(&canonical_pair(a, b))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn raw_graph_decodes_with_missing_fields() {
		let graph: RawGraph = serde_json::from_str(
			r#"{"nodes": [{"id": "a"}], "relationships": []}"#,
		)
		.unwrap();
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].degree, 0);
		assert!(graph.nodes[0].labels.is_empty());
	}

	#[test]
	fn relationship_type_field_is_renamed() {
		let rel: RawRelationship = serde_json::from_str(
			r#"{"id": "r1", "type": "KNOWS", "source": "a", "target": "b"}"#,
		)
		.unwrap();
		assert_eq!(rel.rel_type, "KNOWS");
	}

	#[test]
	fn malformed_search_path_decodes_to_empty() {
		let path: SearchPath = serde_json::from_str("{}").unwrap();
		assert!(path.entities.is_empty());
		assert!(path.relations.is_empty());
		assert!(!HighlightSet::from_path(Some(&path)).is_active());
	}

	#[test]
	fn missing_search_path_is_inactive() {
		let highlight = HighlightSet::from_path(None);
		assert!(!highlight.is_active());
		assert!(!highlight.contains_entity("a"));
	}

	#[test]
	fn relation_pairs_match_both_directions() {
		let path = SearchPath {
			entities: vec![PathEntity { id: "a".into() }],
			relations: vec![PathRelation {
				source: "b".into(),
				target: "a".into(),
			}],
		};
		let highlight = HighlightSet::from_path(Some(&path));
		assert!(highlight.contains_pair("a", "b"));
		assert!(highlight.contains_pair("b", "a"));
		assert!(!highlight.contains_pair("a", "c"));
	}
}
