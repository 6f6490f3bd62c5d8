use std::collections::HashMap;

use leptos::prelude::*;
use log::info;

use crate::components::graph_view::{
	GraphCanvas, PathEntity, PathRelation, RawGraph, RawNode, RawRelationship, SearchPath,
	VisualNode,
};

const ENTITY_TYPES: &[&str] = &[
	"Personne",
	"Lieu",
	"Concept",
	"Livre",
	"Organisation",
	"Événement",
];

/// Generate a deterministic sample knowledge graph in lieu of the upstream
/// retrieval service.
fn generate_sample_graph(n: usize) -> RawGraph {
	let relationships: Vec<RawRelationship> = (1..n)
		.map(|i| {
			let target = (rand_simple(i) * (i as f64)) as usize;
			RawRelationship {
				id: format!("r{i}"),
				rel_type: if i % 3 == 0 { "MENTIONNE" } else { "RELIE_A" }.into(),
				source: format!("e{i}"),
				target: format!("e{target}"),
				properties: HashMap::new(),
			}
		})
		.collect();

	let mut degrees: HashMap<String, u32> = HashMap::new();
	for rel in &relationships {
		*degrees.entry(rel.source.clone()).or_default() += 1;
		*degrees.entry(rel.target.clone()).or_default() += 1;
	}

	let nodes = (0..n)
		.map(|i| {
			let id = format!("e{i}");
			let degree = degrees.get(&id).copied().unwrap_or(0);
			let mut properties = HashMap::new();
			properties.insert("name".to_owned(), format!("Entité {i}").into());
			RawNode {
				id,
				labels: vec![ENTITY_TYPES[i % ENTITY_TYPES.len()].to_owned()],
				properties,
				degree,
				centrality_score: f64::from(degree) / (n as f64),
			}
		})
		.collect();

	RawGraph {
		nodes,
		relationships,
	}
}

/// A search path through the sample graph, standing in for a query answer.
fn generate_sample_path() -> SearchPath {
	SearchPath {
		entities: ["e1", "e2", "e4"]
			.iter()
			.map(|id| PathEntity { id: (*id).into() })
			.collect(),
		relations: vec![
			PathRelation {
				source: "e2".into(),
				target: "e1".into(),
			},
			PathRelation {
				source: "e4".into(),
				target: "e2".into(),
			},
		],
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = Signal::derive(move || Some(generate_sample_graph(100)));
	let search_path = Signal::derive(move || Some(generate_sample_path()));

	let on_node_select = Callback::new(|node: Option<VisualNode>| match node {
		Some(node) => info!(
			"selected {} ({:?}, degree {})",
			node.id, node.kind, node.degree
		),
		None => info!("selection cleared"),
	});
	let on_visible_nodes = Callback::new(|ids: Vec<String>| {
		info!("{} nodes visible", ids.len());
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<GraphCanvas
					data=graph_data
					search_path=search_path
					fullscreen=true
					on_node_select=on_node_select
					on_visible_nodes=on_visible_nodes
				/>
				<div class="graph-overlay">
					<h1>"Knowledge Graph Explorer"</h1>
					<p class="subtitle">
						"Drag nodes to reposition. Scroll to zoom. Drag background to pan. Click a node for details."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
