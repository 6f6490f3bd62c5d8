use log::debug;

use super::encode::{VisualEdge, VisualNode, encode};
use super::sample::{EDGE_CAP, NODE_CAP, sample};
use super::simulation::Simulation;
use super::types::{HighlightSet, RawGraph, SearchPath};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;
pub const HIT_RADIUS: f64 = 12.0;
// A press/release pair that travels less than this (screen px) is a click.
pub const CLICK_TOLERANCE: f64 = 4.0;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

/// What a pointer release amounted to, for the component to turn into
/// selection callbacks.
#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
	SelectedNode(usize),
	ClearedSelection,
	NotAClick,
}

pub struct GraphViewState {
	pub nodes: Vec<VisualNode>,
	pub edges: Vec<VisualEdge>,
	pub sim: Simulation,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hovered: Option<usize>,
	pub selected: Option<usize>,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

impl GraphViewState {
	pub fn new(raw: &RawGraph, path: Option<&SearchPath>, width: f64, height: f64) -> Self {
		let highlight = HighlightSet::from_path(path);
		let sampled = sample(raw, NODE_CAP, EDGE_CAP);
		let visual = encode(&sampled, &highlight);
		debug!(
			"graph rebuilt: {} of {} nodes, {} of {} edges sampled",
			visual.nodes.len(),
			raw.nodes.len(),
			visual.edges.len(),
			raw.relationships.len()
		);

		let radii: Vec<f64> = visual.nodes.iter().map(|n| n.radius).collect();
		let links: Vec<(usize, usize)> = visual
			.edges
			.iter()
			.map(|e| (e.source_idx, e.target_idx))
			.collect();
		let sim = Simulation::new(&radii, links, width, height);

		Self {
			nodes: visual.nodes,
			edges: visual.edges,
			sim,
			transform: ViewTransform {
				x: 0.0,
				y: 0.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hovered: None,
			selected: None,
			width,
			height,
			flow_time: 0.0,
		}
	}

	/// Ids of every node on screen, for the visibility callback.
	pub fn visible_ids(&self) -> Vec<String> {
		self.nodes.iter().map(|n| n.id.clone()).collect()
	}

	/// A [`VisualNode`] with live position and pin state stamped in, for
	/// hover/selection callbacks.
	pub fn node_snapshot(&self, idx: usize) -> Option<VisualNode> {
		let body = self.sim.body(idx)?;
		let mut node = self.nodes.get(idx)?.clone();
		node.x = body.x;
		node.y = body.y;
		node.pinned_position = body.pinned_at();
		Some(node)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(
			gx * self.transform.k + self.transform.x,
			gy * self.transform.k + self.transform.y,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		for (idx, node) in self.nodes.iter().enumerate() {
			let Some(body) = self.sim.body(idx) else {
				continue;
			};
			let (dx, dy) = (body.x - gx, body.y - gy);
			// Hit radius is in graph space, so it scales with zoom like the
			// node circles do.
			if (dx * dx + dy * dy).sqrt() < node.radius.max(HIT_RADIUS) {
				found = Some(idx);
			}
		}
		found
	}

	/// Wheel zoom anchored at the cursor, clamped to [MIN_ZOOM, MAX_ZOOM].
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.node_at_position(sx, sy) {
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				start_x: sx,
				start_y: sy,
				moved: false,
			};
			self.sim.begin_drag(idx);
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
				moved: false,
			};
		}
	}

	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if self.drag.active {
			if (sx - self.drag.start_x).abs() + (sy - self.drag.start_y).abs() > CLICK_TOLERANCE {
				self.drag.moved = true;
			}
			if let Some(idx) = self.drag.node_idx {
				let (gx, gy) = self.screen_to_graph(sx, sy);
				self.sim.drag_to(idx, gx, gy);
			}
		} else if self.pan.active {
			if (sx - self.pan.start_x).abs() + (sy - self.pan.start_y).abs() > CLICK_TOLERANCE {
				self.pan.moved = true;
			}
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		} else {
			self.hovered = self.node_at_position(sx, sy);
		}
	}

	/// Release the pointer. A stationary press on a node selects it; a
	/// stationary press on the background clears the selection.
	pub fn pointer_up(&mut self) -> ClickOutcome {
		if self.drag.active {
			let idx = self.drag.node_idx;
			let was_click = !self.drag.moved;
			if let Some(idx) = idx {
				self.sim.end_drag(idx);
			}
			self.drag = DragState::default();
			if was_click {
				if let Some(idx) = idx {
					self.selected = Some(idx);
					return ClickOutcome::SelectedNode(idx);
				}
			}
			ClickOutcome::NotAClick
		} else if self.pan.active {
			let was_click = !self.pan.moved;
			self.pan = PanState::default();
			if was_click && self.selected.is_some() {
				self.selected = None;
				return ClickOutcome::ClearedSelection;
			}
			ClickOutcome::NotAClick
		} else {
			ClickOutcome::NotAClick
		}
	}

	pub fn pointer_leave(&mut self) {
		if let Some(idx) = self.drag.node_idx {
			self.sim.end_drag(idx);
		}
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hovered = None;
	}

	/// Pure resize: the sample and layout survive, only the centering target
	/// moves. A resize paired with new data goes through [`Self::new`].
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.sim.set_center(width, height);
		self.sim.reheat();
	}

	pub fn tick(&mut self, dt: f64) {
		if !self.sim.settled() {
			self.sim.step();
		}
		self.flow_time += dt;
	}
}

/// What the host must announce to collaborators after a pipeline rebuild
/// replaces `prev` with `next`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RebuildNotices {
	/// The new visible node ids, present only when the node set actually
	/// changed (and is non-empty, the no-data state stays silent).
	pub visible_ids: Option<Vec<String>>,
	pub selection_cleared: bool,
	pub hover_cleared: bool,
}

/// A rebuild discards selection and hover along with the old state, so any
/// active references must be retracted or a detail panel would keep showing
/// a node that no longer carries a ring (or no longer exists).
pub fn rebuild_notices(
	prev: Option<&GraphViewState>,
	next: Option<&GraphViewState>,
) -> RebuildNotices {
	let prev_ids = prev.map(|s| s.visible_ids()).unwrap_or_default();
	let next_ids = next.map(|s| s.visible_ids()).unwrap_or_default();
	RebuildNotices {
		visible_ids: (!next_ids.is_empty() && next_ids != prev_ids).then_some(next_ids),
		selection_cleared: prev.is_some_and(|s| s.selected.is_some()),
		hover_cleared: prev.is_some_and(|s| s.hovered.is_some()),
	}
}
