use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::encode::VisualNode;
use super::state::GraphViewState;

const BACKGROUND: &str = "#1a1a2e";
const EDGE_COLOR: (u8, u8, u8) = (148, 163, 184);
const EDGE_LIT_COLOR: (u8, u8, u8) = (255, 209, 102);

pub fn render(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

/// The explicit no-data state: a blank canvas with a placeholder line.
pub fn render_empty(ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	ctx.set_fill_style_str("rgba(255, 255, 255, 0.4)");
	ctx.set_font("16px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text("No graph data", width / 2.0, height / 2.0);
	ctx.set_text_align("start");
}

fn rgba((r, g, b): (u8, u8, u8), alpha: f64) -> String {
	format!("rgba({r}, {g}, {b}, {alpha})")
}

fn draw_edges(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (dash, gap) = (8.0 / k, 4.0 / k);
	// Marching dashes along the search path, same trick as the hover flow
	// animation: offset advances with wall time.
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);

	for edge in &state.edges {
		let (Some(a), Some(b)) = (state.sim.body(edge.source_idx), state.sim.body(edge.target_idx))
		else {
			continue;
		};
		let (dx, dy) = (b.x - a.x, b.y - a.y);
		if (dx * dx + dy * dy).sqrt() < 0.001 {
			continue;
		}

		if edge.highlighted {
			ctx.set_stroke_style_str(&rgba(EDGE_LIT_COLOR, edge.opacity));
			ctx.set_line_width(2.0 / k);
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		} else {
			ctx.set_stroke_style_str(&rgba(EDGE_COLOR, edge.opacity));
			ctx.set_line_width(1.0 / k);
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		ctx.begin_path();
		ctx.move_to(a.x, a.y);
		ctx.line_to(b.x, b.y);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;

	for (idx, node) in state.nodes.iter().enumerate() {
		let Some(body) = state.sim.body(idx) else {
			continue;
		};
		let (x, y) = (body.x, body.y);

		ctx.set_global_alpha(node.opacity);
		ctx.begin_path();
		let _ = ctx.arc(x, y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.color);
		ctx.fill();
		ctx.set_global_alpha(1.0);

		if state.selected == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, node.radius + 3.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.9)");
			ctx.set_line_width(2.0 / k);
			ctx.stroke();
		} else if state.hovered == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, node.radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.6)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		if node.shows_label() {
			draw_label(node, x, y, k, ctx);
		}
	}
}

fn draw_label(node: &VisualNode, x: f64, y: f64, k: f64, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", node.opacity * 0.85));
	ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
	let _ = ctx.fill_text(&node.label, x + node.radius + 3.0, y + 3.0);
}
