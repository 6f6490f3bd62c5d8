use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::encode::VisualNode;
use super::render;
use super::state::{ClickOutcome, GraphViewState, rebuild_notices};
use super::types::{RawGraph, SearchPath};

fn event_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Interactive force-directed view of a knowledge graph, with an optional
/// search path overlay. Rebuilds its sample/layout whenever `data` or
/// `search_path` change; the previous simulation is dropped on the spot.
#[component]
pub fn GraphCanvas(
	#[prop(into)] data: Signal<Option<RawGraph>>,
	#[prop(into, default = Signal::derive(|| None))] search_path: Signal<Option<SearchPath>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_node_select: Option<Callback<Option<VisualNode>>>,
	#[prop(optional, into)] on_node_hover: Option<Callback<Option<VisualNode>>>,
	#[prop(optional, into)] on_visible_nodes: Option<Callback<Vec<String>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<GraphViewState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	// Synchronous cancellation on view teardown: the frame closure bails out
	// and stops re-requesting as soon as this flips.
	let running = Rc::new(Cell::new(true));
	let loop_started = Rc::new(Cell::new(false));
	// Handle of the most recent request_animation_frame call. The loop always
	// has a frame queued, so teardown must cancel it before the closure goes
	// away; a dangling rAF callback throws when the browser invokes it.
	let raf_handle = Rc::new(Cell::new(0));

	let cleanup = send_wrapper::SendWrapper::new((running.clone(), animate.clone(), raf_handle.clone()));
	on_cleanup(move || {
		let (running_cleanup, animate_cleanup, raf_cleanup) = cleanup.take();
		running_cleanup.set(false);
		if let Some(window) = web_sys::window() {
			let _ = window.cancel_animation_frame(raf_cleanup.get());
		}
		*animate_cleanup.borrow_mut() = None;
	});

	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let raw = data.get();
		let path = search_path.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		// Restart policy: any data or highlight change discards the running
		// simulation and starts fresh.
		let prev = state_init.borrow_mut().take();
		let next = match raw {
			Some(ref graph) if !graph.is_empty() => {
				Some(GraphViewState::new(graph, path.as_ref(), w, h))
			}
			_ => None,
		};
		let notices = rebuild_notices(prev.as_ref(), next.as_ref());
		*state_init.borrow_mut() = next;
		if let Some(ids) = notices.visible_ids {
			if let Some(cb) = on_visible_nodes {
				cb.run(ids);
			}
		}
		if notices.selection_cleared {
			if let Some(cb) = on_node_select {
				cb.run(None);
			}
		}
		if notices.hover_cleared {
			if let Some(cb) = on_node_hover {
				cb.run(None);
			}
		}

		if loop_started.get() {
			return;
		}
		loop_started.set(true);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, running_anim, canvas_anim, raf_anim) = (
			state_init.clone(),
			animate_init.clone(),
			running.clone(),
			canvas.clone(),
			raf_handle.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !running_anim.get() {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			} else {
				render::render_empty(
					&ctx,
					f64::from(canvas_anim.width()),
					f64::from(canvas_anim.height()),
				);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Ok(handle) = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref())
				{
					raf_anim.set(handle);
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Ok(handle) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				raf_handle.set(handle);
			}
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let before = s.hovered;
			s.pointer_move(x, y);
			if s.hovered != before {
				if let Some(cb) = on_node_hover {
					cb.run(s.hovered.and_then(|idx| s.node_snapshot(idx)));
				}
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			match s.pointer_up() {
				ClickOutcome::SelectedNode(idx) => {
					if let Some(cb) = on_node_select {
						cb.run(s.node_snapshot(idx));
					}
				}
				ClickOutcome::ClearedSelection => {
					if let Some(cb) = on_node_select {
						cb.run(None);
					}
				}
				ClickOutcome::NotAClick => {}
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			let was_hovering = s.hovered.is_some();
			s.pointer_leave();
			if was_hovering {
				if let Some(cb) = on_node_hover {
					cb.run(None);
				}
			}
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = event_position(&canvas, &ev);
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
