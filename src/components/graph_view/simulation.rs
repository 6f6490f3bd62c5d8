use std::f64::consts::PI;

pub const CHARGE_STRENGTH: f64 = -300.0;
pub const LINK_DISTANCE: f64 = 100.0;
pub const LINK_STRENGTH: f64 = 0.5;
pub const COLLISION_PADDING: f64 = 2.0;
pub const VELOCITY_DECAY: f64 = 0.6;
pub const ALPHA_MIN: f64 = 0.001;
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

const INITIAL_RING_RADIUS: f64 = 100.0;
// Squared distance floor for the charge force, keeps coincident nodes from
// launching each other off-canvas.
const MIN_CHARGE_DIST2: f64 = 25.0;

#[derive(Clone, Debug)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	// Visual radius + COLLISION_PADDING.
	pub collide_radius: f64,
	pinned: Option<(f64, f64)>,
}

impl Body {
	pub fn pinned_at(&self) -> Option<(f64, f64)> {
		self.pinned
	}
}

/// Damped force relaxation over the sampled graph. One instance lives for as
/// long as one (sample, highlight, viewport) combination is on screen; any
/// change to those inputs discards it and a fresh one starts from the same
/// deterministic ring placement.
pub struct Simulation {
	bodies: Vec<Body>,
	links: Vec<(usize, usize)>,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
}

impl Simulation {
	pub fn new(radii: &[f64], links: Vec<(usize, usize)>, width: f64, height: f64) -> Self {
		let center = (width / 2.0, height / 2.0);
		let n = radii.len();
		let bodies = radii
			.iter()
			.enumerate()
			.map(|(i, &r)| {
				let angle = (i as f64) * 2.0 * PI / (n.max(1) as f64);
				Body {
					x: center.0 + INITIAL_RING_RADIUS * angle.cos(),
					y: center.1 + INITIAL_RING_RADIUS * angle.sin(),
					vx: 0.0,
					vy: 0.0,
					collide_radius: r + COLLISION_PADDING,
					pinned: None,
				}
			})
			.collect();

		Self {
			bodies,
			links,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			// Reaches ALPHA_MIN after ~300 ticks, mirroring d3's schedule.
			alpha_decay: 1.0 - 0.001f64.powf(1.0 / 300.0),
		}
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn body(&self, idx: usize) -> Option<&Body> {
		self.bodies.get(idx)
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Nothing left to do until a reheat; callers skip stepping while settled.
	pub fn settled(&self) -> bool {
		self.alpha < ALPHA_MIN && self.alpha_target == 0.0
	}

	pub fn set_center(&mut self, width: f64, height: f64) {
		self.center = (width / 2.0, height / 2.0);
	}

	pub fn reheat(&mut self) {
		self.alpha = self.alpha.max(DRAG_ALPHA_TARGET);
	}

	pub fn begin_drag(&mut self, idx: usize) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.pinned = Some((body.x, body.y));
			self.alpha_target = DRAG_ALPHA_TARGET;
			self.reheat();
		}
	}

	/// Move the pin point; the body snaps to it on the next step, before the
	/// force passes read positions.
	pub fn drag_to(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(body) = self.bodies.get_mut(idx) {
			if body.pinned.is_some() {
				body.pinned = Some((x, y));
				body.x = x;
				body.y = y;
			}
		}
	}

	pub fn end_drag(&mut self, idx: usize) {
		if let Some(body) = self.bodies.get_mut(idx) {
			body.pinned = None;
		}
		self.alpha_target = 0.0;
	}

	pub fn step(&mut self) {
		if self.settled() {
			return;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.integrate();
		self.apply_collisions();
	}

	fn apply_links(&mut self) {
		for &(s, t) in &self.links {
			if s == t || s >= self.bodies.len() || t >= self.bodies.len() {
				continue;
			}
			let (dx, dy, dist) = self.separation(s, t);
			let pull = (dist - LINK_DISTANCE) / dist * self.alpha * LINK_STRENGTH;
			let (fx, fy) = (dx * pull * 0.5, dy * pull * 0.5);
			self.bodies[t].vx -= fx;
			self.bodies[t].vy -= fy;
			self.bodies[s].vx += fx;
			self.bodies[s].vy += fy;
		}
	}

	fn apply_charge(&mut self) {
		for i in 0..self.bodies.len() {
			for j in (i + 1)..self.bodies.len() {
				let (dx, dy, _) = self.separation(i, j);
				let d2 = (dx * dx + dy * dy).max(MIN_CHARGE_DIST2);
				// Negative strength pushes the pair apart, falling off with
				// distance like d3's many-body force.
				let w = CHARGE_STRENGTH * self.alpha / d2;
				self.bodies[i].vx += dx * w;
				self.bodies[i].vy += dy * w;
				self.bodies[j].vx -= dx * w;
				self.bodies[j].vy -= dy * w;
			}
		}
	}

	fn apply_center(&mut self) {
		if self.bodies.is_empty() {
			return;
		}
		let n = self.bodies.len() as f64;
		let sx = self.bodies.iter().map(|b| b.x).sum::<f64>() / n - self.center.0;
		let sy = self.bodies.iter().map(|b| b.y).sum::<f64>() / n - self.center.1;
		for body in &mut self.bodies {
			body.x -= sx;
			body.y -= sy;
		}
	}

	fn integrate(&mut self) {
		for body in &mut self.bodies {
			if let Some((px, py)) = body.pinned {
				body.x = px;
				body.y = py;
				body.vx = 0.0;
				body.vy = 0.0;
				continue;
			}
			body.vx *= VELOCITY_DECAY;
			body.vy *= VELOCITY_DECAY;
			body.x += body.vx;
			body.y += body.vy;
		}
	}

	fn apply_collisions(&mut self) {
		for i in 0..self.bodies.len() {
			for j in (i + 1)..self.bodies.len() {
				let (dx, dy, dist) = self.separation(i, j);
				let min_dist = self.bodies[i].collide_radius + self.bodies[j].collide_radius;
				if dist >= min_dist {
					continue;
				}
				let overlap = (min_dist - dist) / dist;
				// A pinned body never yields; its partner takes the full shift.
				let (wi, wj) = match (self.bodies[i].pinned, self.bodies[j].pinned) {
					(Some(_), Some(_)) => (0.0, 0.0),
					(Some(_), None) => (0.0, 1.0),
					(None, Some(_)) => (1.0, 0.0),
					(None, None) => (0.5, 0.5),
				};
				self.bodies[i].x -= dx * overlap * wi;
				self.bodies[i].y -= dy * overlap * wi;
				self.bodies[j].x += dx * overlap * wj;
				self.bodies[j].y += dy * overlap * wj;
			}
		}
	}

	// Offset from body `a` to body `b`, with a deterministic index-based
	// nudge when the two coincide so force directions stay well-defined.
	fn separation(&self, a: usize, b: usize) -> (f64, f64, f64) {
		let mut dx = self.bodies[b].x - self.bodies[a].x;
		let mut dy = self.bodies[b].y - self.bodies[a].y;
		if dx * dx + dy * dy < 1e-12 {
			let angle = ((a * 31 + b * 17) % 360) as f64 * PI / 180.0;
			dx = 1e-3 * angle.cos();
			dy = 1e-3 * angle.sin();
		}
		let dist = (dx * dx + dy * dy).sqrt();
		(dx, dy, dist)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sim(n: usize, links: Vec<(usize, usize)>) -> Simulation {
		Simulation::new(&vec![8.0; n], links, 800.0, 600.0)
	}

	fn positions(sim: &Simulation) -> Vec<(f64, f64)> {
		sim.bodies().iter().map(|b| (b.x, b.y)).collect()
	}

	#[test]
	fn initial_placement_is_deterministic() {
		let a = sim(12, vec![(0, 1), (1, 2)]);
		let b = sim(12, vec![(0, 1), (1, 2)]);
		assert_eq!(positions(&a), positions(&b));
	}

	#[test]
	fn equal_step_counts_give_identical_layouts() {
		let mut a = sim(10, vec![(0, 1), (2, 3), (4, 5)]);
		let mut b = sim(10, vec![(0, 1), (2, 3), (4, 5)]);
		for _ in 0..50 {
			a.step();
			b.step();
		}
		assert_eq!(positions(&a), positions(&b));
	}

	#[test]
	fn alpha_decays_toward_zero() {
		let mut s = sim(5, vec![]);
		let start = s.alpha();
		for _ in 0..100 {
			s.step();
		}
		assert!(s.alpha() < start);
		for _ in 0..400 {
			s.step();
		}
		assert!(s.settled());
	}

	#[test]
	fn step_is_a_no_op_once_settled() {
		let mut s = sim(4, vec![(0, 1)]);
		for _ in 0..500 {
			s.step();
		}
		assert!(s.settled());
		let frozen = positions(&s);
		s.step();
		assert_eq!(positions(&s), frozen);
	}

	#[test]
	fn drag_reheats_and_release_cools() {
		let mut s = sim(6, vec![(0, 1)]);
		for _ in 0..500 {
			s.step();
		}
		assert!(s.settled());

		s.begin_drag(0);
		assert!(!s.settled());
		assert!(s.alpha() >= DRAG_ALPHA_TARGET);

		s.end_drag(0);
		for _ in 0..600 {
			s.step();
		}
		assert!(s.settled());
	}

	#[test]
	fn pinned_body_tracks_the_pointer_through_steps() {
		let mut s = sim(6, vec![(0, 1), (0, 2)]);
		s.begin_drag(0);
		s.drag_to(0, 50.0, 60.0);
		for _ in 0..10 {
			s.step();
		}
		let body = s.body(0).unwrap();
		assert_eq!((body.x, body.y), (50.0, 60.0));
		assert!(body.pinned_at().is_some());
	}

	#[test]
	fn released_body_moves_again() {
		let mut s = sim(6, vec![(0, 1)]);
		s.begin_drag(0);
		s.drag_to(0, 400.0, 300.0);
		s.step();
		s.end_drag(0);
		assert!(s.body(0).unwrap().pinned_at().is_none());
		let before = (s.body(0).unwrap().x, s.body(0).unwrap().y);
		for _ in 0..20 {
			s.step();
		}
		let after = (s.body(0).unwrap().x, s.body(0).unwrap().y);
		assert_ne!(before, after);
	}

	#[test]
	fn linked_bodies_settle_near_rest_length() {
		let mut s = sim(2, vec![(0, 1)]);
		for _ in 0..500 {
			s.step();
		}
		let (a, b) = (s.body(0).unwrap(), s.body(1).unwrap());
		let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
		// Charge pushes slightly past the rest length; it should still be
		// the right order of magnitude, not collapsed or exploded.
		assert!(dist > LINK_DISTANCE * 0.5 && dist < LINK_DISTANCE * 3.0);
	}

	#[test]
	fn collision_pushes_overlapping_circles_apart() {
		let mut s = Simulation::new(&[20.0, 20.0], vec![], 800.0, 600.0);
		let target = (s.body(1).unwrap().x, s.body(1).unwrap().y);
		s.begin_drag(0);
		s.drag_to(0, target.0, target.1);
		for _ in 0..100 {
			s.step();
		}
		let (a, b) = (s.body(0).unwrap(), s.body(1).unwrap());
		let dist = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
		// The pinned circle holds its ground; the free one is shoved clear.
		assert!(dist + 1e-6 >= a.collide_radius + b.collide_radius);
		assert_eq!((a.x, a.y), target);
	}

	#[test]
	fn layout_centers_on_the_viewport() {
		let mut s = sim(9, vec![(0, 1), (1, 2), (3, 4)]);
		for _ in 0..300 {
			s.step();
		}
		let n = s.bodies().len() as f64;
		let cx = s.bodies().iter().map(|b| b.x).sum::<f64>() / n;
		let cy = s.bodies().iter().map(|b| b.y).sum::<f64>() / n;
		assert!((cx - 400.0).abs() < 1.0);
		assert!((cy - 300.0).abs() < 1.0);
	}

	#[test]
	fn coincident_nodes_are_separated_deterministically() {
		let run = || {
			let mut s = sim(3, vec![]);
			let target = (s.body(1).unwrap().x, s.body(1).unwrap().y);
			s.begin_drag(0);
			s.drag_to(0, target.0, target.1);
			s.step();
			s.end_drag(0);
			for _ in 0..50 {
				s.step();
			}
			s
		};
		let (a, b) = (run(), run());
		let (n0, n1) = (a.body(0).unwrap(), a.body(1).unwrap());
		let dist = ((n0.x - n1.x).powi(2) + (n0.y - n1.y).powi(2)).sqrt();
		assert!(dist > 1.0);
		assert_eq!(positions(&a), positions(&b));
	}
}
