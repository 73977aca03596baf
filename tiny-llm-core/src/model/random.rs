use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)` used by the sampler.
///
/// Seeded and unseeded generation share the same sampling code and only
/// differ in the source they pass in.
pub trait RandomSource {
	/// Returns the next uniform draw in `[0, 1)`.
	fn next_unit(&mut self) -> f64;
}

/// Adapts any `rand::Rng` into a `RandomSource`.
#[derive(Debug)]
pub struct RngSource<R: Rng> {
	rng: R,
}

impl<R: Rng> RngSource<R> {
	pub fn new(rng: R) -> Self {
		Self { rng }
	}
}

impl RngSource<StdRng> {
	/// Deterministic source: identical seeds yield identical draw sequences.
	pub fn seeded(seed: u64) -> Self {
		Self::new(StdRng::seed_from_u64(seed))
	}
}

impl RngSource<ThreadRng> {
	/// Non-deterministic source backed by the thread-local generator.
	///
	/// Each thread owns its generator, so concurrent generations never share state.
	pub fn entropy() -> Self {
		Self::new(rand::rng())
	}
}

impl<R: Rng> RandomSource for RngSource<R> {
	fn next_unit(&mut self) -> f64 {
		self.rng.random::<f64>()
	}
}

/// Replays a fixed sequence of draws, cycling when exhausted.
///
/// Useful to drive the sampler through known decisions.
#[derive(Clone, Debug)]
pub struct FixedDraws {
	draws: Vec<f64>,
	position: usize,
}

impl FixedDraws {
	/// Creates a source replaying `draws`.
	///
	/// Values are clamped into `[0, 1)`; an empty sequence always draws 0.
	pub fn new(draws: Vec<f64>) -> Self {
		let draws = draws.into_iter().map(|d| d.clamp(0.0, 1.0 - f64::EPSILON)).collect();
		Self { draws, position: 0 }
	}
}

impl RandomSource for FixedDraws {
	fn next_unit(&mut self) -> f64 {
		if self.draws.is_empty() {
			return 0.0;
		}
		let draw = self.draws[self.position % self.draws.len()];
		self.position += 1;
		draw
	}
}
