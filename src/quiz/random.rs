use rand::Rng;

/// Source of uniform random indexes used while building questions.
///
/// The generator never touches `rand` directly, so tests can hand it a
/// scripted sequence and assert exact questions.
pub trait RandomSource {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Adapts any `rand` generator, e.g. `RngSource(StdRng::from_entropy())`.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// Fisher-Yates shuffle driven by a `RandomSource`.
pub fn shuffle<T, R: RandomSource + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.pick(i + 1);
        items.swap(i, j);
    }
}
