//! Collection of the steps taken by an algorithm, such as the simplifier.

/// A type that collects the steps of an algorithm.
///
/// [`StepCollector`] is also implemented for the unit type `()`, for callers that only want the
/// result, and for [`Vec`], which records every step in the order it was taken.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}

/// Forwards steps to another collector while counting them.
///
/// Every simplification rule pushes exactly one step when it rewrites an expression, so the count
/// tells whether a pass changed anything.
pub(crate) struct Counting<'a, S> {
    inner: &'a mut dyn StepCollector<S>,
    count: usize,
}

impl<'a, S> Counting<'a, S> {
    pub(crate) fn new(inner: &'a mut dyn StepCollector<S>) -> Self {
        Self { inner, count: 0 }
    }

    /// Returns the number of steps pushed so far.
    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

impl<S: std::fmt::Debug> StepCollector<S> for Counting<'_, S> {
    fn push(&mut self, step: S) {
        tracing::trace!(?step, "rule applied");
        self.count += 1;
        self.inner.push(step);
    }
}
