/// A type that records the intermediate results of an algorithm, such as the output of each pass
/// of the simplifier.
///
/// [`StepCollector`] is also implemented for the unit type `()`, which discards every step. Pass
/// `&mut ()` when the steps aren't needed.
pub trait StepCollector<S> {
    /// Records a step.
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
