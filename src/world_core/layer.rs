/// One stage of the world pipeline. Stages only read their input and hand off
/// a fresh output; nothing downstream mutates an earlier stage's result.
pub trait Layer<I, O> {
    fn generate(&self, input: I) -> O;
}
