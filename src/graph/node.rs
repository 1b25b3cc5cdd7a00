/// Fixed parameters of one note, captured when a generator is compiled.
///
/// Immutable after compilation: generators never re-read tempo or frequency
/// from anywhere once stamped out, which is what makes two instances compiled
/// with equal parameters bit-identical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteParams {
    /// Fundamental frequency in Hz. Must be positive.
    pub frequency: f32,
    /// Tempo for beat-synced nodes. Any sane BPM value.
    pub beats_per_minute: f32,
    /// Final output scale of the instance. Non-negative; may exceed 1.0.
    pub gain: f32,
    /// Samples per second. Must be positive and must match the rate the
    /// voice manager renders at.
    pub sample_rate: f32,
}

/// A live node in a compiled generator graph.
///
/// `render_block` writes the node's next samples into `out`, overwriting its
/// previous contents, and must not allocate, block, or fail: it runs on the
/// realtime rendering path. All allocation happens at compile time.
///
/// `release` signals note-off. Output is not silenced immediately; envelope
/// bearing nodes play out their tail and report `is_finished` once nothing
/// but silence remains. Nodes with no tail of their own (oscillators, noise)
/// finish as soon as they are released. `is_finished` is never true before
/// `release` — a held note never ends on its own.
pub trait GenNode: Send {
    fn render_block(&mut self, out: &mut [f32]);

    fn release(&mut self);

    fn is_finished(&self) -> bool;
}

impl core::fmt::Debug for dyn GenNode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("dyn GenNode")
    }
}

/// Allow boxed nodes to be composed like any other node.
impl GenNode for Box<dyn GenNode> {
    fn render_block(&mut self, out: &mut [f32]) {
        (**self).render_block(out)
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}
