use crate::graph::node::{GenNode, NoteParams};

/// One note's compiled, stateful signal program.
///
/// Stamped out by `WiringDocument::create_generator`, then owned exclusively
/// by the voice manager. Advances block by block, decays through its release
/// tail after `release()`, and reports `is_finished` once it will emit
/// nothing further. Deterministic: two instances compiled with equal
/// parameters and advanced identically produce identical samples.
pub struct GeneratorInstance {
    root: Box<dyn GenNode>,
    params: NoteParams,
    requester: String,
    released: bool,
}

impl core::fmt::Debug for GeneratorInstance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GeneratorInstance")
            .field("params", &self.params)
            .field("requester", &self.requester)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl GeneratorInstance {
    pub(crate) fn new(root: Box<dyn GenNode>, params: NoteParams, requester: &str) -> Self {
        Self {
            root,
            params,
            requester: requester.to_owned(),
            released: false,
        }
    }

    /// Render the next `out.len()` samples, scaled by the instance gain.
    ///
    /// Allocation-free; runs on the realtime rendering path.
    pub fn advance(&mut self, out: &mut [f32]) {
        self.root.render_block(out);

        if self.params.gain != 1.0 {
            for sample in out.iter_mut() {
                *sample *= self.params.gain;
            }
        }
    }

    /// Note-off. Envelopes enter their release phase; output keeps decaying
    /// until `is_finished` turns true. Idempotent.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.root.release();
        }
    }

    /// True only after `release()`, once the tail has fully decayed.
    pub fn is_finished(&self) -> bool {
        self.released && self.root.is_finished()
    }

    /// The note parameters captured at compile time.
    pub fn params(&self) -> NoteParams {
        self.params
    }

    /// Name of the document that requested compilation. Diagnostics only.
    pub fn requester(&self) -> &str {
        &self.requester
    }
}
