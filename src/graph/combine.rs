use std::f32::consts::TAU;

use crate::graph::node::GenNode;
use crate::MAX_BLOCK_SIZE;

/// Constant amplitude scale on a child graph.
pub struct GainGen {
    input: Box<dyn GenNode>,
    gain: f32,
}

impl GainGen {
    pub fn new(input: Box<dyn GenNode>, gain: f32) -> Self {
        Self { input, gain }
    }
}

impl GenNode for GainGen {
    fn render_block(&mut self, out: &mut [f32]) {
        self.input.render_block(out);
        for sample in out.iter_mut() {
            *sample *= self.gain;
        }
    }

    fn release(&mut self) {
        self.input.release();
    }

    fn is_finished(&self) -> bool {
        self.input.is_finished()
    }
}

/// Sample-wise sum of several child graphs.
///
/// The scratch buffer is allocated once at compile time; rendering stays
/// allocation-free. Finished only when every child is finished.
pub struct MixGen {
    inputs: Vec<Box<dyn GenNode>>,
    scratch: Vec<f32>,
}

impl MixGen {
    pub fn new(inputs: Vec<Box<dyn GenNode>>) -> Self {
        Self {
            inputs,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl GenNode for MixGen {
    fn render_block(&mut self, out: &mut [f32]) {
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);

        out.fill(0.0);
        for input in &mut self.inputs {
            let scratch = &mut self.scratch[..out.len()];
            input.render_block(scratch);

            for (o, s) in out.iter_mut().zip(scratch.iter()) {
                *o += s;
            }
        }
    }

    fn release(&mut self) {
        for input in &mut self.inputs {
            input.release();
        }
    }

    fn is_finished(&self) -> bool {
        self.inputs.iter().all(|input| input.is_finished())
    }
}

/// Amplitude wobble at a tempo-derived rate.
///
/// One cosine-shaped dip per `beats_per_cycle` beats; the cycle rate is
/// baked from the note's beats-per-minute at compile time.
pub struct TremoloGen {
    input: Box<dyn GenNode>,
    depth: f32,
    phase: f32,
    step: f32,
}

impl TremoloGen {
    pub fn new(
        input: Box<dyn GenNode>,
        depth: f32,
        beats_per_cycle: f32,
        beats_per_minute: f32,
        sample_rate: f32,
    ) -> Self {
        let cycle_hz = beats_per_minute / 60.0 / beats_per_cycle.max(f32::EPSILON);

        Self {
            input,
            depth: depth.clamp(0.0, 1.0),
            phase: 0.0,
            step: cycle_hz / sample_rate,
        }
    }
}

impl GenNode for TremoloGen {
    fn render_block(&mut self, out: &mut [f32]) {
        self.input.render_block(out);

        for sample in out.iter_mut() {
            // Raised-cosine dip: full level at phase 0, deepest at 0.5.
            let dip = 0.5 - 0.5 * (self.phase * TAU).cos();
            *sample *= 1.0 - self.depth * dip;

            self.phase += self.step;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
            }
        }
    }

    fn release(&mut self) {
        self.input.release();
    }

    fn is_finished(&self) -> bool {
        self.input.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dc(f32);

    impl GenNode for Dc {
        fn render_block(&mut self, out: &mut [f32]) {
            out.fill(self.0);
        }
        fn release(&mut self) {}
        fn is_finished(&self) -> bool {
            true
        }
    }

    #[test]
    fn gain_scales_child_output() {
        let mut node = GainGen::new(Box::new(Dc(0.5)), 2.0);
        let mut buffer = vec![0.0; 16];
        node.render_block(&mut buffer);
        assert!(buffer.iter().all(|s| (*s - 1.0).abs() < 1e-6));
    }

    #[test]
    fn mix_sums_children() {
        let mut node = MixGen::new(vec![
            Box::new(Dc(0.25)) as Box<dyn GenNode>,
            Box::new(Dc(0.5)),
            Box::new(Dc(-0.25)),
        ]);
        let mut buffer = vec![9.9; 16];
        node.render_block(&mut buffer);
        assert!(buffer.iter().all(|s| (*s - 0.5).abs() < 1e-6));
    }

    #[test]
    fn empty_mix_renders_silence() {
        let mut node = MixGen::new(Vec::new());
        let mut buffer = vec![1.0; 8];
        node.render_block(&mut buffer);
        assert!(buffer.iter().all(|s| *s == 0.0));
    }

    #[test]
    fn tremolo_dips_and_recovers() {
        // One cycle per beat at 60 BPM = 1 Hz; 100 Hz sample rate.
        let mut node = TremoloGen::new(Box::new(Dc(1.0)), 1.0, 1.0, 60.0, 100.0);
        let mut buffer = vec![0.0; 100];
        node.render_block(&mut buffer);

        assert!((buffer[0] - 1.0).abs() < 1e-4, "full level at cycle start");
        assert!(buffer[50] < 0.01, "deepest dip at half cycle");
        assert!(buffer[99] > 0.9, "recovered by cycle end");
    }
}
