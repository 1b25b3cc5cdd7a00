use std::sync::OnceLock;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::graph::node::GenNode;
use crate::wiring::error::{WiringError, WiringResult};

/*
Baked White Noise
=================

Noise generators read from one process-wide table of white noise baked ahead
of time, instead of calling an RNG on the rendering path. This keeps
`render_block` allocation-free and branch-cheap, and makes every noise voice
bit-reproducible: the table contents are fixed by a constant seed, and each
instance's descriptor seed picks its read offset into the table.

Baking is an explicit one-time init: call `bake_noise()` during startup,
before any collection containing a `Noise` descriptor compiles a generator.
Compiling a noise node first fails with `WiringError::NoiseNotBaked` rather
than silently baking mid-performance.
*/

/// Table length. 2^16 samples ≈ 1.4 s at 48 kHz before the read wraps.
const NOISE_TABLE_LEN: usize = 1 << 16;

/// Fixed seed for the table bake, so output is identical run to run.
const NOISE_TABLE_SEED: u64 = 0x5eed_0f_9001;

static NOISE_TABLE: OnceLock<Vec<f32>> = OnceLock::new();

/// Bake the process-wide noise table. Idempotent; call once at startup.
pub fn bake_noise() {
    NOISE_TABLE.get_or_init(|| {
        let mut rng = Pcg32::seed_from_u64(NOISE_TABLE_SEED);
        (0..NOISE_TABLE_LEN)
            .map(|_| rng.gen_range(-1.0_f32..1.0))
            .collect()
    });
}

fn noise_table() -> Option<&'static [f32]> {
    NOISE_TABLE.get().map(Vec::as_slice)
}

/// White noise read from the baked table at a seeded offset.
pub struct NoiseGen {
    table: &'static [f32],
    pos: usize,
    released: bool,
}

impl NoiseGen {
    /// Fails with `NoiseNotBaked` until `bake_noise()` has run.
    pub fn new(seed: u32) -> WiringResult<Self> {
        let table = noise_table().ok_or(WiringError::NoiseNotBaked)?;
        let mut rng = Pcg32::seed_from_u64(seed as u64);
        let pos = rng.gen_range(0..table.len());

        Ok(Self {
            table,
            pos,
            released: false,
        })
    }
}

impl GenNode for NoiseGen {
    fn render_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.table[self.pos];
            self.pos += 1;
            if self.pos == self.table.len() {
                self.pos = 0;
            }
        }
    }

    fn release(&mut self) {
        self.released = true;
    }

    fn is_finished(&self) -> bool {
        self.released
    }
}
