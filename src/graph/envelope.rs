use crate::graph::node::GenNode;
use crate::MIN_TIME;

/*
ADSR Amplitude Envelope
=======================

Linear ADSR multiplying a child graph's output, sample by sample.

The stage machine:

    Attack ──(level = 1)──→ Decay ──(level = sustain)──→ Sustain
       │                      │                             │
       └────────── release() from any stage ────────────────┘
                              ↓
                           Release ──(ramp lands on 0)──→ Done

A compiled instance starts directly in Attack (compilation IS the note-on).
There is no idle stage and no retrigger: one generator, one note.

Release starts from the CURRENT level, not the sustain level, so releasing
mid-attack does not click. The release ramp snapshots its starting level and
total sample count at release() time and interpolates linearly, guaranteeing
it lands on exactly 0.0; once it does, the envelope is finished and the whole
subtree under it is silent for good.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Attack,
    Decay,
    Sustain,
    Release,
    Done,
}

pub struct AdsrGen {
    input: Box<dyn GenNode>,

    // Shape, converted to per-sample terms at compile time.
    attack_increment: f32,
    decay_decrement: f32,
    sustain_level: f32,
    release_time: f32,
    sample_rate: f32,

    stage: Stage,
    level: f32,

    // Release bookkeeping, snapshotted at release() for precision.
    release_start_level: f32,
    release_total_samples: u32,
    release_elapsed_samples: u32,
}

impl AdsrGen {
    pub fn new(
        input: Box<dyn GenNode>,
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
        sample_rate: f32,
    ) -> Self {
        let attack = attack.max(MIN_TIME);
        let decay = decay.max(MIN_TIME);
        let sustain = sustain.clamp(0.0, 1.0);

        Self {
            input,
            attack_increment: 1.0 / (attack * sample_rate),
            decay_decrement: (1.0 - sustain) / (decay * sample_rate),
            sustain_level: sustain,
            release_time: release.max(MIN_TIME),
            sample_rate,
            stage: Stage::Attack,
            level: 0.0,
            release_start_level: 0.0,
            release_total_samples: 0,
            release_elapsed_samples: 0,
        }
    }

    /// Advance one sample and return the envelope level.
    fn next_level(&mut self) -> f32 {
        match self.stage {
            Stage::Attack => {
                self.level += self.attack_increment;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = Stage::Decay;
                }
            }
            Stage::Decay => {
                self.level -= self.decay_decrement;
                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.stage = Stage::Sustain;
                }
            }
            Stage::Sustain => {}
            Stage::Release => {
                self.release_elapsed_samples += 1;
                if self.release_elapsed_samples >= self.release_total_samples {
                    self.level = 0.0;
                    self.stage = Stage::Done;
                } else {
                    let t = self.release_elapsed_samples as f32
                        / self.release_total_samples as f32;
                    self.level = self.release_start_level * (1.0 - t);
                }
            }
            Stage::Done => {}
        }

        self.level
    }
}

impl GenNode for AdsrGen {
    fn render_block(&mut self, out: &mut [f32]) {
        if self.stage == Stage::Done {
            out.fill(0.0);
            return;
        }

        self.input.render_block(out);
        for sample in out.iter_mut() {
            *sample *= self.next_level();
        }
    }

    fn release(&mut self) {
        self.input.release();

        if self.stage == Stage::Release || self.stage == Stage::Done {
            return;
        }

        self.release_start_level = self.level;
        self.release_total_samples = (self.release_time * self.sample_rate).max(1.0) as u32;
        self.release_elapsed_samples = 0;
        self.stage = Stage::Release;
    }

    fn is_finished(&self) -> bool {
        self.stage == Stage::Done
    }
}
