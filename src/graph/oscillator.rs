use std::f32::consts::TAU;

use crate::graph::node::GenNode;

/*
Generator Oscillators
=====================

Phase-accumulator oscillators with the note frequency baked in at compile
time. The phase steps by `frequency / sample_rate` per sample and wraps in
[0, 1); each waveform maps the phase to a sample.

None of these carry a release tail of their own: an oscillator released
outside an envelope finishes immediately. Instruments that want a decaying
note wrap the oscillator in an `Adsr` descriptor.

Waveforms are the naive, non-bandlimited shapes. Aliasing above roughly
sample_rate / (2 * harmonics) is accepted; the machinery cares about graph
lifecycle, not about shipping a definitive oscillator catalogue.
*/

#[derive(Debug, Clone, Copy)]
enum Waveform {
    Sine,
    Square,
    Triangle,
}

pub struct OscGen {
    waveform: Waveform,
    phase: f32,
    step: f32,
    released: bool,
}

/// Apply a detune in cents to a base frequency. 100 cents = 1 semitone.
fn detuned(frequency: f32, detune_cents: f32) -> f32 {
    frequency * 2.0_f32.powf(detune_cents / 1200.0)
}

impl OscGen {
    fn new(waveform: Waveform, frequency: f32, detune_cents: f32, sample_rate: f32) -> Self {
        Self {
            waveform,
            phase: 0.0,
            step: detuned(frequency, detune_cents) / sample_rate,
            released: false,
        }
    }

    pub fn sine(frequency: f32, detune_cents: f32, sample_rate: f32) -> Self {
        Self::new(Waveform::Sine, frequency, detune_cents, sample_rate)
    }

    pub fn square(frequency: f32, detune_cents: f32, sample_rate: f32) -> Self {
        Self::new(Waveform::Square, frequency, detune_cents, sample_rate)
    }

    pub fn triangle(frequency: f32, detune_cents: f32, sample_rate: f32) -> Self {
        Self::new(Waveform::Triangle, frequency, detune_cents, sample_rate)
    }
}

impl GenNode for OscGen {
    fn render_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = match self.waveform {
                Waveform::Sine => (self.phase * TAU).sin(),
                Waveform::Square => {
                    if self.phase < 0.5 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                Waveform::Triangle => 1.0 - 4.0 * (self.phase - 0.5).abs(),
            };

            self.phase += self.step;
            if self.phase >= 1.0 {
                self.phase -= 1.0;
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_stays_in_range_and_oscillates() {
        let mut osc = OscGen::sine(440.0, 0.0, 48_000.0);
        let mut buffer = vec![0.0; 512];
        osc.render_block(&mut buffer);

        assert!(buffer.iter().all(|s| s.abs() <= 1.0 + 1e-6));
        assert!(buffer.iter().any(|s| *s > 0.5));
        assert!(buffer.iter().any(|s| *s < -0.5));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut a = OscGen::triangle(220.0, 3.0, 48_000.0);
        let mut b = OscGen::triangle(220.0, 3.0, 48_000.0);
        let mut buf_a = vec![0.0; 256];
        let mut buf_b = vec![0.0; 256];

        a.render_block(&mut buf_a);
        b.render_block(&mut buf_b);
        assert_eq!(buf_a, buf_b);
    }

    #[test]
    fn square_period_matches_frequency() {
        // 1000 Hz at 48kHz: one cycle every 48 samples.
        let mut osc = OscGen::square(1000.0, 0.0, 48_000.0);
        let mut buffer = vec![0.0; 96];
        osc.render_block(&mut buffer);

        // Two cycles: polarity flips at every half period after the first edge.
        let flips = buffer.windows(2).filter(|w| w[0] != w[1]).count();
        assert_eq!(flips, 3);
    }

    #[test]
    fn finishes_only_after_release() {
        let mut osc = OscGen::sine(440.0, 0.0, 48_000.0);
        assert!(!osc.is_finished());
        osc.release();
        assert!(osc.is_finished());
    }

    #[test]
    fn detune_raises_pitch() {
        assert!(detuned(440.0, 100.0) > 440.0);
        // 1200 cents is exactly one octave.
        assert!((detuned(440.0, 1200.0) - 880.0).abs() < 1e-3);
    }
}
