pub mod graph; // Generator runtime nodes and graph compilation
pub mod synth; // Voice management and polyphony
pub mod tuning; // Pitch-class to frequency conversion
pub mod wiring; // Instrument documents and collections

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
