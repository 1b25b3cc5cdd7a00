//! Generator-graph runtime and compilation.
//!
//! A wiring document's immutable template (`wiring::NodeDescriptor`) is
//! compiled here into a tree of live `GenNode`s with one note's parameters
//! baked in. Compilation allocates; rendering never does.

/// Gain, mix, and tremolo combinator nodes.
pub mod combine;
/// Descriptor tree → runtime node compilation.
pub mod compile;
/// Linear ADSR amplitude envelope.
pub mod envelope;
/// The per-note compiled signal program handed to the voice manager.
pub mod generator;
/// Core runtime trait and note parameters.
pub mod node;
/// Process-wide baked noise table and the noise node.
pub mod noise;
/// Phase-accumulator oscillators.
pub mod oscillator;

pub use compile::{compile, CompileCtx};
pub use generator::GeneratorInstance;
pub use node::{GenNode, NoteParams};
pub use noise::bake_noise;
