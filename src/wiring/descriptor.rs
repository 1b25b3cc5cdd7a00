#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Graph Templates
===============

A `NodeDescriptor` tree is the immutable, declarative description of a
synthesis graph held by a wiring document. It describes WHAT to generate;
nothing in it runs. Compilation (`graph::compile`) turns a descriptor tree
plus one note's parameters into a live generator that produces samples.

Descriptors are plain data: cloning one is cheap relative to note-on rates,
serde derives are available behind the `serde` feature, and the compile
machinery treats the variant set as open-ended (adding a variant touches only
the descriptor enum and the compiler's match).

The `Reference` variant points at a sibling document by name. References are
resolved through the owning collection at compile time and the referenced
subtree is inlined into the compiled generator, so the collection is never
consulted while audio is rendering.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum NodeDescriptor {
    /// Sine oscillator tracking the note frequency.
    Sine {
        /// Detune in cents. 100 cents = 1 semitone.
        detune_cents: f32,
    },
    /// Naive square oscillator tracking the note frequency.
    Square { detune_cents: f32 },
    /// Naive triangle oscillator tracking the note frequency.
    Triangle { detune_cents: f32 },
    /// White noise read from the process-wide baked table.
    ///
    /// The seed picks a per-instance read offset, so two noise voices do not
    /// play the identical sample run, while any one seed is reproducible.
    Noise { seed: u32 },
    /// Linear ADSR amplitude envelope wrapping a child graph.
    ///
    /// Times are in seconds. A held note sits in sustain forever; release
    /// ramps the current level to exactly zero.
    Adsr {
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
        input: Box<NodeDescriptor>,
    },
    /// Constant amplitude scale on a child graph.
    Gain { gain: f32, input: Box<NodeDescriptor> },
    /// Amplitude wobble at a tempo-derived rate.
    ///
    /// One modulation cycle spans `beats_per_cycle` beats at the note's
    /// beats-per-minute, so the effect tracks the tempo passed at compile
    /// time rather than a fixed Hz rate.
    Tremolo {
        /// 0.0 = no effect, 1.0 = full dips to silence.
        depth: f32,
        beats_per_cycle: f32,
        input: Box<NodeDescriptor>,
    },
    /// Sample-wise sum of several child graphs.
    Mix { inputs: Vec<NodeDescriptor> },
    /// The root graph of a sibling document, by name.
    Reference { document: String },
}

impl NodeDescriptor {
    /// Collect the names of every `Reference` in this template, depth first.
    ///
    /// Used by collection loading to validate cross-document references
    /// eagerly instead of at first note-on.
    pub fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            NodeDescriptor::Sine { .. }
            | NodeDescriptor::Square { .. }
            | NodeDescriptor::Triangle { .. }
            | NodeDescriptor::Noise { .. } => {}
            NodeDescriptor::Adsr { input, .. }
            | NodeDescriptor::Gain { input, .. }
            | NodeDescriptor::Tremolo { input, .. } => input.collect_references(out),
            NodeDescriptor::Mix { inputs } => {
                for input in inputs {
                    input.collect_references(out);
                }
            }
            NodeDescriptor::Reference { document } => out.push(document),
        }
    }
}
