use log::debug;

use crate::graph::combine::{GainGen, MixGen, TremoloGen};
use crate::graph::envelope::AdsrGen;
use crate::graph::node::{GenNode, NoteParams};
use crate::graph::noise::NoiseGen;
use crate::graph::oscillator::OscGen;
use crate::wiring::collection::WiringCollection;
use crate::wiring::descriptor::NodeDescriptor;
use crate::wiring::error::{WiringError, WiringResult};

/*
Graph Compilation
=================

Turns an immutable descriptor tree into a live `GenNode` tree with one
note's parameters baked into every node. Compilation is where all allocation
happens; the resulting tree renders without allocating.

`Reference` descriptors resolve through the compile context's collection and
the referenced document's root is compiled inline, so the finished generator
carries no link back to the collection. The visit stack guards against
reference cycles; validated collections can't contain one, but compilation
is also callable against ad-hoc document sets and must not recurse forever.
*/

/// Everything a descriptor needs to become a runtime node.
pub struct CompileCtx<'a> {
    /// The note's fixed parameters.
    pub params: NoteParams,
    /// Name of the document that initiated compilation. Diagnostics only.
    pub requester: &'a str,
    /// Resolves `Reference` descriptors. Consulted only during compilation.
    pub collection: &'a WiringCollection,
}

/// Compile one document's template into a generator graph.
///
/// `document` names the template's owner so reference errors can say which
/// document held the dangling name.
pub fn compile(
    template: &NodeDescriptor,
    document: &str,
    ctx: &CompileCtx,
) -> WiringResult<Box<dyn GenNode>> {
    let mut stack = vec![document.to_owned()];
    let root = compile_node(template, ctx, &mut stack)?;

    debug!(
        "compiled generator for '{}' ({} Hz, requested by '{}')",
        document, ctx.params.frequency, ctx.requester
    );
    Ok(root)
}

fn compile_node(
    template: &NodeDescriptor,
    ctx: &CompileCtx,
    stack: &mut Vec<String>,
) -> WiringResult<Box<dyn GenNode>> {
    let p = ctx.params;

    Ok(match template {
        NodeDescriptor::Sine { detune_cents } => {
            Box::new(OscGen::sine(p.frequency, *detune_cents, p.sample_rate))
        }
        NodeDescriptor::Square { detune_cents } => {
            Box::new(OscGen::square(p.frequency, *detune_cents, p.sample_rate))
        }
        NodeDescriptor::Triangle { detune_cents } => {
            Box::new(OscGen::triangle(p.frequency, *detune_cents, p.sample_rate))
        }
        NodeDescriptor::Noise { seed } => Box::new(NoiseGen::new(*seed)?),
        NodeDescriptor::Adsr {
            attack,
            decay,
            sustain,
            release,
            input,
        } => {
            let input = compile_node(input, ctx, stack)?;
            Box::new(AdsrGen::new(
                input,
                *attack,
                *decay,
                *sustain,
                *release,
                p.sample_rate,
            ))
        }
        NodeDescriptor::Gain { gain, input } => {
            let input = compile_node(input, ctx, stack)?;
            Box::new(GainGen::new(input, *gain))
        }
        NodeDescriptor::Tremolo {
            depth,
            beats_per_cycle,
            input,
        } => {
            let input = compile_node(input, ctx, stack)?;
            Box::new(TremoloGen::new(
                input,
                *depth,
                *beats_per_cycle,
                p.beats_per_minute,
                p.sample_rate,
            ))
        }
        NodeDescriptor::Mix { inputs } => {
            let compiled = inputs
                .iter()
                .map(|input| compile_node(input, ctx, stack))
                .collect::<WiringResult<Vec<_>>>()?;
            Box::new(MixGen::new(compiled))
        }
        NodeDescriptor::Reference { document } => {
            if stack.iter().any(|name| name == document) {
                let mut path = stack.join(" -> ");
                path.push_str(" -> ");
                path.push_str(document);
                return Err(WiringError::ReferenceCycle { path });
            }

            let referenced = ctx.collection.document_by_name(document).ok_or_else(|| {
                WiringError::UnresolvedReference {
                    document: stack.last().cloned().unwrap_or_default(),
                    reference: document.clone(),
                }
            })?;

            stack.push(document.clone());
            let node = compile_node(referenced.root(), ctx, stack)?;
            stack.pop();
            node
        }
    })
}
