#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::{compile, CompileCtx, GeneratorInstance, NoteParams};
use crate::wiring::collection::WiringCollection;
use crate::wiring::descriptor::NodeDescriptor;
use crate::wiring::error::{WiringError, WiringResult};

/// A named, immutable instrument: one graph template plus a factory for
/// stamping out per-note generators.
///
/// Documents never change after loading, so in-flight generators can never
/// observe a mutated template. Names are unique within a collection by
/// convention, not enforcement; name lookup returns the first match.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct WiringDocument {
    name: String,
    root: NodeDescriptor,
}

impl WiringDocument {
    pub fn new(name: impl Into<String>, root: NodeDescriptor) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &NodeDescriptor {
        &self.root
    }

    /// Compile a fresh generator for one note.
    ///
    /// Each call is independent: two instances compiled with equal `params`
    /// behave identically and share no mutable state, which is what keeps
    /// two voices on the same note from interfering.
    ///
    /// `requester` names the calling document for diagnostics only.
    /// `collection` resolves cross-document references; it is consulted only
    /// during this call and never re-queried while the generator renders.
    pub fn create_generator(
        &self,
        params: NoteParams,
        requester: &str,
        collection: &WiringCollection,
    ) -> WiringResult<GeneratorInstance> {
        if !(params.frequency > 0.0) {
            return Err(WiringError::InvalidFrequency {
                freq: params.frequency,
            });
        }
        if !(params.sample_rate > 0.0) {
            return Err(WiringError::InvalidSampleRate {
                rate: params.sample_rate,
            });
        }
        if !(params.gain >= 0.0) {
            return Err(WiringError::InvalidGain { gain: params.gain });
        }

        let ctx = CompileCtx {
            params,
            requester,
            collection,
        };
        let root = compile(&self.root, &self.name, &ctx)?;

        Ok(GeneratorInstance::new(root, params, requester))
    }
}
