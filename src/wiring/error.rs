use thiserror::Error;

/// Result type for document loading and graph compilation.
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors raised while loading wiring documents or compiling generators.
///
/// Load-time structural errors (`UnresolvedReference`, `ReferenceCycle`) are
/// fatal to the load: no collection is produced, so callers can never play
/// notes from a partially validated set of documents.
#[derive(Debug, Error)]
pub enum WiringError {
    /// A graph template references a sibling document that is not in the
    /// collection.
    #[error("document '{document}' references unknown document '{reference}'")]
    UnresolvedReference {
        /// The document whose template holds the dangling reference.
        document: String,
        /// The name that failed to resolve.
        reference: String,
    },

    /// Cross-document references form a cycle.
    #[error("cross-document reference cycle: {path}")]
    ReferenceCycle {
        /// The cycle, rendered as `a -> b -> a`.
        path: String,
    },

    /// Index-based document lookup outside `[0, len)`.
    #[error("document index {index} out of range (collection holds {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of documents in the collection.
        len: usize,
    },

    /// Name-based lookup for a document that is not in the collection.
    #[error("no document named '{name}' in collection")]
    UnknownDocument {
        /// The requested name.
        name: String,
    },

    /// Note frequency must be positive.
    #[error("invalid note frequency: {freq} Hz")]
    InvalidFrequency {
        /// The rejected frequency.
        freq: f32,
    },

    /// Sample rate must be positive.
    #[error("invalid sample rate: {rate} Hz")]
    InvalidSampleRate {
        /// The rejected sample rate.
        rate: f32,
    },

    /// Gain must be non-negative (values above 1.0 are allowed).
    #[error("invalid gain: {gain}")]
    InvalidGain {
        /// The rejected gain.
        gain: f32,
    },

    /// A `Noise` descriptor was compiled before `bake_noise()` ran.
    #[error("noise table not baked; call graph::noise::bake_noise() first")]
    NoiseNotBaked,

    /// Serialized documents failed to parse. Fatal to the load, like any
    /// other structural error.
    #[cfg(feature = "serde")]
    #[error("malformed document json: {0}")]
    MalformedJson(#[from] serde_json::Error),
}
