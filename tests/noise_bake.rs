//! Runs as its own process, so the bake-before-use contract can be observed
//! from the unbaked state. Ordering inside the single test is deliberate.

use wiresynth::graph::{bake_noise, NoteParams};
use wiresynth::wiring::{NodeDescriptor, WiringCollection, WiringDocument, WiringError};

#[test]
fn noise_requires_explicit_bake_then_compiles() {
    let doc = WiringDocument::new("hiss", NodeDescriptor::Noise { seed: 11 });
    let collection = WiringCollection::load(vec![doc]).unwrap();
    let doc = collection.active().unwrap();
    let params = NoteParams {
        frequency: 440.0,
        beats_per_minute: 120.0,
        gain: 1.0,
        sample_rate: 48_000.0,
    };

    // Compiling a noise node before baking is a hard error, not a silent
    // mid-performance bake.
    let err = doc
        .create_generator(params, doc.name(), &collection)
        .unwrap_err();
    assert!(matches!(err, WiringError::NoiseNotBaked));

    bake_noise();

    let mut instance = doc
        .create_generator(params, doc.name(), &collection)
        .unwrap();
    let mut block = vec![0.0; 512];
    instance.advance(&mut block);
    assert!(block.iter().any(|s| s.abs() > 0.1));

    // Identical seeds replay identical noise.
    let mut again = doc
        .create_generator(params, doc.name(), &collection)
        .unwrap();
    let mut block2 = vec![0.0; 512];
    again.advance(&mut block2);
    assert_eq!(block, block2);
}
