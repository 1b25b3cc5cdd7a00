//! Benchmarks for the voice-manager mixing path.
//!
//! Run with: cargo bench
//!
//! The mixing loop runs on the audio callback, so the interesting number is
//! how far under the block deadline a realistic voice count stays.
//!
//! Reference timing at 48kHz sample rate:
//!   - 128 samples = 2.67ms deadline
//!   - 512 samples = 10.67ms deadline

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use wiresynth::graph::{bake_noise, NoteParams};
use wiresynth::synth::GenManager;
use wiresynth::wiring::{NodeDescriptor, WiringCollection, WiringDocument};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK_SIZES: &[usize] = &[128, 512];

fn instrument() -> WiringDocument {
    WiringDocument::new(
        "bench",
        NodeDescriptor::Adsr {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.6,
            release: 0.2,
            input: Box::new(NodeDescriptor::Mix {
                inputs: vec![
                    NodeDescriptor::Sine { detune_cents: 0.0 },
                    NodeDescriptor::Square { detune_cents: -7.0 },
                    NodeDescriptor::Gain {
                        gain: 0.2,
                        input: Box::new(NodeDescriptor::Noise { seed: 1 }),
                    },
                ],
            }),
        },
    )
}

fn manager_with_voices(collection: &WiringCollection, voices: usize) -> GenManager {
    let doc = collection.active().unwrap();
    let mut manager = GenManager::new(SAMPLE_RATE);

    for i in 0..voices {
        // Spread the chord so phases do not align.
        let params = NoteParams {
            frequency: 110.0 * (1.0 + i as f32 * 0.13),
            beats_per_minute: 120.0,
            gain: 1.0,
            sample_rate: SAMPLE_RATE,
        };
        let instance = doc
            .create_generator(params, doc.name(), collection)
            .unwrap();
        manager.start_generator(instance, 1.0).unwrap();
    }

    manager
}

fn bench_render(c: &mut Criterion) {
    bake_noise();
    let collection = WiringCollection::load(vec![instrument()]).unwrap();

    let mut group = c.benchmark_group("synth/render_block");
    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for voices in [1, 8, 32] {
            let mut manager = manager_with_voices(&collection, voices);
            let id = BenchmarkId::new(format!("{voices}_voices"), size);
            group.bench_with_input(id, &size, |b, _| {
                b.iter(|| {
                    manager.render_block(black_box(&mut buffer));
                })
            });
        }
    }
    group.finish();
}

fn bench_sweep(c: &mut Criterion) {
    bake_noise();
    let collection = WiringCollection::load(vec![instrument()]).unwrap();

    c.bench_function("synth/check_finished_release", |b| {
        let mut manager = manager_with_voices(&collection, 32);
        b.iter(|| {
            manager.check_finished_release();
            black_box(manager.any_playing())
        })
    });
}

criterion_group!(benches, bench_render, bench_sweep);
criterion_main!(benches);
