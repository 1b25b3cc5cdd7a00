use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};

use crate::graph::GeneratorInstance;
use crate::synth::manager::{GenManager, VoiceError};
use crate::synth::voice::VoiceHandle;

/*
Control / Audio Split
=====================

In a real deployment the audio callback and the control tick run on
different threads. This module splits a `GenManager` into:

  VoiceController — control side. Allocates handles up front, pushes
  commands into a lock-free ring buffer, and observes playback through a
  shared live-voice counter. Never touches voice state directly.

  VoiceRenderer — audio side. Owns the manager, applies queued commands at
  the start of each block (so a voice never appears or vanishes mid-mix),
  then renders.

Commands are applied only at block boundaries; the sample-generation math
itself stays lock-free per voice. Handle allocation happens on the control
side so `start_generator` can return a handle synchronously; the manager
keeps its own counter monotonic with respect to preassigned handles.

The voice-limit check on the controller must hold across a whole block, not
just against the live counter the renderer published after its last block: a
burst of starts queued inside one block would otherwise all pass a stale
check, and the renderer would have no way to report the declined notes back.
The controller therefore also counts queued-but-unapplied starts; the limit
check declines synchronously against live + pending, and the renderer
absorbs the pending count into the published live count as it applies each
start. A declined note is always an `Err` on the control side, never a
silent drop on the audio side.
*/

pub enum VoiceCommand {
    Start {
        instance: GeneratorInstance,
        velocity_gain: f32,
        handle: VoiceHandle,
    },
    Stop {
        handle: VoiceHandle,
    },
    StopAll,
    /// The once-per-tick finished-voice sweep, scheduled from the control
    /// side so reclamation stays a deliberate, caller-driven operation.
    Sweep,
}

struct Shared {
    next_handle: AtomicU64,
    live: AtomicUsize,
    /// Starts pushed by the controller but not yet applied by the renderer.
    pending_starts: AtomicUsize,
}

pub struct VoiceController {
    tx: Producer<VoiceCommand>,
    shared: Arc<Shared>,
    max_voices: Option<usize>,
}

pub struct VoiceRenderer {
    manager: GenManager,
    rx: Consumer<VoiceCommand>,
    shared: Arc<Shared>,
}

/// Split a manager into a control half and an audio half connected by a
/// ring buffer of `capacity` pending commands.
pub fn controller_pair(
    manager: GenManager,
    capacity: usize,
    max_voices: Option<usize>,
) -> (VoiceController, VoiceRenderer) {
    let (tx, rx) = RingBuffer::new(capacity);
    let shared = Arc::new(Shared {
        next_handle: AtomicU64::new(0),
        live: AtomicUsize::new(0),
        pending_starts: AtomicUsize::new(0),
    });

    let controller = VoiceController {
        tx,
        shared: Arc::clone(&shared),
        max_voices,
    };
    let renderer = VoiceRenderer {
        manager,
        rx,
        shared,
    };
    (controller, renderer)
}

impl VoiceController {
    /// Queue a voice start and return its handle immediately.
    ///
    /// The limit check counts both the voices the renderer reported live and
    /// the starts still queued ahead of the next block, so every declined
    /// note is reported here; nothing is dropped downstream.
    pub fn start_generator(
        &mut self,
        instance: GeneratorInstance,
        velocity_gain: f32,
    ) -> Result<VoiceHandle, VoiceError> {
        if let Some(max) = self.max_voices {
            let live = self.shared.live.load(Ordering::Acquire);
            let pending = self.shared.pending_starts.load(Ordering::Acquire);
            if live + pending >= max {
                return Err(VoiceError::LimitExceeded { max });
            }
        }

        let handle = VoiceHandle::new(self.shared.next_handle.fetch_add(1, Ordering::Relaxed));
        self.tx
            .push(VoiceCommand::Start {
                instance,
                velocity_gain,
                handle,
            })
            .map_err(|_| VoiceError::QueueFull)?;
        self.shared.pending_starts.fetch_add(1, Ordering::Release);
        Ok(handle)
    }

    /// Queue a graceful note-off. Stale handles are ignored by the renderer.
    pub fn stop_note(&mut self, handle: VoiceHandle) -> Result<(), VoiceError> {
        self.tx
            .push(VoiceCommand::Stop { handle })
            .map_err(|_| VoiceError::QueueFull)
    }

    /// Queue an emergency stop of every voice.
    pub fn stop_all_notes(&mut self) -> Result<(), VoiceError> {
        self.tx
            .push(VoiceCommand::StopAll)
            .map_err(|_| VoiceError::QueueFull)
    }

    /// Schedule the finished-voice sweep. Call once per control tick.
    pub fn check_finished_release(&mut self) -> Result<(), VoiceError> {
        self.tx
            .push(VoiceCommand::Sweep)
            .map_err(|_| VoiceError::QueueFull)
    }

    /// True iff the renderer reported at least one non-finished voice after
    /// its last block.
    pub fn any_playing(&self) -> bool {
        self.shared.live.load(Ordering::Acquire) > 0
    }
}

impl VoiceRenderer {
    /// Apply all pending commands, then mix the next block.
    ///
    /// Called from the audio callback. Command application happens strictly
    /// before mixing, so the voice set is stable for the whole block.
    pub fn render_block(&mut self, out: &mut [f32]) {
        while let Ok(command) = self.rx.pop() {
            match command {
                VoiceCommand::Start {
                    instance,
                    velocity_gain,
                    handle,
                } => {
                    self.shared.pending_starts.fetch_sub(1, Ordering::Release);
                    // The controller's live + pending check already declined
                    // anything past the limit; a manager configured with a
                    // stricter ceiling than the controller still warns.
                    let _ = self.manager.start_assigned(instance, velocity_gain, handle);
                }
                VoiceCommand::Stop { handle } => self.manager.stop_note(handle),
                VoiceCommand::StopAll => self.manager.stop_all_notes(),
                VoiceCommand::Sweep => self.manager.check_finished_release(),
            }
        }

        self.manager.render_block(out);
        self.shared
            .live
            .store(self.manager.live_count(), Ordering::Release);
    }

    pub fn manager(&self) -> &GenManager {
        &self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NoteParams;
    use crate::synth::manager::StealPolicy;
    use crate::wiring::{NodeDescriptor, WiringCollection, WiringDocument};

    const SAMPLE_RATE: f32 = 48_000.0;

    fn collection() -> WiringCollection {
        let doc = WiringDocument::new(
            "keys",
            NodeDescriptor::Adsr {
                attack: 0.001,
                decay: 0.01,
                sustain: 0.8,
                release: 0.005,
                input: Box::new(NodeDescriptor::Sine { detune_cents: 0.0 }),
            },
        );
        WiringCollection::load(vec![doc]).unwrap()
    }

    fn instance(collection: &WiringCollection) -> GeneratorInstance {
        let doc = collection.active().unwrap();
        let params = NoteParams {
            frequency: 440.0,
            beats_per_minute: 120.0,
            gain: 1.0,
            sample_rate: SAMPLE_RATE,
        };
        doc.create_generator(params, doc.name(), collection).unwrap()
    }

    #[test]
    fn commands_apply_at_block_boundaries() {
        let collection = collection();
        let (mut control, mut audio) = controller_pair(GenManager::new(SAMPLE_RATE), 64, None);

        let handle = control.start_generator(instance(&collection), 1.0).unwrap();
        assert!(!control.any_playing(), "no block rendered yet");

        let mut buffer = vec![0.0; 512];
        audio.render_block(&mut buffer);
        assert!(control.any_playing());
        assert!(buffer.iter().any(|s| s.abs() > 0.0));

        control.stop_note(handle).unwrap();
        audio.render_block(&mut buffer); // release begins, tail renders out
        control.check_finished_release().unwrap();
        audio.render_block(&mut buffer); // sweep reclaims before mixing
        assert!(!control.any_playing());
    }

    #[test]
    fn controller_declines_past_the_published_limit() {
        let collection = collection();
        let manager = GenManager::with_limit(SAMPLE_RATE, 1, StealPolicy::Reject);
        let (mut control, mut audio) = controller_pair(manager, 64, Some(1));

        control.start_generator(instance(&collection), 1.0).unwrap();
        let mut buffer = vec![0.0; 64];
        audio.render_block(&mut buffer);

        let err = control
            .start_generator(instance(&collection), 1.0)
            .unwrap_err();
        assert!(matches!(err, VoiceError::LimitExceeded { max: 1 }));
    }

    #[test]
    fn burst_of_starts_declines_at_the_limit_before_any_block() {
        let collection = collection();
        let manager = GenManager::with_limit(SAMPLE_RATE, 1, StealPolicy::Reject);
        let (mut control, mut audio) = controller_pair(manager, 64, Some(1));

        // Two starts inside the same block: the first fills the only slot,
        // the second must be declined synchronously, not dropped later.
        let first = control.start_generator(instance(&collection), 1.0).unwrap();
        let err = control
            .start_generator(instance(&collection), 1.0)
            .unwrap_err();
        assert!(matches!(err, VoiceError::LimitExceeded { max: 1 }));

        let mut buffer = vec![0.0; 64];
        audio.render_block(&mut buffer);
        assert_eq!(
            audio.manager().voice_state(first),
            Some(crate::synth::voice::VoiceState::Rendering),
            "the accepted start must survive the block"
        );
        assert_eq!(audio.manager().live_count(), 1);
    }

    #[test]
    fn pending_starts_drain_as_blocks_render() {
        let collection = collection();
        let manager = GenManager::with_limit(SAMPLE_RATE, 1, StealPolicy::Reject);
        let (mut control, mut audio) = controller_pair(manager, 64, Some(1));

        let handle = control.start_generator(instance(&collection), 1.0).unwrap();
        let mut buffer = vec![0.0; 512];
        audio.render_block(&mut buffer);

        // Stop, render the tail out, sweep: the slot frees up again.
        control.stop_note(handle).unwrap();
        audio.render_block(&mut buffer);
        control.check_finished_release().unwrap();
        audio.render_block(&mut buffer);
        assert!(!control.any_playing());

        // With both live and pending back to zero, a new start is accepted.
        let next = control.start_generator(instance(&collection), 1.0).unwrap();
        assert_ne!(handle, next);
    }

    #[test]
    fn handles_allocated_by_controller_are_distinct() {
        let collection = collection();
        let (mut control, _audio) = controller_pair(GenManager::new(SAMPLE_RATE), 64, None);

        let a = control.start_generator(instance(&collection), 1.0).unwrap();
        let b = control.start_generator(instance(&collection), 1.0).unwrap();
        assert_ne!(a, b);
    }
}
