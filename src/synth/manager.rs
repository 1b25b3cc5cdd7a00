use log::{debug, warn};
use thiserror::Error;

use crate::graph::GeneratorInstance;
use crate::synth::voice::{Voice, VoiceHandle, VoiceState};
use crate::MAX_BLOCK_SIZE;

/*
Voice Manager
=============

Owns every live generator instance, keyed by handle, and drives them through
the Rendering → Releasing → Finished lifecycle.

Two execution contexts touch a manager in a real deployment: the audio
callback pulls `render_block`, and the control tick calls everything else.
The manager itself is single-threaded; the `message` module provides the
lock-free command-queue split that applies control calls at block boundaries.

The rendering hot path never allocates or frees. Voice memory is allocated in
`start_generator` and dropped only in `check_finished_release` — the explicit
once-per-tick reclamation sweep. A voice that finishes (naturally or by force)
goes silent immediately but keeps its slot until the next sweep; the sweep is
the single place slots are returned for reuse.
*/

/// Errors from voice-manager control operations.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// The configured voice ceiling is reached and the policy declined to
    /// steal. Recoverable: the note simply does not start.
    #[error("voice limit of {max} reached; note declined")]
    LimitExceeded {
        /// The configured maximum number of concurrent voices.
        max: usize,
    },

    /// The control→audio command queue is full (queue-split deployments).
    #[error("voice command queue is full")]
    QueueFull,
}

/// What to do when a note starts while the voice ceiling is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StealPolicy {
    /// Decline the new note. Avoids audible artifacts on existing voices.
    #[default]
    Reject,
    /// Force-finish the oldest voice already in its release tail; decline
    /// if no voice is releasing.
    OldestReleasing,
    /// Force-finish the oldest voice outright.
    Oldest,
}

pub struct GenManager {
    slots: Vec<Option<Voice>>,
    next_handle: u64,
    max_voices: Option<usize>,
    steal: StealPolicy,
    scratch: Vec<f32>,
    frame_counter: u64,
    sample_rate: f32,
}

impl GenManager {
    /// A manager with no voice ceiling.
    ///
    /// `sample_rate` must match the rate every started instance was compiled
    /// for; mismatches shift pitch and timing (caller precondition, not
    /// validated here).
    pub fn new(sample_rate: f32) -> Self {
        Self {
            slots: Vec::new(),
            next_handle: 0,
            max_voices: None,
            steal: StealPolicy::Reject,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            frame_counter: 0,
            sample_rate,
        }
    }

    /// A manager that refuses (or steals, per `steal`) beyond `max_voices`
    /// concurrent non-finished voices.
    pub fn with_limit(sample_rate: f32, max_voices: usize, steal: StealPolicy) -> Self {
        Self {
            max_voices: Some(max_voices),
            steal,
            slots: Vec::with_capacity(max_voices),
            ..Self::new(sample_rate)
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Number of voices not yet `Finished`.
    pub fn live_count(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|voice| voice.state() != VoiceState::Finished)
            .count()
    }

    /// True iff at least one voice is not `Finished`.
    pub fn any_playing(&self) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|voice| voice.state() != VoiceState::Finished)
    }

    /// State of a voice, or `None` if the handle was already reclaimed.
    pub fn voice_state(&self, handle: VoiceHandle) -> Option<VoiceState> {
        self.find(handle).map(Voice::state)
    }

    /// Register a compiled instance as a new voice and start rendering it.
    ///
    /// `velocity_gain` multiplies on top of the instance's own gain
    /// (reserved for input velocity, e.g. from a MIDI source). Allocation
    /// happens here, never on the render path.
    pub fn start_generator(
        &mut self,
        instance: GeneratorInstance,
        velocity_gain: f32,
    ) -> Result<VoiceHandle, VoiceError> {
        let handle = VoiceHandle::new(self.next_handle);
        self.next_handle += 1;
        self.start_assigned(instance, velocity_gain, handle)
    }

    /// Like `start_generator` with a caller-allocated handle. Used by the
    /// command-queue split, where the control side hands out handles before
    /// the audio side applies the start.
    pub fn start_assigned(
        &mut self,
        instance: GeneratorInstance,
        velocity_gain: f32,
        handle: VoiceHandle,
    ) -> Result<VoiceHandle, VoiceError> {
        if let Some(max) = self.max_voices {
            if self.live_count() >= max && !self.try_steal() {
                warn!("voice limit {max} reached; declining note");
                return Err(VoiceError::LimitExceeded { max });
            }
        }

        // Keep handle allocation monotonic even when handles arrive
        // preassigned from the control side.
        self.next_handle = self.next_handle.max(handle.raw() + 1);

        let voice = Voice::new(handle, instance, velocity_gain, self.frame_counter);
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => *slot = Some(voice),
            None => self.slots.push(Some(voice)),
        }

        debug!("voice {} started", handle.raw());
        Ok(handle)
    }

    /// Graceful note-off by handle.
    ///
    /// A stale handle (already reclaimed by the sweep) is a no-op, not an
    /// error: the stop racing the reclamation sweep is expected.
    pub fn stop_note(&mut self, handle: VoiceHandle) {
        match self.find_mut(handle) {
            Some(voice) => {
                voice.stop();
                debug!("voice {} releasing", handle.raw());
            }
            None => debug!("stop for stale voice handle {}; ignored", handle.raw()),
        }
    }

    /// Emergency stop: every voice is silenced immediately, bypassing its
    /// release tail. Slots are reclaimed by the next sweep.
    pub fn stop_all_notes(&mut self) {
        for voice in self.slots.iter_mut().flatten() {
            voice.force_finish();
        }
        debug!("all voices force-stopped");
    }

    /// The once-per-tick maintenance sweep.
    ///
    /// Promotes `Releasing` voices whose tail has decayed to `Finished`, and
    /// reclaims every `Finished` slot. This is the only place voice memory
    /// is dropped, keeping deallocation off the audio callback.
    pub fn check_finished_release(&mut self) {
        for slot in &mut self.slots {
            if let Some(voice) = slot {
                voice.settle();
                if voice.state() == VoiceState::Finished {
                    debug!("voice {} reclaimed", voice.handle().raw());
                    *slot = None;
                }
            }
        }
    }

    /// Mix every non-finished voice's next block into `out`.
    ///
    /// Sample-wise sum, each voice scaled by its velocity gain. Runs on the
    /// audio callback cadence; allocation-free.
    pub fn render_block(&mut self, out: &mut [f32]) {
        debug_assert!(out.len() <= MAX_BLOCK_SIZE);

        out.fill(0.0);
        for voice in self.slots.iter_mut().flatten() {
            if voice.state() == VoiceState::Finished {
                continue;
            }

            let scratch = &mut self.scratch[..out.len()];
            scratch.fill(0.0);
            voice.instance_mut().advance(scratch);

            let gain = voice.velocity_gain();
            for (o, s) in out.iter_mut().zip(scratch.iter()) {
                *o += s * gain;
            }
        }

        self.frame_counter += out.len() as u64;
    }

    fn find(&self, handle: VoiceHandle) -> Option<&Voice> {
        self.slots
            .iter()
            .flatten()
            .find(|voice| voice.handle() == handle)
    }

    fn find_mut(&mut self, handle: VoiceHandle) -> Option<&mut Voice> {
        self.slots
            .iter_mut()
            .flatten()
            .find(|voice| voice.handle() == handle)
    }

    /// Apply the steal policy. Returns true if a slot was freed.
    fn try_steal(&mut self) -> bool {
        let candidate = match self.steal {
            StealPolicy::Reject => None,
            StealPolicy::OldestReleasing => self
                .slots
                .iter()
                .flatten()
                .filter(|voice| voice.state() == VoiceState::Releasing)
                .min_by_key(|voice| voice.age())
                .map(Voice::handle),
            StealPolicy::Oldest => self
                .slots
                .iter()
                .flatten()
                .filter(|voice| voice.state() != VoiceState::Finished)
                .min_by_key(|voice| voice.age())
                .map(Voice::handle),
        };

        match candidate {
            Some(handle) => {
                debug!("stealing voice {}", handle.raw());
                for slot in &mut self.slots {
                    if slot.as_ref().is_some_and(|voice| voice.handle() == handle) {
                        *slot = None;
                        return true;
                    }
                }
                false
            }
            None => false,
        }
    }
}
