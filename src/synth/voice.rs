use crate::graph::GeneratorInstance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Rendering, // Normal playback
    Releasing, // Stop requested, envelope tail playing out
    Finished,  // Terminal; silent, eligible for reclamation
}

/// Opaque identifier for a live voice.
///
/// Handles are allocated monotonically and never reused, so a stale handle
/// can never alias a newer voice. There is no "no voice" sentinel value;
/// absence is expressed with `Option<VoiceHandle>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceHandle(u64);

impl VoiceHandle {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// One live note under the manager: a generator instance bound to a handle,
/// a velocity gain, and its lifecycle state.
pub struct Voice {
    handle: VoiceHandle,
    instance: GeneratorInstance,
    velocity_gain: f32,
    state: VoiceState,
    age: u64,
}

impl Voice {
    pub(crate) fn new(
        handle: VoiceHandle,
        instance: GeneratorInstance,
        velocity_gain: f32,
        age: u64,
    ) -> Self {
        Self {
            handle,
            instance,
            velocity_gain,
            state: VoiceState::Rendering,
            age,
        }
    }

    pub fn handle(&self) -> VoiceHandle {
        self.handle
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub(crate) fn age(&self) -> u64 {
        self.age
    }

    pub(crate) fn velocity_gain(&self) -> f32 {
        self.velocity_gain
    }

    pub(crate) fn instance_mut(&mut self) -> &mut GeneratorInstance {
        &mut self.instance
    }

    /// Graceful stop: begin the release tail.
    pub(crate) fn stop(&mut self) {
        if self.state == VoiceState::Rendering {
            self.state = VoiceState::Releasing;
            self.instance.release();
        }
    }

    /// Emergency stop: silence immediately, skipping the tail.
    pub(crate) fn force_finish(&mut self) {
        self.state = VoiceState::Finished;
    }

    /// Promote `Releasing` to `Finished` once the instance's tail has fully
    /// decayed. Returns true if the voice just finished.
    pub(crate) fn settle(&mut self) -> bool {
        if self.state == VoiceState::Releasing && self.instance.is_finished() {
            self.state = VoiceState::Finished;
            return true;
        }
        false
    }
}
