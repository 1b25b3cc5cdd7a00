// Purpose: voice lifecycle and polyphony
// This layer sits above compiled generators and manages many of them at once

pub mod manager;
#[cfg(feature = "rtrb")]
pub mod message;
pub mod voice;

pub use manager::{GenManager, StealPolicy, VoiceError};
#[cfg(feature = "rtrb")]
pub use message::{controller_pair, VoiceCommand, VoiceController, VoiceRenderer};
pub use voice::{Voice, VoiceHandle, VoiceState};
