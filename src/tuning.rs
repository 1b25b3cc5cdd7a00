/*
Pitch-Class Tuning
==================

Converts a musical pitch class plus an octave number into a fundamental
frequency in Hz, using twelve-tone equal temperament anchored at A4 = 440 Hz.

The conversion goes through the MIDI-style semitone index:

    index = 12 * (octave + 1) + semitone
    freq  = 440 * 2^((index - 69) / 12)

so C4 (middle C) is index 60 and A4 is index 69. One octave up doubles the
frequency exactly; one semitone up multiplies by 2^(1/12).

The function is total: any `i32` octave is accepted and produces a finite
frequency (extreme octaves simply land far outside the audible range). No
clamping is applied; callers that want a keyboard-shaped range enforce it
themselves.
*/

/// The twelve semitone names of the chromatic scale.
///
/// Sharps only; flats are the same pitch classes (Db == Cs and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    /// Semitone offset within the octave: C = 0 through B = 11.
    pub fn semitone(self) -> i32 {
        match self {
            PitchClass::C => 0,
            PitchClass::Cs => 1,
            PitchClass::D => 2,
            PitchClass::Ds => 3,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::Fs => 6,
            PitchClass::G => 7,
            PitchClass::Gs => 8,
            PitchClass::A => 9,
            PitchClass::As => 10,
            PitchClass::B => 11,
        }
    }

    /// All twelve pitch classes in ascending order.
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];
}

/// Equal-tempered frequency of a pitch class in a given octave.
///
/// A4 = 440 Hz. Deterministic, no side effects, defined for every input.
pub fn frequency(pitch: PitchClass, octave: i32) -> f32 {
    let index = 12 * (octave + 1) + pitch.semitone();
    440.0 * 2.0_f32.powf((index as f32 - 69.0) / 12.0)
}
