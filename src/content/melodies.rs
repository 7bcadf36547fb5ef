use serde::Serialize;

use crate::error::ContentError;
use crate::melody::{Melody, Note};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Opening of *Für Elise* as laid out on the two-octave keyboard.
pub const FUR_ELISE: [&str; 35] = [
    "E2", "D#2", "E2", "D#2", "E2", "B", "D2", "C2", "A", "C", "E", "A", "B", "E", "G#", "B",
    "C2", "E", "E2", "D#2", "E2", "D#2", "E2", "B", "D2", "C2", "A", "C", "E", "A", "B", "E",
    "C2", "B", "A",
];

pub const WHITE_KEYS: [&str; 10] = ["C", "D", "E", "F", "G", "A", "B", "C2", "D2", "E2"];
pub const BLACK_KEYS: [&str; 7] = ["C#", "D#", "F#", "G#", "A#", "C#2", "D#2"];

/// White-key slots that carry a black key to their right.
pub const BLACK_KEY_SLOTS: [usize; 7] = [0, 1, 3, 4, 5, 7, 8];

/// How many times the performance stage plays the melody back to back.
pub const PERFORMANCE_REPEATS: usize = 2;

pub fn fur_elise() -> Melody {
    Melody::from_table(&FUR_ELISE)
}

#[derive(Serialize, Clone, Debug)]
pub struct KeyboardKey {
    pub note: Note,
    pub black: bool,
    /// White keys: their own slot. Black keys: the white slot they sit after.
    pub slot: usize,
}

pub fn keyboard_layout() -> Vec<KeyboardKey> {
    let whites = WHITE_KEYS.iter().enumerate().map(|(slot, name)| KeyboardKey {
        note: Note::from(*name),
        black: false,
        slot,
    });
    let blacks = BLACK_KEYS
        .iter()
        .zip(BLACK_KEY_SLOTS.iter())
        .map(|(name, slot)| KeyboardKey {
            note: Note::from(*name),
            black: true,
            slot: *slot,
        });
    whites.chain(blacks).collect()
}

pub fn midi_from_pitch(step: char, alter: i32, octave: i32) -> i32 {
    let base = match step {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => 0,
    };
    (octave + 1) * 12 + base + alter
}

/// Name a MIDI pitch the way the keyboard labels it. The octave starting at
/// `base_octave` has bare names ("C", "D#"), the one above is suffixed "2".
/// Flats come out as the equivalent sharp. Pitches with no key (below C or
/// above E2) are rejected.
pub fn note_from_midi(midi: i32, base_octave: i32) -> Result<Note, ContentError> {
    let name = NOTE_NAMES[midi.rem_euclid(12) as usize];
    let octave = midi.div_euclid(12) - 1;
    let note = match octave - base_octave {
        0 => Note::new(name),
        1 => Note::new(format!("{}2", name)),
        _ => return Err(ContentError::OffKeyboard { midi, base_octave }),
    };
    if on_keyboard(&note) {
        Ok(note)
    } else {
        Err(ContentError::OffKeyboard { midi, base_octave })
    }
}

pub fn on_keyboard(note: &Note) -> bool {
    WHITE_KEYS
        .iter()
        .chain(BLACK_KEYS.iter())
        .any(|key| *key == note.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fur_elise_shape() {
        let m = fur_elise();
        assert_eq!(m.len(), 35);
        assert_eq!(m.notes()[0].as_str(), "E2");
        assert_eq!(m.notes()[34].as_str(), "A");
        assert_eq!(m.repeated(PERFORMANCE_REPEATS).len(), 70);
    }

    #[test]
    fn test_melody_only_uses_keyboard_keys() {
        let keys: Vec<Note> = keyboard_layout().into_iter().map(|k| k.note).collect();
        for note in fur_elise().notes() {
            assert!(keys.contains(note), "{} is not on the keyboard", note);
        }
    }

    #[test]
    fn test_keyboard_layout() {
        let layout = keyboard_layout();
        assert_eq!(layout.len(), 17);
        assert_eq!(layout.iter().filter(|k| k.black).count(), 7);
        for key in &layout {
            assert_eq!(key.black, key.note.is_black());
        }
    }

    #[test]
    fn test_note_from_midi() {
        // A4 = 69, E5 = 76, D#5 = 75 with the keyboard starting at octave 4
        assert_eq!(note_from_midi(69, 4).unwrap().as_str(), "A");
        assert_eq!(note_from_midi(76, 4).unwrap().as_str(), "E2");
        assert_eq!(note_from_midi(75, 4).unwrap().as_str(), "D#2");
        assert_eq!(note_from_midi(midi_from_pitch('E', -1, 5), 4).unwrap().as_str(), "D#2");
        assert!(matches!(
            note_from_midi(59, 4),
            Err(ContentError::OffKeyboard { midi: 59, .. })
        ));
        // F5 and C6 have no key above E2
        assert!(matches!(
            note_from_midi(77, 4),
            Err(ContentError::OffKeyboard { midi: 77, .. })
        ));
        assert!(note_from_midi(84, 4).is_err());
    }

    #[test]
    fn test_every_key_round_trips_through_midi() {
        for midi in 60..=76 {
            let note = note_from_midi(midi, 4).unwrap();
            assert!(on_keyboard(&note), "{} is not on the keyboard", note);
        }
        assert!(!on_keyboard(&Note::from("F2")));
    }
}
