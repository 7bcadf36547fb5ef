use thiserror::Error;

/// Failures while building lesson content. The running tutorial itself never
/// fails; these only surface when constructing melodies or parsing host input.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("melody has no notes")]
    EmptyMelody,

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("note is missing its {0}")]
    MissingPitch(&'static str),

    #[error("MIDI note {midi} is outside the keyboard starting at octave {base_octave}")]
    OffKeyboard { midi: i32, base_octave: i32 },

    #[error("unknown choice: {0}")]
    UnknownChoice(String),
}
