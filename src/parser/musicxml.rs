use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Serialize;

use crate::content::melodies::{midi_from_pitch, note_from_midi};
use crate::error::ContentError;
use crate::melody::{Melody, Note};

#[derive(Serialize, Clone, Debug)]
pub struct ParsedMelody {
    pub title: Option<String>,
    pub melody: Melody,
}

/// Read the first part of a MusicXML score as a single-line melody on the
/// keyboard. Rests are skipped and only the first note of each chord is kept.
pub fn parse_melody(xml: &str, base_octave: i32) -> Result<ParsedMelody, ContentError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut notes: Vec<Note> = Vec::new();
    let mut title: Option<String> = None;

    let mut current_tag: Option<&'static str> = None;
    let mut parts_seen = 0u32;

    // Note state
    let mut in_note = false;
    let mut note_is_rest = false;
    let mut note_is_chord = false;
    let mut step: Option<char> = None;
    let mut alter: i32 = 0;
    let mut octave: Option<i32> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"part" => parts_seen += 1,
                b"note" => {
                    in_note = true;
                    note_is_rest = false;
                    note_is_chord = false;
                    step = None;
                    alter = 0;
                    octave = None;
                }
                b"rest" if in_note => note_is_rest = true,
                b"chord" if in_note => note_is_chord = true,
                b"step" => current_tag = Some("step"),
                b"alter" => current_tag = Some("alter"),
                b"octave" => current_tag = Some("octave"),
                b"movement-title" => current_tag = Some("movement-title"),
                b"work-title" => current_tag = Some("work-title"),
                _ => {}
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"rest" if in_note => note_is_rest = true,
                b"chord" if in_note => note_is_chord = true,
                _ => {}
            },
            Event::Text(e) => {
                if let Some(tag) = current_tag.take() {
                    let text = e.unescape()?;
                    match tag {
                        "step" => step = text.chars().next(),
                        "alter" => {
                            // Microtonal alters like "0.5" round toward the nearest key
                            if let Ok(v) = text.parse::<f64>() {
                                alter = v.round() as i32;
                            }
                        }
                        "octave" => octave = text.parse::<i32>().ok(),
                        "movement-title" | "work-title" => {
                            if title.is_none() {
                                title = Some(text.to_string());
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::End(ref e) => {
                if e.name().as_ref() == b"note" && in_note {
                    in_note = false;
                    if parts_seen <= 1 && !note_is_rest && !note_is_chord {
                        let s = step.ok_or(ContentError::MissingPitch("step"))?;
                        let o = octave.ok_or(ContentError::MissingPitch("octave"))?;
                        notes.push(note_from_midi(midi_from_pitch(s, alter, o), base_octave)?);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(ParsedMelody {
        title,
        melody: Melody::new(notes)?,
    })
}
