//! Labeled form controls for dimension-region parameters
//!
//! Small view functions pairing a fixed-width label with an input widget, so
//! editor panes line up into columns of controls. Each takes a callback
//! closure and returns `Element<Message>`.

use iced::widget::{checkbox, pick_list, row, slider, text};
use iced::{Alignment, Element, Length};

/// Label column width, matches the chooser's label gutter
const LABEL_WIDTH: f32 = 90.0;

/// Width of the value readout next to a slider
const VALUE_WIDTH: f32 = 42.0;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Display name of a MIDI note, octave -1 at note 0 (so note 60 is "C4")
pub fn note_name(note: u8) -> String {
    let octave = note as i32 / 12 - 1;
    format!("{}{}", NOTE_NAMES[note as usize % 12], octave)
}

/// Parse a note name back into a MIDI note number
pub fn parse_note(s: &str) -> Option<u8> {
    let s = s.trim();
    let split = s
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit() || *c == '-')
        .map(|(i, _)| i)?;
    let (name, octave) = s.split_at(split);
    let semitone = NOTE_NAMES
        .iter()
        .position(|n| n.eq_ignore_ascii_case(name))? as i32;
    let octave: i32 = octave.parse().ok()?;
    let note = (octave + 1) * 12 + semitone;
    u8::try_from(note).ok().filter(|&n| n <= 127)
}

/// Labeled 0..=127 slider with a numeric readout
pub fn num_entry<'a, Message: Clone + 'a>(
    label: &'a str,
    value: u8,
    on_change: impl Fn(u8) -> Message + 'a,
) -> Element<'a, Message> {
    row![
        text(label).width(Length::Fixed(LABEL_WIDTH)).size(12),
        slider(0..=127u8, value, on_change),
        text(value.to_string())
            .width(Length::Fixed(VALUE_WIDTH))
            .size(12),
    ]
    .spacing(6)
    .align_y(Alignment::Center)
    .into()
}

/// Labeled note slider, readout shows the note name instead of the number
pub fn note_entry<'a, Message: Clone + 'a>(
    label: &'a str,
    value: u8,
    on_change: impl Fn(u8) -> Message + 'a,
) -> Element<'a, Message> {
    row![
        text(label).width(Length::Fixed(LABEL_WIDTH)).size(12),
        slider(0..=127u8, value, on_change),
        text(note_name(value))
            .width(Length::Fixed(VALUE_WIDTH))
            .size(12),
    ]
    .spacing(6)
    .align_y(Alignment::Center)
    .into()
}

/// Labeled checkbox
pub fn bool_entry<'a, Message: Clone + 'a>(
    label: &'a str,
    value: bool,
    on_toggle: impl Fn(bool) -> Message + 'a,
) -> Element<'a, Message> {
    row![
        text(label).width(Length::Fixed(LABEL_WIDTH)).size(12),
        checkbox(value).on_toggle(on_toggle),
    ]
    .spacing(6)
    .align_y(Alignment::Center)
    .into()
}

/// Labeled drop-down over a fixed option list
pub fn choice_entry<'a, T, Message>(
    label: &'a str,
    options: &'a [T],
    selected: Option<T>,
    on_select: impl Fn(T) -> Message + 'a,
) -> Element<'a, Message>
where
    T: ToString + PartialEq + Clone + 'a,
    Message: Clone + 'a,
{
    row![
        text(label).width(Length::Fixed(LABEL_WIDTH)).size(12),
        pick_list(options, selected, on_select).text_size(12),
    ]
    .spacing(6)
    .align_y(Alignment::Center)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_names() {
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(127), "G9");
    }

    #[test]
    fn test_parse_note_roundtrip() {
        for note in [0u8, 11, 12, 35, 60, 61, 99, 127] {
            assert_eq!(parse_note(&note_name(note)), Some(note));
        }
    }

    #[test]
    fn test_parse_note_rejects_garbage() {
        assert_eq!(parse_note(""), None);
        assert_eq!(parse_note("H4"), None);
        assert_eq!(parse_note("C"), None);
        assert_eq!(parse_note("G10"), None);
    }
}
