/// Frequency of `note` semitones above A in `octave`.
///
/// Note 0 is A, 1 is A#, 2 is B, 3 is C and so on; octave 4 note 0 is A440.
pub fn note_to_frequency(octave: i32, note: i32) -> f32 {
    let semitones = ((octave - 4) * 12 + note) as f64;
    (440.0 * 2f64.powf(semitones / 12.0)) as f32
}

/// Rows of the letter keyboard, top to bottom, with their octave.
const ROWS: [(i32, &str); 3] = [(3, "qwertyuiop["), (2, "asdfghjkl;'"), (1, "zxcvbnm,./")];

/// Map a typing key to the note it plays.
///
/// Each letter row is one octave of semitones starting at A: QWERTY is
/// octave 3, ASDF octave 2 and ZXCV octave 1. Letters are case-insensitive.
pub fn key_to_frequency(key: char) -> Option<f32> {
    let key = key.to_ascii_lowercase();
    ROWS.iter().find_map(|&(octave, row)| {
        row.chars()
            .position(|c| c == key)
            .map(|note| note_to_frequency(octave, note as i32))
    })
}
