//! Pure scoring arithmetic shared by the engine and the UI.

/// Characters per "word" in the standard WPM definition.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Number of positions where `input` agrees with `reference`.
pub fn correct_character_count(input: &[char], reference: &[char]) -> usize {
    input
        .iter()
        .zip(reference.iter())
        .filter(|(typed, expected)| typed == expected)
        .count()
}

/// Words per minute from the correct character count.
///
/// With no elapsed time the divisor falls back to one whole minute, which
/// under-reports during the first second instead of dividing by zero.
pub fn words_per_minute(correct_characters: usize, elapsed_seconds: u64) -> u32 {
    let minutes = match elapsed_seconds {
        0 => 1.0,
        secs => secs as f64 / 60.0,
    };

    (correct_characters as f64 / CHARS_PER_WORD / minutes).floor() as u32
}

/// Share of the reference not spoiled by errors, clamped to `[0, 100]`.
pub fn accuracy_percent(reference_len: usize, error_count: u32) -> f64 {
    if reference_len == 0 {
        return if error_count == 0 { 100.0 } else { 0.0 };
    }

    let len = reference_len as f64;
    let percent = ((len - error_count as f64) / len * 100.0).max(0.0);

    round_to_hundredths(percent)
}

pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
