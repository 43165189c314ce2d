//! International morse encoding and pulse scheduling.
//!
//! A message encodes to a string of `.`, `-`, and space symbols; letters
//! are joined by single spaces and a space in the message widens the gap.
//! The pulse schedule maps dashes to two time units and dots to one;
//! gap symbols fire no pulse but still advance the schedule clock by one
//! unit.

use blink1_hw::Rgb;

/// Color used for morse pulses.
pub const PULSE_COLOR: Rgb = Rgb::new(0xEE, 0xEE, 0xEE);

/// One scheduled pulse, relative to the start of the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub offset_ms: u64,
    pub duration_ms: u64,
}

/// Encodes a message into morse symbols.
///
/// Characters without a morse encoding are dropped.
pub fn encode(message: &str) -> String {
    let mut codes: Vec<&str> = Vec::new();
    for c in message.chars() {
        if c == ' ' {
            codes.push("");
        } else if let Some(code) = char_code(c.to_ascii_lowercase()) {
            codes.push(code);
        }
    }
    codes.join(" ")
}

/// Interval weight of one encoded symbol.
fn symbol_weight(symbol: char) -> u64 {
    match symbol {
        '-' => 2,
        '.' => 1,
        _ => 0,
    }
}

/// Computes the pulse schedule for an encoded message.
///
/// The first symbol pulses immediately, even at weight zero (a 0 ms
/// pulse). Each later symbol advances the clock by the previous symbol's
/// weighted duration, or by one unit when that is zero, and pulses only
/// if its own weight is nonzero.
pub fn pulse_schedule(code: &str, unit_ms: u64) -> Vec<Pulse> {
    let symbols: Vec<char> = code.chars().collect();
    let Some(&first) = symbols.first() else {
        return Vec::new();
    };

    let mut pulses = vec![Pulse {
        offset_ms: 0,
        duration_ms: symbol_weight(first) * unit_ms,
    }];

    let mut offset_ms = 0;
    for i in 1..symbols.len() {
        let prev_ms = symbol_weight(symbols[i - 1]) * unit_ms;
        offset_ms += if prev_ms == 0 { unit_ms } else { prev_ms };

        let weight = symbol_weight(symbols[i]);
        if weight > 0 {
            pulses.push(Pulse {
                offset_ms,
                duration_ms: weight * unit_ms,
            });
        }
    }
    pulses
}

/// Morse code for a single (lowercased) character.
fn char_code(c: char) -> Option<&'static str> {
    let code = match c {
        'a' => ".-",
        'b' => "-...",
        'c' => "-.-.",
        'd' => "-..",
        'e' => ".",
        'f' => "..-.",
        'g' => "--.",
        'h' => "....",
        'i' => "..",
        'j' => ".---",
        'k' => "-.-",
        'l' => ".-..",
        'm' => "--",
        'n' => "-.",
        'o' => "---",
        'p' => ".--.",
        'q' => "--.-",
        'r' => ".-.",
        's' => "...",
        't' => "-",
        'u' => "..-",
        'v' => "...-",
        'w' => ".--",
        'x' => "-..-",
        'y' => "-.--",
        'z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        '.' => ".-.-.-",
        ',' => "--..--",
        '?' => "..--..",
        '\'' => ".----.",
        '!' => "-.-.--",
        '/' => "-..-.",
        '(' => "-.--.",
        ')' => "-.--.-",
        '&' => ".-...",
        ':' => "---...",
        ';' => "-.-.-.",
        '=' => "-...-",
        '+' => ".-.-.",
        '-' => "-....-",
        '_' => "..--.-",
        '"' => ".-..-.",
        '$' => "...-..-",
        '@' => ".--.-.",
        _ => return None,
    };
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_sos() {
        assert_eq!(encode("sos"), "... --- ...");
        assert_eq!(encode("SOS"), "... --- ...");
    }

    #[test]
    fn test_encode_with_punctuation_and_spaces() {
        assert_eq!(
            encode("Hello, world"),
            ".... . .-.. .-.. --- --..--  .-- --- .-. .-.. -.."
        );
    }

    #[test]
    fn test_encode_drops_unknown() {
        assert_eq!(encode("a~b"), ".- -...");
        assert_eq!(encode("~~~"), "");
    }

    #[test]
    fn test_schedule_sos() {
        let unit = 400;
        let pulses = pulse_schedule(&encode("sos"), unit);

        // 3 dots, 3 dashes, 3 dots; gaps fire nothing
        assert_eq!(pulses.len(), 9);

        // dots at the start, one unit each
        assert_eq!(pulses[0], Pulse { offset_ms: 0, duration_ms: 400 });
        assert_eq!(pulses[1], Pulse { offset_ms: 400, duration_ms: 400 });
        assert_eq!(pulses[2], Pulse { offset_ms: 800, duration_ms: 400 });

        // the letter gap advances the clock by a unit before the dashes
        assert_eq!(pulses[3], Pulse { offset_ms: 1600, duration_ms: 800 });
        assert_eq!(pulses[4], Pulse { offset_ms: 2400, duration_ms: 800 });
        assert_eq!(pulses[5], Pulse { offset_ms: 3200, duration_ms: 800 });

        // dashes last twice as long as dots
        assert_eq!(pulses[3].duration_ms, 2 * pulses[0].duration_ms);

        // trailing dots after the second gap
        assert_eq!(pulses[6], Pulse { offset_ms: 4400, duration_ms: 400 });
        assert_eq!(pulses[7], Pulse { offset_ms: 4800, duration_ms: 400 });
        assert_eq!(pulses[8], Pulse { offset_ms: 5200, duration_ms: 400 });
    }

    #[test]
    fn test_schedule_leading_gap_pulses_zero() {
        let pulses = pulse_schedule(" .", 400);
        assert_eq!(pulses[0], Pulse { offset_ms: 0, duration_ms: 0 });
        assert_eq!(pulses[1], Pulse { offset_ms: 400, duration_ms: 400 });
    }

    #[test]
    fn test_schedule_empty() {
        assert!(pulse_schedule("", 400).is_empty());
    }
}
