//! Key name classification for the keyboard half of the input protocol.
//!
//! Keys arrive on the wire as names (`"a"`, `"Shift"`, `"PageUp"`, `"F11"`).
//! The decoder classifies each name into one of four classes, checked in this
//! order: printable character, modifier, special key, unknown.

use once_cell::sync::Lazy;
use regex::Regex;

static PRINTABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r##"^[0-9A-Za-z)!@#$%^&*(:+<_>?~{|}";=,\-./`\[\\\]']$"##)
        .expect("printable key pattern is valid")
});

static MODIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(Command|Cmd|Control|Ctrl|CommandOrControl|CmdOrCtrl|Alt|Option|AltGr|Shift|Super)$",
    )
    .expect("modifier key pattern is valid")
});

static LOWERCASE_LETTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]$").expect("lowercase letter pattern is valid"));

// Suffix match: only the end of the name is anchored.
static SPECIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(F1*[1-9]|F10|F2[0-4]|Plus|Space|Tab|Backspace|Delete|Insert|Return|Enter|Up|Down|Left|Right|Home|End|PageUp|PageDown|Escape|Esc|VolumeUp|VolumeDown|VolumeMute|MediaNextTrack|MediaPreviousTrack|MediaStop|MediaPlayPause|PrintScreen)$",
    )
    .expect("special key pattern is valid")
});

/// Classification of a wire key name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// A single letter, digit, or punctuation character.
    Printable,
    /// Shift, Control, Alt, Command, Super and their aliases.
    Modifier,
    /// Function keys, navigation keys, Enter, Escape, media keys.
    Special,
    Unknown,
}

/// Classifies `key`. Precedence is printable, then modifier, then special.
pub fn classify(key: &str) -> KeyClass {
    if PRINTABLE.is_match(key) {
        KeyClass::Printable
    } else if MODIFIER.is_match(key) {
        KeyClass::Modifier
    } else if SPECIAL.is_match(key) {
        KeyClass::Special
    } else {
        KeyClass::Unknown
    }
}

/// Whether a printable key is replayed with Shift held: everything except a
/// single lowercase ASCII letter, so `"A"`, `"1"` and `"?"` all carry it.
pub fn printable_needs_shift(key: &str) -> bool {
    !LOWERCASE_LETTER.is_match(key)
}

/// First character uppercased, the rest lowercased: `"PageUp"` becomes
/// `"Pageup"`, `"shift"` becomes `"Shift"`.
pub fn cased_key_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_digits_and_punctuation_are_printable() {
        for key in ["a", "Z", "0", "9", "!", "\"", "'", "[", "]", "\\", "`", "-", "~"] {
            assert_eq!(classify(key), KeyClass::Printable, "key {key:?}");
        }
    }

    #[test]
    fn test_multi_character_names_are_not_printable() {
        assert_ne!(classify("ab"), KeyClass::Printable);
        assert_ne!(classify(" "), KeyClass::Printable);
        assert_eq!(classify(""), KeyClass::Unknown);
    }

    #[test]
    fn test_modifier_names_are_modifiers() {
        for key in ["Shift", "Control", "Ctrl", "Alt", "AltGr", "Option", "Command", "Super"] {
            assert_eq!(classify(key), KeyClass::Modifier, "key {key:?}");
        }
    }

    #[test]
    fn test_modifier_match_is_exact() {
        assert_eq!(classify("LeftShift"), KeyClass::Unknown);
        assert_eq!(classify("shift"), KeyClass::Unknown);
    }

    #[test]
    fn test_function_keys_are_special() {
        for key in ["F1", "F9", "F10", "F11", "F19", "F20", "F24"] {
            assert_eq!(classify(key), KeyClass::Special, "key {key:?}");
        }
        assert_eq!(classify("F25"), KeyClass::Unknown);
    }

    #[test]
    fn test_special_pattern_matches_name_suffix() {
        assert_eq!(classify("PageUp"), KeyClass::Special);
        assert_eq!(classify("ArrowUp"), KeyClass::Special);
        assert_eq!(classify("NumpadEnter"), KeyClass::Special);
        assert_eq!(classify("MediaPlayPause"), KeyClass::Special);
    }

    #[test]
    fn test_unrecognised_names_are_unknown() {
        assert_eq!(classify("Dead"), KeyClass::Unknown);
        assert_eq!(classify("CapsLock"), KeyClass::Unknown);
    }

    #[test]
    fn test_shift_applies_to_every_printable_but_lowercase_letters() {
        for key in ["A", "Z", "0", "9", "!", "?", "~", "-"] {
            assert!(printable_needs_shift(key), "key {key:?}");
        }
        for key in ["a", "m", "z"] {
            assert!(!printable_needs_shift(key), "key {key:?}");
        }
    }

    #[test]
    fn test_cased_key_name() {
        assert_eq!(cased_key_name("shift"), "Shift");
        assert_eq!(cased_key_name("PageUp"), "Pageup");
        assert_eq!(cased_key_name("F1"), "F1");
        assert_eq!(cased_key_name(""), "");
    }
}
