// Tonality and pitch naming.
//
// The composer works in one of two modes, major or minor, which selects the
// scale-interval table used for roots (progression.rs) and which pair of
// diatonic chord tables applies (config.rs). This module also provides note
// names for parsing user input (`--key c#`) and for printing keys.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Major or minor tonality of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    pub fn from_is_major(is_major: bool) -> Self {
        if is_major { Mode::Major } else { Mode::Minor }
    }

    pub fn is_major(self) -> bool {
        self == Mode::Major
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Major => write!(f, "major"),
            Mode::Minor => write!(f, "minor"),
        }
    }
}

/// A spelled pitch name. Enharmonic spellings are distinct names that map
/// to the same pitch class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteName {
    C,
    CSharp,
    DFlat,
    D,
    DSharp,
    EFlat,
    E,
    F,
    FSharp,
    GFlat,
    G,
    GSharp,
    AFlat,
    A,
    ASharp,
    BFlat,
    B,
}

impl NoteName {
    /// Pitch class, C = 0.
    pub fn pitch_class(self) -> i32 {
        match self {
            NoteName::C => 0,
            NoteName::CSharp | NoteName::DFlat => 1,
            NoteName::D => 2,
            NoteName::DSharp | NoteName::EFlat => 3,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::FSharp | NoteName::GFlat => 6,
            NoteName::G => 7,
            NoteName::GSharp | NoteName::AFlat => 8,
            NoteName::A => 9,
            NoteName::ASharp | NoteName::BFlat => 10,
            NoteName::B => 11,
        }
    }
}

/// Error returned when a string is not a recognised note name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown note name '{0}'")]
pub struct ParseNoteNameError(String);

impl FromStr for NoteName {
    type Err = ParseNoteNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = match s.trim().to_lowercase().as_str() {
            "c" => NoteName::C,
            "c#" => NoteName::CSharp,
            "db" => NoteName::DFlat,
            "d" => NoteName::D,
            "d#" => NoteName::DSharp,
            "eb" => NoteName::EFlat,
            "e" => NoteName::E,
            "f" => NoteName::F,
            "f#" => NoteName::FSharp,
            "gb" => NoteName::GFlat,
            "g" => NoteName::G,
            "g#" => NoteName::GSharp,
            "ab" => NoteName::AFlat,
            "a" => NoteName::A,
            "a#" => NoteName::ASharp,
            "bb" => NoteName::BFlat,
            "b" => NoteName::B,
            _ => return Err(ParseNoteNameError(s.to_string())),
        };
        Ok(name)
    }
}

/// Display name of a pitch class (sharps for black keys, except Eb and Bb).
pub fn pitch_name(pitch: i32) -> &'static str {
    match pitch.rem_euclid(12) {
        0 => "C",
        1 => "C#",
        2 => "D",
        3 => "Eb",
        4 => "E",
        5 => "F",
        6 => "F#",
        7 => "G",
        8 => "Ab",
        9 => "A",
        10 => "Bb",
        _ => "B",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(Mode::from_is_major(true), Mode::Major);
        assert_eq!(Mode::from_is_major(false), Mode::Minor);
        assert!(Mode::Major.is_major());
        assert!(!Mode::Minor.is_major());
    }

    #[test]
    fn test_parse_note_names() {
        assert_eq!("C".parse::<NoteName>().unwrap(), NoteName::C);
        assert_eq!("c#".parse::<NoteName>().unwrap().pitch_class(), 1);
        assert_eq!("Db".parse::<NoteName>().unwrap().pitch_class(), 1);
        assert_eq!(" bb ".parse::<NoteName>().unwrap().pitch_class(), 10);
        assert_eq!("b".parse::<NoteName>().unwrap().pitch_class(), 11);
        assert!("h".parse::<NoteName>().is_err());
        assert!("".parse::<NoteName>().is_err());
    }

    #[test]
    fn test_pitch_name_wraps() {
        assert_eq!(pitch_name(0), "C");
        assert_eq!(pitch_name(24), "C");
        assert_eq!(pitch_name(31), "G");
        assert_eq!(pitch_name(-1), "B");
        assert_eq!(pitch_name(10), "Bb");
    }
}
