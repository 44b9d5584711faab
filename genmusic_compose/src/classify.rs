// Chord quality inference by interval analysis.
//
// Each note's pitch class is measured against the chord root, the intervals
// are sorted into third / fifth / sixth / seventh slots, and a small decision
// tree maps the slots to a `ChordQuality`.
//
// Two quirks of the interval table are kept as they are, because stored
// scores and tests depend on the exact classifications:
// - A pitch class 7 above the root fills the fifth slot as `Fifth::Diminished`.
//   There is no separate perfect-fifth marker, so every triad with a perfect
//   fifth reads as having a "diminished" fifth. Minor triads therefore
//   classify as `Diminished`.
// - Pitch class 10 is claimed by the sixth slot (`Sixth::Minor`) before the
//   seventh slot is consulted, so `Seventh::Minor` is never detected and the
//   dominant / minor-seventh branches below are unreachable from real notes.
//
// The classifier is independent of the quality a chord builder declares, and
// the two are allowed to disagree (see progression.rs).

use crate::note::{ChordQuality, Note};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Third {
    Minor,
    Major,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fifth {
    Diminished,
    Augmented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sixth {
    Major,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seventh {
    Minor,
    Major,
}

/// Which interval slots a note set fills, relative to its first note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalProfile {
    pub third: Option<Third>,
    pub fifth: Option<Fifth>,
    pub sixth: Option<Sixth>,
    pub seventh: Option<Seventh>,
}

impl IntervalProfile {
    /// Analyse `notes`, taking `notes[0]` as the root. Later notes overwrite
    /// earlier ones that land in the same slot.
    pub fn analyze(notes: &[Note]) -> Self {
        let mut profile = IntervalProfile::default();
        let Some(root) = notes.first() else {
            return profile;
        };
        for note in notes {
            match (note.pitch - root.pitch).rem_euclid(12) {
                3 => profile.third = Some(Third::Minor),
                4 => profile.third = Some(Third::Major),
                7 => profile.fifth = Some(Fifth::Diminished),
                8 => profile.fifth = Some(Fifth::Augmented),
                9 => profile.sixth = Some(Sixth::Major),
                // 10 also names a minor seventh, but the sixth slot owns it.
                10 => profile.sixth = Some(Sixth::Minor),
                11 => profile.seventh = Some(Seventh::Major),
                _ => {}
            }
        }
        profile
    }

    /// Map the filled slots to a quality. Falls back to `Major` when no
    /// third is present.
    pub fn quality(&self) -> ChordQuality {
        match self.third {
            Some(Third::Major) if self.fifth == Some(Fifth::Augmented) => ChordQuality::Augmented,
            Some(Third::Major) => match (self.seventh, self.sixth) {
                (Some(Seventh::Major), _) => ChordQuality::MajorSeventh,
                (Some(Seventh::Minor), Some(Sixth::Major)) => ChordQuality::DominantThirteenth,
                (Some(Seventh::Minor), _) => ChordQuality::DominantSeventh,
                (None, _) => ChordQuality::Major,
            },
            Some(Third::Minor) if self.fifth == Some(Fifth::Diminished) => {
                match (self.seventh, self.sixth) {
                    (Some(Seventh::Minor), _) => ChordQuality::HalfDiminishedSeventh,
                    (_, Some(Sixth::Major)) => ChordQuality::DiminishedSeventh,
                    _ => ChordQuality::Diminished,
                }
            }
            Some(Third::Minor) => match (self.seventh, self.sixth) {
                (Some(Seventh::Major), _) => ChordQuality::MinorMajorSeventh,
                (Some(Seventh::Minor), _) => ChordQuality::MinorSeventh,
                (None, Some(Sixth::Major)) => ChordQuality::MinorSixth,
                (None, _) => ChordQuality::Minor,
            },
            None => ChordQuality::Major,
        }
    }
}

/// Classify a note set whose first element is the root.
pub fn classify_notes(notes: &[Note]) -> ChordQuality {
    IntervalProfile::analyze(notes).quality()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notes(pitches: &[i32]) -> Vec<Note> {
        pitches.iter().map(|&p| Note::new(p, 0.0, 4.0)).collect()
    }

    #[test]
    fn test_major_triad_with_doubled_root() {
        // Root-position C major as the progression builder voices it.
        assert_eq!(classify_notes(&notes(&[24, 24, 40, 31])), ChordQuality::Major);
    }

    #[test]
    fn test_perfect_fifth_reads_as_diminished() {
        // Minor triad: the 7-semitone fifth fills the "diminished" slot.
        let profile = IntervalProfile::analyze(&notes(&[57, 60, 64]));
        assert_eq!(profile.third, Some(Third::Minor));
        assert_eq!(profile.fifth, Some(Fifth::Diminished));
        assert_eq!(profile.quality(), ChordQuality::Diminished);
    }

    #[test]
    fn test_interval_ten_is_a_sixth_not_a_seventh() {
        // C7: the Bb lands in the sixth slot, so no seventh is detected.
        let profile = IntervalProfile::analyze(&notes(&[48, 52, 55, 58]));
        assert_eq!(profile.sixth, Some(Sixth::Minor));
        assert_eq!(profile.seventh, None);
        assert_eq!(profile.quality(), ChordQuality::Major);
    }

    #[test]
    fn test_major_seventh_and_minor_major_seventh() {
        assert_eq!(classify_notes(&notes(&[48, 52, 55, 59])), ChordQuality::MajorSeventh);
        // Minor third + major seventh with no fifth present.
        assert_eq!(classify_notes(&notes(&[48, 51, 59])), ChordQuality::MinorMajorSeventh);
    }

    #[test]
    fn test_augmented() {
        assert_eq!(classify_notes(&notes(&[48, 52, 56])), ChordQuality::Augmented);
    }

    #[test]
    fn test_diminished_seventh_from_major_sixth_slot() {
        // Minor third + "diminished" fifth + 9 semitones.
        assert_eq!(classify_notes(&notes(&[48, 51, 55, 57])), ChordQuality::DiminishedSeventh);
    }

    #[test]
    fn test_minor_without_fifth() {
        assert_eq!(classify_notes(&notes(&[48, 51])), ChordQuality::Minor);
        assert_eq!(classify_notes(&notes(&[48, 51, 57])), ChordQuality::MinorSixth);
    }

    #[test]
    fn test_no_third_falls_back_to_major() {
        // Sus4 voicing: 5 and 7 semitones, no third.
        assert_eq!(classify_notes(&notes(&[48, 53, 55])), ChordQuality::Major);
        assert_eq!(classify_notes(&notes(&[48])), ChordQuality::Major);
        assert_eq!(classify_notes(&[]), ChordQuality::Major);
    }

    #[test]
    fn test_intervals_measured_modulo_octave() {
        // Third voiced above the octave and a root doubled below.
        assert_eq!(classify_notes(&notes(&[60, 48, 76])), ChordQuality::Major);
    }

    #[test]
    fn test_unreachable_seventh_branches_when_set_directly() {
        let dom = IntervalProfile {
            third: Some(Third::Major),
            seventh: Some(Seventh::Minor),
            ..Default::default()
        };
        assert_eq!(dom.quality(), ChordQuality::DominantSeventh);
        let thirteenth = IntervalProfile {
            sixth: Some(Sixth::Major),
            ..dom
        };
        assert_eq!(thirteenth.quality(), ChordQuality::DominantThirteenth);
        let half_dim = IntervalProfile {
            third: Some(Third::Minor),
            fifth: Some(Fifth::Diminished),
            seventh: Some(Seventh::Minor),
            ..Default::default()
        };
        assert_eq!(half_dim.quality(), ChordQuality::HalfDiminishedSeventh);
    }
}
