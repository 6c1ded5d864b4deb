// Subdivision patterns - Named splits of one beat
// Each pattern is an ordered list of beat fractions summing to 1

use serde::{Deserialize, Serialize};
use std::fmt;

const QUARTER: &[f64] = &[1.0];
const EIGHTH: &[f64] = &[0.5, 0.5];
const TRIPLET: &[f64] = &[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];
const SIXTEENTH: &[f64] = &[0.25, 0.25, 0.25, 0.25];
// Swing delays the offbeat to the last third of the beat
const SWING: &[f64] = &[2.0 / 3.0, 1.0 / 3.0];
const EIGHT_SIXTEEN_SIXTEEN: &[f64] = &[0.5, 0.25, 0.25];
const SIXTEEN_EIGHT_SIXTEEN: &[f64] = &[0.25, 0.5, 0.25];
const SIXTEEN_SIXTEEN_EIGHT: &[f64] = &[0.25, 0.25, 0.5];

/// Named subdivision of one beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubdivisionMode {
    Quarter,
    Eighth,
    Triplet,
    Sixteenth,
    Swing,
    EightSixteenSixteen,
    SixteenEightSixteen,
    SixteenSixteenEight,
}

impl SubdivisionMode {
    /// All modes, in menu order
    pub const ALL: [SubdivisionMode; 8] = [
        SubdivisionMode::Quarter,
        SubdivisionMode::Eighth,
        SubdivisionMode::Triplet,
        SubdivisionMode::Sixteenth,
        SubdivisionMode::Swing,
        SubdivisionMode::EightSixteenSixteen,
        SubdivisionMode::SixteenEightSixteen,
        SubdivisionMode::SixteenSixteenEight,
    ];

    /// The beat fractions of this pattern, in playback order
    ///
    /// The first fraction is the offset from the beat onset to the first
    /// subdivision tick after it; the onset itself is played as the
    /// Beat-role event, never as part of this list.
    pub fn pattern(&self) -> &'static [f64] {
        match self {
            SubdivisionMode::Quarter => QUARTER,
            SubdivisionMode::Eighth => EIGHTH,
            SubdivisionMode::Triplet => TRIPLET,
            SubdivisionMode::Sixteenth => SIXTEENTH,
            SubdivisionMode::Swing => SWING,
            SubdivisionMode::EightSixteenSixteen => EIGHT_SIXTEEN_SIXTEEN,
            SubdivisionMode::SixteenEightSixteen => SIXTEEN_EIGHT_SIXTEEN,
            SubdivisionMode::SixteenSixteenEight => SIXTEEN_SIXTEEN_EIGHT,
        }
    }

    /// Look up a mode by wire name; unknown names fall back to the default
    /// two-way split
    pub fn from_name(name: &str) -> Self {
        match name {
            "quarter" => SubdivisionMode::Quarter,
            "eighth" => SubdivisionMode::Eighth,
            "triplet" => SubdivisionMode::Triplet,
            "sixteenth" => SubdivisionMode::Sixteenth,
            "swing" => SubdivisionMode::Swing,
            "8-16-16" => SubdivisionMode::EightSixteenSixteen,
            "16-8-16" => SubdivisionMode::SixteenEightSixteen,
            "16-16-8" => SubdivisionMode::SixteenSixteenEight,
            _ => SubdivisionMode::Eighth,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            SubdivisionMode::Quarter => "Quarter",
            SubdivisionMode::Eighth => "Eighth",
            SubdivisionMode::Triplet => "Triplet",
            SubdivisionMode::Sixteenth => "Sixteenth",
            SubdivisionMode::Swing => "Swing",
            SubdivisionMode::EightSixteenSixteen => "8-16-16",
            SubdivisionMode::SixteenEightSixteen => "16-8-16",
            SubdivisionMode::SixteenSixteenEight => "16-16-8",
        }
    }
}

impl Default for SubdivisionMode {
    fn default() -> Self {
        SubdivisionMode::Eighth
    }
}

impl fmt::Display for SubdivisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
