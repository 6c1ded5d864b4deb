// Tempo and time signature - Musical time configuration
// All inputs are clamped rather than rejected

use std::fmt;

/// Tempo in BPM (Beats Per Minute)
/// BPM is stored as an integer and clamped to [30, 260]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Tempo {
    bpm: u32,
}

impl Tempo {
    pub const MIN_BPM: u32 = 30;
    pub const MAX_BPM: u32 = 260;

    /// Creates a new tempo, clamping into the valid range
    pub fn new(bpm: u32) -> Self {
        Self {
            bpm: bpm.clamp(Self::MIN_BPM, Self::MAX_BPM),
        }
    }

    /// Get BPM value
    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    /// Set BPM value, clamping into the valid range
    pub fn set_bpm(&mut self, bpm: u32) {
        self.bpm = bpm.clamp(Self::MIN_BPM, Self::MAX_BPM);
    }

    /// Duration of one beat in seconds
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    /// Classical tempo marking for the current BPM
    pub fn marking(&self) -> &'static str {
        match self.bpm {
            0..=39 => "Grave",
            40..=59 => "Largo",
            60..=75 => "Adagio",
            76..=107 => "Andante",
            108..=119 => "Moderato",
            120..=167 => "Allegro",
            168..=199 => "Presto",
            _ => "Prestissimo",
        }
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(65)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} BPM", self.bpm)
    }
}

/// Time signature (numerator/denominator)
/// Numerator is beats per bar, denominator the beat unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeSignature {
    numerator: u8,
    denominator: u8,
}

impl TimeSignature {
    pub const MIN_NUMERATOR: u8 = 1;
    pub const MAX_NUMERATOR: u8 = 16;

    /// Valid beat units, in ascending order
    pub const DENOMINATORS: [u8; 5] = [1, 2, 4, 8, 16];

    /// Creates a new time signature
    /// Numerator clamps to [1, 16]; denominator snaps to the nearest valid
    /// beat unit (ties resolve downward)
    pub fn new(numerator: u8, denominator: u8) -> Self {
        Self {
            numerator: numerator.clamp(Self::MIN_NUMERATOR, Self::MAX_NUMERATOR),
            denominator: Self::snap_denominator(denominator),
        }
    }

    /// Common 4/4 time signature
    pub fn four_four() -> Self {
        Self::new(4, 4)
    }

    /// Common 3/4 time signature (waltz)
    pub fn three_four() -> Self {
        Self::new(3, 4)
    }

    /// Beats per bar
    pub fn numerator(&self) -> u8 {
        self.numerator
    }

    /// Beat unit (1, 2, 4, 8 or 16)
    pub fn denominator(&self) -> u8 {
        self.denominator
    }

    /// Beats per bar as a count
    pub fn beats_per_bar(&self) -> usize {
        self.numerator as usize
    }

    fn snap_denominator(denominator: u8) -> u8 {
        Self::DENOMINATORS
            .into_iter()
            .min_by_key(|d| (d.abs_diff(denominator), *d))
            .unwrap_or(4)
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::four_four()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_clamping() {
        assert_eq!(Tempo::new(120).bpm(), 120);
        assert_eq!(Tempo::new(5).bpm(), 30);
        assert_eq!(Tempo::new(1000).bpm(), 260);

        let mut tempo = Tempo::default();
        assert_eq!(tempo.bpm(), 65);
        tempo.set_bpm(0);
        assert_eq!(tempo.bpm(), 30);
        tempo.set_bpm(261);
        assert_eq!(tempo.bpm(), 260);
    }

    #[test]
    fn test_seconds_per_beat_formula() {
        // At 120 BPM, one beat = 0.5s
        assert_eq!(Tempo::new(120).seconds_per_beat(), 0.5);
        assert_eq!(Tempo::new(60).seconds_per_beat(), 1.0);
        assert_eq!(Tempo::new(240).seconds_per_beat(), 0.25);

        // Formula holds across the whole valid range
        for bpm in Tempo::MIN_BPM..=Tempo::MAX_BPM {
            assert_eq!(Tempo::new(bpm).seconds_per_beat(), 60.0 / bpm as f64);
        }
    }

    #[test]
    fn test_seconds_per_beat_monotonic() {
        let mut previous = f64::INFINITY;
        for bpm in Tempo::MIN_BPM..=Tempo::MAX_BPM {
            let spb = Tempo::new(bpm).seconds_per_beat();
            assert!(spb < previous, "beat duration must decrease as BPM rises");
            previous = spb;
        }
    }

    #[test]
    fn test_tempo_markings() {
        assert_eq!(Tempo::new(30).marking(), "Grave");
        assert_eq!(Tempo::new(45).marking(), "Largo");
        assert_eq!(Tempo::new(65).marking(), "Adagio");
        assert_eq!(Tempo::new(90).marking(), "Andante");
        assert_eq!(Tempo::new(110).marking(), "Moderato");
        assert_eq!(Tempo::new(120).marking(), "Allegro");
        assert_eq!(Tempo::new(180).marking(), "Presto");
        assert_eq!(Tempo::new(220).marking(), "Prestissimo");
    }

    #[test]
    fn test_time_signature_clamping() {
        let ts = TimeSignature::four_four();
        assert_eq!(ts.numerator(), 4);
        assert_eq!(ts.denominator(), 4);
        assert_eq!(ts.to_string(), "4/4");

        assert_eq!(TimeSignature::new(0, 4).numerator(), 1);
        assert_eq!(TimeSignature::new(20, 4).numerator(), 16);
    }

    #[test]
    fn test_denominator_snapping() {
        // Valid values pass through untouched
        for d in TimeSignature::DENOMINATORS {
            assert_eq!(TimeSignature::new(4, d).denominator(), d);
        }

        // Invalid values snap to the nearest beat unit, ties downward
        assert_eq!(TimeSignature::new(4, 3).denominator(), 2);
        assert_eq!(TimeSignature::new(4, 5).denominator(), 4);
        assert_eq!(TimeSignature::new(4, 6).denominator(), 4);
        assert_eq!(TimeSignature::new(4, 7).denominator(), 8);
        assert_eq!(TimeSignature::new(4, 12).denominator(), 8);
        assert_eq!(TimeSignature::new(4, 100).denominator(), 16);
        assert_eq!(TimeSignature::new(4, 0).denominator(), 1);
    }
}
