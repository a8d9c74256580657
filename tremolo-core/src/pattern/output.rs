//! Single-channel output pattern
//!
//! An output pattern is an ordered list of durations (seconds) that a
//! channel alternates through, starting in the ON phase. The template is
//! consumed destructively from a working copy so every repeat starts from
//! the pristine template.

use heapless::Vec;

/// Maximum number of durations in one pattern
pub const MAX_PATTERN_LEN: usize = 32;

/// Errors detected when building a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PatternError {
    /// Duration sequence is empty
    Empty,
    /// Duration sequence exceeds [`MAX_PATTERN_LEN`]
    TooLong,
    /// A duration is negative, NaN or infinite
    InvalidDuration,
}

/// Magnitude from which every f32 is a whole number
const CENTIS_EXACT: f32 = 8_388_608.0;

/// Round a non-negative number of seconds to hundredths
///
/// Keeps float subtraction noise from piling up into near-zero heads that
/// never compare equal to zero.
pub fn round_to_centis(seconds: f32) -> f32 {
    let centis = seconds * 100.0;
    // From 2^23 on every f32 is already a whole number of centiseconds
    if centis >= CENTIS_EXACT {
        return seconds;
    }
    (centis + 0.5) as u32 as f32 / 100.0
}

/// Timing program for one channel
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPattern {
    /// Durations as received, never mutated
    template: Vec<f32, MAX_PATTERN_LEN>,
    /// Working copy, head entry counts down
    remaining: Vec<f32, MAX_PATTERN_LEN>,
    /// Index of the head duration
    cursor: usize,
    /// Full passes still permitted, including the current one
    repeats_left: u32,
    /// Terminal: all durations and repeats exhausted
    spent: bool,
    /// Set only by the `reduce_timer` call that began a new repeat
    start_of_repeat: bool,
}

impl OutputPattern {
    /// Create a pattern from a duration sequence and a repeat count
    ///
    /// A repeat count of zero yields a pattern that is already spent.
    ///
    /// # Errors
    /// Rejects empty or oversized sequences and durations that are
    /// negative or not finite.
    pub fn new(durations: &[f32], repeat_count: u32) -> Result<Self, PatternError> {
        if durations.is_empty() {
            return Err(PatternError::Empty);
        }
        if durations.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(PatternError::InvalidDuration);
        }

        let template =
            Vec::from_slice(durations).map_err(|_| PatternError::TooLong)?;

        Ok(Self {
            remaining: template.clone(),
            template,
            cursor: 0,
            repeats_left: repeat_count,
            spent: repeat_count == 0,
            start_of_repeat: false,
        })
    }

    /// Time left at the pattern head, or `None` once spent
    pub fn time_remaining(&self) -> Option<f32> {
        if self.spent {
            return None;
        }
        self.remaining.get(self.cursor).copied()
    }

    /// Subtract elapsed time from the pattern head
    ///
    /// Returns the head's remaining time rounded to hundredths. A return of
    /// exactly `0.0` means the head expired and the cursor moved to the next
    /// duration (a phase boundary). When the sequence is exhausted and a
    /// repeat is left, the pattern restarts, [`start_of_repeat`] becomes
    /// true, and the first template duration is returned. Returns `None`
    /// once the pattern is spent.
    ///
    /// [`start_of_repeat`]: Self::start_of_repeat
    pub fn reduce_timer(&mut self, elapsed: f32) -> Option<f32> {
        self.start_of_repeat = false;

        if self.spent {
            return None;
        }

        let head = self.remaining.get_mut(self.cursor)?;
        let reduced = round_to_centis((*head - elapsed).max(0.0));
        *head = reduced;

        if reduced > 0.0 {
            return Some(reduced);
        }

        self.cursor += 1;
        if self.cursor < self.remaining.len() {
            return Some(reduced);
        }

        if self.begin_repeat() {
            self.start_of_repeat = true;
            return self.remaining.first().copied();
        }

        self.spent = true;
        None
    }

    /// Consume one repeat; restart from the template if another is left
    fn begin_repeat(&mut self) -> bool {
        self.repeats_left = self.repeats_left.saturating_sub(1);
        if self.repeats_left == 0 {
            return false;
        }

        self.cursor = 0;
        self.remaining.clone_from(&self.template);
        true
    }

    /// True only right after the `reduce_timer` call that began a repeat
    pub fn start_of_repeat(&self) -> bool {
        self.start_of_repeat
    }

    /// Check if all durations and repeats are exhausted
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Full passes still permitted, including the current one
    pub fn repeats_left(&self) -> u32 {
        self.repeats_left
    }

    /// Index of the head duration
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Durations as originally supplied
    pub fn template(&self) -> &[f32] {
        &self.template
    }

    /// Sum of the template durations (one repeat)
    pub fn period(&self) -> f32 {
        self.template.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_pattern() {
        assert_eq!(OutputPattern::new(&[], 1), Err(PatternError::Empty));
    }

    #[test]
    fn test_rejects_invalid_durations() {
        assert_eq!(
            OutputPattern::new(&[0.5, -0.1], 1),
            Err(PatternError::InvalidDuration)
        );
        assert_eq!(
            OutputPattern::new(&[f32::NAN], 1),
            Err(PatternError::InvalidDuration)
        );
        assert_eq!(
            OutputPattern::new(&[f32::INFINITY], 1),
            Err(PatternError::InvalidDuration)
        );
    }

    #[test]
    fn test_rejects_oversized_pattern() {
        let durations = [0.1; MAX_PATTERN_LEN + 1];
        assert_eq!(
            OutputPattern::new(&durations, 1),
            Err(PatternError::TooLong)
        );
        assert!(OutputPattern::new(&durations[..MAX_PATTERN_LEN], 1).is_ok());
    }

    #[test]
    fn test_rounding_keeps_large_durations() {
        assert_eq!(round_to_centis(0.125), 0.13);
        assert_eq!(round_to_centis(1.0e5), 1.0e5);
        assert_eq!(round_to_centis(5.0e9), 5.0e9);
        assert_eq!(round_to_centis(f32::MAX), f32::MAX);
    }

    #[test]
    fn test_very_long_duration_survives_reduction() {
        let mut pattern = OutputPattern::new(&[1.0e8, 0.5], 1).unwrap();

        let left = pattern.reduce_timer(0.1).unwrap();
        assert!((left - 1.0e8).abs() <= 8.0, "left {}", left);
        assert_eq!(pattern.cursor(), 0);

        let left = pattern.reduce_timer(5.0e7).unwrap();
        assert!((left - 5.0e7).abs() <= 8.0, "left {}", left);
    }

    #[test]
    fn test_zero_repeats_is_spent() {
        let mut pattern = OutputPattern::new(&[0.5, 0.5], 0).unwrap();
        assert!(pattern.is_spent());
        assert_eq!(pattern.time_remaining(), None);
        assert_eq!(pattern.reduce_timer(0.1), None);
    }

    #[test]
    fn test_partial_reduction_keeps_cursor() {
        let mut pattern = OutputPattern::new(&[0.5, 0.3], 1).unwrap();
        assert_eq!(pattern.time_remaining(), Some(0.5));

        assert_eq!(pattern.reduce_timer(0.2), Some(0.3));
        assert_eq!(pattern.cursor(), 0);
        assert_eq!(pattern.time_remaining(), Some(0.3));
        assert!(!pattern.start_of_repeat());
    }

    #[test]
    fn test_expiry_advances_cursor() {
        let mut pattern = OutputPattern::new(&[0.5, 0.3], 1).unwrap();

        assert_eq!(pattern.reduce_timer(0.5), Some(0.0));
        assert_eq!(pattern.cursor(), 1);
        assert_eq!(pattern.time_remaining(), Some(0.3));
        assert!(!pattern.start_of_repeat());
    }

    #[test]
    fn test_overshoot_clamps_to_zero() {
        let mut pattern = OutputPattern::new(&[0.2, 0.4], 1).unwrap();
        assert_eq!(pattern.reduce_timer(0.7), Some(0.0));
        assert_eq!(pattern.time_remaining(), Some(0.4));
    }

    #[test]
    fn test_repeat_restores_template() {
        let mut pattern = OutputPattern::new(&[0.5, 0.5], 2).unwrap();

        assert_eq!(pattern.reduce_timer(0.5), Some(0.0));
        let restart = pattern.reduce_timer(0.5);

        assert_eq!(restart, Some(0.5));
        assert!(pattern.start_of_repeat());
        assert_eq!(pattern.cursor(), 0);
        assert_eq!(pattern.repeats_left(), 1);
        assert_eq!(pattern.time_remaining(), Some(0.5));

        // Flag is consumed by the next reduction
        pattern.reduce_timer(0.1);
        assert!(!pattern.start_of_repeat());
    }

    #[test]
    fn test_last_repeat_spends_pattern() {
        let mut pattern = OutputPattern::new(&[0.25], 1).unwrap();

        assert_eq!(pattern.reduce_timer(0.25), None);
        assert!(pattern.is_spent());
        assert!(!pattern.start_of_repeat());
        assert_eq!(pattern.time_remaining(), None);

        // Spent is terminal
        assert_eq!(pattern.reduce_timer(1.0), None);
        assert!(pattern.is_spent());
    }

    #[test]
    fn test_residue_below_half_centi_collapses() {
        let mut pattern = OutputPattern::new(&[0.504, 0.2], 1).unwrap();
        assert_eq!(pattern.reduce_timer(0.5), Some(0.0));
        assert_eq!(pattern.cursor(), 1);
    }

    #[test]
    fn test_residue_at_half_centi_survives() {
        let mut pattern = OutputPattern::new(&[0.506, 0.2], 1).unwrap();
        assert_eq!(pattern.reduce_timer(0.5), Some(0.01));
        assert_eq!(pattern.cursor(), 0);
    }

    #[test]
    fn test_round_to_centis() {
        assert_eq!(round_to_centis(0.0), 0.0);
        assert_eq!(round_to_centis(0.004), 0.0);
        assert_eq!(round_to_centis(0.006), 0.01);
        assert_eq!(round_to_centis(1.234), 1.23);
        assert_eq!(round_to_centis(0.30000001), 0.3);
    }

    #[test]
    fn test_period() {
        let pattern = OutputPattern::new(&[0.25, 0.5, 0.25], 3).unwrap();
        assert_eq!(pattern.period(), 1.0);
        assert_eq!(pattern.template(), &[0.25, 0.5, 0.25]);
    }
}
