//! Colour sequences
//!
//! A sequence is a fixed-capacity list of colour codes in `1..=colors`.
//! Sequences can be generated at random, or decoded from a decimal
//! integer whose least-significant digit is the last peg.

use core::fmt;

use heapless::Vec;
use rand::Rng;

/// Longest supported sequence (one decimal digit per peg)
pub const MAX_SEQ_LEN: usize = 9;

/// Largest supported colour count (codes are single decimal digits)
pub const MAX_COLORS: u8 = 9;

const COLOR_NAMES: [&str; MAX_COLORS as usize] = [
    "Red", "Green", "Blue", "Yellow", "Magenta", "Cyan", "White", "Orange", "Purple",
];

const COLOR_INITIALS: [&str; MAX_COLORS as usize] = ["R", "G", "B", "Y", "M", "C", "W", "O", "P"];

/// Full name of a colour code, `"?"` for codes outside `1..=9`
pub fn color_name(code: u8) -> &'static str {
    match code {
        1..=MAX_COLORS => COLOR_NAMES[code as usize - 1],
        _ => "?",
    }
}

/// One-letter name of a colour code, `"?"` for codes outside `1..=9`
pub fn color_initial(code: u8) -> &'static str {
    match code {
        1..=MAX_COLORS => COLOR_INITIALS[code as usize - 1],
        _ => "?",
    }
}

/// Errors building a sequence from external input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceError {
    /// A digit is outside `1..=colors`
    InvalidDigit { position: u8, digit: u8, colors: u8 },
    /// The number of digits differs from the sequence length
    MalformedSecretLength { expected: u8, found: u8 },
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceError::InvalidDigit {
                position,
                digit,
                colors,
            } => write!(
                f,
                "digit {} at position {} is outside 1..={}",
                digit, position, colors
            ),
            SequenceError::MalformedSecretLength { expected, found } => {
                write!(f, "expected {} digits, found {}", expected, found)
            }
        }
    }
}

/// Ordered colour codes of one secret or guess
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sequence {
    pegs: Vec<u8, MAX_SEQ_LEN>,
}

impl Sequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self { pegs: Vec::new() }
    }

    /// Build a sequence from colour codes, checking each against `colors`
    pub fn from_slice(pegs: &[u8], colors: u8) -> Result<Self, SequenceError> {
        if pegs.len() > MAX_SEQ_LEN {
            return Err(SequenceError::MalformedSecretLength {
                expected: MAX_SEQ_LEN as u8,
                found: pegs.len().min(u8::MAX as usize) as u8,
            });
        }
        let mut seq = Self::new();
        for (position, &digit) in pegs.iter().enumerate() {
            if !(1..=colors).contains(&digit) {
                return Err(SequenceError::InvalidDigit {
                    position: position as u8,
                    digit,
                    colors,
                });
            }
            seq.push(digit);
        }
        Ok(seq)
    }

    /// Decode a decimal integer into `seqlen` colour codes
    ///
    /// The least-significant digit becomes the last peg, so 312 decodes to
    /// `[3, 1, 2]`. The digit count must equal `seqlen` and every digit
    /// must be in `1..=colors`.
    pub fn decode(value: u32, seqlen: u8, colors: u8) -> Result<Self, SequenceError> {
        let found = digit_count(value);
        if found != seqlen || seqlen as usize > MAX_SEQ_LEN {
            return Err(SequenceError::MalformedSecretLength {
                expected: seqlen,
                found,
            });
        }

        let mut digits = [0u8; MAX_SEQ_LEN];
        let mut rest = value;
        for slot in digits[..seqlen as usize].iter_mut().rev() {
            *slot = (rest % 10) as u8;
            rest /= 10;
        }

        Self::from_slice(&digits[..seqlen as usize], colors)
    }

    /// Encode back into a decimal integer (inverse of [`decode`](Self::decode))
    pub fn encode(&self) -> u32 {
        self.pegs
            .iter()
            .fold(0u32, |acc, &peg| acc * 10 + u32::from(peg))
    }

    /// Generate `seqlen` codes uniformly over `1..=colors`
    pub fn random<R: Rng + ?Sized>(rng: &mut R, seqlen: u8, colors: u8) -> Self {
        let mut seq = Self::new();
        for _ in 0..(seqlen as usize).min(MAX_SEQ_LEN) {
            seq.push(rng.gen_range(1..=colors.max(1)));
        }
        seq
    }

    /// Append a peg; pegs beyond capacity are dropped
    pub(crate) fn push(&mut self, peg: u8) {
        let _ = self.pegs.push(peg);
    }

    /// Number of pegs
    pub fn len(&self) -> usize {
        self.pegs.len()
    }

    /// Check for an empty sequence
    pub fn is_empty(&self) -> bool {
        self.pegs.is_empty()
    }

    /// Colour codes in order
    pub fn as_slice(&self) -> &[u8] {
        &self.pegs
    }

    /// Short colour names, space separated ("R G B")
    pub fn initials(&self) -> Initials<'_> {
        Initials(self)
    }
}

/// Display adapter printing one-letter colour names
pub struct Initials<'a>(&'a Sequence);

impl fmt::Display for Initials<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &peg) in self.0.pegs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(color_initial(peg))?;
        }
        Ok(())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &peg in self.pegs.iter() {
            write!(f, "{}", peg)?;
        }
        Ok(())
    }
}

/// Decimal digits of `value` (0 has one digit)
fn digit_count(mut value: u32) -> u8 {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_decode_digits_in_order() {
        let seq = Sequence::decode(312, 3, 3).unwrap();
        assert_eq!(seq.as_slice(), &[3, 1, 2]);
        assert_eq!(seq.encode(), 312);
    }

    #[test]
    fn test_decode_wrong_length() {
        assert_eq!(
            Sequence::decode(1231, 3, 3),
            Err(SequenceError::MalformedSecretLength {
                expected: 3,
                found: 4
            })
        );
        assert_eq!(
            Sequence::decode(12, 3, 3),
            Err(SequenceError::MalformedSecretLength {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_decode_invalid_digit() {
        assert_eq!(
            Sequence::decode(142, 3, 3),
            Err(SequenceError::InvalidDigit {
                position: 1,
                digit: 4,
                colors: 3
            })
        );
        assert!(Sequence::decode(102, 3, 3).is_err());
    }

    #[test]
    fn test_decode_every_valid_three_digit_value() {
        for a in 1..=3u32 {
            for b in 1..=3u32 {
                for c in 1..=3u32 {
                    let value = a * 100 + b * 10 + c;
                    let seq = Sequence::decode(value, 3, 3).unwrap();
                    assert_eq!(seq.as_slice(), &[a as u8, b as u8, c as u8]);
                }
            }
        }
    }

    #[test]
    fn test_random_within_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let seq = Sequence::random(&mut rng, 4, 3);
            assert_eq!(seq.len(), 4);
            assert!(seq.as_slice().iter().all(|&c| (1..=3).contains(&c)));
        }
    }

    #[test]
    fn test_from_slice_validates() {
        assert!(Sequence::from_slice(&[1, 2, 3], 3).is_ok());
        assert!(Sequence::from_slice(&[1, 0, 3], 3).is_err());
        assert!(Sequence::from_slice(&[1; 10], 3).is_err());
    }

    #[test]
    fn test_color_names() {
        assert_eq!(color_name(1), "Red");
        assert_eq!(color_name(3), "Blue");
        assert_eq!(color_name(0), "?");
        assert_eq!(color_initial(2), "G");

        let seq = Sequence::from_slice(&[1, 2, 3], 3).unwrap();
        assert_eq!(seq.initials().to_string(), "R G B");
        assert_eq!(seq.to_string(), "123");
    }
}
