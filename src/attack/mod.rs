//! The five attack kernels, one per supported round count, and the
//! per-thread scratch each needs to hold between work units.

pub mod five;
pub mod four;
pub mod sixseveneight;
pub mod three;
pub mod two;

use crate::error::{CrackError, Result};

/// Which kernel a given round count selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attack {
    Two,
    Three,
    Four,
    Five,
    SixSevenEight(u32),
}

impl Attack {
    pub fn for_rounds(rounds: u32) -> Result<Self> {
        match rounds {
            2 => Ok(Attack::Two),
            3 => Ok(Attack::Three),
            4 => Ok(Attack::Four),
            5 => Ok(Attack::Five),
            6 | 7 | 8 => Ok(Attack::SixSevenEight(rounds)),
            _ => Err(CrackError::usage(format!("unsupported round count {rounds}"))),
        }
    }

    /// Whether this kernel consumes the [`crate::pair::PairStore`] rather
    /// than operating directly on the first two loaded tuples.
    pub fn uses_pairs(&self) -> bool {
        matches!(self, Attack::SixSevenEight(_))
    }
}

/// Per-thread scratch for the kernels that need one, allocated once per
/// worker and reused across every work unit it is handed.
pub enum Scratch {
    None,
    Four(four::Scratch),
    Five(five::Scratch),
}

impl Attack {
    pub fn new_scratch(&self) -> Scratch {
        match self {
            Attack::Two | Attack::Three | Attack::SixSevenEight(_) => Scratch::None,
            Attack::Four => Scratch::Four(four::Scratch::new()),
            Attack::Five => Scratch::Five(five::Scratch::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_supported_round_count() {
        assert_eq!(Attack::for_rounds(2).unwrap(), Attack::Two);
        assert_eq!(Attack::for_rounds(3).unwrap(), Attack::Three);
        assert_eq!(Attack::for_rounds(4).unwrap(), Attack::Four);
        assert_eq!(Attack::for_rounds(5).unwrap(), Attack::Five);
        assert_eq!(Attack::for_rounds(6).unwrap(), Attack::SixSevenEight(6));
        assert_eq!(Attack::for_rounds(7).unwrap(), Attack::SixSevenEight(7));
        assert_eq!(Attack::for_rounds(8).unwrap(), Attack::SixSevenEight(8));
    }

    #[test]
    fn rejects_unsupported_round_counts() {
        assert!(Attack::for_rounds(1).is_err());
        assert!(Attack::for_rounds(9).is_err());
    }

    #[test]
    fn only_six_seven_eight_use_pairs() {
        assert!(!Attack::Four.uses_pairs());
        assert!(Attack::SixSevenEight(7).uses_pairs());
    }
}
