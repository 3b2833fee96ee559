use crate::config::CARDS_IN_HAND;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequirementError {
    #[error("land count {lands} exceeds deck size {cards}")]
    TooManyLands { lands: u32, cards: u32 },
    #[error("land split sums to {split}, more than the {lands} lands in the deck")]
    SplitExceedsLands { split: u32, lands: u32 },
    #[error("target turn must be at least 1")]
    ZeroTurn,
    #[error("deck of {0} cards cannot deal an opening hand")]
    DeckTooSmall(u32),
    #[error("{colored} colored symbols do not fit a mana value of {turn}")]
    ColorsExceedTurn { colored: u64, turn: u32 },
}

/// One point of the parameter space: a deck shape and a mana cost to pay on curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub deck_size: u32,
    pub land_count: u32,
    /// Turn by which the cost must be payable, equal to its mana value
    pub target_turn: u32,
    /// Colored symbols needed: [color A, color B]
    pub color_requirement: [u32; 2],
    /// Lands producing [only A, only B, both]; the rest are colorless
    pub land_split: [u32; 3],
    /// Seed of this requirement's trial stream
    pub seed: u64,
}

impl Requirement {
    pub fn new(
        deck_size: u32,
        land_count: u32,
        target_turn: u32,
        color_requirement: [u32; 2],
        land_split: [u32; 3],
        seed: u64,
    ) -> Result<Self, RequirementError> {
        if deck_size < CARDS_IN_HAND {
            return Err(RequirementError::DeckTooSmall(deck_size));
        }
        if land_count > deck_size {
            return Err(RequirementError::TooManyLands {
                lands: land_count,
                cards: deck_size,
            });
        }
        let split: u32 = land_split.iter().sum();
        if split > land_count {
            return Err(RequirementError::SplitExceedsLands {
                split,
                lands: land_count,
            });
        }
        if target_turn == 0 {
            return Err(RequirementError::ZeroTurn);
        }
        match color_requirement[0].checked_add(color_requirement[1]) {
            Some(colored) if colored <= target_turn => {}
            _ => {
                return Err(RequirementError::ColorsExceedTurn {
                    colored: u64::from(color_requirement[0]) + u64::from(color_requirement[1]),
                    turn: target_turn,
                })
            }
        }
        Ok(Requirement {
            deck_size,
            land_count,
            target_turn,
            color_requirement,
            land_split,
            seed,
        })
    }

    /// Lands that produce neither tracked color
    pub fn generic_lands(&self) -> u32 {
        self.land_count - self.land_split.iter().sum::<u32>()
    }
}

impl fmt::Display for Requirement {
    /// CSV prefix: deckSize,landCount,targetTurn,reqA,reqB,landA,landB,landAB
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{}",
            self.deck_size,
            self.land_count,
            self.target_turn,
            self.color_requirement[0],
            self.color_requirement[1],
            self.land_split[0],
            self.land_split[1],
            self.land_split[2]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_requirement() {
        let req = Requirement::new(40, 17, 3, [2, 1], [6, 5, 2], 7).expect("valid");
        assert_eq!(req.generic_lands(), 4);
        assert_eq!(req.to_string(), "40,17,3,2,1,6,5,2");
    }

    #[test]
    fn test_invalid_requirements() {
        assert_eq!(
            Requirement::new(40, 41, 3, [1, 0], [0, 0, 0], 0),
            Err(RequirementError::TooManyLands { lands: 41, cards: 40 })
        );
        assert_eq!(
            Requirement::new(40, 17, 3, [1, 0], [10, 5, 3], 0),
            Err(RequirementError::SplitExceedsLands { split: 18, lands: 17 })
        );
        assert_eq!(
            Requirement::new(40, 17, 0, [1, 0], [1, 0, 0], 0),
            Err(RequirementError::ZeroTurn)
        );
        assert_eq!(
            Requirement::new(6, 3, 1, [1, 0], [1, 0, 0], 0),
            Err(RequirementError::DeckTooSmall(6))
        );
    }

    #[test]
    fn test_colored_symbols_bounded_by_turn() {
        assert_eq!(
            Requirement::new(40, 17, 3, [2, 2], [6, 5, 2], 0),
            Err(RequirementError::ColorsExceedTurn { colored: 4, turn: 3 })
        );
        assert_eq!(
            Requirement::new(40, 17, 3, [u32::MAX, 1], [0, 0, 0], 5),
            Err(RequirementError::ColorsExceedTurn {
                colored: u64::from(u32::MAX) + 1,
                turn: 3
            })
        );
        assert!(Requirement::new(40, 17, 3, [2, 1], [0, 0, 0], 0).is_ok());
    }
}
