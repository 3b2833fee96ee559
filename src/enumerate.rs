//! Exhaustive list of requirements for a configured domain.

use crate::config::{ConfigError, EngineConfig};
use crate::requirement::Requirement;
use crate::rng::SeedSource;

/// Domain bounds the requirement list and the result table share
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DomainBounds {
    pub deck_size: u32,
    pub land_count: u32,
    pub max_turn: u32,
    pub max_color_a: u32,
    pub max_color_b: u32,
}

impl DomainBounds {
    /// Validate `config` and take its bounds
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(DomainBounds {
            deck_size: config.deck_size,
            land_count: config.land_count(),
            max_turn: config.max_turn,
            max_color_a: config.max_color_a,
            max_color_b: config.max_color_b,
        })
    }

    /// Visit every requirement shape in enumeration order.
    ///
    /// For each turn and primary color count: single-color decks where every
    /// colored land makes A, then every land split for each secondary color
    /// count. The secondary count never exceeds the primary one and the two
    /// together never exceed the turn.
    fn for_each_shape(&self, mut visit: impl FnMut(u32, [u32; 2], [u32; 3])) {
        let lands = self.land_count;
        for turn in 1..=self.max_turn {
            for a in 1..=turn.min(self.max_color_a) {
                for land_a in a..=lands {
                    visit(turn, [a, 0], [land_a, 0, 0]);
                }
                let max_b = (turn - a).min(self.max_color_b).min(a);
                for b in 1..=max_b {
                    for land_a in 0..=lands {
                        for land_b in 0..=lands - land_a {
                            for land_ab in 0..=lands - land_a - land_b {
                                visit(turn, [a, b], [land_a, land_b, land_ab]);
                            }
                        }
                    }
                }
            }
        }
    }

    /// Number of requirements `enumerate` produces
    pub fn count(&self) -> usize {
        let mut count = 0;
        self.for_each_shape(|_, _, _| count += 1);
        count
    }

    /// Build every requirement, each with its own seed from `seeds`
    pub fn enumerate(&self, seeds: &mut SeedSource) -> Vec<Requirement> {
        let mut requirements = Vec::with_capacity(self.count());
        self.for_each_shape(|turn, colors, split| {
            requirements.push(Requirement {
                deck_size: self.deck_size,
                land_count: self.land_count,
                target_turn: turn,
                color_requirement: colors,
                land_split: split,
                seed: seeds.next_seed(),
            });
        });
        requirements
    }
}
