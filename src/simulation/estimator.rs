use crate::config::{Denominator, DrawConvention, EngineConfig};
use crate::requirement::Requirement;
use crate::rng::TrialRng;
use crate::simulation::hand::deal_opening_hand;

/// Knobs of the per-requirement Monte Carlo loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialSettings {
    pub trials: u32,
    pub mulligan_floor: u32,
    pub draw_convention: DrawConvention,
}

impl From<&EngineConfig> for TrialSettings {
    fn from(config: &EngineConfig) -> Self {
        TrialSettings {
            trials: config.trials,
            mulligan_floor: config.mulligan_floor,
            draw_convention: config.draw_convention,
        }
    }
}

/// How a single simulated game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    /// Fewer lands than the target turn: the colors don't matter
    Inapplicable,
    Failure,
    Success,
}

/// Counts accumulated over every trial of one requirement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Estimate {
    pub successes: u64,
    pub applicable: u64,
    pub trials: u64,
}

impl Estimate {
    pub fn record(&mut self, outcome: TrialOutcome) {
        self.trials += 1;
        match outcome {
            TrialOutcome::Inapplicable => {}
            TrialOutcome::Failure => self.applicable += 1,
            TrialOutcome::Success => {
                self.applicable += 1;
                self.successes += 1;
            }
        }
    }

    /// Estimated probability, or None when the denominator is zero
    pub fn probability(&self, denominator: Denominator) -> Option<f64> {
        let total = match denominator {
            Denominator::Conditional => self.applicable,
            Denominator::AllTrials => self.trials,
        };
        if total == 0 {
            None
        } else {
            Some(self.successes as f64 / total as f64)
        }
    }
}

/// Play one game: mulligan, draw to the target turn, then check the cost.
pub fn run_trial(
    requirement: &Requirement,
    stream: &mut TrialRng,
    settings: &TrialSettings,
) -> TrialOutcome {
    let mut opening = deal_opening_hand(requirement, stream, settings.mulligan_floor);

    let draws = settings.draw_convention.draws_until(requirement.target_turn);
    for _ in 0..draws {
        // Unreachable turns run the deck dry; stop rather than overdraw
        if opening.deck.is_empty() {
            break;
        }
        opening.hand.record(opening.deck.draw_card());
    }

    let hand = opening.hand;
    if hand.lands < requirement.target_turn {
        TrialOutcome::Inapplicable
    } else if hand.pays_colors(requirement.color_requirement) {
        TrialOutcome::Success
    } else {
        TrialOutcome::Failure
    }
}

/// Run every trial of one requirement from its own seed.
///
/// Pure in `(requirement, settings)`: the same inputs give the same counts.
pub fn estimate(requirement: &Requirement, settings: &TrialSettings) -> Estimate {
    let mut stream = TrialRng::new(requirement.seed);
    let mut estimate = Estimate::default();
    for _ in 0..settings.trials {
        estimate.record(run_trial(requirement, &mut stream, settings));
    }
    estimate
}
