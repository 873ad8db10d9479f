//! Outcome computation for dice and rock-paper-scissors duels.
//!
//! Everything here is pure given its inputs; randomness comes in through `DieRoller`
//! so tests can fix the rolls.

use rand::Rng;

use crate::model::game::{DiceRolls, DuelOutcome, RpsChoice};

/// Maximum number of draws before a dice duel is declared a draw.
pub const MAX_DICE_ATTEMPTS: u8 = 5;

/// Source of six-sided die rolls.
pub trait DieRoller: Send + Sync {
    /// Returns a roll in `1..=6`.
    fn roll(&self) -> u8;
}

/// Uniform die backed by the thread-local RNG.
pub struct RandomDie;

impl DieRoller for RandomDie {
    fn roll(&self) -> u8 {
        rand::rng().random_range(1..=6)
    }
}

/// Draws a roll for each side, redrawing ties up to `MAX_DICE_ATTEMPTS` draws in total.
pub fn roll_dice(die: &dyn DieRoller) -> DiceRolls {
    let mut attempts = 0;

    loop {
        attempts += 1;
        let challenger = die.roll();
        let opponent = die.roll();

        if challenger != opponent || attempts >= MAX_DICE_ATTEMPTS {
            return DiceRolls {
                attempts,
                challenger,
                opponent,
            };
        }
    }
}

/// Higher roll takes the stake; equal final rolls are a draw.
pub fn resolve_dice(rolls: DiceRolls, stake: i64) -> DuelOutcome {
    match rolls.challenger.cmp(&rolls.opponent) {
        std::cmp::Ordering::Greater => DuelOutcome::a_wins(stake),
        std::cmp::Ordering::Less => DuelOutcome::b_wins(stake),
        std::cmp::Ordering::Equal => DuelOutcome::draw(),
    }
}

pub fn resolve_rps(challenger: RpsChoice, opponent: RpsChoice, stake: i64) -> DuelOutcome {
    if challenger.beats(opponent) {
        DuelOutcome::a_wins(stake)
    } else if opponent.beats(challenger) {
        DuelOutcome::b_wins(stake)
    } else {
        DuelOutcome::draw()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::game::OutcomeKind;
    use std::{collections::VecDeque, sync::Mutex};

    /// Die returning a fixed sequence, then sixes.
    pub(crate) struct SequenceDie {
        rolls: Mutex<VecDeque<u8>>,
        pub(crate) drawn: Mutex<usize>,
    }

    impl SequenceDie {
        pub(crate) fn new(rolls: &[u8]) -> Self {
            Self {
                rolls: Mutex::new(rolls.iter().copied().collect()),
                drawn: Mutex::new(0),
            }
        }
    }

    impl DieRoller for SequenceDie {
        fn roll(&self) -> u8 {
            *self.drawn.lock().unwrap() += 1;
            self.rolls.lock().unwrap().pop_front().unwrap_or(6)
        }
    }

    #[test]
    fn higher_roll_wins_full_stake() {
        let rolls = roll_dice(&SequenceDie::new(&[5, 2]));

        assert_eq!(rolls.attempts, 1);
        assert_eq!(resolve_dice(rolls, 20), DuelOutcome::a_wins(20));
    }

    #[test]
    fn ties_are_redrawn() {
        let rolls = roll_dice(&SequenceDie::new(&[3, 3, 4, 4, 1, 6]));

        assert_eq!(rolls.attempts, 3);
        assert_eq!((rolls.challenger, rolls.opponent), (1, 6));
        assert_eq!(resolve_dice(rolls, 10).kind, OutcomeKind::Loss);
    }

    #[test]
    fn dice_never_draw_more_than_five_times() {
        // A die that always ties would loop forever without the attempt cap.
        let die = SequenceDie::new(&[]);
        let rolls = roll_dice(&die);

        assert_eq!(rolls.attempts, MAX_DICE_ATTEMPTS);
        assert_eq!(*die.drawn.lock().unwrap(), 2 * MAX_DICE_ATTEMPTS as usize);
        assert_eq!(resolve_dice(rolls, 10), DuelOutcome::draw());
    }

    #[test]
    fn random_dice_always_terminate_in_range() {
        for _ in 0..500 {
            let rolls = roll_dice(&RandomDie);

            assert!((1..=MAX_DICE_ATTEMPTS).contains(&rolls.attempts));
            assert!((1..=6).contains(&rolls.challenger));
            assert!((1..=6).contains(&rolls.opponent));
        }
    }

    #[test]
    fn rps_is_a_cyclic_order() {
        for a in RpsChoice::ALL {
            for b in RpsChoice::ALL {
                if a == b {
                    assert!(!a.beats(b));
                    assert_eq!(resolve_rps(a, b, 10).kind, OutcomeKind::Draw);
                } else {
                    assert!(a.beats(b) ^ b.beats(a), "{a:?} vs {b:?}");
                }
            }
        }

        assert_eq!(
            resolve_rps(RpsChoice::Rock, RpsChoice::Scissors, 10),
            DuelOutcome::a_wins(10)
        );
        assert_eq!(
            resolve_rps(RpsChoice::Rock, RpsChoice::Paper, 10),
            DuelOutcome::b_wins(10)
        );
    }

    #[test]
    fn duel_payouts_sum_to_zero() {
        for a in RpsChoice::ALL {
            for b in RpsChoice::ALL {
                let outcome = resolve_rps(a, b, 25);
                assert_eq!(outcome.payout_a + outcome.payout_b, 0);
            }
        }

        for challenger in 1..=6 {
            for opponent in 1..=6 {
                let rolls = DiceRolls {
                    attempts: 1,
                    challenger,
                    opponent,
                };
                let outcome = resolve_dice(rolls, 40);
                assert_eq!(outcome.payout_a + outcome.payout_b, 0);
            }
        }
    }
}
