//! Button custom ids.
//!
//! Every game button carries `<game>:<verb>:<challenge id>`, which is enough to turn
//! a click back into a `GameAction` without any per-message state.

use crate::model::game::{
    BlackjackMove, ChallengeId, ChallengeResponse, GameAction, GameKind, GameMove, RpsChoice,
};

pub const ACCEPT: &str = "accept";
pub const DECLINE: &str = "decline";

pub fn encode(game: GameKind, verb: &str, id: &ChallengeId) -> String {
    format!("{}:{}:{}", game.as_str(), verb, id)
}

/// Parses a button custom id into the action it stands for.
///
/// # Returns
/// - `Some(GameAction)` - A well-formed game button
/// - `None` - Not one of ours, or malformed
pub fn decode(custom_id: &str) -> Option<GameAction> {
    let mut parts = custom_id.splitn(3, ':');
    let game = GameKind::parse(parts.next()?)?;
    let verb = parts.next()?;
    let challenge_id = ChallengeId::parse(parts.next()?)?;

    let response = match verb {
        ACCEPT => Some(ChallengeResponse::Accept),
        DECLINE => Some(ChallengeResponse::Decline),
        _ => None,
    };
    if let Some(response) = response {
        return Some(GameAction::RespondToChallenge {
            game,
            challenge_id,
            response,
        });
    }

    let game_move = match game {
        GameKind::RockPaperScissors => GameMove::Rps(RpsChoice::parse(verb)?),
        GameKind::Blackjack => GameMove::Blackjack(BlackjackMove::parse(verb)?),
        GameKind::Dice => return None,
    };

    Some(GameAction::SubmitMove {
        game,
        challenge_id,
        game_move,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ChallengeId {
        ChallengeId::parse("1-10-20-1700000000000").unwrap()
    }

    #[test]
    fn decodes_accept_and_decline() {
        let accept = decode(&encode(GameKind::Dice, ACCEPT, &id()));
        assert_eq!(
            accept,
            Some(GameAction::RespondToChallenge {
                game: GameKind::Dice,
                challenge_id: id(),
                response: ChallengeResponse::Accept,
            })
        );

        let decline = decode("rps:decline:1-10-20-1700000000000");
        assert!(matches!(
            decline,
            Some(GameAction::RespondToChallenge {
                game: GameKind::RockPaperScissors,
                response: ChallengeResponse::Decline,
                ..
            })
        ));
    }

    #[test]
    fn decodes_moves_per_game() {
        assert_eq!(
            decode(&encode(GameKind::RockPaperScissors, "paper", &id())),
            Some(GameAction::SubmitMove {
                game: GameKind::RockPaperScissors,
                challenge_id: id(),
                game_move: GameMove::Rps(RpsChoice::Paper),
            })
        );

        let session = ChallengeId::parse("1-10-1700000000000").unwrap();
        assert_eq!(
            decode(&encode(GameKind::Blackjack, "double", &session)),
            Some(GameAction::SubmitMove {
                game: GameKind::Blackjack,
                challenge_id: session,
                game_move: GameMove::Blackjack(BlackjackMove::Double),
            })
        );
    }

    #[test]
    fn rejects_foreign_and_malformed_ids() {
        assert_eq!(decode("poker:accept:1-10-20-1"), None);
        assert_eq!(decode("dice:roll:1-10-20-1"), None);
        assert_eq!(decode("rps:hit:1-10-20-1"), None);
        assert_eq!(decode("blackjack:rock:1-10-1"), None);
        assert_eq!(decode("dice:accept:not-an-id"), None);
        assert_eq!(decode("dice:accept"), None);
        assert_eq!(decode(""), None);
    }
}
