//! Turns game replies and economy results into Discord messages.
//!
//! Text building is kept in plain functions returning `String` so it can be tested
//! without a gateway; the `Create*` builders only assemble those pieces.

use serenity::all::{
    ButtonStyle, CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter,
    CreateInteractionResponseMessage,
};

use crate::{
    bot::custom_id,
    error::game::GameError,
    model::{
        account::{Balance, Shortfall},
        card::Hand,
        game::{
            BlackjackMove, BlackjackView, ChallengeView, GameKind, GameReply, OutcomeKind,
            Resolution, RpsChoice, SettlementReport, SettlementStatus,
        },
        wager::WagerRecord,
    },
    service::game::expiry::ExpiryNotice,
};

const COLOR_PENDING: u32 = 0x5865f2;
const COLOR_WIN: u32 = 0x2ecc71;
const COLOR_LOSS: u32 = 0xe74c3c;
const COLOR_NEUTRAL: u32 = 0x95a5a6;
const COLOR_VOID: u32 = 0xe67e22;

pub fn game_title(game: GameKind) -> &'static str {
    match game {
        GameKind::Dice => "🎲 Dice duel",
        GameKind::RockPaperScissors => "✊ Rock, paper, scissors",
        GameKind::Blackjack => "🃏 Blackjack",
    }
}

/// Builds the message for a successful game action.
///
/// Public updates carry the challenge embed and whatever buttons the next step
/// needs. `AlreadySettled` is only shown to the user who pressed the button.
pub fn reply_message(reply: &GameReply) -> CreateInteractionResponseMessage {
    let message = CreateInteractionResponseMessage::new();

    match reply {
        GameReply::ChallengePosted(view) => message
            .content(format!("<@{}>", view.opponent_id))
            .embed(challenge_embed(view, &posted_text(view)))
            .components(vec![respond_row(view)]),
        GameReply::ChallengeAccepted(view) => message
            .embed(challenge_embed(view, &accepted_text(view)))
            .components(vec![rps_row(view)]),
        GameReply::MoveRecorded {
            challenge,
            waiting_on,
        } => message
            .embed(challenge_embed(
                challenge,
                &format!("One move is in. Waiting on <@{}>.", waiting_on),
            ))
            .components(vec![rps_row(challenge)]),
        GameReply::ChallengeDeclined {
            challenge,
            declined_by,
        } => message
            .embed(
                challenge_embed(challenge, &format!("<@{}> declined.", declined_by))
                    .color(COLOR_NEUTRAL),
            )
            .components(vec![]),
        GameReply::TableUpdated(view) => message
            .embed(table_embed(view))
            .components(vec![blackjack_row(view)]),
        GameReply::Resolved(report) => message
            .embed(result_embed(report))
            .components(vec![]),
        GameReply::AlreadySettled => message
            .content("This game has already been settled.")
            .ephemeral(true),
    }
}

/// Ephemeral message explaining why an action was refused.
pub fn error_message(err: &GameError) -> CreateInteractionResponseMessage {
    notice_message(&format!("❌ {}", err))
}

pub fn notice_message(text: &str) -> CreateInteractionResponseMessage {
    CreateInteractionResponseMessage::new()
        .content(text)
        .ephemeral(true)
}

/// Reply to a command left over from an older registration.
pub fn unknown_command_message() -> CreateInteractionResponseMessage {
    notice_message("That command isn't available anymore.")
}

fn challenge_embed(view: &ChallengeView, text: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title(game_title(view.game))
        .description(text)
        .color(COLOR_PENDING)
        .field("Stake", format!("{} cash", view.stake), true)
        .footer(CreateEmbedFooter::new(format!("Challenge {}", view.id)))
}

fn posted_text(view: &ChallengeView) -> String {
    format!(
        "<@{}> challenges <@{}> for **{}** cash. Expires <t:{}:R>.",
        view.challenger_id,
        view.opponent_id,
        view.stake,
        view.expires_at.timestamp()
    )
}

fn accepted_text(view: &ChallengeView) -> String {
    format!(
        "<@{}> accepted. Both players pick a move before <t:{}:R>; choices stay hidden.",
        view.opponent_id,
        view.expires_at.timestamp()
    )
}

fn respond_row(view: &ChallengeView) -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(custom_id::encode(view.game, custom_id::ACCEPT, &view.id))
            .label("Accept")
            .style(ButtonStyle::Success),
        CreateButton::new(custom_id::encode(view.game, custom_id::DECLINE, &view.id))
            .label("Decline")
            .style(ButtonStyle::Danger),
    ])
}

fn rps_row(view: &ChallengeView) -> CreateActionRow {
    CreateActionRow::Buttons(
        RpsChoice::ALL
            .iter()
            .map(|choice| {
                CreateButton::new(custom_id::encode(view.game, choice.as_str(), &view.id))
                    .label(format!("{} {}", choice.emoji(), choice.as_str()))
                    .style(ButtonStyle::Primary)
            })
            .collect(),
    )
}

fn blackjack_row(view: &BlackjackView) -> CreateActionRow {
    let button = |action: BlackjackMove, label: &str, style: ButtonStyle| {
        CreateButton::new(custom_id::encode(
            GameKind::Blackjack,
            action.as_str(),
            &view.id,
        ))
        .label(label)
        .style(style)
    };

    CreateActionRow::Buttons(vec![
        button(BlackjackMove::Hit, "Hit", ButtonStyle::Primary),
        button(BlackjackMove::Stand, "Stand", ButtonStyle::Secondary),
        button(BlackjackMove::Double, "Double", ButtonStyle::Success).disabled(!view.can_double),
    ])
}

fn table_embed(view: &BlackjackView) -> CreateEmbed {
    CreateEmbed::new()
        .title(game_title(GameKind::Blackjack))
        .description(format!(
            "{}\nActs before <t:{}:R>.",
            table_text(view),
            view.expires_at.timestamp()
        ))
        .color(COLOR_PENDING)
        .field("Stake", format!("{} cash", view.stake), true)
}

/// Both hands of a table; the dealer's hole card stays hidden until the hand is over.
pub fn table_text(view: &BlackjackView) -> String {
    format!(
        "<@{}>: {}\nDealer: {}",
        view.player_id,
        hand_text(&view.player, false),
        hand_text(&view.dealer, !view.finished)
    )
}

pub fn hand_text(hand: &Hand, hide_hole: bool) -> String {
    match hand.cards().first() {
        Some(up) if hide_hole => format!("{} ??", up),
        _ => format!("{} ({})", hand, hand.value()),
    }
}

fn result_embed(report: &SettlementReport) -> CreateEmbed {
    let color = match &report.status {
        SettlementStatus::Voided(_) => COLOR_VOID,
        SettlementStatus::NoPayout => COLOR_NEUTRAL,
        SettlementStatus::Paid(_) if report.winner().is_none() => COLOR_LOSS,
        SettlementStatus::Paid(_) => COLOR_WIN,
    };

    CreateEmbed::new()
        .title(game_title(report.game))
        .description(format!(
            "{}\n\n{}",
            resolution_text(report),
            status_text(report)
        ))
        .color(color)
        .footer(CreateEmbedFooter::new(format!(
            "Challenge {}",
            report.challenge_id
        )))
}

/// How the game played out.
pub fn resolution_text(report: &SettlementReport) -> String {
    let opponent = report
        .opponent_id
        .map(|id| format!("<@{}>", id))
        .unwrap_or_else(|| "The house".to_string());

    match &report.resolution {
        Resolution::Dice(rolls) => {
            let mut text = format!(
                "<@{}> rolled **{}**, {} rolled **{}**.",
                report.challenger_id, rolls.challenger, opponent, rolls.opponent
            );
            if rolls.attempts > 1 {
                text.push_str(&format!(" ({} draws)", rolls.attempts));
            }
            text
        }
        Resolution::Rps {
            challenger,
            opponent: opponent_choice,
        } => format!(
            "<@{}> picked {} {}, {} picked {} {}.",
            report.challenger_id,
            challenger.emoji(),
            challenger.as_str(),
            opponent,
            opponent_choice.emoji(),
            opponent_choice.as_str()
        ),
        Resolution::Blackjack(view) => table_text(view),
    }
}

/// What happened to the money.
pub fn status_text(report: &SettlementReport) -> String {
    match &report.status {
        SettlementStatus::Paid(balances) => {
            let amount = report.outcome.payout_a.abs();
            let mut text = match report.winner() {
                Some(winner) => format!("<@{}> wins **{}** cash.", winner, amount),
                None => format!("The house takes **{}** cash.", amount),
            };
            for (user_id, balance) in balances {
                text.push_str(&format!("\n<@{}> now has {} cash.", user_id, balance.cash));
            }
            text
        }
        SettlementStatus::NoPayout => match report.outcome.kind {
            OutcomeKind::Push => "Push. Nobody wins.".to_string(),
            _ => "It's a draw. No cash changes hands.".to_string(),
        },
        SettlementStatus::Voided(shortfall) => void_text(shortfall),
    }
}

fn void_text(shortfall: &Shortfall) -> String {
    if shortfall.balance >= shortfall.required {
        return format!(
            "<@{}>'s balance can't take this payout. The wager is void.",
            shortfall.user_id
        );
    }

    format!(
        "<@{}> can't cover the stake ({} of {} cash). The wager is void.",
        shortfall.user_id, shortfall.balance, shortfall.required
    )
}

/// Channel notice for a wager that timed out.
pub fn expiry_text(notice: &ExpiryNotice) -> String {
    let who = match notice.opponent_id {
        Some(opponent) => format!("<@{}> vs <@{}>", notice.challenger_id, opponent),
        None => format!("<@{}>", notice.challenger_id),
    };

    let Some(settlement) = &notice.settlement else {
        return format!(
            "⌛ The {} game of {} for {} cash expired. Nothing was paid out.",
            notice.game, who, notice.stake
        );
    };

    let result = match &settlement.status {
        SettlementStatus::Paid(_) if settlement.outcome.payout_a < 0 => format!(
            "<@{}> forfeits **{}** cash.",
            notice.challenger_id, -settlement.outcome.payout_a
        ),
        SettlementStatus::Paid(_) => format!(
            "<@{}> is paid **{}** cash.",
            notice.challenger_id, settlement.outcome.payout_a
        ),
        SettlementStatus::NoPayout => "It was settled as a push.".to_string(),
        SettlementStatus::Voided(shortfall) => void_text(shortfall),
    };

    format!(
        "⌛ The {} game of {} for {} cash timed out. {}",
        notice.game, who, notice.stake, result
    )
}

pub fn balance_embed(user_id: u64, balance: Balance) -> CreateEmbed {
    CreateEmbed::new()
        .title("💰 Balance")
        .description(format!("<@{}>", user_id))
        .color(COLOR_PENDING)
        .field("Cash", balance.cash.to_string(), true)
        .field("Bank", balance.bank.to_string(), true)
}

pub fn wagers_embed(user_id: u64, records: &[WagerRecord]) -> CreateEmbed {
    let description = if records.is_empty() {
        format!("<@{}> hasn't settled any wagers yet.", user_id)
    } else {
        records
            .iter()
            .map(|r| wager_line(user_id, r))
            .collect::<Vec<_>>()
            .join("\n")
    };

    CreateEmbed::new()
        .title("📜 Recent wagers")
        .description(description)
        .color(COLOR_PENDING)
}

/// One history line from the point of view of `user_id`.
pub fn wager_line(user_id: u64, record: &WagerRecord) -> String {
    let against = if record.challenger_id == user_id {
        record.opponent_id
    } else {
        Some(record.challenger_id)
    };
    let against = against
        .map(|id| format!("<@{}>", id))
        .unwrap_or_else(|| "the house".to_string());

    format!(
        "<t:{}:d> {} vs {}: {:+}",
        record.created_at.timestamp(),
        record.game,
        against,
        record.net_for(user_id)
    )
}

pub fn grant_text(user_id: u64, amount: i64, balance: Balance) -> String {
    format!(
        "Adjusted <@{}> by {:+} cash. New balance: {} cash, {} bank.",
        user_id, amount, balance.cash, balance.bank
    )
}

pub fn grant_refused_text(shortfall: &Shortfall) -> String {
    // Holding enough cash means the refusal came from a counter leaving its range.
    if shortfall.balance >= shortfall.required {
        return format!(
            "That adjustment would take <@{}>'s balance out of range.",
            shortfall.user_id
        );
    }

    format!(
        "<@{}> only has {} cash, so {} can't be removed.",
        shortfall.user_id, shortfall.balance, shortfall.required
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        model::{
            card::{Card, Rank, Suit},
            game::{ChallengeId, DiceRolls, DuelOutcome},
        },
        service::game::expiry::ExpirySettlement,
    };

    fn report(status: SettlementStatus, outcome: DuelOutcome) -> SettlementReport {
        SettlementReport {
            game: GameKind::Dice,
            challenge_id: ChallengeId::new(1, 10, 20, Utc::now()),
            challenger_id: 10,
            opponent_id: Some(20),
            stake: 20,
            outcome,
            resolution: Resolution::Dice(DiceRolls {
                attempts: 2,
                challenger: 5,
                opponent: 2,
            }),
            status,
        }
    }

    #[test]
    fn dice_resolution_mentions_redraws() {
        let report = report(SettlementStatus::NoPayout, DuelOutcome::draw());

        assert_eq!(
            resolution_text(&report),
            "<@10> rolled **5**, <@20> rolled **2**. (2 draws)"
        );
    }

    #[test]
    fn paid_status_names_winner_and_balances() {
        let report = report(
            SettlementStatus::Paid(vec![(10, Balance::new(120, 0)), (20, Balance::new(80, 0))]),
            DuelOutcome::a_wins(20),
        );

        assert_eq!(
            status_text(&report),
            "<@10> wins **20** cash.\n<@10> now has 120 cash.\n<@20> now has 80 cash."
        );
    }

    #[test]
    fn house_win_is_attributed_to_the_house() {
        let mut report = report(
            SettlementStatus::Paid(vec![(10, Balance::new(80, 0))]),
            DuelOutcome::b_wins(20),
        );
        report.opponent_id = None;

        assert!(status_text(&report).starts_with("The house takes **20** cash."));
    }

    #[test]
    fn voided_status_reports_shortfall() {
        let report = report(
            SettlementStatus::Voided(Shortfall {
                user_id: 20,
                balance: 5,
                required: 20,
            }),
            DuelOutcome::a_wins(20),
        );

        assert_eq!(
            status_text(&report),
            "<@20> can't cover the stake (5 of 20 cash). The wager is void."
        );
    }

    #[test]
    fn dealer_hole_card_stays_hidden() {
        let hand = Hand::from_cards(vec![
            Card::new(Rank::King, Suit::Hearts),
            Card::new(Rank::Seven, Suit::Clubs),
        ]);

        assert_eq!(hand_text(&hand, true), "K♥ ??");
        assert_eq!(hand_text(&hand, false), "K♥ 7♣ (17)");
    }

    #[test]
    fn history_line_is_signed_from_the_viewer() {
        let record = WagerRecord {
            game: "rps".to_string(),
            challenger_id: 10,
            opponent_id: Some(20),
            stake: 15,
            payout: 15,
            outcome: "win".to_string(),
            winner_id: Some(10),
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        };
        let ts = record.created_at.timestamp();

        assert_eq!(
            wager_line(20, &record),
            format!("<t:{}:d> rps vs <@10>: -15", ts)
        );
        assert_eq!(
            wager_line(10, &record),
            format!("<t:{}:d> rps vs <@20>: +15", ts)
        );
    }

    #[test]
    fn expiry_notice_names_both_sides() {
        let notice = ExpiryNotice {
            id: ChallengeId::new(1, 10, 20, Utc::now()),
            game: GameKind::RockPaperScissors,
            guild_id: 1,
            channel_id: 500,
            challenger_id: 10,
            opponent_id: Some(20),
            stake: 30,
            settlement: None,
        };

        assert_eq!(
            expiry_text(&notice),
            "⌛ The rock-paper-scissors game of <@10> vs <@20> for 30 cash expired. Nothing was paid out."
        );
    }

    #[test]
    fn abandoned_table_notice_names_forfeit() {
        let notice = ExpiryNotice {
            id: ChallengeId::for_session(1, 10, Utc::now()),
            game: GameKind::Blackjack,
            guild_id: 1,
            channel_id: 500,
            challenger_id: 10,
            opponent_id: None,
            stake: 50,
            settlement: Some(ExpirySettlement {
                outcome: DuelOutcome::b_wins(50),
                status: SettlementStatus::Paid(vec![(10, Balance::new(50, 0))]),
            }),
        };

        assert_eq!(
            expiry_text(&notice),
            "⌛ The blackjack game of <@10> for 50 cash timed out. <@10> forfeits **50** cash."
        );
    }

    #[test]
    fn out_of_range_grant_is_not_a_shortfall() {
        let overflow = Shortfall {
            user_id: 5,
            balance: i64::MAX - 5,
            required: 0,
        };
        let debit = Shortfall {
            user_id: 5,
            balance: 30,
            required: 50,
        };

        assert_eq!(
            grant_refused_text(&overflow),
            "That adjustment would take <@5>'s balance out of range."
        );
        assert_eq!(
            grant_refused_text(&debit),
            "<@5> only has 30 cash, so 50 can't be removed."
        );
    }

    #[test]
    fn unknown_command_gets_ephemeral_notice() {
        let message = serde_json::to_value(unknown_command_message()).unwrap();

        assert_eq!(message["content"], "That command isn't available anymore.");
        assert_eq!(message["flags"], 64);
    }
}
