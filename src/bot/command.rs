//! Slash command definitions and option parsing.
//!
//! Commands are registered on `ready` and parsed here into either a `GameAction` for
//! the game service or an economy request.

use serenity::all::{
    CommandInteraction, CommandOptionType, CreateCommand, CreateCommandOption, Permissions,
    ResolvedOption, ResolvedValue,
};

use crate::model::game::{GameAction, GameKind, Opponent};

pub const DICE: &str = "dice";
pub const RPS: &str = "rps";
pub const BLACKJACK: &str = "blackjack";
pub const BALANCE: &str = "balance";
pub const WAGERS: &str = "wagers";
pub const ECONOMY: &str = "economy";

const GRANT: &str = "grant";

/// A parsed slash command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Play(GameAction),
    Balance { user_id: Option<u64> },
    Wagers { user_id: Option<u64> },
    /// Administrative cash adjustment; negative amounts debit.
    Grant { user_id: u64, amount: i64 },
}

/// Every command the bot registers.
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        duel_command(DICE, "Challenge someone to a dice roll for cash"),
        duel_command(RPS, "Challenge someone to rock, paper, scissors for cash"),
        CreateCommand::new(BLACKJACK)
            .description("Play a hand of blackjack against the house")
            .add_option(stake_option()),
        CreateCommand::new(BALANCE)
            .description("Show a cash and bank balance")
            .add_option(CreateCommandOption::new(
                CommandOptionType::User,
                "user",
                "Whose balance to show (defaults to you)",
            )),
        CreateCommand::new(WAGERS)
            .description("Show recently settled wagers")
            .add_option(CreateCommandOption::new(
                CommandOptionType::User,
                "user",
                "Whose wagers to show (defaults to you)",
            )),
        CreateCommand::new(ECONOMY)
            .description("Manage the server economy")
            .default_member_permissions(Permissions::MANAGE_GUILD)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    GRANT,
                    "Add cash to (or with a negative amount, remove cash from) a member",
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "user", "Member to adjust")
                        .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::Integer,
                        "amount",
                        "Cash to add; negative to remove",
                    )
                    .required(true),
                ),
            ),
    ]
}

fn duel_command(name: &str, description: &str) -> CreateCommand {
    CreateCommand::new(name)
        .description(description)
        .add_option(
            CreateCommandOption::new(CommandOptionType::User, "opponent", "Who to challenge")
                .required(true),
        )
        .add_option(stake_option())
}

fn stake_option() -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::Integer, "stake", "Cash to wager")
        .required(true)
        .min_int_value(1)
}

/// Parses a command interaction.
///
/// # Returns
/// - `Some(SlashCommand)` - A known command with its options
/// - `None` - Unknown command or missing required options
pub fn parse(cmd: &CommandInteraction) -> Option<SlashCommand> {
    let options = cmd.data.options();

    match cmd.data.name.as_str() {
        DICE => Some(propose(GameKind::Dice, &options)),
        RPS => Some(propose(GameKind::RockPaperScissors, &options)),
        BLACKJACK => Some(propose(GameKind::Blackjack, &options)),
        BALANCE => Some(SlashCommand::Balance {
            user_id: user_option(&options, "user").map(|u| u.user_id),
        }),
        WAGERS => Some(SlashCommand::Wagers {
            user_id: user_option(&options, "user").map(|u| u.user_id),
        }),
        ECONOMY => {
            let sub = options.first()?;
            match (sub.name, &sub.value) {
                (GRANT, ResolvedValue::SubCommand(sub_options)) => Some(SlashCommand::Grant {
                    user_id: user_option(sub_options, "user")?.user_id,
                    amount: integer_option(sub_options, "amount")?,
                }),
                _ => None,
            }
        }
        _ => None,
    }
}

/// A missing stake reads as zero and is refused by the game service.
fn propose(game: GameKind, options: &[ResolvedOption<'_>]) -> SlashCommand {
    SlashCommand::Play(GameAction::ProposeChallenge {
        game,
        opponent: user_option(options, "opponent"),
        stake: integer_option(options, "stake").unwrap_or(0),
    })
}

fn user_option(options: &[ResolvedOption<'_>], name: &str) -> Option<Opponent> {
    options
        .iter()
        .find(|o| o.name == name)
        .and_then(|o| match &o.value {
            ResolvedValue::User(user, _) => Some(Opponent {
                user_id: user.id.get(),
                is_bot: user.bot,
            }),
            _ => None,
        })
}

fn integer_option(options: &[ResolvedOption<'_>], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|o| o.name == name)
        .and_then(|o| match o.value {
            ResolvedValue::Integer(value) => Some(value),
            _ => None,
        })
}
