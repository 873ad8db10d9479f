use super::*;

fn duel_transfer(winner: u64, loser: u64, stake: i64) -> LedgerTransfer {
    LedgerTransfer {
        guild_id: 1,
        legs: vec![
            LedgerLeg {
                user_id: winner,
                delta: BalanceDelta::cash(stake),
                required_cash: stake,
            },
            LedgerLeg {
                user_id: loser,
                delta: BalanceDelta::cash(-stake),
                required_cash: stake,
            },
        ],
        memo: Some(WagerMemo {
            game: GameKind::Dice,
            challenger_id: winner,
            opponent_id: Some(loser),
            stake,
            payout: stake,
            outcome: OutcomeKind::Win,
            winner_id: Some(winner),
        }),
    }
}

/// Tests a two-leg payout moving the stake from loser to winner.
///
/// Verifies that both balances change, the returned balances match the stored rows
/// and a wager log row is written.
///
/// Expected: Ok(LedgerCommit::Applied) with 120 / 80
#[tokio::test]
async fn applies_both_legs_and_logs_wager() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_account(db, "1", "10", 100).await?;
    factory::create_account(db, "1", "20", 100).await?;

    let repo = AccountRepository::new(db);
    let commit = repo.transfer(&duel_transfer(10, 20, 20)).await?;

    assert_eq!(
        commit,
        LedgerCommit::Applied(vec![(10, Balance::new(120, 0)), (20, Balance::new(80, 0))])
    );
    assert_eq!(repo.balance(1, 10).await?.cash, 120);
    assert_eq!(repo.balance(1, 20).await?.cash, 80);
    assert_eq!(entity::prelude::WagerLog::find().count(db).await?, 1);

    Ok(())
}

/// Tests that a loser who cannot cover the stake voids the whole transfer.
///
/// Expected: Ok(LedgerCommit::Insufficient) naming the loser, balances unchanged and
/// no wager log row
#[tokio::test]
async fn rejects_when_loser_cannot_cover_stake() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_account(db, "1", "10", 100).await?;
    factory::create_account(db, "1", "20", 5).await?;

    let repo = AccountRepository::new(db);
    let commit = repo.transfer(&duel_transfer(10, 20, 20)).await?;

    assert_eq!(
        commit,
        LedgerCommit::Insufficient(Shortfall {
            user_id: 20,
            balance: 5,
            required: 20,
        })
    );
    assert_eq!(repo.balance(1, 10).await?.cash, 100);
    assert_eq!(repo.balance(1, 20).await?.cash, 5);
    assert_eq!(entity::prelude::WagerLog::find().count(db).await?, 0);

    Ok(())
}

/// Tests that a winner who no longer holds the stake is rejected too.
///
/// The winner's leg only adds cash, but its required cash is the stake they put at
/// risk.
///
/// Expected: Ok(LedgerCommit::Insufficient) naming the winner
#[tokio::test]
async fn rejects_when_winner_cannot_cover_stake() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_account(db, "1", "10", 3).await?;
    factory::create_account(db, "1", "20", 100).await?;

    let repo = AccountRepository::new(db);
    let commit = repo.transfer(&duel_transfer(10, 20, 20)).await?;

    assert!(matches!(
        commit,
        LedgerCommit::Insufficient(Shortfall { user_id: 10, .. })
    ));
    assert_eq!(repo.balance(1, 10).await?.cash, 3);
    assert_eq!(repo.balance(1, 20).await?.cash, 100);

    Ok(())
}

/// Tests that a participant without an account row is created at zero and rejected.
///
/// Expected: Ok(LedgerCommit::Insufficient) with balance 0
#[tokio::test]
async fn missing_account_counts_as_zero() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_account(db, "1", "10", 100).await?;

    let repo = AccountRepository::new(db);
    let commit = repo.transfer(&duel_transfer(10, 20, 20)).await?;

    assert_eq!(
        commit,
        LedgerCommit::Insufficient(Shortfall {
            user_id: 20,
            balance: 0,
            required: 20,
        })
    );
    assert_eq!(repo.balance(1, 10).await?.cash, 100);

    Ok(())
}

/// Tests that a transfer without a memo leaves the wager log alone.
///
/// Expected: Ok(Applied) and no wager log row
#[tokio::test]
async fn transfer_without_memo_writes_no_history() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_account(db, "1", "10", 100).await?;
    factory::create_account(db, "1", "20", 100).await?;

    let mut transfer = duel_transfer(10, 20, 30);
    transfer.memo = None;

    let repo = AccountRepository::new(db);
    let commit = repo.transfer(&transfer).await?;

    assert!(matches!(commit, LedgerCommit::Applied(_)));
    assert_eq!(entity::prelude::WagerLog::find().count(db).await?, 0);

    Ok(())
}
