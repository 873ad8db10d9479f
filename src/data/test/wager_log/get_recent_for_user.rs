use super::*;

/// Tests that wagers are found on either side of the duel.
///
/// Verifies that the repository returns rows where the user was the challenger and
/// rows where the user was the opponent, newest first.
///
/// Expected: Ok with both rows, most recent first
#[tokio::test]
async fn finds_wagers_as_challenger_and_opponent() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    WagerLogFactory::new(db, "10")
        .opponent_id("20")
        .stake(15)
        .created_at(now - Duration::minutes(5))
        .build()
        .await?;
    WagerLogFactory::new(db, "30")
        .opponent_id("10")
        .game("rps")
        .stake(25)
        .outcome("win", Some("30".to_string()))
        .created_at(now)
        .build()
        .await?;

    let repo = WagerLogRepository::new(db);
    let records = repo.get_recent_for_user(1, 10, 10).await?;

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].game, "rps");
    assert_eq!(records[0].net_for(10), -25);
    assert_eq!(records[1].game, "dice");
    assert_eq!(records[1].net_for(10), 15);

    Ok(())
}

/// Tests that other users' wagers and other guilds are excluded.
///
/// Expected: Ok with only the matching row
#[tokio::test]
async fn excludes_other_users_and_guilds() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    WagerLogFactory::new(db, "10").opponent_id("20").build().await?;
    WagerLogFactory::new(db, "30").opponent_id("40").build().await?;
    WagerLogFactory::new(db, "10")
        .guild_id("2")
        .opponent_id("20")
        .build()
        .await?;

    let repo = WagerLogRepository::new(db);
    let records = repo.get_recent_for_user(1, 10, 10).await?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].opponent_id, Some(20));

    Ok(())
}

/// Tests that the limit caps the number of rows.
///
/// Expected: Ok with `limit` rows
#[tokio::test]
async fn respects_limit() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    for _ in 0..5 {
        WagerLogFactory::new(db, "10").build().await?;
    }

    let repo = WagerLogRepository::new(db);
    let records = repo.get_recent_for_user(1, 10, 3).await?;

    assert_eq!(records.len(), 3);

    Ok(())
}

/// Tests house games, where there is no opponent.
///
/// Expected: Ok with `opponent_id` None and the payout as net
#[tokio::test]
async fn reads_house_games() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    WagerLogFactory::new(db, "10")
        .game("blackjack")
        .stake(20)
        .payout(30)
        .build()
        .await?;

    let repo = WagerLogRepository::new(db);
    let records = repo.get_recent_for_user(1, 10, 10).await?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].opponent_id, None);
    assert_eq!(records[0].net_for(10), 30);

    Ok(())
}

/// Tests that an empty history is returned as an empty list.
///
/// Expected: Ok(vec![])
#[tokio::test]
async fn returns_empty_for_no_history() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = WagerLogRepository::new(db);
    let records = repo.get_recent_for_user(1, 10, 10).await?;

    assert!(records.is_empty());

    Ok(())
}
