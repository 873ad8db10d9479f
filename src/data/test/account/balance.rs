use super::*;

/// Tests reading both counters of an existing account.
///
/// Expected: Ok(Balance) matching the seeded row
#[tokio::test]
async fn reads_existing_balance() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::account::AccountFactory::new(db)
        .guild_id("1")
        .user_id("7")
        .cash(90)
        .bank(15)
        .build()
        .await?;

    let repo = AccountRepository::new(db);
    let balance = repo.balance(1, 7).await?;

    assert_eq!(balance, Balance::new(90, 15));

    Ok(())
}

/// Tests that a missing account reads as zero without being created.
///
/// Expected: Ok(Balance::default()) and no rows inserted
#[tokio::test]
async fn missing_account_reads_as_zero() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AccountRepository::new(db);
    let balance = repo.balance(1, 7).await?;

    assert_eq!(balance, Balance::default());
    assert_eq!(entity::prelude::Account::find().count(db).await?, 0);

    Ok(())
}

/// Tests that the query fails when the table is missing.
///
/// Expected: Err(DbErr)
#[tokio::test]
async fn fails_without_table() -> Result<(), DbErr> {
    let test = TestBuilder::new().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AccountRepository::new(db);
    let result = repo.balance(1, 7).await;

    assert!(result.is_err());

    Ok(())
}
