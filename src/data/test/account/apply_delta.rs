use super::*;

/// Tests crediting the primary currency of a new account.
///
/// Expected: Ok(Applied) and the account created with the credited amount
#[tokio::test]
async fn credits_new_account() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AccountRepository::new(db);
    let commit = repo.apply_delta(1, 5, BalanceDelta::cash(500)).await?;

    assert_eq!(
        commit,
        LedgerCommit::Applied(vec![(5, Balance::new(500, 0))])
    );
    assert_eq!(repo.balance(1, 5).await?.cash, 500);

    Ok(())
}

/// Tests adjusting both counters at once.
///
/// Expected: Ok(Applied) with both counters changed
#[tokio::test]
async fn adjusts_both_counters() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::account::AccountFactory::new(db)
        .guild_id("1")
        .user_id("5")
        .cash(100)
        .bank(100)
        .build()
        .await?;

    let repo = AccountRepository::new(db);
    repo.apply_delta(1, 5, BalanceDelta { cash: -40, bank: 40 })
        .await?;

    assert_eq!(repo.balance(1, 5).await?, Balance::new(60, 140));

    Ok(())
}

/// Tests that a debit below zero is refused.
///
/// Expected: Ok(Insufficient) and the balance unchanged
#[tokio::test]
async fn refuses_negative_balance() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_account(db, "1", "5", 30).await?;

    let repo = AccountRepository::new(db);
    let commit = repo.apply_delta(1, 5, BalanceDelta::cash(-50)).await?;

    assert_eq!(
        commit,
        LedgerCommit::Insufficient(Shortfall {
            user_id: 5,
            balance: 30,
            required: 50,
        })
    );
    assert_eq!(repo.balance(1, 5).await?.cash, 30);

    Ok(())
}

/// Tests that a credit overflowing the counter is refused.
///
/// Expected: Ok(Insufficient) and the balance unchanged
#[tokio::test]
async fn refuses_overflowing_credit() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_account(db, "1", "5", i64::MAX - 5).await?;

    let repo = AccountRepository::new(db);
    let commit = repo.apply_delta(1, 5, BalanceDelta::cash(10)).await?;

    assert!(matches!(
        commit,
        LedgerCommit::Insufficient(Shortfall { user_id: 5, .. })
    ));
    assert_eq!(repo.balance(1, 5).await?.cash, i64::MAX - 5);

    Ok(())
}
