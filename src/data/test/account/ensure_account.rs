use super::*;

/// Tests creating an account on first contact.
///
/// Verifies that a user with no row receives a zero balance and that the row is
/// persisted.
///
/// Expected: Ok(Balance { cash: 0, bank: 0 }) and one row in the table
#[tokio::test]
async fn creates_zero_balance_account() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AccountRepository::new(db);
    let balance = repo.ensure_account(1, 42).await?;

    assert_eq!(balance, Balance::new(0, 0));
    assert_eq!(entity::prelude::Account::find().count(db).await?, 1);

    Ok(())
}

/// Tests that an existing account is left untouched.
///
/// Expected: Ok with the seeded balance and no duplicate row
#[tokio::test]
async fn returns_existing_balance() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_account(db, "1", "42", 250).await?;

    let repo = AccountRepository::new(db);
    let balance = repo.ensure_account(1, 42).await?;

    assert_eq!(balance.cash, 250);
    assert_eq!(entity::prelude::Account::find().count(db).await?, 1);

    Ok(())
}

/// Tests that accounts are scoped per guild.
///
/// Expected: a second row for the same user in another guild
#[tokio::test]
async fn scopes_accounts_by_guild() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_ledger_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_account(db, "1", "42", 250).await?;

    let repo = AccountRepository::new(db);
    let balance = repo.ensure_account(2, 42).await?;

    assert_eq!(balance.cash, 0);
    assert_eq!(entity::prelude::Account::find().count(db).await?, 2);

    Ok(())
}
