use crate::{
    data::{account::AccountRepository, ledger::Ledger},
    model::{
        account::{Balance, BalanceDelta, LedgerCommit, LedgerLeg, LedgerTransfer, Shortfall},
        game::{GameKind, OutcomeKind},
        wager::WagerMemo,
    },
};
use sea_orm::{DbErr, EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

mod apply_delta;
mod balance;
mod ensure_account;
mod transfer;
