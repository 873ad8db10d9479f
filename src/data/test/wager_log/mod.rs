use crate::data::wager_log::WagerLogRepository;
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory::wager_log::WagerLogFactory};

mod get_recent_for_user;
