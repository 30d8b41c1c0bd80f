//! Shared builders for integration tests

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use ladder_ratings::config::{AppConfig, ErrorPolicy};
use ladder_ratings::{Ladder, MatchRecord, Season};

/// Evening of the given day in February 2021
pub fn at(day: u32) -> NaiveDateTime {
    day_in(2, day)
}

pub fn day_in(month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, month, day)
        .and_then(|date| date.and_hms_opt(20, 0, 0))
        .expect("valid test date")
}

/// `winner` beats `loser` in the most recent season
pub fn win(when: NaiveDateTime, winner: &str, loser: &str) -> MatchRecord {
    MatchRecord::new(when, winner, loser, winner, 0)
}

pub fn win_in(when: NaiveDateTime, winner: &str, loser: &str, season: Season) -> MatchRecord {
    MatchRecord::new(when, winner, loser, winner, season)
}

pub fn config_with_seasons(seasons: &[&str]) -> AppConfig {
    let mut config = AppConfig::default();
    config.ladder.seasons = seasons.iter().map(|s| s.to_string()).collect();
    config
}

pub fn ladder() -> Ladder {
    Ladder::new(AppConfig::default()).expect("default config is valid")
}

pub fn lenient_ladder() -> Ladder {
    let mut config = AppConfig::default();
    config.pipeline.error_policy = ErrorPolicy::SkipBestEffort;
    Ladder::new(config).expect("default config is valid")
}

/// Small two-season ledger with a root player called "zero"
pub fn sample_ledger() -> Vec<MatchRecord> {
    vec![
        win_in(day_in(1, 5), "zero", "alice", 1).with_races("Protoss", "Terran"),
        win_in(day_in(1, 6), "alice", "bob", 1).with_races("Terran", "Zerg"),
        win_in(day_in(1, 7), "carol", "dave", 1),
        win_in(day_in(3, 2), "bob", "carol", 0).with_teams("Blue", "Green"),
        win_in(day_in(3, 3), "zero", "dave", 0).with_mmrs(4200, 3900),
        win_in(day_in(3, 4), "erin", "frank", 0),
    ]
}
