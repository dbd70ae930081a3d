// Copyright (c) 2026 Bpass
// Licensed under the Apache License, Version 2.0

#![forbid(unsafe_code)]

use bpass::core::release::{ReleaseError, ReleasePlan};
use bpass::core::time::{days, minutes, parse_timestamp, seconds};

#[test]
fn availability_follows_the_ten_day_curve() {
    let start = 1_700_000_000;
    let plan = ReleasePlan::from_duration(start, days(10), 10_000).unwrap();

    assert_eq!(plan.available_at(start - days(1), 0), 0);
    assert_eq!(plan.available_at(start + days(1), 0), 1000);
    assert_eq!(plan.available_at(start + days(1) + seconds(85), 0), 1000);
    assert_eq!(plan.available_at(start + days(1) + seconds(87), 0), 1001);
    assert_eq!(plan.available_at(start + days(11), 0), 10_000);
}

#[test]
fn minting_ahead_of_the_curve_delays_availability() {
    let start = 1_700_000_000;
    let plan = ReleasePlan::from_duration(start, days(10), 10_000).unwrap();

    let t = start + seconds(432);
    assert_eq!(plan.available_at(t, 0), 5);
    // two buyers take 5 each while only 5 were released
    assert_eq!(plan.available_at(t, 10), 0);
    assert_eq!(plan.available_at(t + seconds(432), 10), 0);
    assert_eq!(plan.available_at(t + seconds(864), 10), 5);
}

#[test]
fn setup_release_script_window() {
    let start = parse_timestamp("2022-02-23T17:00:00").unwrap();
    let plan = ReleasePlan::from_duration(start, minutes(500 * 10), 500).unwrap();
    assert_eq!(plan.end() - plan.start(), 300_000);
    // one pass every ten minutes
    assert_eq!(plan.released_at(start + minutes(10)), 1);
    assert_eq!(plan.released_at(start + minutes(10) - 1), 0);
    assert_eq!(plan.next_release_at(start), Some(start + minutes(10)));
}

#[test]
fn new_release_waits_for_the_previous_one_to_drain() {
    let plan = ReleasePlan::new(100, 200, 10).unwrap();
    assert_eq!(plan.ensure_can_replace(150, 2), Err(ReleaseError::StillAvailable(3)));
    assert_eq!(plan.ensure_can_replace(150, 5), Ok(()));
    assert_eq!(plan.ensure_can_replace(250, 9), Err(ReleaseError::StillAvailable(1)));
    assert_eq!(plan.ensure_can_replace(250, 10), Ok(()));
}
