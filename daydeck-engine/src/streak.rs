//! Consecutive-visit streak calculation.

use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

use crate::constants::STREAK_SCAN_CAP_DAYS;

/// Count consecutive visited days ending at `today`.
///
/// Walks backward one calendar day at a time and stops at the first gap
/// or after [`STREAK_SCAN_CAP_DAYS`] days. The chain must include `today`
/// itself: if `today` is absent the streak is 0 regardless of history.
#[must_use]
pub fn streak(visit_dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut count = 0;
    let mut cursor = today;
    while count < STREAK_SCAN_CAP_DAYS && visit_dates.contains(&cursor) {
        count += 1;
        let Some(previous) = cursor.checked_sub_days(Days::new(1)) else {
            break;
        };
        cursor = previous;
    }
    count
}
