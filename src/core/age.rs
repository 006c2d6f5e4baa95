//! Derived ages for exposed resources

use chrono::{DateTime, Datelike, Months, Utc};

/// Age in whole years at `now`, or at `date_of_death` when there is one
///
/// A birthday on 29 February is celebrated on 28 February in common years.
pub fn current_age(
    date_of_birth: DateTime<Utc>,
    date_of_death: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i32 {
    let end = date_of_death.unwrap_or(now);
    let mut age = end.year() - date_of_birth.year();

    let anniversary = if age >= 0 {
        date_of_birth.checked_add_months(Months::new(12 * age.unsigned_abs()))
    } else {
        date_of_birth.checked_sub_months(Months::new(12 * age.unsigned_abs()))
    };
    if anniversary.is_some_and(|anniversary| end < anniversary) {
        age -= 1;
    }
    age
}
