use chrono::{DateTime, Datelike, Months, Utc};

/// Age in whole years on `now`, or on the date of death if there is one.
///
/// One year is taken off when the birthday anniversary has not been reached
/// in the final year. A 29 February birthday falls on 28 February in common
/// years.
pub fn current_age(
    date_of_birth: DateTime<Utc>,
    date_of_death: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> i32 {
    let until = date_of_death.unwrap_or(now);
    let mut age = until.year() - date_of_birth.year();

    if until < anniversary(date_of_birth, age) {
        age -= 1;
    }

    age
}

/// `date` shifted by whole years, clamped to the last day of the month
fn anniversary(date: DateTime<Utc>, years: i32) -> DateTime<Utc> {
    let months = Months::new(years.unsigned_abs().saturating_mul(12));
    let shifted = if years >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.unwrap_or(date)
}
