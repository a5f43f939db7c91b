use chrono::{NaiveDate, Utc};

/// Today's date in UTC. All entry and balance dates are UTC calendar days.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        if let Some(next) = current.succ_opt() {
            current = next;
        } else {
            break;
        }
    }
    days
}
