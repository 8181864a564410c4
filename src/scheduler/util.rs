use chrono::NaiveTime;

pub(super) fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

pub(super) fn seconds_to_hours(seconds: i64) -> f64 {
    seconds as f64 / 3600.0
}
