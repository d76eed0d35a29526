/*!
Calendar arithmetic used by the occurrence iterator.

Dates are mapped to "ordinals," the number of days since 1970-01-01. The
iterator works almost exclusively with ordinals and day-of-year indices, and
only converts back to civil dates when it emits an occurrence.

Weekdays are numbered from Monday (`0`) to Sunday (`6`). Every weekday mask
built by the iterator relies on this numbering.
*/

use std::sync::LazyLock;

use {
    jiff::{
        ToSpan,
        civil::{Date, DateTime, Time, Weekday},
    },
    regex::Regex,
};

use crate::error::ParseError;

/// The largest year an occurrence may fall in.
pub const MAX_YEAR: i32 = 9999;

/// The date corresponding to ordinal `0`.
const EPOCH: Date = jiff::civil::date(1970, 1, 1);

/// Returns the number of days between 1970-01-01 and the given date.
pub fn to_ordinal(date: Date) -> i32 {
    // OK because the span between any two civil dates, in units of days,
    // always fits.
    EPOCH.until(date).unwrap().get_days()
}

/// The inverse of `to_ordinal`.
///
/// Returns `None` when the ordinal is outside of the range of supported
/// civil dates.
pub fn from_ordinal(ordinal: i32) -> Option<Date> {
    EPOCH.checked_add(ordinal.days()).ok()
}

/// Returns true if the given year is a leap year in the Gregorian calendar.
///
/// Unlike `jiff::civil::Date::in_leap_year`, this accepts any year, which is
/// convenient when looking one year past the maximum.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Returns the number of days in the given year.
pub fn days_in_year(year: i32) -> usize {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Returns the number of days in the given month of the given year.
pub fn days_in_month(year: i32, month: i8) -> i8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Returns the weekday of the given date, with Monday as `0`.
pub fn weekday(date: Date) -> usize {
    weekday_index(date.weekday())
}

/// Converts a weekday into an index with Monday as `0`.
pub fn weekday_index(weekday: Weekday) -> usize {
    // OK because a Monday-zero offset is always in 0..=6.
    usize::try_from(weekday.to_monday_zero_offset()).unwrap()
}

/// Converts an index with Monday as `0` into a weekday. Indices wrap around.
pub fn weekday_from_index(index: usize) -> Weekday {
    // OK because `index % 7` always fits in an `i8` and is in 0..=6.
    Weekday::from_monday_zero_offset(i8::try_from(index % 7).unwrap())
        .unwrap()
}

/// Returns the day of the year of the given date, in the range `1..=366`.
pub fn year_day(date: Date) -> i16 {
    date.day_of_year()
}

/// Returns the weekday of the first day of the given month along with the
/// number of days in that month.
///
/// Returns `None` when the year or month is out of range.
pub fn month_range(year: i16, month: i8) -> Option<(Weekday, i8)> {
    let first = Date::new(year, month, 1).ok()?;
    Some((first.weekday(), first.days_in_month()))
}

/// Merges a date with a time of day.
pub fn combine(date: Date, time: Time) -> DateTime {
    date.to_datetime(time)
}

/// Drops any fractional seconds from the given datetime.
pub fn truncate_to_second(dt: DateTime) -> DateTime {
    dt.date().at(dt.hour(), dt.minute(), dt.second(), 0)
}

/// Returns the current wall clock time, truncated to whole seconds.
pub fn now() -> DateTime {
    truncate_to_second(jiff::Zoned::now().datetime())
}

/// The remainder of floor division. The result has the sign of `b`.
pub fn pymod(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r != 0 && ((r < 0) != (b < 0)) { r + b } else { r }
}

/// Floor division along with the corresponding `pymod` remainder.
pub fn divmod(a: i64, b: i64) -> (i64, i64) {
    let r = pymod(a, b);
    ((a - r) / b, r)
}

/// Returns the date of Easter Sunday in the given year.
///
/// This uses the anonymous Gregorian algorithm. `None` is returned for years
/// outside of the supported range.
pub fn easter(year: i16) -> Option<Date> {
    let y = i32::from(year);
    let a = y % 19;
    let b = y / 100;
    let c = y % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    Date::new(year, i8::try_from(month).ok()?, i8::try_from(day).ok()?).ok()
}

/// Parses a datetime in the RRULE wire format.
///
/// Both `YYYYMMDD` and `YYYYMMDDTHHMMSS` are accepted, the latter with an
/// optional trailing `Z`. The `Z` doesn't change anything: every datetime
/// handled by this crate is a naive wall clock time.
pub fn parse_datetime(s: &str) -> Result<DateTime, ParseError> {
    static RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(
            r"^(\d{4})(\d{2})(\d{2})(?:[Tt](\d{2})(\d{2})(\d{2})[Zz]?)?$",
        )
        .unwrap()
    });

    let malformed = || ParseError::MalformedDate(s.to_string());
    let caps = RE.captures(s).ok_or_else(malformed)?;
    let num = |i: usize| -> Result<i16, ParseError> {
        match caps.get(i) {
            None => Ok(0),
            Some(m) => m.as_str().parse().map_err(|_| malformed()),
        }
    };
    let year = num(1)?;
    let month = i8::try_from(num(2)?).map_err(|_| malformed())?;
    let day = i8::try_from(num(3)?).map_err(|_| malformed())?;
    let hour = i8::try_from(num(4)?).map_err(|_| malformed())?;
    let minute = i8::try_from(num(5)?).map_err(|_| malformed())?;
    let second = i8::try_from(num(6)?).map_err(|_| malformed())?;
    let date = Date::new(year, month, day).map_err(|_| malformed())?;
    let time = Time::new(hour, minute, second, 0).map_err(|_| malformed())?;
    Ok(combine(date, time))
}

/// Formats a datetime in the RRULE wire format, `YYYYMMDDTHHMMSSZ`.
pub fn format_datetime(dt: DateTime) -> String {
    dt.strftime("%Y%m%dT%H%M%SZ").to_string()
}

/// Parses a datetime in either the RRULE wire format or ISO 8601.
///
/// ISO 8601 input may be a date (`2014-01-01`) or a datetime
/// (`2014-01-01T09:00:00`). Dates are interpreted as midnight.
pub fn parse_flexible(s: &str) -> Result<DateTime, ParseError> {
    let s = s.trim();
    if let Ok(dt) = parse_datetime(s) {
        return Ok(dt);
    }
    if let Ok(dt) = s.parse::<DateTime>() {
        return Ok(dt);
    }
    if let Ok(date) = s.parse::<Date>() {
        return Ok(date.to_datetime(Time::midnight()));
    }
    log::debug!("`{s}` is neither an RRULE nor an ISO 8601 datetime");
    Err(ParseError::MalformedDate(s.to_string()))
}
