/*!
The RFC 5545 `RRULE` string format.

A rule is written as semicolon separated `KEY=VALUE` pairs, e.g.,
`FREQ=MONTHLY;COUNT=5;BYDAY=+1FR`. Only options that were actually given are
written, always in the same order. List values are comma separated, weekdays
are written as an optional signed number followed by a two letter code and
datetimes are written as `YYYYMMDDTHHMMSSZ`.
*/

use std::fmt::Write;

use crate::{
    calendar,
    error::{Error, ParseError},
    rule::{Frequency, Options},
    weekday::ByWeekday,
};

/// Writes the given options as an `RRULE` string.
///
/// Options that weren't given are skipped. An empty set of options produces
/// an empty string.
pub fn options_to_string(opts: &Options) -> String {
    let mut pairs = Pairs::default();
    if let Some(freq) = opts.freq {
        pairs.push("FREQ", freq);
    }
    if let Some(dtstart) = opts.dtstart {
        pairs.push("DTSTART", calendar::format_datetime(dtstart));
    }
    if let Some(interval) = opts.interval {
        pairs.push("INTERVAL", interval);
    }
    if let Some(wkst) = opts.wkst {
        pairs.push("WKST", ByWeekday::any(wkst).code());
    }
    if let Some(count) = opts.count {
        pairs.push("COUNT", count);
    }
    if let Some(until) = opts.until {
        pairs.push("UNTIL", calendar::format_datetime(until));
    }
    pairs.list("BYSETPOS", &opts.bysetpos);
    pairs.list("BYMONTH", &opts.bymonth);
    pairs.list("BYMONTHDAY", &opts.bymonthday);
    pairs.list("BYYEARDAY", &opts.byyearday);
    pairs.list("BYWEEKNO", &opts.byweekno);
    pairs.list("BYDAY", &opts.byweekday);
    pairs.list("BYHOUR", &opts.byhour);
    pairs.list("BYMINUTE", &opts.byminute);
    pairs.list("BYSECOND", &opts.bysecond);
    if let Some(byeaster) = opts.byeaster {
        pairs.push("BYEASTER", byeaster);
    }
    pairs.out
}

#[derive(Default)]
struct Pairs {
    out: String,
}

impl Pairs {
    fn push(&mut self, key: &str, value: impl std::fmt::Display) {
        if !self.out.is_empty() {
            self.out.push(';');
        }
        // OK because writing to a `String` never fails.
        write!(self.out, "{key}={value}").unwrap();
    }

    fn list<T: std::fmt::Display>(&mut self, key: &str, values: &[T]) {
        if values.is_empty() {
            return;
        }
        let joined = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<String>>()
            .join(",");
        self.push(key, joined);
    }
}

/// Parses an `RRULE` string into options.
///
/// A leading `RRULE:` is permitted, keys are case insensitive and empty
/// segments (e.g., from a trailing `;`) are ignored. The options returned
/// have not been validated. That happens when a `Rule` is built from them.
pub fn parse_string(s: &str) -> Result<Options, Error> {
    let s = s.trim();
    let s = match s.get(..6) {
        Some(prefix) if prefix.eq_ignore_ascii_case("RRULE:") => &s[6..],
        _ => s,
    };
    if s.trim().is_empty() {
        return Err(ParseError::UnexpectedEnd.into());
    }

    let mut opts = Options::default();
    for segment in s.split(';') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some((key, value)) = segment.split_once('=') else {
            return Err(ParseError::MalformedToken(segment.to_string()).into());
        };
        let value = value.trim();
        match &*key.trim().to_ascii_uppercase() {
            "FREQ" => opts.freq = Some(parse_frequency(value)?),
            "DTSTART" => opts.dtstart = Some(calendar::parse_datetime(value)?),
            "INTERVAL" => opts.interval = Some(parse_number(value)?),
            "WKST" => opts.wkst = Some(parse_weekday(value)?.weekday()),
            "COUNT" => opts.count = Some(parse_number(value)?),
            "UNTIL" => opts.until = Some(calendar::parse_datetime(value)?),
            "BYSETPOS" => opts.bysetpos = parse_list(value, parse_number)?,
            "BYMONTH" => opts.bymonth = parse_list(value, parse_number)?,
            "BYMONTHDAY" => opts.bymonthday = parse_list(value, parse_number)?,
            "BYYEARDAY" => opts.byyearday = parse_list(value, parse_number)?,
            "BYWEEKNO" => opts.byweekno = parse_list(value, parse_number)?,
            "BYDAY" => opts.byweekday = parse_list(value, parse_weekday)?,
            "BYHOUR" => opts.byhour = parse_list(value, parse_number)?,
            "BYMINUTE" => opts.byminute = parse_list(value, parse_number)?,
            "BYSECOND" => opts.bysecond = parse_list(value, parse_number)?,
            "BYEASTER" => opts.byeaster = Some(parse_number(value)?),
            _ => {
                return Err(
                    ParseError::UnknownProperty(key.trim().to_string()).into()
                );
            }
        }
    }
    Ok(opts)
}

/// Parses a frequency, which must be written with its full RFC 5545 name.
fn parse_frequency(value: &str) -> Result<Frequency, ParseError> {
    Frequency::ALL
        .iter()
        .copied()
        .find(|freq| freq.as_str().eq_ignore_ascii_case(value))
        .ok_or_else(|| ParseError::MalformedToken(value.to_string()))
}

fn parse_weekday(value: &str) -> Result<ByWeekday, Error> {
    value.parse()
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, Error> {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::MalformedToken(value.to_string()).into());
    }
    value
        .parse()
        .map_err(|_| ParseError::MalformedToken(value.to_string()).into())
}

fn parse_list<T>(
    value: &str,
    parse: impl Fn(&str) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    value.split(',').map(|v| parse(v.trim())).collect()
}
