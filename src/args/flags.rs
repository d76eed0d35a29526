use anyhow::Context;

use recur::{Options, Rule};

use crate::args::{Configurable, Usage};

/// The format in which rules are given on the command line or on stdin.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InputFormat {
    /// The RFC 5545 `RRULE` string format, e.g., `FREQ=DAILY;COUNT=3`.
    #[default]
    Rrule,
    /// A JSON object of options, e.g., `{"freq": "DAILY", "count": 3}`.
    Json,
    /// An English sentence, e.g., `every day for 3 times`.
    Text,
}

impl InputFormat {
    pub const USAGE: Usage = Usage::flag(
        "--from <format>",
        "The format of the rules given (defaults to rrule).",
        r#"
The format of the rules given (defaults to rrule).

The legal values for this flag are `rrule` (default), `json` and `text`.

An `rrule` is a list of `KEY=VALUE` pairs separated by semicolons, as defined
by RFC 5545. An optional `RRULE:` prefix is permitted. For example,
`FREQ=MONTHLY;BYDAY=+1FR;COUNT=3`.

A `json` rule is an object whose keys are option names. For example,
`{"freq": "MONTHLY", "byweekday": "+1FR", "count": 3}`. Unknown keys are
rejected.

A `text` rule is a simple English sentence. For example,
`every month on the 1st Friday for 3 times`.
"#,
    );

    /// Reads the options of a rule written in this format.
    pub fn read(&self, input: &str) -> anyhow::Result<Options> {
        let opts = match *self {
            InputFormat::Rrule => recur::rfc::parse_string(input)?,
            InputFormat::Json => Options::from_json(input)?,
            InputFormat::Text => recur::text::parse(input)?,
        };
        Ok(opts)
    }
}

impl Configurable for InputFormat {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Long("from") => {
                *self = crate::args::parse(p, "--from")?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn usage(&self) -> &[Usage] {
        &[InputFormat::USAGE]
    }
}

impl std::str::FromStr for InputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<InputFormat> {
        Ok(match s {
            "rrule" => InputFormat::Rrule,
            "json" => InputFormat::Json,
            "text" => InputFormat::Text,
            unk => anyhow::bail!("unrecognized rule format `{unk}`"),
        })
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            InputFormat::Rrule => write!(f, "rrule"),
            InputFormat::Json => write!(f, "json"),
            InputFormat::Text => write!(f, "text"),
        }
    }
}

/// A datetime given as a flag.
///
/// Both the RRULE wire format (`20140101T090000Z`) and ISO 8601
/// (`2014-01-01T09:00:00` or `2014-01-01`) are accepted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateTime(jiff::civil::DateTime);

impl DateTime {
    /// Return the parsed datetime.
    pub fn get(&self) -> jiff::civil::DateTime {
        self.0
    }
}

impl std::str::FromStr for DateTime {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<DateTime> {
        let dt = recur::calendar::parse_flexible(s)
            .with_context(|| format!("failed to parse `{s}` as a datetime"))?;
        Ok(DateTime(dt))
    }
}

/// The `--start` flag, which provides the start of rules without one.
///
/// When not given, the current time is used. The current time may be
/// overridden with the `RECUR_NOW` environment variable.
#[derive(Clone, Debug, Default)]
pub struct Start(Option<DateTime>);

impl Start {
    pub const USAGE: Usage = Usage::flag(
        "--start <datetime>",
        "The start of rules that don't have one (defaults to now).",
        r#"
The start of rules that don't have one (defaults to now).

A rule's start (its DTSTART) is always its first candidate occurrence, and it
provides the default month, day, weekday and time of day for anything the rule
doesn't specify.

Datetimes may be written as `20140101T090000Z`, `20140101`,
`2014-01-01T09:00:00` or `2014-01-01`. A trailing `Z` is ignored: every
datetime is a wall clock time.

When this flag isn't given, the current time is used. The current time can be
overridden with the `RECUR_NOW` environment variable.
"#,
    );

    /// Return the start, falling back to the current time.
    pub fn get(&self) -> jiff::civil::DateTime {
        self.0.map(|dt| dt.get()).unwrap_or_else(|| *crate::NOW)
    }

    /// Returns true when `--start` was given.
    pub fn is_given(&self) -> bool {
        self.0.is_some()
    }

    /// Fills in the start of the given options when they don't have one.
    pub fn fill(&self, opts: &mut Options) {
        if opts.dtstart.is_none() {
            opts.dtstart = Some(self.get());
        }
    }

    /// Builds a rule from the given options, filling in its start first.
    pub fn rule(&self, mut opts: Options) -> anyhow::Result<Rule> {
        self.fill(&mut opts);
        Ok(Rule::new(opts)?)
    }
}

impl Configurable for Start {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Long("start") => {
                self.0 = Some(crate::args::parse(p, "--start")?);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn usage(&self) -> &[Usage] {
        &[Start::USAGE]
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn input_format() {
        assert_eq!("rrule".parse::<InputFormat>().unwrap(), InputFormat::Rrule);
        assert_eq!("json".parse::<InputFormat>().unwrap(), InputFormat::Json);
        assert_eq!("text".parse::<InputFormat>().unwrap(), InputFormat::Text);
        insta::assert_snapshot!(
            "ical".parse::<InputFormat>().unwrap_err(),
            @"unrecognized rule format `ical`",
        );
    }

    #[test]
    fn reads_each_format() {
        let rrule = InputFormat::Rrule.read("FREQ=DAILY;COUNT=3").unwrap();
        let json =
            InputFormat::Json.read(r#"{"freq": "DAILY", "count": 3}"#).unwrap();
        let text = InputFormat::Text.read("every day for 3 times").unwrap();
        assert_eq!(rrule, json);
        assert_eq!(rrule, text);
    }

    #[test]
    fn datetime() {
        let dt: DateTime = "20140101T090000Z".parse().unwrap();
        assert_eq!(dt.get(), date(2014, 1, 1).at(9, 0, 0, 0));
        let dt: DateTime = "2014-01-01".parse().unwrap();
        assert_eq!(dt.get(), date(2014, 1, 1).at(0, 0, 0, 0));
        insta::assert_snapshot!(
            format!("{:#}", "tomorrow".parse::<DateTime>().unwrap_err()),
            @"failed to parse `tomorrow` as a datetime: malformed date `tomorrow` (expected YYYYMMDD or YYYYMMDDTHHMMSSZ)",
        );
    }

    #[test]
    fn start_only_fills_missing() {
        let start = Start(Some("2014-01-01T09:00:00".parse().unwrap()));
        let mut opts = Options::default();
        start.fill(&mut opts);
        assert_eq!(opts.dtstart, Some(date(2014, 1, 1).at(9, 0, 0, 0)));

        let mut opts = Options {
            dtstart: Some(date(2000, 1, 1).at(0, 0, 0, 0)),
            ..Options::default()
        };
        start.fill(&mut opts);
        assert_eq!(opts.dtstart, Some(date(2000, 1, 1).at(0, 0, 0, 0)));
    }
}
