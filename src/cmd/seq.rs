use std::io::Write;

use anyhow::Context;

use crate::args::{
    self, Usage,
    flags::{DateTime, InputFormat, Start},
    positional::Inputs,
};

const USAGE: &'static str = r#"
Generate the occurrences of RFC 5545 recurrence rules.

Occurrences are printed in chronological order, one per line. A rule without
a start (DTSTART) starts at the current time, or at the time given by
`--start`.

Unless the rule has a COUNT or an UNTIL, or one of `-n/--limit` or `--before`
is given, occurrences are generated until the end of year 9999. Programs like
`head` may also be used to limit the output.

USAGE:
    recur seq <rule> ...

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Print the first Friday of each month, three times:

        $ recur seq --start 2014-01-01T09:00:00 'FREQ=MONTHLY;BYDAY=+1FR;COUNT=3'
        2014-01-03T09:00:00
        2014-02-07T09:00:00
        2014-03-07T09:00:00

    %snip-start%

    Find every Friday the 13th in 2015:

        $ recur seq --after 2015-01-01 --before 2016-01-01 \
            'FREQ=MONTHLY;BYDAY=FR;BYMONTHDAY=13;DTSTART=20140101T000000Z'
        2015-02-13T00:00:00
        2015-03-13T00:00:00
        2015-11-13T00:00:00

    Rules may also be written in English:

        $ recur seq --from text --start 2014-01-01 'every weekday' -n 3
        2014-01-01T00:00:00
        2014-01-02T00:00:00
        2014-01-03T00:00:00

    Find the next occurrence of a rule, starting from a particular datetime:

        $ recur seq --after 2014-06-01 -i 'FREQ=YEARLY;BYEASTER=0;DTSTART=20140101'
        2015-04-05T00:00:00

    %snip-end%
REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config = Config::default();
    let mut format = InputFormat::default();
    let mut start = Start::default();
    let mut rules = Inputs::new(Inputs::RULE);
    args::configure(
        p,
        USAGE,
        &mut [&mut config, &mut format, &mut start, &mut rules],
    )?;

    let mut wtr = std::io::stdout().lock();
    rules.try_map(|input| {
        let opts = format
            .read(input)
            .with_context(|| format!("invalid rule `{input}`"))?;
        let rule = start
            .rule(opts)
            .with_context(|| format!("invalid rule `{input}`"))?;
        log::debug!("expanding rule `{rule}`");
        for dt in config.occurrences(&rule).take(config.limit()) {
            writeln!(wtr, "{dt}")?;
        }
        Ok(true)
    })
}

#[derive(Debug, Default)]
struct Config {
    limit: Option<usize>,
    after: Option<DateTime>,
    before: Option<DateTime>,
    inclusive: bool,
}

impl Config {
    /// Returns the occurrences of `rule` selected by the flags given.
    ///
    /// With both bounds, occurrences in between are returned. With only one
    /// bound, the single occurrence nearest to it is returned. Otherwise, the
    /// occurrences are generated lazily.
    fn occurrences<'r>(
        &self,
        rule: &'r recur::Rule,
    ) -> Box<dyn Iterator<Item = jiff::civil::DateTime> + 'r> {
        let inclusive = self.inclusive;
        match (self.after, self.before) {
            (Some(after), Some(before)) => Box::new(
                rule.between(after.get(), before.get(), inclusive).into_iter(),
            ),
            (Some(after), None) => {
                Box::new(rule.after(after.get(), inclusive).into_iter())
            }
            (None, Some(before)) => {
                Box::new(rule.before(before.get(), inclusive).into_iter())
            }
            (None, None) => Box::new(rule.iter()),
        }
    }

    fn limit(&self) -> usize {
        self.limit.unwrap_or(usize::MAX)
    }
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        p: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        use lexopt::Arg::*;

        match *arg {
            Short('n') | Long("limit") => {
                self.limit = Some(args::parse(p, "-n/--limit")?);
            }
            Long("after") => {
                self.after = Some(args::parse(p, "--after")?);
            }
            Long("before") => {
                self.before = Some(args::parse(p, "--before")?);
            }
            Short('i') | Long("inclusive") => {
                self.inclusive = true;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        const LIMIT: Usage = Usage::flag(
            "-n/--limit <number>",
            "Print at most this many occurrences per rule.",
            r#"
Print at most this many occurrences per rule.

Zero is a legal value, but always results in no output.
"#,
        );
        const AFTER: Usage = Usage::flag(
            "--after <datetime>",
            "Only print occurrences after this datetime.",
            r#"
Only print occurrences after this datetime.

When given without `--before`, only the first occurrence after this datetime
is printed. When given with `--before`, every occurrence between the two is
printed.

Use `-i/--inclusive` to also print an occurrence equal to this datetime.
"#,
        );
        const BEFORE: Usage = Usage::flag(
            "--before <datetime>",
            "Only print occurrences before this datetime.",
            r#"
Only print occurrences before this datetime.

When given without `--after`, only the last occurrence before this datetime is
printed. Finding it requires generating every occurrence from the start of the
rule up to this datetime. When given with `--after`, every occurrence between
the two is printed.

Use `-i/--inclusive` to also print an occurrence equal to this datetime.
"#,
        );
        const INCLUSIVE: Usage = Usage::flag(
            "-i/--inclusive",
            "Make `--after` and `--before` inclusive.",
            r#"
Make `--after` and `--before` inclusive.

By default, an occurrence equal to either bound is not printed. With this flag,
it is.
"#,
        );

        &[LIMIT, AFTER, BEFORE, INCLUSIVE]
    }
}
