use std::io::Write;

use anyhow::Context;

use crate::args::{self, Usage, flags::Start, positional::Inputs};

const USAGE: &'static str = r#"
Convert English sentences into recurrence rules.

Each sentence is printed as an RFC 5545 RRULE string (or as JSON with
`--json`) on its own line. The rule is validated before it is printed.

USAGE:
    recur parse <sentence> ...

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Convert a sentence into a rule:

        $ recur parse 'every 2 weeks on Monday, Wednesday for 10 times'
        FREQ=WEEKLY;INTERVAL=2;COUNT=10;BYDAY=MO,WE

    %snip-start%

    Print the options of a rule as JSON, with a start:

        $ recur parse --json --start 2014-01-01 'every month on the 1st Friday'
        {"freq":"MONTHLY","dtstart":"20140101T000000Z","byweekday":["+1FR"]}

    A sentence can be turned into occurrences by piping it to `recur seq`:

        $ recur parse --start 2014-01-01 'every day for 2 times' | recur seq
        2014-01-01T00:00:00
        2014-01-02T00:00:00

    %snip-end%
REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config = Config::default();
    let mut start = Start::default();
    let mut sentences = Inputs::new(Inputs::SENTENCE);
    args::configure(p, USAGE, &mut [&mut config, &mut start, &mut sentences])?;

    let mut wtr = std::io::stdout().lock();
    sentences.try_map(|sentence| {
        let mut opts = recur::text::parse(sentence)
            .with_context(|| format!("failed to parse `{sentence}`"))?;
        if start.is_given() {
            start.fill(&mut opts);
        }
        // Validation needs a start, but only a given one is printed.
        start
            .rule(opts.clone())
            .with_context(|| format!("invalid rule from `{sentence}`"))?;
        if config.json {
            serde_json::to_writer(&mut wtr, &opts)?;
            writeln!(wtr)?;
        } else {
            writeln!(wtr, "{opts}")?;
        }
        Ok(true)
    })
}

#[derive(Debug, Default)]
struct Config {
    json: bool,
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Long("json") => {
                self.json = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn usage(&self) -> &[Usage] {
        const JSON: Usage = Usage::flag(
            "--json",
            "Print rules as JSON objects of options.",
            r#"
Print rules as JSON objects of options.

The JSON written can be read back with `recur seq --from json`. Only options
that were given are written.
"#,
        );
        &[JSON]
    }
}
