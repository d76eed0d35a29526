use std::io::Write;

use anyhow::Context;

use crate::args::{
    self, Usage,
    flags::{InputFormat, Start},
    positional::Inputs,
};

const USAGE: &'static str = r#"
Describe recurrence rules in English.

Each rule is printed as a sentence on its own line. Only rules repeating daily
or less often can be described. Options that can't be described are left out,
in which case `(~ approximate)` is added to the end of the sentence.

USAGE:
    recur text <rule> ...

TIP:
    use -h for short docs and --help for long docs

EXAMPLES:
    Describe a rule:

        $ recur text 'FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE;COUNT=10'
        every 2 weeks on Monday, Wednesday for 10 times

    %snip-start%

    Describe a rule given as JSON:

        $ recur text --from json '{"freq": "MONTHLY", "bymonthday": [1, -1]}'
        every month on the 1st and last

    Fail when a rule can't be described exactly:

        $ recur text --strict 'FREQ=DAILY;BYHOUR=9,17'
        rule `FREQ=DAILY;BYHOUR=9,17` can only be described approximately: every day (~ approximate)

    %snip-end%
REQUIRED ARGUMENTS:
%args%
OPTIONS:
%flags%
"#;

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let mut config = Config::default();
    let mut format = InputFormat::default();
    let mut rules = Inputs::new(Inputs::RULE);
    args::configure(p, USAGE, &mut [&mut config, &mut format, &mut rules])?;

    // The start never shows up in a sentence, but every rule needs one.
    let start = Start::default();
    let mut wtr = std::io::stdout().lock();
    rules.try_map(|input| {
        let opts = format
            .read(input)
            .with_context(|| format!("invalid rule `{input}`"))?;
        let rule = start
            .rule(opts)
            .with_context(|| format!("invalid rule `{input}`"))?;
        let text = rule.to_text();
        if config.strict && !rule.is_fully_convertible_to_text() {
            anyhow::bail!(
                "rule `{input}` can only be described approximately: {text}"
            );
        }
        writeln!(wtr, "{text}")?;
        Ok(true)
    })
}

#[derive(Debug, Default)]
struct Config {
    strict: bool,
}

impl args::Configurable for Config {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        match *arg {
            lexopt::Arg::Long("strict") => {
                self.strict = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn usage(&self) -> &[Usage] {
        const STRICT: Usage = Usage::flag(
            "--strict",
            "Fail when a rule can only be described approximately.",
            r#"
Fail when a rule can only be described approximately.

A rule can only be described approximately when it repeats more often than
daily, when it has both a COUNT and an UNTIL, or when it uses an option that
has no English description at its frequency (e.g., BYHOUR or BYSETPOS).
"#,
        );
        &[STRICT]
    }
}
