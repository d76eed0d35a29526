mod parse;
mod seq;
mod text;

const USAGE: &'static str = "\
A tool for expanding and describing RFC 5545 recurrence rules.

USAGE:
    recur <command> ...

COMMANDS:
    parse  Convert English sentences into recurrence rules
    seq    Generate the occurrences of a recurrence rule
    text   Describe recurrence rules in English
";

pub fn run(p: &mut lexopt::Parser) -> anyhow::Result<()> {
    let cmd = crate::args::next_as_command(USAGE, p)?;
    match &*cmd {
        "parse" => parse::run(p),
        "seq" => seq::run(p),
        "text" => text::run(p),
        unk => anyhow::bail!("unrecognized command '{}'", unk),
    }
}
