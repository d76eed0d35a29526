use std::io::BufRead;

use anyhow::Context;

use crate::args::{Configurable, Usage};

/// The CLI parsing configuration for reading rules (or sentences).
///
/// This greedily consumes all remaining positional arguments. When there are
/// none, inputs are read from stdin instead, one per line. Blank lines on
/// stdin are skipped.
#[derive(Clone, Debug)]
pub struct Inputs {
    usage: Usage,
    values: Vec<String>,
}

impl Inputs {
    pub const RULE: Usage = Usage::arg(
        "<rule>",
        "A recurrence rule, read from stdin when absent.",
        r#"
A recurrence rule. Its format is set by `--from`.

Any number of rules may be given. When no rule is given, rules are read from
stdin, one per line.
"#,
    );

    pub const SENTENCE: Usage = Usage::arg(
        "<sentence>",
        "An English sentence, read from stdin when absent.",
        r#"
An English sentence describing a recurrence rule, e.g.,
`every 2 weeks on Monday, Wednesday for 10 times`.

Any number of sentences may be given. When no sentence is given, sentences
are read from stdin, one per line.
"#,
    );

    /// Creates an empty set of inputs documented by the given usage.
    pub fn new(usage: Usage) -> Inputs {
        Inputs { usage, values: vec![] }
    }

    /// Run the given function over each input.
    ///
    /// If there were no positional inputs, then this reads them from stdin,
    /// one per line.
    ///
    /// Iteration stops when the closure returns false or returns an error.
    pub fn try_map(
        self,
        mut f: impl FnMut(&str) -> anyhow::Result<bool>,
    ) -> anyhow::Result<()> {
        if !self.values.is_empty() {
            for value in self.values.iter() {
                if !f(value)? {
                    break;
                }
            }
            return Ok(());
        }
        for (i, line) in std::io::stdin().lock().lines().enumerate() {
            let line = line
                .with_context(|| format!("failed to read line {} from stdin", i + 1))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if !f(line)? {
                break;
            }
        }
        Ok(())
    }
}

impl Configurable for Inputs {
    fn configure(
        &mut self,
        _: &mut lexopt::Parser,
        arg: &mut lexopt::Arg,
    ) -> anyhow::Result<bool> {
        let lexopt::Arg::Value(ref value) = *arg else { return Ok(false) };
        let Some(value) = value.to_str() else {
            anyhow::bail!("input is not valid UTF-8: {value:?}");
        };
        self.values.push(value.to_string());
        Ok(true)
    }

    fn usage(&self) -> &[Usage] {
        std::slice::from_ref(&self.usage)
    }
}
