/*!
An RFC 5545 recurrence rule engine.

A `Rule` is built from `Options`, either directly, through a `RuleBuilder`,
from the RRULE string format, from JSON or from a simple English sentence.
Its occurrences can be iterated lazily with `Rule::iter`, or collected with
one of the queries: `all`, `between`, `before` and `after`.

```
use jiff::civil::date;
use recur::{Frequency, Rule, weekday::FR};

let rule = Rule::builder(Frequency::Monthly)
    .dtstart(date(2014, 1, 1).at(9, 0, 0, 0))
    .by_week_day(FR.nth(1)?)
    .count(3)
    .build()?;
assert_eq!(rule.to_string(), "FREQ=MONTHLY;DTSTART=20140101T090000Z;COUNT=3;BYDAY=+1FR");
assert_eq!(
    rule.all(),
    vec![
        date(2014, 1, 3).at(9, 0, 0, 0),
        date(2014, 2, 7).at(9, 0, 0, 0),
        date(2014, 3, 7).at(9, 0, 0, 0),
    ],
);
assert_eq!(rule.to_text(), "every month on the 1st Friday for 3 times");

# Ok::<(), Box<dyn std::error::Error>>(())
```

Every datetime is a naive wall clock time (a `jiff::civil::DateTime`). An
RRULE `Z` suffix is accepted but has no effect.
*/

pub use crate::{
    error::{ConstructionError, Error, ParseError},
    iter::RuleIter,
    rule::{
        Frequency, IntoByWeekdayIter, IntoI8Iter, IntoI16Iter, IntoI32Iter,
        NormalizedOptions, OPTION_NAMES, Options, Rule, RuleBuilder,
    },
    weekday::ByWeekday,
};

pub mod calendar;
mod error;
mod iter;
mod query;
pub mod rfc;
mod rule;
pub mod text;
pub mod weekday;
