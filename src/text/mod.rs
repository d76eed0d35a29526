/*!
Reading and writing recurrence rules as natural language text.

Only a subset of rules can be described in text: rules that repeat daily or
at a coarser frequency, filtered by weekday, day of the month, month and (for
yearly rules) week number or day of the year. See `implemented`.

```
use recur::{Rule, text};

let rule = Rule::from_text("every 2 weeks on Monday, Wednesday for 4 times")?;
assert_eq!(rule.to_string(), "FREQ=WEEKLY;INTERVAL=2;COUNT=4;BYDAY=MO,WE");
assert_eq!(
    text::to_text(&rule),
    "every 2 weeks on Monday, Wednesday for 4 times",
);

# Ok::<(), recur::Error>(())
```
*/

use crate::{
    error::Error,
    rule::{Options, Rule},
};

pub use self::{
    language::{ENGLISH, Language, Token},
    totext::{implemented, is_fully_convertible},
};

use self::lexer::Lexer;

mod language;
mod lexer;
mod parser;
mod totext;

/// Parses an English sentence into rule options.
pub fn parse(text: &str) -> Result<Options, Error> {
    parser::parse(Lexer::english(), &ENGLISH, text)
}

/// Parses a sentence in the given language into rule options.
///
/// This returns an error when one of the language's token patterns isn't a
/// valid regular expression.
pub fn parse_with(text: &str, language: &Language) -> Result<Options, Error> {
    if std::ptr::eq(language, &ENGLISH) {
        return parse(text);
    }
    let lexer = Lexer::new(language)?;
    parser::parse(&lexer, language, text)
}

/// Writes a rule as an English sentence.
///
/// Options that can't be written are left out, and ` (~ approximate)` is
/// added to the end. Rules repeating more often than daily can't be written
/// at all.
pub fn to_text(rule: &Rule) -> String {
    totext::to_text(rule, &ENGLISH)
}

/// Writes a rule as a sentence in the given language.
pub fn to_text_with(rule: &Rule, language: &Language) -> String {
    totext::to_text(rule, language)
}

impl Rule {
    /// Builds a rule from an English sentence, e.g., `every weekday`.
    pub fn from_text(text: &str) -> Result<Rule, Error> {
        Rule::new(parse(text)?)
    }

    /// Writes this rule as an English sentence.
    pub fn to_text(&self) -> String {
        to_text(self)
    }

    /// Returns true when `to_text` describes this rule exactly.
    pub fn is_fully_convertible_to_text(&self) -> bool {
        is_fully_convertible(self)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use crate::{
        rule::{Frequency, NormalizedOptions, RuleBuilder},
        weekday::{FR, MO, SU, TH, TU, WE},
    };

    use super::*;

    /// Returns the normalized options of `rule` with every list sorted.
    fn sorted(rule: &Rule) -> NormalizedOptions {
        let mut opts = rule.options().clone();
        opts.bymonth.sort();
        opts.bymonthday.sort();
        opts.bynmonthday.sort();
        opts.byyearday.sort();
        opts.byweekno.sort();
        opts.byweekday.sort_by_key(|wd| wd.to_monday_zero_offset());
        opts.bynweekday.sort_by_key(|&(wd, n)| (wd.to_monday_zero_offset(), n));
        opts
    }

    /// Writes `rule` as text, reads it back and checks that the result
    /// repeats the same way. Returns false when the rule can only be
    /// described approximately.
    fn text_round_trip(rule: &Rule) -> bool {
        if !rule.is_fully_convertible_to_text() {
            return false;
        }
        let text = rule.to_text();
        let mut opts = parse(&text)
            .unwrap_or_else(|err| panic!("`{text}` from {rule}: {err}"));
        opts.dtstart = Some(rule.options().dtstart);
        opts.wkst = rule.original().wkst;
        let back = Rule::new(opts)
            .unwrap_or_else(|err| panic!("`{text}` from {rule}: {err}"));
        assert_eq!(sorted(&back), sorted(rule), "`{text}` from {rule}");
        true
    }

    fn round_trip(text: &str) -> String {
        let rule = Rule::from_text(text).unwrap();
        rule.to_text()
    }

    #[test]
    fn round_trips() {
        for text in [
            "every day for 3 times",
            "every 2 weeks on Monday, Wednesday",
            "every month on the 1st and last",
            "every month on the 1st Friday",
            "every January and March",
            "every day until January 2, 2015",
            "every month on Friday the 13th",
            "every weekday",
            "every 3 years",
            "every year in weeks 1 and 52",
        ] {
            assert_eq!(round_trip(text), text);
        }
    }

    #[test]
    fn normalizes() {
        insta::assert_snapshot!(
            round_trip("Every two days for one time."),
            @"every 2 days for 1 time",
        );
        insta::assert_snapshot!(
            round_trip("every month on the last and the 1st"),
            @"every month on the 1st and last",
        );
        insta::assert_snapshot!(
            round_trip("every week on fri and mon til 2015-01-02"),
            @"every week on Monday, Friday until January 2, 2015",
        );
    }

    #[test]
    fn rules_survive_text() {
        let weekdays = [MO, TU, WE, TH, FR];
        let variants: &[fn(&mut RuleBuilder)] = &[
            |_| {},
            |b| {
                b.interval(2);
            },
            |b| {
                b.count(1);
            },
            |b| {
                b.interval(3).count(5);
            },
            |b| {
                b.until(date(2015, 1, 2).at(0, 0, 0, 0));
            },
            |b| {
                b.until(date(2015, 1, 2).at(9, 30, 0, 0));
            },
            |b| {
                b.until(date(2015, 1, 2).at(9, 30, 15, 0));
            },
            |b| {
                b.by_month([1, 3]);
            },
            |b| {
                b.interval(2).by_month([1, 3]);
            },
            |b| {
                b.by_month([3, 9]).by_month_day(15);
            },
            |b| {
                b.by_month_day([1, -1]);
            },
            |b| {
                b.by_month_day([-3, 2, 22]);
            },
            |b| {
                b.by_month_day(13).by_week_day(FR);
            },
            |b| {
                b.by_month_day([1, 13]).by_week_day([MO, FR]);
            },
            |b| {
                b.by_month_day(13).by_week_day(FR.nth(-1).unwrap());
            },
            |b| {
                b.by_week_day([WE, MO]);
            },
            |b| {
                b.by_week_day([MO, TU, WE, TH, FR]);
            },
            |b| {
                b.interval(2).by_week_day([MO, TU, WE, TH, FR]);
            },
            |b| {
                b.by_month(6).by_week_day([MO, TU, WE, TH, FR]);
            },
            |b| {
                b.by_month_day(13).by_week_day([MO, TU, WE, TH, FR]);
            },
            |b| {
                b.by_week_day([FR.nth(1).unwrap(), SU.nth(-1).unwrap()]);
            },
            |b| {
                b.by_week_day([SU, MO.nth(2).unwrap()]);
            },
            |b| {
                b.by_year_day([1, 100, -1]);
            },
            |b| {
                b.by_month([1, 3]).by_year_day(60);
            },
            |b| {
                b.by_month_day(13).by_year_day(200);
            },
            |b| {
                b.by_week([1, 52]);
            },
            |b| {
                b.by_week(-1).by_week_day(MO);
            },
            |b| {
                let until = date(2020, 6, 1).at(12, 0, 0, 0);
                b.interval(2).by_week(20).until(until);
            },
        ];
        let mut checked = 0;
        for freq in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Yearly,
        ] {
            for variant in variants.iter() {
                let mut builder = Rule::builder(freq);
                builder.dtstart(date(2014, 1, 1).at(9, 0, 0, 0));
                variant(&mut builder);
                let rule = builder.build().unwrap();
                if text_round_trip(&rule) {
                    checked += 1;
                }
            }
        }
        // Week numbers and days of the year are only written for yearly
        // rules.
        assert_eq!(checked, 4 * variants.len() - 3 * 6);

        let rule = Rule::builder(Frequency::Daily)
            .dtstart(date(2014, 1, 1).at(9, 0, 0, 0))
            .by_week_day(weekdays)
            .build()
            .unwrap();
        assert_eq!(rule.to_text(), "every day on weekdays");
        assert!(text_round_trip(&rule));
    }

    #[test]
    fn rule_from_text() {
        let rule = Rule::from_text("every day for 3 times").unwrap();
        assert_eq!(rule.options().freq, Frequency::Daily);
        assert_eq!(rule.options().count, Some(3));
        assert!(rule.is_fully_convertible_to_text());
        assert_eq!(rule.to_string(), "FREQ=DAILY;COUNT=3");

        let mut opts = parse("every monday").unwrap();
        assert_eq!(opts.byweekday, [MO]);
        opts.dtstart = Some(date(2014, 1, 1).at(9, 0, 0, 0));
        let rule = Rule::new(opts).unwrap();
        assert_eq!(
            rule.iter().take(2).collect::<Vec<_>>(),
            [date(2014, 1, 6).at(9, 0, 0, 0), date(2014, 1, 13).at(9, 0, 0, 0)],
        );
    }

    #[test]
    fn approximate() {
        let rule = Rule::builder(Frequency::Daily).by_hour(9).build().unwrap();
        assert!(!rule.is_fully_convertible_to_text());
        assert_eq!(rule.to_text(), "every day (~ approximate)");
    }

    #[test]
    fn other_languages() {
        static GERMAN: Language = Language {
            day_names: [
                "Montag",
                "Dienstag",
                "Mittwoch",
                "Donnerstag",
                "Freitag",
                "Samstag",
                "Sonntag",
            ],
            month_names: [
                "Januar",
                "Februar",
                "März",
                "April",
                "Mai",
                "Juni",
                "Juli",
                "August",
                "September",
                "Oktober",
                "November",
                "Dezember",
            ],
            words: &[
                ("every", "jeden"),
                ("day", "Tag"),
                ("on", "am"),
                ("for", "für"),
                ("times", "Mal"),
            ],
            tokens: &[
                (Token::Skip, r"[ \r\n\t]+|\.$"),
                (Token::Number, r"[1-9][0-9]*"),
                (Token::Every, r"jede[nrs]?"),
                (Token::Days, r"tage?"),
                (Token::Weeks, r"wochen?"),
                (Token::On, r"am|im"),
                (Token::For, r"für"),
                (Token::Times, r"mal"),
                (Token::Weekday(jiff::civil::Weekday::Monday), r"mo(ntag)?"),
                (Token::Comma, r"(,\s*|(und|oder)\s*)+"),
            ],
        };

        let opts = parse_with("jede Woche am Montag für 3 Mal", &GERMAN).unwrap();
        assert_eq!(opts.freq, Some(Frequency::Weekly));
        assert_eq!(opts.byweekday, [MO]);
        assert_eq!(opts.count, Some(3));

        let rule = Rule::new(parse_with("jeden Tag für 3 mal", &GERMAN).unwrap())
            .unwrap();
        insta::assert_snapshot!(
            to_text_with(&rule, &GERMAN),
            @"jeden Tag für 3 Mal",
        );
        assert!(parse_with("every day", &GERMAN).is_err());
    }
}
