/*!
A recursive descent parser for recurrence rules written in English (or any
other `Language`).

The grammar, roughly:

```text
rule    = "every" [number] unit {filters} [end]
unit    = "day(s)" | "weekday(s)" | "week(s)" | "month(s)" | "year(s)"
        | weekday {"," weekday} [monthdays]
        | month {"," month}
filters = ("on" | "the") filter {("," | "the" | "on") filter}
filter  = nth weekday | days | weekday | "weekday(s)"
        | "week(s)" number {"," number} | month
days    = nth {"," nth} ["day(s)" | "day(s) of the year"]
end     = "until" date ["at" time] | "for" number ["time(s)"]
```

where `nth` is `first`, `second`, `third`, `last`, `1st`, `2nd`, ... and
may be followed by `last` to count from the end. A list of days ending with
`day of the year` gives days of the year, otherwise days of the month.
*/

use jiff::civil::{DateTime, Time};

use crate::{
    calendar,
    error::{ConstructionError, Error, ParseError},
    rule::{Frequency, Options},
    text::{
        language::{Language, Token},
        lexer::{Lexer, Symbols},
    },
    weekday::{ByWeekday, FR, MO, TH, TU, WE},
};

/// The largest absolute value permitted for an ordinal.
const MAX_NTH: i64 = 366;

/// Parses a sentence in the given language into rule options.
pub(crate) fn parse(
    lexer: &Lexer,
    language: &Language,
    text: &str,
) -> Result<Options, Error> {
    let mut parser = Parser {
        symbols: Symbols::new(lexer, text),
        language,
        opts: Options::default(),
    };
    parser.rule()?;
    if let Some(unmatched) = parser.symbols.unmatched() {
        return Err(ParseError::UnexpectedSymbol(unmatched.to_string()).into());
    }
    if !parser.symbols.is_done() {
        return Err(parser.symbols.unexpected().into());
    }
    Ok(parser.opts)
}

struct Parser<'l, 't, 'g> {
    symbols: Symbols<'l, 't>,
    language: &'g Language,
    opts: Options,
}

impl<'l, 't, 'g> Parser<'l, 't, 'g> {
    fn rule(&mut self) -> Result<(), Error> {
        self.symbols.expect(Token::Every)?;
        if let Some(n) = self.number()? {
            self.opts.interval = Some(n);
        }
        let Some(symbol) = self.symbols.symbol() else {
            return Err(self.symbols.unexpected().into());
        };
        match symbol {
            Token::Days => self.unit(Frequency::Daily)?,
            Token::Weeks => self.unit(Frequency::Weekly)?,
            Token::Months => self.unit(Frequency::Monthly)?,
            Token::Years => self.unit(Frequency::Yearly)?,
            Token::Weekdays => {
                self.opts.freq = Some(Frequency::Weekly);
                self.opts.byweekday = weekdays();
                self.symbols.next_symbol();
                self.end()?;
            }
            Token::Weekday(weekday) => {
                self.opts.freq = Some(Frequency::Weekly);
                self.opts.byweekday = vec![ByWeekday::any(weekday)];
                if !self.symbols.next_symbol() {
                    return Ok(());
                }
                while self.symbols.accept(Token::Comma) {
                    let Some(Token::Weekday(weekday)) = self.symbols.symbol()
                    else {
                        return Err(self.symbols.unexpected().into());
                    };
                    self.opts.byweekday.push(ByWeekday::any(weekday));
                    self.symbols.next_symbol();
                }
                self.month_days()?;
                self.end()?;
            }
            Token::Month(month) => {
                self.opts.freq = Some(Frequency::Yearly);
                self.opts.bymonth = vec![month];
                if !self.symbols.next_symbol() {
                    return Ok(());
                }
                while self.symbols.accept(Token::Comma) {
                    let Some(Token::Month(month)) = self.symbols.symbol()
                    else {
                        return Err(self.symbols.unexpected().into());
                    };
                    self.opts.bymonth.push(month);
                    self.symbols.next_symbol();
                }
                self.filters()?;
                self.end()?;
            }
            _ => return Err(self.symbols.unexpected().into()),
        }
        Ok(())
    }

    /// Handles `every [n] day(s)`, `week(s)` and so on.
    fn unit(&mut self, freq: Frequency) -> Result<(), Error> {
        self.opts.freq = Some(freq);
        if self.symbols.next_symbol() {
            self.filters()?;
            self.end()?;
        }
        Ok(())
    }

    /// Parses any number of `on ...` filters.
    fn filters(&mut self) -> Result<(), Error> {
        let on = self.symbols.accept(Token::On);
        let the = self.symbols.accept(Token::The);
        if !on && !the {
            return Ok(());
        }
        loop {
            if let Some(nth) = self.nth()? {
                if let Some(Token::Weekday(weekday)) = self.symbols.symbol() {
                    self.symbols.next_symbol();
                    let wd = ByWeekday::numbered(nth, weekday)?;
                    self.opts.byweekday.push(wd);
                } else {
                    self.days(nth)?;
                }
            } else if let Some(Token::Weekday(weekday)) = self.symbols.symbol()
            {
                self.symbols.next_symbol();
                self.opts.byweekday.push(ByWeekday::any(weekday));
            } else if self.symbols.symbol() == Some(Token::Weekdays) {
                self.symbols.next_symbol();
                self.opts.byweekday.extend(weekdays());
            } else if self.symbols.symbol() == Some(Token::Weeks) {
                self.symbols.next_symbol();
                let week = self.week_number()?;
                self.opts.byweekno = vec![week];
                while self.symbols.accept(Token::Comma) {
                    let week = self.week_number()?;
                    self.opts.byweekno.push(week);
                }
            } else if let Some(Token::Month(month)) = self.symbols.symbol() {
                self.symbols.next_symbol();
                self.opts.bymonth.push(month);
            } else {
                return Ok(());
            }

            let mut more = false;
            while self.symbols.accept(Token::Comma)
                || self.symbols.accept(Token::The)
                || self.symbols.accept(Token::On)
            {
                more = true;
            }
            if !more {
                return Ok(());
            }
        }
    }

    /// Parses the rest of a list of days starting with `first`.
    ///
    /// The list stops before an ordinal followed by a weekday, so that
    /// `the 1st and 2nd Monday` leaves `2nd Monday` to the caller.
    fn days(&mut self, first: i16) -> Result<(), Error> {
        let mut days = vec![first];
        loop {
            let before = self.symbols.clone();
            if !self.symbols.accept(Token::Comma) {
                break;
            }
            match self.nth()? {
                Some(nth)
                    if !matches!(
                        self.symbols.symbol(),
                        Some(Token::Weekday(_))
                    ) =>
                {
                    days.push(nth);
                }
                _ => {
                    self.symbols = before;
                    break;
                }
            }
        }
        if self.symbols.accept(Token::DayOfYear) {
            self.opts.byyearday.extend(days);
            return Ok(());
        }
        self.symbols.accept(Token::Days);
        for nth in days {
            self.opts.bymonthday.push(month_day(nth)?);
        }
        Ok(())
    }

    /// Parses the days of the month in `every Friday the 13th`.
    fn month_days(&mut self) -> Result<(), Error> {
        self.symbols.accept(Token::On);
        self.symbols.accept(Token::The);
        let Some(nth) = self.nth()? else { return Ok(()) };
        self.opts.bymonthday = vec![month_day(nth)?];
        while self.symbols.accept(Token::Comma) {
            let Some(nth) = self.nth()? else {
                return Err(self.symbols.unexpected().into());
            };
            self.opts.bymonthday.push(month_day(nth)?);
        }
        Ok(())
    }

    /// Parses the optional `until <date>` or `for <n> times`.
    fn end(&mut self) -> Result<(), Error> {
        if self.symbols.symbol() == Some(Token::Until) {
            let text = self.symbols.rest().trim();
            let text = text.strip_suffix('.').unwrap_or(text).trim();
            self.opts.until = Some(self.date(text)?);
            self.symbols.finish();
        } else if self.symbols.accept(Token::For) {
            let Some(count) = self.number()? else {
                return Err(self.symbols.unexpected().into());
            };
            self.opts.count = Some(count);
            self.symbols.accept(Token::Times);
        }
        Ok(())
    }

    /// Parses an ordinal, moving past it.
    fn nth(&mut self) -> Result<Option<i16>, ParseError> {
        let nth = match self.symbols.symbol() {
            Some(Token::Last) => {
                self.symbols.next_symbol();
                return Ok(Some(-1));
            }
            Some(Token::First) => 1,
            Some(Token::Second) => 2,
            Some(Token::Third) => 3,
            Some(Token::Nth) => {
                let digits = self.symbols.group().unwrap_or("");
                let malformed = || ParseError::MalformedToken(digits.to_string());
                let n: i64 = digits.parse().map_err(|_| malformed())?;
                if !(-MAX_NTH..=MAX_NTH).contains(&n) {
                    return Err(ParseError::NthOutOfRange(n));
                }
                // OK because the range check above guarantees it fits.
                i16::try_from(n).unwrap()
            }
            _ => return Ok(None),
        };
        self.symbols.next_symbol();
        if self.symbols.symbol() == Some(Token::Last) {
            // `last` alone is the last, so `first last` is not an ordinal.
            if nth == 1 {
                return Err(self.symbols.unexpected());
            }
            self.symbols.next_symbol();
            return Ok(Some(-nth));
        }
        Ok(Some(nth))
    }

    /// Parses a number written with digits or as text, moving past it.
    fn number<T: TryFrom<i64>>(&mut self) -> Result<Option<T>, ParseError> {
        let n: i64 = match (self.symbols.symbol(), self.symbols.matched()) {
            (Some(Token::Number), Some(digits)) => digits
                .parse()
                .map_err(|_| ParseError::MalformedToken(digits.to_string()))?,
            (Some(Token::NumberAsText), Some(word)) => {
                match &*word.to_lowercase() {
                    "one" => 1,
                    "two" => 2,
                    "three" => 3,
                    _ => {
                        return Err(ParseError::MalformedToken(
                            word.to_string(),
                        ));
                    }
                }
            }
            _ => return Ok(None),
        };
        let matched = self.symbols.matched().unwrap_or("");
        let n = T::try_from(n)
            .map_err(|_| ParseError::MalformedToken(matched.to_string()))?;
        self.symbols.next_symbol();
        Ok(Some(n))
    }

    fn week_number(&mut self) -> Result<i8, Error> {
        match self.number()? {
            Some(week) => Ok(week),
            None => Err(self.symbols.unexpected().into()),
        }
    }

    /// Parses the date in `until <date>`.
    ///
    /// This accepts the format written by the generator (`January 2, 2015`,
    /// optionally followed by `at 09:30` or `at 09:30:15`) along with the
    /// RRULE and ISO 8601 formats.
    fn date(&self, text: &str) -> Result<DateTime, ParseError> {
        if let Ok(dt) = calendar::parse_flexible(text) {
            return Ok(dt);
        }
        let malformed = || ParseError::MalformedDate(text.to_string());
        let words: Vec<&str> = text.split_whitespace().collect();
        let (month, day, year, time) = match *words {
            [month, day, year] => (month, day, year, Time::midnight()),
            [month, day, year, at, time]
                if at.eq_ignore_ascii_case(self.language.word("at")) =>
            {
                (month, day, year, clock(time).ok_or_else(malformed)?)
            }
            _ => return Err(malformed()),
        };
        let month = self.language.month_from_name(month).ok_or_else(malformed)?;
        let day = day.trim_end_matches(',');
        let day = day
            .strip_suffix("st")
            .or_else(|| day.strip_suffix("nd"))
            .or_else(|| day.strip_suffix("rd"))
            .or_else(|| day.strip_suffix("th"))
            .unwrap_or(day);
        let day: i8 = day.parse().map_err(|_| malformed())?;
        let year: i16 = year.parse().map_err(|_| malformed())?;
        let date =
            jiff::civil::Date::new(year, month, day).map_err(|_| malformed())?;
        Ok(calendar::combine(date, time))
    }
}

/// Parses a time of day written as `HH:MM` or `HH:MM:SS`.
fn clock(text: &str) -> Option<Time> {
    let mut parts = text.split(':').map(|part| part.parse::<i8>().ok());
    let (Some(hour), Some(minute)) = (parts.next()?, parts.next()?) else {
        return None;
    };
    let second = match parts.next() {
        None => 0,
        Some(second) => second?,
    };
    if parts.next().is_some() {
        return None;
    }
    Time::new(hour, minute, second, 0).ok()
}

/// Monday through Friday.
fn weekdays() -> Vec<ByWeekday> {
    vec![MO, TU, WE, TH, FR]
}

fn month_day(nth: i16) -> Result<i8, ConstructionError> {
    i8::try_from(nth).map_err(|_| ConstructionError::OutOfRange {
        option: "bymonthday",
        value: i32::from(nth),
        range: "1..=31 or -31..=-1",
    })
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use crate::{
        text::language::ENGLISH,
        weekday::{SA, SU},
    };

    use super::*;

    fn english(text: &str) -> Result<Options, Error> {
        parse(Lexer::english(), &ENGLISH, text)
    }

    fn ok(text: &str) -> Options {
        english(text).unwrap()
    }

    fn err(text: &str) -> String {
        english(text).unwrap_err().to_string()
    }

    #[test]
    fn units() {
        let opts = ok("every day");
        assert_eq!(opts.freq, Some(Frequency::Daily));
        assert_eq!(opts.interval, None);

        let opts = ok("Every 2 weeks");
        assert_eq!(opts.freq, Some(Frequency::Weekly));
        assert_eq!(opts.interval, Some(2));

        let opts = ok("every three months.");
        assert_eq!(opts.freq, Some(Frequency::Monthly));
        assert_eq!(opts.interval, Some(3));

        assert_eq!(ok("every year").freq, Some(Frequency::Yearly));
    }

    #[test]
    fn weekdays_shortcut() {
        let opts = ok("every weekday");
        assert_eq!(opts.freq, Some(Frequency::Weekly));
        assert_eq!(opts.byweekday, [MO, TU, WE, TH, FR]);

        let opts = ok("every week on weekdays for 4 times");
        assert_eq!(opts.freq, Some(Frequency::Weekly));
        assert_eq!(opts.byweekday, [MO, TU, WE, TH, FR]);
        assert_eq!(opts.count, Some(4));
    }

    #[test]
    fn weekday_unit() {
        let opts = ok("every Monday, Wednesday and fri");
        assert_eq!(opts.freq, Some(Frequency::Weekly));
        assert_eq!(opts.byweekday, [MO, WE, FR]);

        let opts = ok("every Friday the 13th for 3 times");
        assert_eq!(opts.byweekday, [FR]);
        assert_eq!(opts.bymonthday, [13]);
        assert_eq!(opts.count, Some(3));

        let opts = ok("every sat, sun on the 1st, 2nd and last");
        assert_eq!(opts.byweekday, [SA, SU]);
        assert_eq!(opts.bymonthday, [1, 2, -1]);
    }

    #[test]
    fn month_unit() {
        let opts = ok("every January and March");
        assert_eq!(opts.freq, Some(Frequency::Yearly));
        assert_eq!(opts.bymonth, [1, 3]);

        let opts = ok("every jan, feb on the last day");
        assert_eq!(opts.bymonth, [1, 2]);
        assert_eq!(opts.bymonthday, [-1]);
    }

    #[test]
    fn filters() {
        let opts = ok("every 2 weeks on Monday, Wednesday");
        assert_eq!(opts.interval, Some(2));
        assert_eq!(opts.byweekday, [MO, WE]);

        let opts = ok("every month on the 1st and last");
        assert_eq!(opts.freq, Some(Frequency::Monthly));
        assert_eq!(opts.bymonthday, [1, -1]);

        let opts = ok("every month on the first friday and the last sunday");
        assert_eq!(opts.byweekday, [FR.nth(1).unwrap(), SU.nth(-1).unwrap()]);

        let opts = ok("every month on the second last Tuesday");
        assert_eq!(opts.byweekday, [TU.nth(-2).unwrap()]);

        let opts = ok("every month on the 3rd last day");
        assert_eq!(opts.bymonthday, [-3]);

        let opts = ok("every month on Friday the 13th");
        assert_eq!(opts.byweekday, [FR]);
        assert_eq!(opts.bymonthday, [13]);

        let opts = ok("every year in week 1, 20 and 52");
        assert_eq!(opts.freq, Some(Frequency::Yearly));
        assert_eq!(opts.byweekno, [1, 20, 52]);

        let opts = ok("every day in March on weekdays");
        assert_eq!(opts.bymonth, [3]);
        assert_eq!(opts.byweekday, [MO, TU, WE, TH, FR]);

        let opts = ok("every year in weeks 1 and -1");
        assert_eq!(opts.byweekno, [1, -1]);

        let opts = ok("every month on the 1st and 2nd Monday");
        assert_eq!(opts.bymonthday, [1]);
        assert_eq!(opts.byweekday, [MO.nth(2).unwrap()]);

        let opts = ok("every month on the 13th and on the last Friday");
        assert_eq!(opts.bymonthday, [13]);
        assert_eq!(opts.byweekday, [FR.nth(-1).unwrap()]);
    }

    #[test]
    fn year_days() {
        let opts = ok("every year on the 1st, 100th and last day of the year");
        assert_eq!(opts.freq, Some(Frequency::Yearly));
        assert_eq!(opts.byyearday, [1, 100, -1]);
        assert!(opts.bymonthday.is_empty());

        let opts = ok("every year on the 13th on the 200th day of the year");
        assert_eq!(opts.bymonthday, [13]);
        assert_eq!(opts.byyearday, [200]);

        let opts = ok("every 2 years in January and March on the 3rd day");
        assert_eq!(opts.interval, Some(2));
        assert_eq!(opts.bymonth, [1, 3]);
        assert_eq!(opts.bymonthday, [3]);
    }

    #[test]
    fn ends() {
        let opts = ok("every day for 1 time");
        assert_eq!(opts.count, Some(1));

        let opts = ok("every day for two times");
        assert_eq!(opts.count, Some(2));

        let opts = ok("every day until January 2, 2015");
        assert_eq!(opts.until, Some(date(2015, 1, 2).at(0, 0, 0, 0)));

        let opts = ok("every week until Jan 2nd 2015.");
        assert_eq!(opts.until, Some(date(2015, 1, 2).at(0, 0, 0, 0)));

        let opts = ok("every day until 20150102T090000Z");
        assert_eq!(opts.until, Some(date(2015, 1, 2).at(9, 0, 0, 0)));

        let opts = ok("every month til 2015-01-02");
        assert_eq!(opts.until, Some(date(2015, 1, 2).at(0, 0, 0, 0)));

        let opts = ok("every day until January 2, 2015 at 09:30");
        assert_eq!(opts.until, Some(date(2015, 1, 2).at(9, 30, 0, 0)));

        let opts = ok("every day until January 2, 2015 at 23:59:30.");
        assert_eq!(opts.until, Some(date(2015, 1, 2).at(23, 59, 30, 0)));
    }

    #[test]
    fn errors() {
        insta::assert_snapshot!(
            err("daily"),
            @"failed to parse recurrence rule: unexpected symbol at `daily`",
        );
        insta::assert_snapshot!(
            err("every"),
            @"failed to parse recurrence rule: unexpected end of input",
        );
        insta::assert_snapshot!(
            err("every 2"),
            @"failed to parse recurrence rule: unexpected end of input",
        );
        insta::assert_snapshot!(
            err("every fortnight"),
            @"failed to parse recurrence rule: unexpected symbol at `fortnight`",
        );
        insta::assert_snapshot!(
            err("every day for 3 times please"),
            @"failed to parse recurrence rule: unexpected symbol at `please`",
        );
        insta::assert_snapshot!(
            err("every Monday, June"),
            @"failed to parse recurrence rule: unexpected symbol at `June`",
        );
        insta::assert_snapshot!(
            err("every day until someday"),
            @"failed to parse recurrence rule: malformed date `someday` (expected YYYYMMDD or YYYYMMDDTHHMMSSZ)",
        );
        insta::assert_snapshot!(
            err("every month on the 367th day"),
            @"failed to parse recurrence rule: nth value `367` is out of range (must be in -366..=366)",
        );
        insta::assert_snapshot!(
            err("every year in week"),
            @"failed to parse recurrence rule: unexpected end of input",
        );
        insta::assert_snapshot!(
            err("every day for"),
            @"failed to parse recurrence rule: unexpected end of input",
        );
        insta::assert_snapshot!(
            err("every month on the first last day"),
            @"failed to parse recurrence rule: unexpected symbol at `last day`",
        );
        insta::assert_snapshot!(
            err("every month on the 1st last Friday"),
            @"failed to parse recurrence rule: unexpected symbol at `last Friday`",
        );
        insta::assert_snapshot!(
            err("every day until January 2, 2015 at noon"),
            @"failed to parse recurrence rule: malformed date `January 2, 2015 at noon` (expected YYYYMMDD or YYYYMMDDTHHMMSSZ)",
        );
        insta::assert_snapshot!(
            err("every day & night"),
            @"failed to parse recurrence rule: unexpected symbol at `& night`",
        );
    }
}
