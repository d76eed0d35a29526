use jiff::civil::Time;

use crate::{
    rule::{Frequency, Rule},
    text::language::Language,
    weekday::ByWeekday,
};

/// The options that can be written as text at every supported frequency.
const COMMON: &[&str] =
    &["count", "until", "interval", "byweekday", "bymonthday", "bymonth"];

/// The options that can be written as text only at yearly frequency.
const YEARLY_ONLY: &[&str] = &["byweekno", "byyearday"];

/// Returns the names of the options that can be written as text at the
/// given frequency, or `None` when rules at that frequency can't be written
/// as text at all.
pub fn implemented(freq: Frequency) -> Option<Vec<&'static str>> {
    match freq {
        Frequency::Daily | Frequency::Weekly | Frequency::Monthly => {
            Some(COMMON.to_vec())
        }
        Frequency::Yearly => {
            Some(YEARLY_ONLY.iter().chain(COMMON).copied().collect())
        }
        Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => None,
    }
}

/// Returns true when every option given to `rule` can be written as text.
///
/// `dtstart`, `wkst` and `freq` are never written but don't make a rule
/// approximate. A rule with both `count` and `until` is never fully
/// convertible.
pub fn is_fully_convertible(rule: &Rule) -> bool {
    let Some(implemented) = implemented(rule.options().freq) else {
        return false;
    };
    let orig = rule.original();
    if orig.count.is_some() && orig.until.is_some() {
        return false;
    }
    orig.given()
        .into_iter()
        .filter(|name| !matches!(*name, "dtstart" | "wkst" | "freq"))
        .all(|name| implemented.contains(&name))
}

/// Writes `rule` as a sentence in the given language.
pub(crate) fn to_text(rule: &Rule, language: &Language) -> String {
    if implemented(rule.options().freq).is_none() {
        return language
            .word("Unable to fully convert this rule to text")
            .to_string();
    }
    let mut writer = Writer::new(rule, language);
    writer.write();
    writer.text
}

/// The weekdays given to a rule, split by whether they are numbered.
struct Weekdays {
    all_weeks: Vec<ByWeekday>,
    some_weeks: Vec<ByWeekday>,
    /// True when exactly Monday through Friday are given, none numbered.
    is_weekdays: bool,
}

impl Weekdays {
    fn new(given: &[ByWeekday]) -> Option<Weekdays> {
        if given.is_empty() {
            return None;
        }
        let (mut some_weeks, mut all_weeks): (Vec<_>, Vec<_>) =
            given.iter().copied().partition(|wd| wd.number().is_some());
        all_weeks.sort_by_key(|wd| wd.index());
        some_weeks.sort_by_key(|wd| wd.index());
        let is_weekdays = some_weeks.is_empty()
            && all_weeks.iter().map(|wd| wd.index()).eq(0..5);
        Some(Weekdays { all_weeks, some_weeks, is_weekdays })
    }
}

struct Writer<'r, 'g> {
    rule: &'r Rule,
    lang: &'g Language,
    text: String,
    interval: i32,
    monthdays: Vec<i8>,
    weekdays: Option<Weekdays>,
}

impl<'r, 'g> Writer<'r, 'g> {
    fn new(rule: &'r Rule, lang: &'g Language) -> Writer<'r, 'g> {
        let orig = rule.original();
        // Positive days first, both halves in ascending order.
        let mut monthdays = orig.bymonthday.clone();
        monthdays.sort_by_key(|&day| (day < 0, day));
        Writer {
            rule,
            lang,
            text: String::new(),
            interval: rule.options().interval,
            monthdays,
            weekdays: Weekdays::new(&orig.byweekday),
        }
    }

    fn write(&mut self) {
        self.text.push_str(self.lang.word("every"));
        match self.rule.options().freq {
            Frequency::Yearly => self.yearly(),
            Frequency::Monthly => self.monthly(),
            Frequency::Weekly => self.weekly(),
            Frequency::Daily => self.daily(),
            _ => unreachable!("checked by the caller"),
        }

        let rule = self.rule;
        let opts = rule.options();
        if let Some(until) = opts.until {
            self.word("until");
            self.add(self.lang.month_name(until.month()));
            self.add(&format!("{},", until.day()));
            self.add(&until.year().to_string());
            if until.time() != Time::midnight() {
                let (h, m, s) = (until.hour(), until.minute(), until.second());
                self.word("at");
                if s == 0 {
                    self.add(&format!("{h:02}:{m:02}"));
                } else {
                    self.add(&format!("{h:02}:{m:02}:{s:02}"));
                }
            }
        } else if let Some(count) = opts.count {
            self.word("for");
            self.add(&count.to_string());
            self.word(if plural(i64::from(count)) { "times" } else { "time" });
        }

        if !is_fully_convertible(self.rule) {
            self.word("(~ approximate)");
        }
    }

    fn daily(&mut self) {
        self.unit("day", "days");
        self.in_months();
        self.by_day();
    }

    fn weekly(&mut self) {
        let orig = self.rule.original();
        if self.interval == 1
            && self.is_weekdays()
            && self.monthdays.is_empty()
            && orig.bymonth.is_empty()
        {
            self.word("weekday");
            return;
        }
        self.unit("week", "weeks");
        self.in_months();
        self.by_day();
    }

    fn monthly(&mut self) {
        self.unit("month", "months");
        self.in_months();
        self.by_day();
    }

    fn yearly(&mut self) {
        if self.rule.original().bymonth.is_empty() {
            self.unit("year", "years");
        } else if self.interval == 1 {
            self.by_month();
        } else {
            self.unit("year", "years");
            self.in_months();
        }
        self.by_day();

        let rule = self.rule;
        let orig = rule.original();
        if !orig.byyearday.is_empty() {
            let mut yeardays = orig.byyearday.clone();
            yeardays.sort_by_key(|&day| (day < 0, day));
            let days: Vec<String> =
                yeardays.iter().map(|&n| self.nth(n)).collect();
            self.word("on the");
            self.add(&self.list(&days, ",", Some("and")));
            self.word("day of the year");
        }
        if !orig.byweekno.is_empty() {
            let weeks: Vec<String> =
                orig.byweekno.iter().map(|n| n.to_string()).collect();
            self.word(if weeks.len() == 1 { "in week" } else { "in weeks" });
            self.add(&self.list(&weeks, ",", Some("and")));
        }
    }

    /// Writes `[n] unit`, e.g., `day` or `3 days`.
    fn unit(&mut self, one: &str, many: &str) {
        if self.interval != 1 {
            self.add(&self.interval.to_string());
        }
        self.word(if plural(i64::from(self.interval)) { many } else { one });
    }

    fn in_months(&mut self) {
        if !self.rule.original().bymonth.is_empty() {
            self.word("in");
            self.by_month();
        }
    }

    /// Writes the days of the month and weekdays.
    fn by_day(&mut self) {
        if !self.monthdays.is_empty() {
            self.by_month_day();
            let some = self.numbered_weekdays();
            if !some.is_empty() {
                self.word("and");
                self.word("on the");
                self.add(&self.list(&some, ",", Some("and")));
            }
        } else if self.is_weekdays() {
            self.word("on");
            self.word("weekdays");
        } else if self.weekdays.is_some() {
            self.by_weekday();
        }
    }

    fn by_month_day(&mut self) {
        let days: Vec<String> =
            self.monthdays.iter().map(|&n| self.nth(i16::from(n))).collect();
        let all_weeks = self
            .weekdays
            .as_ref()
            .map(|wds| wds.all_weeks.as_slice())
            .unwrap_or(&[]);
        if !all_weeks.is_empty() {
            let names: Vec<String> =
                all_weeks.iter().map(|&wd| self.weekday_text(wd)).collect();
            self.word("on");
            self.add(&self.list(&names, ",", Some("or")));
            self.word("the");
            self.add(&self.list(&days, ",", Some("or")));
        } else {
            self.word("on the");
            self.add(&self.list(&days, ",", Some("and")));
        }
    }

    fn by_weekday(&mut self) {
        let Some(ref weekdays) = self.weekdays else { return };
        let all: Vec<String> = weekdays
            .all_weeks
            .iter()
            .map(|&wd| self.weekday_text(wd))
            .collect();
        let some = self.numbered_weekdays();

        if !all.is_empty() {
            self.word("on");
            self.add(&self.list(&all, ",", None));
        }
        if !some.is_empty() {
            if !all.is_empty() {
                self.word("and");
            }
            self.word("on the");
            self.add(&self.list(&some, ",", Some("and")));
        }
    }

    fn numbered_weekdays(&self) -> Vec<String> {
        let Some(ref weekdays) = self.weekdays else { return vec![] };
        weekdays.some_weeks.iter().map(|&wd| self.weekday_text(wd)).collect()
    }

    fn by_month(&mut self) {
        let months: Vec<String> = self
            .rule
            .original()
            .bymonth
            .iter()
            .map(|&m| self.lang.month_name(m).to_string())
            .collect();
        self.add(&self.list(&months, ",", Some("and")));
    }

    fn is_weekdays(&self) -> bool {
        self.weekdays.as_ref().is_some_and(|wds| wds.is_weekdays)
    }

    /// Writes an ordinal, e.g., `1st`, `22nd` or `3rd last`.
    fn nth(&self, n: i16) -> String {
        if n == -1 {
            return self.lang.word("last").to_string();
        }
        let abs = n.unsigned_abs();
        let suffix = match abs {
            1 | 21 | 31 => "st",
            2 | 22 => "nd",
            3 | 23 => "rd",
            _ => "th",
        };
        let nth = format!("{abs}{}", self.lang.word(suffix));
        if n < 0 { format!("{nth} {}", self.lang.word("last")) } else { nth }
    }

    fn weekday_text(&self, wd: ByWeekday) -> String {
        let name = self.lang.day_name(wd.weekday());
        match wd.number() {
            None => name.to_string(),
            Some(n) => format!("{} {name}", self.nth(n)),
        }
    }

    /// Joins `items` with `delim`, using `last` before the final item when
    /// given.
    fn list(&self, items: &[String], delim: &str, last: Option<&str>) -> String {
        let Some(last) = last else {
            return items.join(&format!("{delim} "));
        };
        let last = self.lang.word(last);
        let mut out = String::new();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                if i == items.len() - 1 {
                    out.push(' ');
                    out.push_str(last);
                    out.push(' ');
                } else {
                    out.push_str(delim);
                    out.push(' ');
                }
            }
            out.push_str(item);
        }
        out
    }

    fn word(&mut self, id: &str) {
        let word = self.lang.word(id);
        self.text.push(' ');
        self.text.push_str(word);
    }

    fn add(&mut self, s: &str) {
        self.text.push(' ');
        self.text.push_str(s);
    }
}

/// Returns true when `n` of something should be written in the plural.
fn plural(n: i64) -> bool {
    n % 100 != 1
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use crate::{
        text::language::ENGLISH,
        weekday::{FR, MO, SA, SU, TH, TU, WE},
    };

    use super::*;

    fn text(builder: &mut crate::rule::RuleBuilder) -> String {
        let rule = builder.dtstart(date(2014, 1, 1).at(9, 0, 0, 0)).build();
        to_text(&rule.unwrap(), &ENGLISH)
    }

    #[test]
    fn daily() {
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Daily).count(3)),
            @"every day for 3 times",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Daily).interval(2).count(1)),
            @"every 2 days for 1 time",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Daily).by_week_day([MO, TU, WE, TH, FR])),
            @"every day on weekdays",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Daily).by_month([1, 3]).by_week_day(SA)),
            @"every day in January and March on Saturday",
        );
        insta::assert_snapshot!(
            text(
                Rule::builder(Frequency::Daily)
                    .until(date(2015, 1, 2).at(0, 0, 0, 0))
            ),
            @"every day until January 2, 2015",
        );
        insta::assert_snapshot!(
            text(
                Rule::builder(Frequency::Daily)
                    .until(date(2015, 1, 2).at(9, 30, 0, 0))
            ),
            @"every day until January 2, 2015 at 09:30",
        );
        insta::assert_snapshot!(
            text(
                Rule::builder(Frequency::Daily)
                    .until(date(2015, 1, 2).at(17, 0, 45, 0))
            ),
            @"every day until January 2, 2015 at 17:00:45",
        );
    }

    #[test]
    fn weekly() {
        insta::assert_snapshot!(
            text(&mut Rule::builder(Frequency::Weekly)),
            @"every week",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Weekly).interval(2).by_week_day([WE, MO])),
            @"every 2 weeks on Monday, Wednesday",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Weekly).by_week_day([MO, TU, WE, TH, FR])),
            @"every weekday",
        );
        insta::assert_snapshot!(
            text(
                Rule::builder(Frequency::Weekly)
                    .interval(3)
                    .by_week_day([MO, TU, WE, TH, FR])
            ),
            @"every 3 weeks on weekdays",
        );
        insta::assert_snapshot!(
            text(
                Rule::builder(Frequency::Weekly)
                    .by_month(6)
                    .by_week_day([MO, TU, WE, TH, FR])
            ),
            @"every week in June on weekdays",
        );
        insta::assert_snapshot!(
            text(
                Rule::builder(Frequency::Weekly)
                    .by_week_day([MO, TU, WE, TH, FR, SA])
            ),
            @"every week on Monday, Tuesday, Wednesday, Thursday, Friday, Saturday",
        );
    }

    #[test]
    fn monthly() {
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Monthly).by_month_day([-1, 1])),
            @"every month on the 1st and last",
        );
        insta::assert_snapshot!(
            text(
                Rule::builder(Frequency::Monthly)
                    .by_month_day([-3, 2, -1, 22])
            ),
            @"every month on the 2nd, 22nd, 3rd last and last",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Monthly).by_week_day(FR.nth(1).unwrap())),
            @"every month on the 1st Friday",
        );
        insta::assert_snapshot!(
            text(
                Rule::builder(Frequency::Monthly)
                    .by_week_day([FR.nth(-1).unwrap(), MO.nth(2).unwrap(), SU])
            ),
            @"every month on Sunday and on the 2nd Monday and last Friday",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Monthly).by_week_day(FR).by_month_day(13)),
            @"every month on Friday the 13th",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Monthly).interval(6).by_month([3, 9])),
            @"every 6 months in March and September",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Monthly).by_month([3, 9])),
            @"every month in March and September",
        );
        insta::assert_snapshot!(
            text(
                Rule::builder(Frequency::Monthly)
                    .by_month_day(13)
                    .by_week_day(FR.nth(-1).unwrap())
            ),
            @"every month on the 13th and on the last Friday",
        );
    }

    #[test]
    fn yearly() {
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Yearly).by_month([1, 3])),
            @"every January and March",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Yearly).interval(2).by_month([1, 3])),
            @"every 2 years in January and March",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Yearly).interval(2)),
            @"every 2 years",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Yearly).by_year_day([1, 100, -1])),
            @"every year on the 1st, 100th and last day of the year",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Yearly).by_week(20)),
            @"every year in week 20",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Yearly).by_week([1, 52])),
            @"every year in weeks 1 and 52",
        );
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Yearly).by_week(-1)),
            @"every year in week -1",
        );
    }

    #[test]
    fn approximate() {
        insta::assert_snapshot!(
            text(Rule::builder(Frequency::Daily).by_hour([9, 17])),
            @"every day (~ approximate)",
        );
        insta::assert_snapshot!(
            text(&mut Rule::builder(Frequency::Hourly)),
            @"Unable to fully convert this rule to text",
        );
    }

    #[test]
    fn fully_convertible() {
        let ok = |builder: &mut crate::rule::RuleBuilder| {
            is_fully_convertible(&builder.build().unwrap())
        };
        assert!(ok(Rule::builder(Frequency::Daily).count(3)));
        assert!(ok(Rule::builder(Frequency::Weekly)
            .dtstart(date(2014, 1, 1).at(0, 0, 0, 0))
            .week_start(jiff::civil::Weekday::Sunday)
            .by_week_day(MO)));
        assert!(ok(Rule::builder(Frequency::Yearly).by_week(1)));
        assert!(!ok(Rule::builder(Frequency::Monthly).by_week(1)));
        assert!(!ok(Rule::builder(Frequency::Daily).by_hour(9)));
        assert!(!ok(Rule::builder(Frequency::Daily).by_set_position(1)));
        assert!(!ok(&mut Rule::builder(Frequency::Minutely)));
        assert!(!ok(Rule::builder(Frequency::Daily)
            .count(3)
            .until(date(2015, 1, 1).at(0, 0, 0, 0))));
    }

    #[test]
    fn translated() {
        let german = Language {
            words: &[
                ("every", "jeden"),
                ("day", "Tag"),
                ("for", "für"),
                ("times", "Mal"),
            ],
            ..ENGLISH.clone()
        };
        let rule = Rule::builder(Frequency::Daily).count(3).build().unwrap();
        insta::assert_snapshot!(to_text(&rule, &german), @"jeden Tag für 3 Mal");
    }
}
