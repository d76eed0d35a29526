use jiff::civil::Weekday;

/// A kind of token recognized in a natural language recurrence rule.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Token {
    /// Whitespace or a final period. Never seen by the grammar.
    Skip,
    /// An integer, e.g., `2` or `-1`.
    Number,
    /// A small number written out, e.g., `two`.
    NumberAsText,
    Every,
    Days,
    /// Ends a list of days of the year, e.g., `day of the year`.
    DayOfYear,
    Weekdays,
    Weeks,
    Months,
    Years,
    /// Introduces a list of filters. In English, `on` or `in`.
    On,
    The,
    First,
    Second,
    Third,
    /// An ordinal written with digits. The first capture group of its
    /// pattern must match the digits, e.g., `([0-9]+)(st|nd|rd|th)`.
    Nth,
    Last,
    For,
    Times,
    Until,
    Weekday(Weekday),
    /// A month, from `1` (January) to `12` (December).
    Month(i8),
    /// A list separator. In English, `,`, `and` or `or`.
    Comma,
}

/// Everything needed to read and write rules in a natural language.
///
/// Token patterns are regular expressions. They are matched at the current
/// position in the input, case insensitively. When more than one pattern
/// matches, the longest match wins, and ties go to the pattern listed first.
///
/// Words are the phrases the generator writes, looked up by their English
/// text (e.g., `"every"` or `"on the"`). A phrase missing from `words` is
/// written in English.
#[derive(Clone, Debug)]
pub struct Language {
    /// Weekday names, starting with Monday.
    pub day_names: [&'static str; 7],
    /// Month names, starting with January.
    pub month_names: [&'static str; 12],
    pub words: &'static [(&'static str, &'static str)],
    pub tokens: &'static [(Token, &'static str)],
}

impl Language {
    /// Returns the translation of the given phrase.
    pub fn word<'a>(&'a self, id: &'a str) -> &'a str {
        self.words
            .iter()
            .find(|&&(key, _)| key == id)
            .map(|&(_, word)| word)
            .unwrap_or(id)
    }

    /// Returns the name of the given weekday.
    pub fn day_name(&self, weekday: Weekday) -> &'static str {
        self.day_names[crate::calendar::weekday_index(weekday)]
    }

    /// Returns the name of the given month, where `1` is January.
    ///
    /// Months outside of `1..=12` have no name and yield an empty string.
    pub fn month_name(&self, month: i8) -> &'static str {
        usize::try_from(month)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .and_then(|i| self.month_names.get(i))
            .copied()
            .unwrap_or("")
    }

    /// Returns the month matching the given name, either in full or by its
    /// first three letters, ignoring case.
    pub fn month_from_name(&self, name: &str) -> Option<i8> {
        let name = name.trim_end_matches('.');
        let index = self.month_names.iter().position(|full| {
            full.eq_ignore_ascii_case(name)
                || (name.chars().count() >= 3
                    && full
                        .get(..name.len())
                        .is_some_and(|pre| pre.eq_ignore_ascii_case(name)))
        })?;
        // OK because there are only 12 months.
        Some(i8::try_from(index + 1).unwrap())
    }
}

/// The English language, used by default.
pub static ENGLISH: Language = Language {
    day_names: [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ],
    month_names: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    words: &[],
    tokens: &[
        (Token::Skip, r"[ \r\n\t]+|\.$"),
        (Token::Number, r"-?[1-9][0-9]*"),
        (Token::NumberAsText, r"one|two|three"),
        (Token::Every, r"every"),
        (Token::Days, r"days?"),
        (Token::DayOfYear, r"days?\s+of\s+the\s+year"),
        (Token::Weekdays, r"weekdays?"),
        (Token::Weeks, r"weeks?"),
        (Token::Months, r"months?"),
        (Token::Years, r"years?"),
        (Token::On, r"on|in"),
        (Token::The, r"the"),
        (Token::First, r"first"),
        (Token::Second, r"second"),
        (Token::Third, r"third"),
        (Token::Nth, r"([1-9][0-9]*)(\.|th|nd|rd|st)"),
        (Token::Last, r"last"),
        (Token::For, r"for"),
        (Token::Times, r"times?"),
        (Token::Until, r"(un)?til"),
        (Token::Weekday(Weekday::Monday), r"mo(n(day)?)?"),
        (Token::Weekday(Weekday::Tuesday), r"tu(e(s(day)?)?)?"),
        (Token::Weekday(Weekday::Wednesday), r"we(d(n(esday)?)?)?"),
        (Token::Weekday(Weekday::Thursday), r"th(u(r(sday)?)?)?"),
        (Token::Weekday(Weekday::Friday), r"fr(i(day)?)?"),
        (Token::Weekday(Weekday::Saturday), r"sa(t(urday)?)?"),
        (Token::Weekday(Weekday::Sunday), r"su(n(day)?)?"),
        (Token::Month(1), r"jan(uary)?"),
        (Token::Month(2), r"feb(ruary)?"),
        (Token::Month(3), r"mar(ch)?"),
        (Token::Month(4), r"apr(il)?"),
        (Token::Month(5), r"may"),
        (Token::Month(6), r"june?"),
        (Token::Month(7), r"july?"),
        (Token::Month(8), r"aug(ust)?"),
        (Token::Month(9), r"sep(t(ember)?)?"),
        (Token::Month(10), r"oct(ober)?"),
        (Token::Month(11), r"nov(ember)?"),
        (Token::Month(12), r"dec(ember)?"),
        (Token::Comma, r"(,\s*|(and|or)\s*)+"),
    ],
};
