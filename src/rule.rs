use std::{
    ops::{Range, RangeInclusive},
    sync::Mutex,
};

use {
    jiff::civil::{DateTime, Time, Weekday},
    serde::{Deserialize, Deserializer, Serialize, Serializer},
};

use crate::{
    calendar,
    error::{ConstructionError, Error},
    iter::RuleIter,
    query::Cache,
    rfc,
    weekday::ByWeekday,
};

/// The names of every option accepted by `Options::from_json`.
pub const OPTION_NAMES: [&str; 16] = [
    "freq",
    "dtstart",
    "interval",
    "wkst",
    "count",
    "until",
    "bysetpos",
    "bymonth",
    "bymonthday",
    "byyearday",
    "byweekno",
    "byweekday",
    "byhour",
    "byminute",
    "bysecond",
    "byeaster",
];

/// A compiled RFC 5545 recurrence rule.
///
/// A rule is built once from `Options` and is immutable afterwards, except
/// for an internal cache of query results. Cloning a rule never clones its
/// cache.
///
/// The queries (`all`, `between`, `before` and `after`) are defined in the
/// `query` module. `Rule::iter` gives direct access to the lazy sequence of
/// occurrences.
#[derive(Debug)]
pub struct Rule {
    orig: Options,
    options: NormalizedOptions,
    pub(crate) cache: Option<Mutex<Cache>>,
}

impl Rule {
    /// Validates and normalizes the given options into a rule.
    pub fn new(options: Options) -> Result<Rule, Error> {
        let normalized = NormalizedOptions::new(&options)?;
        Ok(Rule {
            orig: options,
            options: normalized,
            cache: Some(Mutex::new(Cache::default())),
        })
    }

    /// Like `Rule::new`, but query results are never cached.
    pub fn new_uncached(options: Options) -> Result<Rule, Error> {
        let mut rule = Rule::new(options)?;
        rule.cache = None;
        Ok(rule)
    }

    /// Returns a builder for constructing a `Rule` at the given frequency.
    pub fn builder(freq: Frequency) -> RuleBuilder {
        RuleBuilder::new(freq)
    }

    /// Builds a rule from a JSON object of options.
    ///
    /// See `Options::from_json`.
    pub fn from_json(json: &str) -> Result<Rule, Error> {
        Rule::new(Options::from_json(json)?)
    }

    /// The options this rule was built from, before normalization.
    pub fn original(&self) -> &Options {
        &self.orig
    }

    /// The normalized options that drive iteration.
    pub fn options(&self) -> &NormalizedOptions {
        &self.options
    }

    /// Returns true when this rule terminates on its own, via either `count`
    /// or `until`.
    pub fn is_finite(&self) -> bool {
        self.options.count.is_some() || self.options.until.is_some()
    }

    /// Returns an iterator over all occurrences of this rule.
    ///
    /// Note that the iterator may be very long: without `count` or `until`,
    /// it only stops at the end of year 9999. Callers should either set one
    /// of them or call `take(N)`.
    pub fn iter(&self) -> RuleIter<'_> {
        RuleIter::new(&self.options)
    }
}

impl Clone for Rule {
    fn clone(&self) -> Rule {
        Rule {
            orig: self.orig.clone(),
            options: self.options.clone(),
            cache: self.cache.as_ref().map(|_| Mutex::new(Cache::default())),
        }
    }
}

impl<'r> IntoIterator for &'r Rule {
    type IntoIter = RuleIter<'r>;
    type Item = DateTime;

    fn into_iter(self) -> RuleIter<'r> {
        self.iter()
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.orig, f)
    }
}

impl std::str::FromStr for Rule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Rule, Error> {
        Rule::new(rfc::parse_string(s)?)
    }
}

/// The frequency at which a rule repeats.
///
/// Frequencies are ordered from coarsest (`Yearly`) to finest (`Secondly`).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minutely,
    Secondly,
}

impl Frequency {
    /// All frequencies, from coarsest to finest.
    pub const ALL: [Frequency; 7] = [
        Frequency::Yearly,
        Frequency::Monthly,
        Frequency::Weekly,
        Frequency::Daily,
        Frequency::Hourly,
        Frequency::Minutely,
        Frequency::Secondly,
    ];

    /// Returns the RFC 5545 name of this frequency, e.g., `YEARLY`.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Frequency::Yearly => "YEARLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Daily => "DAILY",
            Frequency::Hourly => "HOURLY",
            Frequency::Minutely => "MINUTELY",
            Frequency::Secondly => "SECONDLY",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Frequency, Error> {
        use self::Frequency::*;

        let freq = match &*s.to_lowercase() {
            "yearly" | "year" | "yr" | "y" => Yearly,
            "monthly" | "month" | "mo" => Monthly,
            "weekly" | "week" | "wk" | "w" => Weekly,
            "daily" | "day" | "d" => Daily,
            "hourly" | "hour" | "hr" | "h" => Hourly,
            "minutely" | "minute" | "min" | "m" => Minutely,
            "secondly" | "second" | "sec" | "s" => Secondly,
            _ => {
                return Err(
                    ConstructionError::InvalidFrequency(s.to_string()).into()
                );
            }
        };
        Ok(freq)
    }
}

impl Serialize for Frequency {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Frequency, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Index(u8),
            Name(String),
        }

        match Repr::deserialize(d)? {
            Repr::Index(i) => {
                Frequency::ALL.get(usize::from(i)).copied().ok_or_else(|| {
                    serde::de::Error::custom(
                        ConstructionError::InvalidFrequency(i.to_string()),
                    )
                })
            }
            Repr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// The options of a recurrence rule as given by a caller.
///
/// Every option is optional. Lists are empty when not given. These are
/// validated and normalized into `NormalizedOptions` when a `Rule` is built.
///
/// In JSON, a scalar is accepted anywhere a list is expected and `null` means
/// "not given." Weekdays are written as `"MO"`, `"+2MO"` or `0` (Monday)
/// through `6` (Sunday). Datetimes are written in either the RRULE wire
/// format or ISO 8601.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freq: Option<Frequency>,
    #[serde(with = "datetime", skip_serializing_if = "Option::is_none")]
    pub dtstart: Option<DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i32>,
    #[serde(
        with = "crate::weekday::week_start",
        skip_serializing_if = "Option::is_none"
    )]
    pub wkst: Option<Weekday>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(with = "datetime", skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bysetpos: Vec<i32>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bymonth: Vec<i8>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bymonthday: Vec<i8>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub byyearday: Vec<i16>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub byweekno: Vec<i8>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub byweekday: Vec<ByWeekday>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub byhour: Vec<i8>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub byminute: Vec<i8>,
    #[serde(
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub bysecond: Vec<i8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byeaster: Option<i16>,
}

impl Options {
    /// Parses options from a JSON object.
    ///
    /// Every key must be one of `OPTION_NAMES`. When any key isn't, an
    /// "unsupported option" error naming all such keys is returned.
    pub fn from_json(json: &str) -> Result<Options, Error> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|err| invalid_json(&err))?;
        Options::from_json_value(value)
    }

    /// Like `Options::from_json`, but for an already parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Options, Error> {
        let serde_json::Value::Object(ref map) = value else {
            return Err(ConstructionError::InvalidValue {
                key: "options".to_string(),
                message: "options must be a JSON object".to_string(),
            }
            .into());
        };
        let unsupported: Vec<String> = map
            .keys()
            .filter(|key| !OPTION_NAMES.contains(&key.as_str()))
            .cloned()
            .collect();
        if !unsupported.is_empty() {
            return Err(ConstructionError::UnsupportedOption(unsupported).into());
        }
        serde_json::from_value(value).map_err(|err| invalid_json(&err))
    }

    /// Returns true when no option has been given.
    pub fn is_empty(&self) -> bool {
        *self == Options::default()
    }

    /// Returns the names of the options that were given, in the order of
    /// `OPTION_NAMES`.
    pub fn given(&self) -> Vec<&'static str> {
        let given = [
            self.freq.is_some(),
            self.dtstart.is_some(),
            self.interval.is_some(),
            self.wkst.is_some(),
            self.count.is_some(),
            self.until.is_some(),
            !self.bysetpos.is_empty(),
            !self.bymonth.is_empty(),
            !self.bymonthday.is_empty(),
            !self.byyearday.is_empty(),
            !self.byweekno.is_empty(),
            !self.byweekday.is_empty(),
            !self.byhour.is_empty(),
            !self.byminute.is_empty(),
            !self.bysecond.is_empty(),
            self.byeaster.is_some(),
        ];
        OPTION_NAMES
            .iter()
            .zip(given)
            .filter(|&(_, given)| given)
            .map(|(&name, _)| name)
            .collect()
    }
}

impl std::fmt::Display for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&rfc::options_to_string(self))
    }
}

fn invalid_json(err: &serde_json::Error) -> Error {
    ConstructionError::InvalidValue {
        key: "options".to_string(),
        message: err.to_string(),
    }
    .into()
}

fn one_or_many<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        One(T),
        Many(Vec<T>),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(d)? {
        None => vec![],
        Some(OneOrMany::One(v)) => vec![v],
        Some(OneOrMany::Many(vs)) => vs,
    })
}

/// (De)serializes an optional datetime in the RRULE wire format.
mod datetime {
    use super::*;

    pub fn serialize<S: Serializer>(
        dt: &Option<DateTime>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match *dt {
            None => s.serialize_none(),
            Some(dt) => s.serialize_some(&calendar::format_datetime(dt)),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime>, D::Error> {
        let Some(s) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        calendar::parse_flexible(&s).map(Some).map_err(serde::de::Error::custom)
    }
}

/// The canonical options of a rule, after validation and normalization.
///
/// This is what the occurrence iterator works with. Compared to `Options`:
///
/// * Every scalar option has a value, filled in from defaults or `dtstart`.
/// * When no day-level filter is given, one is derived from `dtstart` so that
///   the rule repeats on the same day as its start.
/// * Month days are split into positive (`bymonthday`) and negative
///   (`bynmonthday`) values.
/// * Weekdays are split into plain weekdays (`byweekday`) and numbered
///   weekdays (`bynweekday`). Numbered weekdays are only kept at monthly and
///   yearly frequency.
/// * The times of day are precomputed into `timeset` for frequencies coarser
///   than hourly.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NormalizedOptions {
    pub freq: Frequency,
    pub dtstart: DateTime,
    pub interval: i32,
    pub wkst: Weekday,
    pub count: Option<u32>,
    pub until: Option<DateTime>,
    pub bysetpos: Vec<i32>,
    pub bymonth: Vec<i8>,
    pub bymonthday: Vec<i8>,
    pub bynmonthday: Vec<i8>,
    pub byyearday: Vec<i16>,
    pub byweekno: Vec<i8>,
    pub byweekday: Vec<Weekday>,
    pub bynweekday: Vec<(Weekday, i16)>,
    pub byhour: Vec<i8>,
    pub byminute: Vec<i8>,
    pub bysecond: Vec<i8>,
    pub byeaster: Option<i16>,
    pub timeset: Option<Vec<Time>>,
}

impl NormalizedOptions {
    fn new(orig: &Options) -> Result<NormalizedOptions, ConstructionError> {
        let freq = match (orig.freq, orig.byeaster) {
            (_, Some(_)) => Frequency::Yearly,
            (Some(freq), None) => freq,
            (None, None) => return Err(ConstructionError::MissingFrequency),
        };
        let dtstart = match orig.dtstart {
            Some(dt) => calendar::truncate_to_second(dt),
            None => calendar::now(),
        };
        let interval = orig.interval.unwrap_or(1);
        if interval < 1 {
            return Err(ConstructionError::InvalidInterval(i64::from(
                interval,
            )));
        }
        if let Some(count) = orig.count {
            if count < 1 {
                return Err(ConstructionError::InvalidCount(i64::from(count)));
            }
        }
        validate(orig)?;

        let mut bymonth = orig.bymonth.clone();
        let mut bymonthday = orig.bymonthday.clone();
        let mut byweekday = orig.byweekday.clone();
        let has_day_filter = !orig.byweekno.is_empty()
            || !orig.byyearday.is_empty()
            || !orig.bymonthday.is_empty()
            || !orig.byweekday.is_empty()
            || orig.byeaster.is_some();
        if !has_day_filter {
            match freq {
                Frequency::Yearly => {
                    if bymonth.is_empty() {
                        bymonth = vec![dtstart.month()];
                    }
                    bymonthday = vec![dtstart.day()];
                }
                Frequency::Monthly => {
                    bymonthday = vec![dtstart.day()];
                }
                Frequency::Weekly => {
                    byweekday = vec![ByWeekday::any(dtstart.weekday())];
                }
                _ => {}
            }
        }

        let (positive, negative): (Vec<i8>, Vec<i8>) =
            bymonthday.iter().partition(|&&day| day > 0);
        let mut plain = vec![];
        let mut numbered = vec![];
        for wd in byweekday.iter() {
            match wd.number() {
                Some(nth) if freq <= Frequency::Monthly => {
                    numbered.push((wd.weekday(), nth));
                }
                _ => plain.push(wd.weekday()),
            }
        }

        let default_unless = |given: &[i8], finer: Frequency, value: i8| {
            if !given.is_empty() {
                given.to_vec()
            } else if freq < finer {
                vec![value]
            } else {
                vec![]
            }
        };
        let byhour =
            default_unless(&orig.byhour, Frequency::Hourly, dtstart.hour());
        let byminute = default_unless(
            &orig.byminute,
            Frequency::Minutely,
            dtstart.minute(),
        );
        let bysecond = default_unless(
            &orig.bysecond,
            Frequency::Secondly,
            dtstart.second(),
        );
        let timeset = if freq < Frequency::Hourly {
            let mut times = vec![];
            for &hour in byhour.iter() {
                for &minute in byminute.iter() {
                    for &second in bysecond.iter() {
                        times.push(jiff::civil::time(hour, minute, second, 0));
                    }
                }
            }
            times.sort();
            Some(times)
        } else {
            None
        };

        Ok(NormalizedOptions {
            freq,
            dtstart,
            interval,
            wkst: orig.wkst.unwrap_or(Weekday::Monday),
            count: orig.count,
            until: orig.until,
            bysetpos: orig.bysetpos.clone(),
            bymonth,
            bymonthday: positive,
            bynmonthday: negative,
            byyearday: orig.byyearday.clone(),
            byweekno: orig.byweekno.clone(),
            byweekday: plain,
            bynweekday: numbered,
            byhour,
            byminute,
            bysecond,
            byeaster: orig.byeaster,
            timeset,
        })
    }
}

/// Checks that every by-value is in its legal range.
fn validate(orig: &Options) -> Result<(), ConstructionError> {
    fn check<T: Copy + Into<i32>>(
        option: &'static str,
        values: &[T],
        range: &'static str,
        ok: impl Fn(i32) -> bool,
    ) -> Result<(), ConstructionError> {
        for &v in values.iter() {
            let value = v.into();
            if !ok(value) {
                return Err(ConstructionError::OutOfRange {
                    option,
                    value,
                    range,
                });
            }
        }
        Ok(())
    }
    let signed = |max: i32| {
        move |v: i32| (-max..=-1).contains(&v) || (1..=max).contains(&v)
    };

    for &pos in orig.bysetpos.iter() {
        if !signed(366)(pos) {
            return Err(ConstructionError::InvalidSetPosition(pos));
        }
    }
    check("bymonth", &orig.bymonth, "1..=12", |v| (1..=12).contains(&v))?;
    check("bymonthday", &orig.bymonthday, "1..=31 or -31..=-1", signed(31))?;
    check("byyearday", &orig.byyearday, "1..=366 or -366..=-1", signed(366))?;
    check("byweekno", &orig.byweekno, "1..=53 or -53..=-1", signed(53))?;
    check("byhour", &orig.byhour, "0..=23", |v| (0..=23).contains(&v))?;
    check("byminute", &orig.byminute, "0..=59", |v| (0..=59).contains(&v))?;
    check("bysecond", &orig.bysecond, "0..=59", |v| (0..=59).contains(&v))?;
    let easter = orig.byeaster.as_slice();
    check("byeaster", easter, "-366..=366", |v| (-366..=366).contains(&v))?;
    Ok(())
}

/// A builder for constructing a valid recurrence rule.
///
/// Every by-filter method may be called more than once. Each call adds to
/// the values already given.
#[derive(Clone, Debug)]
pub struct RuleBuilder {
    options: Options,
}

impl RuleBuilder {
    fn new(freq: Frequency) -> RuleBuilder {
        RuleBuilder { options: Options { freq: Some(freq), ..Options::default() } }
    }

    /// Validates the options given so far and builds a rule from them.
    pub fn build(&self) -> Result<Rule, Error> {
        Rule::new(self.options.clone())
    }

    /// Returns the options given so far.
    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn dtstart(&mut self, start: DateTime) -> &mut RuleBuilder {
        self.options.dtstart = Some(start);
        self
    }

    pub fn until(&mut self, until: DateTime) -> &mut RuleBuilder {
        self.options.until = Some(until);
        self
    }

    pub fn count(&mut self, count: u32) -> &mut RuleBuilder {
        self.options.count = Some(count);
        self
    }

    pub fn interval(&mut self, interval: i32) -> &mut RuleBuilder {
        self.options.interval = Some(interval);
        self
    }

    pub fn week_start(&mut self, weekday: Weekday) -> &mut RuleBuilder {
        self.options.wkst = Some(weekday);
        self
    }

    pub fn by_month<I: IntoI8Iter>(&mut self, months: I) -> &mut RuleBuilder {
        self.options.bymonth.extend(months.into_i8_iter());
        self
    }

    pub fn by_week<I: IntoI8Iter>(&mut self, weeks: I) -> &mut RuleBuilder {
        self.options.byweekno.extend(weeks.into_i8_iter());
        self
    }

    pub fn by_year_day<I: IntoI16Iter>(
        &mut self,
        days: I,
    ) -> &mut RuleBuilder {
        self.options.byyearday.extend(days.into_i16_iter());
        self
    }

    pub fn by_month_day<I: IntoI8Iter>(
        &mut self,
        days: I,
    ) -> &mut RuleBuilder {
        self.options.bymonthday.extend(days.into_i8_iter());
        self
    }

    pub fn by_week_day<I: IntoByWeekdayIter>(
        &mut self,
        week_days: I,
    ) -> &mut RuleBuilder {
        self.options.byweekday.extend(week_days.into_by_weekday_iter());
        self
    }

    pub fn by_hour<I: IntoI8Iter>(&mut self, hours: I) -> &mut RuleBuilder {
        self.options.byhour.extend(hours.into_i8_iter());
        self
    }

    pub fn by_minute<I: IntoI8Iter>(
        &mut self,
        minutes: I,
    ) -> &mut RuleBuilder {
        self.options.byminute.extend(minutes.into_i8_iter());
        self
    }

    pub fn by_second<I: IntoI8Iter>(
        &mut self,
        seconds: I,
    ) -> &mut RuleBuilder {
        self.options.bysecond.extend(seconds.into_i8_iter());
        self
    }

    pub fn by_set_position<I: IntoI32Iter>(
        &mut self,
        positions: I,
    ) -> &mut RuleBuilder {
        self.options.bysetpos.extend(positions.into_i32_iter());
        self
    }

    /// Sets the offset, in days, from Easter Sunday.
    ///
    /// This forces the rule to a yearly frequency.
    pub fn by_easter(&mut self, offset: i16) -> &mut RuleBuilder {
        self.options.byeaster = Some(offset);
        self
    }
}

/// A trait that permits flexibly specifying a sequence of `i8` integers.
///
/// This trait is used for builder methods on `RuleBuilder`. It permits
/// callers to provide integers in a number of flexible ways:
///
/// * A single integer: `5`
/// * An array or vector of integers: `[1, 3, 5]`.
/// * A single range of integers: `5..8` or `5..=8`.
/// * An array of ranges of integers: `[5..=10, 15..=20]`.
///
/// There is one such trait per integer type instead of one generic trait so
/// that `builder.by_month(5)` can infer the type of `5`.
pub trait IntoI8Iter {
    fn into_i8_iter(self) -> impl Iterator<Item = i8>;
}

/// Like `IntoI8Iter`, but for `i16`.
pub trait IntoI16Iter {
    fn into_i16_iter(self) -> impl Iterator<Item = i16>;
}

/// Like `IntoI8Iter`, but for `i32`.
pub trait IntoI32Iter {
    fn into_i32_iter(self) -> impl Iterator<Item = i32>;
}

macro_rules! impl_into_int_iter {
    ($trait:ident, $method:ident, $int:ty) => {
        impl $trait for $int {
            fn $method(self) -> impl Iterator<Item = $int> {
                std::iter::once(self)
            }
        }

        impl $trait for Range<$int> {
            fn $method(self) -> impl Iterator<Item = $int> {
                self
            }
        }

        impl $trait for RangeInclusive<$int> {
            fn $method(self) -> impl Iterator<Item = $int> {
                self
            }
        }

        impl $trait for Vec<$int> {
            fn $method(self) -> impl Iterator<Item = $int> {
                self.into_iter()
            }
        }

        impl<const N: usize> $trait for [$int; N] {
            fn $method(self) -> impl Iterator<Item = $int> {
                self.into_iter()
            }
        }

        impl<const N: usize> $trait for [RangeInclusive<$int>; N] {
            fn $method(self) -> impl Iterator<Item = $int> {
                self.into_iter().flatten()
            }
        }
    };
}

impl_into_int_iter!(IntoI8Iter, into_i8_iter, i8);
impl_into_int_iter!(IntoI16Iter, into_i16_iter, i16);
impl_into_int_iter!(IntoI32Iter, into_i32_iter, i32);

/// A trait that permits flexibly specifying a sequence of weekdays.
///
/// * A single `ByWeekday`, e.g., `MO` or `FR.nth(-1)?`.
/// * A single `jiff::civil::Weekday`.
/// * An inclusive range of weekdays, e.g., `Weekday::Monday..=Weekday::Friday`.
/// * An array or vector of any of the above.
pub trait IntoByWeekdayIter {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday>;
}

impl IntoByWeekdayIter for ByWeekday {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        std::iter::once(self)
    }
}

impl IntoByWeekdayIter for Weekday {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        std::iter::once(ByWeekday::any(self))
    }
}

impl IntoByWeekdayIter for RangeInclusive<Weekday> {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        let (start, end) = (*self.start(), *self.end());
        // OK because `Weekday::until` guarantees `0..=6`.
        // And add `1` because this is an inclusive range.
        let count = 1 + usize::try_from(start.until(end)).unwrap();
        start.cycle_forward().take(count).map(ByWeekday::any)
    }
}

impl IntoByWeekdayIter for Vec<ByWeekday> {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        self.into_iter()
    }
}

impl<const N: usize> IntoByWeekdayIter for [ByWeekday; N] {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        self.into_iter()
    }
}

impl<const N: usize> IntoByWeekdayIter for [Weekday; N] {
    fn into_by_weekday_iter(self) -> impl Iterator<Item = ByWeekday> {
        self.into_iter().map(ByWeekday::any)
    }
}
