/*!
The occurrence iterator.

Occurrences are generated one period at a time, where a period is a year,
month, week or day depending on the rule's frequency. For each period, the
candidate days are described as indices into the current year (`0` is
January 1). Each candidate day is checked against a set of masks, built once
per year (and per month for numbered weekdays), that map a day index to its
month, day of month, weekday, week number and so on. The days that survive
are combined with the times of day for the period.

Masks extend 7 days past the end of the year, so that a weekly period that
starts in late December can be evaluated without switching years.
*/

use jiff::civil::{DateTime, Time};

use crate::{
    calendar::{self, MAX_YEAR, divmod, pymod},
    rule::{Frequency, NormalizedOptions},
};

/// The first day index of each month, plus the length of the year.
const M365RANGE: [usize; 13] =
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];
const M366RANGE: [usize; 13] =
    [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366];

/// The number of steps after which a sub-daily cursor is guaranteed to have
/// cycled through every reachable hour, minute of day or second of day.
const HOURLY_CYCLE: usize = 24;
const MINUTELY_CYCLE: usize = 24 * 60;
const SECONDLY_CYCLE: usize = 24 * 60 * 60;

/// An iterator over the occurrences of a rule, in ascending order.
///
/// This is created by `Rule::iter`.
#[derive(Debug)]
pub struct RuleIter<'o> {
    opts: &'o NormalizedOptions,
    info: IterInfo<'o>,
    cursor: Cursor,
    timeset: Vec<Time>,
    /// Whether any candidate day was excluded from the last period.
    filtered: bool,
    /// Occurrences of the current period, in descending order.
    pending: Vec<DateTime>,
    remaining: Option<u32>,
    /// Set once no more periods will be generated.
    exhausted: bool,
}

/// The position of the iterator.
///
/// Fields are wide and signed since advancing adds the interval before
/// carrying into the next field.
#[derive(Clone, Copy, Debug)]
struct Cursor {
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
    /// Weekday of the cursor's day, Monday as `0`. Only tracked for weekly
    /// frequency.
    weekday: i64,
}

impl<'o> RuleIter<'o> {
    pub(crate) fn new(opts: &'o NormalizedOptions) -> RuleIter<'o> {
        let start = opts.dtstart;
        let cursor = Cursor {
            year: i64::from(start.year()),
            month: i64::from(start.month()),
            day: i64::from(start.day()),
            hour: i64::from(start.hour()),
            minute: i64::from(start.minute()),
            second: i64::from(start.second()),
            weekday: i64::from(start.weekday().to_monday_zero_offset()),
        };
        let mut info = IterInfo::new(opts);
        info.rebuild(cursor.year, cursor.month);

        let timeset = match opts.timeset {
            Some(ref timeset) => timeset.clone(),
            None => {
                let skip = (opts.freq >= Frequency::Hourly
                    && !opts.byhour.is_empty()
                    && !contains(&opts.byhour, cursor.hour))
                    || (opts.freq >= Frequency::Minutely
                        && !opts.byminute.is_empty()
                        && !contains(&opts.byminute, cursor.minute))
                    || (opts.freq >= Frequency::Secondly
                        && !opts.bysecond.is_empty()
                        && !contains(&opts.bysecond, cursor.second));
                if skip { vec![] } else { sub_daily_timeset(opts, &cursor) }
            }
        };
        RuleIter {
            opts,
            info,
            cursor,
            timeset,
            filtered: false,
            pending: vec![],
            remaining: opts.count,
            exhausted: false,
        }
    }

    /// Stops iteration entirely, discarding anything not yet emitted.
    fn finish(&mut self) {
        self.exhausted = true;
        self.pending.clear();
    }

    /// Returns true when every day of the cursor's period is after `until`.
    fn is_past_until(&self) -> bool {
        let Some(until) = self.opts.until else { return false };
        let c = &self.cursor;
        let (month, day) = match self.opts.freq {
            Frequency::Yearly => (1, 1),
            Frequency::Monthly => (c.month, 1),
            _ => (c.month, c.day),
        };
        let start = i16::try_from(c.year).ok().and_then(|year| {
            let month = i8::try_from(month).ok()?;
            let day = i8::try_from(day).ok()?;
            jiff::civil::Date::new(year, month, day).ok()
        });
        start.is_some_and(|start| start.to_datetime(Time::midnight()) > until)
    }

    /// Generates the occurrences of the current period into `pending`.
    fn generate(&mut self) {
        let days: Vec<usize> = self
            .info
            .day_set(&self.cursor)
            .filter(|&i| !self.info.is_filtered(i))
            .collect();
        self.filtered = days.len() != self.info.day_set(&self.cursor).len();

        let mut occurrences = vec![];
        if !self.opts.bysetpos.is_empty() && !self.timeset.is_empty() {
            let len = i64::try_from(self.timeset.len()).unwrap_or(i64::MAX);
            for &pos in self.opts.bysetpos.iter() {
                let pos = i64::from(pos);
                let (daypos, timepos) =
                    if pos < 0 { divmod(pos, len) } else { divmod(pos - 1, len) };
                let Some(day) = index_signed(&days, daypos) else { continue };
                let Some(time) = usize::try_from(timepos)
                    .ok()
                    .and_then(|i| self.timeset.get(i))
                else {
                    continue;
                };
                let Some(date) = self.info.date(day) else { continue };
                let dt = calendar::combine(date, *time);
                if !occurrences.contains(&dt) {
                    occurrences.push(dt);
                }
            }
            occurrences.sort();
        } else {
            'days: for &day in days.iter() {
                let Some(date) = self.info.date(day) else {
                    self.exhausted = true;
                    break 'days;
                };
                for &time in self.timeset.iter() {
                    occurrences.push(calendar::combine(date, time));
                }
            }
        }
        occurrences.reverse();
        self.pending = occurrences;
    }

    /// Moves the cursor to the next period.
    fn advance(&mut self) {
        let opts = self.opts;
        let interval = i64::from(opts.interval);
        let c = &mut self.cursor;
        let mut fixday = false;
        match opts.freq {
            Frequency::Yearly => {
                c.year += interval;
                if c.year > i64::from(MAX_YEAR) {
                    self.exhausted = true;
                    return;
                }
                self.info.rebuild(c.year, c.month);
            }
            Frequency::Monthly => {
                c.month += interval;
                if c.month > 12 {
                    let (years, month) = divmod(c.month, 12);
                    c.month = month;
                    c.year += years;
                    if c.month == 0 {
                        c.month = 12;
                        c.year -= 1;
                    }
                }
                if c.year > i64::from(MAX_YEAR) {
                    self.exhausted = true;
                    return;
                }
                self.info.rebuild(c.year, c.month);
            }
            Frequency::Weekly => {
                let wkst = self.info.wkst;
                if wkst > c.weekday {
                    c.day += -(c.weekday + 1 + (6 - wkst)) + interval * 7;
                } else {
                    c.day += -(c.weekday - wkst) + interval * 7;
                }
                c.weekday = wkst;
                fixday = true;
            }
            Frequency::Daily => {
                c.day += interval;
                fixday = true;
            }
            Frequency::Hourly => {
                if self.filtered {
                    // Jump to the last hour of the day reachable at this
                    // interval.
                    c.hour += ((23 - c.hour) / interval) * interval;
                }
                let mut found = false;
                for _ in 0..HOURLY_CYCLE {
                    c.hour += interval;
                    let (days, hour) = divmod(c.hour, 24);
                    if days != 0 {
                        c.hour = hour;
                        c.day += days;
                        fixday = true;
                    }
                    if opts.byhour.is_empty() || contains(&opts.byhour, c.hour)
                    {
                        found = true;
                        break;
                    }
                }
                if !found {
                    log::debug!(
                        "no hour in {:?} is reachable at an interval of \
                         {interval} hours, ending iteration",
                        opts.byhour,
                    );
                    self.exhausted = true;
                    return;
                }
                self.timeset = sub_daily_timeset(opts, c);
            }
            Frequency::Minutely => {
                if self.filtered {
                    let minute_of_day = c.hour * 60 + c.minute;
                    c.minute += ((1439 - minute_of_day) / interval) * interval;
                }
                let mut found = false;
                for _ in 0..MINUTELY_CYCLE {
                    c.minute += interval;
                    let (hours, minute) = divmod(c.minute, 60);
                    if hours != 0 {
                        c.minute = minute;
                        c.hour += hours;
                        let (days, hour) = divmod(c.hour, 24);
                        if days != 0 {
                            c.hour = hour;
                            c.day += days;
                            fixday = true;
                        }
                    }
                    if (opts.byhour.is_empty() || contains(&opts.byhour, c.hour))
                        && (opts.byminute.is_empty()
                            || contains(&opts.byminute, c.minute))
                    {
                        found = true;
                        break;
                    }
                }
                if !found {
                    log::debug!(
                        "no minute is reachable at an interval of \
                         {interval} minutes, ending iteration",
                    );
                    self.exhausted = true;
                    return;
                }
                self.timeset = sub_daily_timeset(opts, c);
            }
            Frequency::Secondly => {
                if self.filtered {
                    let second_of_day =
                        c.hour * 3600 + c.minute * 60 + c.second;
                    c.second += ((86399 - second_of_day) / interval) * interval;
                }
                let mut found = false;
                for _ in 0..SECONDLY_CYCLE {
                    c.second += interval;
                    let (minutes, second) = divmod(c.second, 60);
                    if minutes != 0 {
                        c.second = second;
                        c.minute += minutes;
                        let (hours, minute) = divmod(c.minute, 60);
                        if hours != 0 {
                            c.minute = minute;
                            c.hour += hours;
                            let (days, hour) = divmod(c.hour, 24);
                            if days != 0 {
                                c.hour = hour;
                                c.day += days;
                                fixday = true;
                            }
                        }
                    }
                    if (opts.byhour.is_empty() || contains(&opts.byhour, c.hour))
                        && (opts.byminute.is_empty()
                            || contains(&opts.byminute, c.minute))
                        && (opts.bysecond.is_empty()
                            || contains(&opts.bysecond, c.second))
                    {
                        found = true;
                        break;
                    }
                }
                if !found {
                    log::debug!(
                        "no second is reachable at an interval of \
                         {interval} seconds, ending iteration",
                    );
                    self.exhausted = true;
                    return;
                }
                self.timeset = sub_daily_timeset(opts, c);
            }
        }

        if fixday && c.day > 28 {
            let mut days_in_month = month_len(c.year, c.month);
            if c.day > days_in_month {
                while c.day > days_in_month {
                    c.day -= days_in_month;
                    c.month += 1;
                    if c.month == 13 {
                        c.month = 1;
                        c.year += 1;
                        if c.year > i64::from(MAX_YEAR) {
                            self.exhausted = true;
                            return;
                        }
                    }
                    days_in_month = month_len(c.year, c.month);
                }
                self.info.rebuild(c.year, c.month);
            }
        }
    }
}

impl<'o> Iterator for RuleIter<'o> {
    type Item = DateTime;

    fn next(&mut self) -> Option<DateTime> {
        loop {
            if let Some(dt) = self.pending.pop() {
                if self.opts.until.is_some_and(|until| dt > until) {
                    self.finish();
                    return None;
                }
                if dt < self.opts.dtstart {
                    continue;
                }
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                }
                if self.remaining == Some(0) {
                    self.finish();
                }
                return Some(dt);
            }
            if self.exhausted {
                return None;
            }
            self.generate();
            if !self.exhausted {
                self.advance();
            }
            if !self.exhausted && self.is_past_until() {
                log::debug!("next period starts after until, ending iteration");
                self.exhausted = true;
            }
        }
    }
}

impl<'o> std::iter::FusedIterator for RuleIter<'o> {}

/// The masks describing the year (and month) the cursor is in.
#[derive(Debug)]
struct IterInfo<'o> {
    opts: &'o NormalizedOptions,
    /// The week start, Monday as `0`.
    wkst: i64,
    byweekday: Vec<usize>,
    bynweekday: Vec<(usize, i16)>,
    /// The (year, month) the masks were last built for.
    last: Option<(i64, i64)>,
    yearlen: usize,
    nextyearlen: usize,
    yearordinal: i32,
    mrange: &'static [usize; 13],
    /// The month of each day.
    mmask: Vec<i8>,
    /// The day of the month of each day.
    mdaymask: Vec<i8>,
    /// The day of the month of each day, counted from the end of the month.
    nmdaymask: Vec<i8>,
    /// The weekday of each day, Monday as `0`.
    wdaymask: Vec<usize>,
    /// Whether each day is in one of the requested week numbers.
    wnomask: Option<Vec<bool>>,
    /// Whether each day is one of the requested numbered weekdays.
    nwdaymask: Option<Vec<bool>>,
    /// The day indices of the requested Easter offsets.
    eastermask: Option<Vec<i64>>,
}

impl<'o> IterInfo<'o> {
    fn new(opts: &'o NormalizedOptions) -> IterInfo<'o> {
        IterInfo {
            opts,
            wkst: i64::from(opts.wkst.to_monday_zero_offset()),
            byweekday: opts
                .byweekday
                .iter()
                .map(|&wd| calendar::weekday_index(wd))
                .collect(),
            bynweekday: opts
                .bynweekday
                .iter()
                .map(|&(wd, nth)| (calendar::weekday_index(wd), nth))
                .collect(),
            last: None,
            yearlen: 365,
            nextyearlen: 365,
            yearordinal: 0,
            mrange: &M365RANGE,
            mmask: vec![],
            mdaymask: vec![],
            nmdaymask: vec![],
            wdaymask: vec![],
            wnomask: None,
            nwdaymask: None,
            eastermask: None,
        }
    }

    /// Rebuilds the masks for the given year and month.
    ///
    /// Year masks are only rebuilt when the year changes. The numbered
    /// weekday mask is rebuilt whenever the year or month changes.
    fn rebuild(&mut self, year: i64, month: i64) {
        if self.last == Some((year, month)) {
            return;
        }
        if self.last.map(|(y, _)| y) != Some(year) {
            log::trace!("rebuilding year masks for {year}");
            self.rebuild_year(year);
        }
        if !self.bynweekday.is_empty() {
            self.rebuild_numbered_weekdays(month);
        }
        self.last = Some((year, month));
    }

    fn rebuild_year(&mut self, year: i64) {
        // OK because the cursor never goes past `MAX_YEAR` and never before
        // the year of the start, which is a valid civil year.
        let civil_year = i32::try_from(year).unwrap();
        self.yearlen = calendar::days_in_year(civil_year);
        self.nextyearlen = calendar::days_in_year(civil_year + 1);
        let first = jiff::civil::Date::new(
            i16::try_from(civil_year).unwrap(),
            1,
            1,
        )
        .unwrap();
        self.yearordinal = calendar::to_ordinal(first);
        let yearweekday = calendar::weekday(first);

        self.mrange =
            if self.yearlen == 366 { &M366RANGE } else { &M365RANGE };
        self.mmask.clear();
        self.mdaymask.clear();
        self.nmdaymask.clear();
        for month in 1..=12 {
            let len = calendar::days_in_month(civil_year, month);
            for day in 1..=len {
                self.mmask.push(month);
                self.mdaymask.push(day);
                self.nmdaymask.push(day - len - 1);
            }
        }
        // The first week of the next year.
        for day in 1..=7 {
            self.mmask.push(1);
            self.mdaymask.push(day);
            self.nmdaymask.push(day - 32);
        }
        self.wdaymask = (0..self.yearlen + 14)
            .map(|i| (yearweekday + i) % 7)
            .collect();

        self.wnomask = if self.opts.byweekno.is_empty() {
            None
        } else {
            Some(self.week_number_mask(civil_year, yearweekday))
        };
        self.eastermask = self.opts.byeaster.map(|offset| {
            let Some(easter) = i16::try_from(civil_year)
                .ok()
                .and_then(calendar::easter)
            else {
                return vec![];
            };
            let ordinal = calendar::to_ordinal(easter);
            vec![
                i64::from(ordinal) + i64::from(offset)
                    - i64::from(self.yearordinal),
            ]
        });
    }

    /// Builds the mask of days in the requested week numbers.
    ///
    /// Week 1 is the first week with at least 4 days in this year, where
    /// weeks start on `wkst`. Days before week 1 belong to the last week of
    /// the previous year, and the last days of the year may belong to week
    /// 1 of the next year.
    fn week_number_mask(&self, year: i32, yearweekday: usize) -> Vec<bool> {
        let yearlen = to_i64(self.yearlen);
        let yearweekday = to_i64(yearweekday);
        let wkst = self.wkst;
        let byweekno = &self.opts.byweekno;
        let mut mask = vec![false; self.yearlen + 7];

        let firstwkst = pymod(7 - yearweekday + wkst, 7);
        let mut no1wkst = firstwkst;
        let wyearlen = if no1wkst >= 4 {
            no1wkst = 0;
            // Number of days in the year, plus the days we got from last
            // year.
            yearlen + pymod(yearweekday - wkst, 7)
        } else {
            // Number of days in the year, minus the days we left in last
            // year.
            yearlen - no1wkst
        };
        let (div, rem) = divmod(wyearlen, 7);
        let numweeks = div + rem / 4;

        let mark_week = |mask: &mut Vec<bool>, mut i: i64| {
            for _ in 0..7 {
                if let Some(slot) = index_mut(mask, i) {
                    *slot = true;
                }
                i += 1;
                if index(&self.wdaymask, i).map(|&wd| to_i64(wd)) == Some(wkst)
                {
                    break;
                }
            }
        };
        for &n in byweekno.iter() {
            let mut n = i64::from(n);
            if n < 0 {
                n += numweeks + 1;
            }
            if !(0 < n && n <= numweeks) {
                continue;
            }
            let i = if n > 1 {
                let mut i = no1wkst + (n - 1) * 7;
                if no1wkst != firstwkst {
                    i -= 7 - firstwkst;
                }
                i
            } else {
                no1wkst
            };
            mark_week(&mut mask, i);
        }

        if byweekno.contains(&1) {
            // Check week number 1 of next year as well.
            let mut i = no1wkst + numweeks * 7;
            if no1wkst != firstwkst {
                i -= 7 - firstwkst;
            }
            if i < yearlen {
                // If week starts in next year, we don't care about it.
                mark_week(&mut mask, i);
            }
        }

        if no1wkst != 0 {
            // Check last week number of last year as well. If no1wkst is 0,
            // either the year started on week start, or week number 1 got
            // days from last year, so there are no days from last year's
            // last week number in this year.
            let lnumweeks = if !byweekno.contains(&-1) {
                let lyearlen = to_i64(calendar::days_in_year(year - 1));
                let lyearweekday = pymod(yearweekday - lyearlen, 7);
                let lno1wkst = pymod(7 - lyearweekday + wkst, 7);
                if lno1wkst >= 4 {
                    52 + pymod(lyearlen + pymod(lyearweekday - wkst, 7), 7) / 4
                } else {
                    52 + pymod(yearlen - no1wkst, 7) / 4
                }
            } else {
                -1
            };
            if byweekno.iter().any(|&n| i64::from(n) == lnumweeks) {
                for slot in mask.iter_mut().take(to_usize(no1wkst)) {
                    *slot = true;
                }
            }
        }
        mask
    }

    /// Builds the mask of days matching a numbered weekday, within each
    /// month (at monthly frequency or with `bymonth`) or the whole year.
    fn rebuild_numbered_weekdays(&mut self, month: i64) {
        let mut ranges: Vec<(usize, usize)> = vec![];
        match self.opts.freq {
            Frequency::Yearly if !self.opts.bymonth.is_empty() => {
                for &m in self.opts.bymonth.iter() {
                    let m = usize::from(m.unsigned_abs());
                    ranges.push((self.mrange[m - 1], self.mrange[m]));
                }
            }
            Frequency::Yearly => ranges.push((0, self.yearlen)),
            Frequency::Monthly => {
                let m = to_usize(month);
                ranges.push((self.mrange[m - 1], self.mrange[m]));
            }
            _ => {}
        }
        if ranges.is_empty() {
            self.nwdaymask = None;
            return;
        }

        let mut mask = vec![false; self.yearlen];
        for (first, last) in ranges {
            let (first, last) = (to_i64(first), to_i64(last) - 1);
            for &(wday, nth) in self.bynweekday.iter() {
                let wday = to_i64(wday);
                let nth = i64::from(nth);
                let i = if nth < 0 {
                    let i = last + (nth + 1) * 7;
                    let Some(&wd) = index(&self.wdaymask, i) else { continue };
                    i - pymod(to_i64(wd) - wday, 7)
                } else {
                    let i = first + (nth - 1) * 7;
                    let Some(&wd) = index(&self.wdaymask, i) else { continue };
                    i + pymod(7 - to_i64(wd) + wday, 7)
                };
                if first <= i && i <= last {
                    if let Some(slot) = index_mut(&mut mask, i) {
                        *slot = true;
                    }
                }
            }
        }
        self.nwdaymask = Some(mask);
    }

    /// Returns the candidate day indices for the period the cursor is in.
    fn day_set(&self, c: &Cursor) -> std::ops::Range<usize> {
        match self.opts.freq {
            Frequency::Yearly => 0..self.yearlen,
            Frequency::Monthly => {
                let m = to_usize(c.month);
                self.mrange[m - 1]..self.mrange[m]
            }
            Frequency::Weekly => {
                let start = self.day_index(c);
                let mut end = start;
                for _ in 0..7 {
                    end += 1;
                    if self.wdaymask.get(end).map(|&wd| to_i64(wd))
                        == Some(self.wkst)
                    {
                        break;
                    }
                }
                start..end
            }
            _ => {
                let i = self.day_index(c);
                i..i + 1
            }
        }
    }

    /// Returns the day index of the cursor's date in its year.
    fn day_index(&self, c: &Cursor) -> usize {
        self.mrange[to_usize(c.month) - 1] + to_usize(c.day) - 1
    }

    /// Returns the date with the given day index.
    fn date(&self, i: usize) -> Option<jiff::civil::Date> {
        let i = i32::try_from(i).ok()?;
        calendar::from_ordinal(self.yearordinal.checked_add(i)?)
    }

    /// Returns true when the day with the given index is excluded by any of
    /// the rule's day-level filters.
    fn is_filtered(&self, i: usize) -> bool {
        let opts = self.opts;
        if !opts.bymonth.is_empty()
            && !self.mmask.get(i).is_some_and(|m| opts.bymonth.contains(m))
        {
            return true;
        }
        if let Some(ref wnomask) = self.wnomask {
            if !wnomask.get(i).copied().unwrap_or(false) {
                return true;
            }
        }
        if !self.byweekday.is_empty()
            && !self.wdaymask.get(i).is_some_and(|wd| self.byweekday.contains(wd))
        {
            return true;
        }
        if let Some(ref nwdaymask) = self.nwdaymask {
            if !nwdaymask.get(i).copied().unwrap_or(false) {
                return true;
            }
        }
        if let Some(ref eastermask) = self.eastermask {
            if !eastermask.contains(&to_i64(i)) {
                return true;
            }
        }
        if !opts.bymonthday.is_empty() || !opts.bynmonthday.is_empty() {
            let positive =
                self.mdaymask.get(i).is_some_and(|d| opts.bymonthday.contains(d));
            let negative = self
                .nmdaymask
                .get(i)
                .is_some_and(|d| opts.bynmonthday.contains(d));
            if !positive && !negative {
                return true;
            }
        }
        if !opts.byyearday.is_empty() {
            let (i, yearlen) = (to_i64(i), to_i64(self.yearlen));
            let (positive, negative) = if i < yearlen {
                (i + 1, i - yearlen)
            } else {
                (i + 1 - yearlen, i - yearlen - to_i64(self.nextyearlen))
            };
            if !opts
                .byyearday
                .iter()
                .any(|&d| i64::from(d) == positive || i64::from(d) == negative)
            {
                return true;
            }
        }
        false
    }
}

/// Returns the times of day for a sub-daily period starting at the cursor.
fn sub_daily_timeset(opts: &NormalizedOptions, c: &Cursor) -> Vec<Time> {
    let (hour, minute, second) = (to_i8(c.hour), to_i8(c.minute), to_i8(c.second));
    let mut times = vec![];
    match opts.freq {
        Frequency::Hourly => {
            for &minute in opts.byminute.iter() {
                for &second in opts.bysecond.iter() {
                    times.push(jiff::civil::time(hour, minute, second, 0));
                }
            }
        }
        Frequency::Minutely => {
            for &second in opts.bysecond.iter() {
                times.push(jiff::civil::time(hour, minute, second, 0));
            }
        }
        _ => times.push(jiff::civil::time(hour, minute, second, 0)),
    }
    times.sort();
    times
}

fn month_len(year: i64, month: i64) -> i64 {
    let year = i32::try_from(year).unwrap_or(i32::MAX);
    let month = i8::try_from(month).unwrap_or(1);
    i64::from(calendar::days_in_month(year, month))
}

fn contains(values: &[i8], value: i64) -> bool {
    values.iter().any(|&v| i64::from(v) == value)
}

/// Indexes a list with Python semantics: negative indices count from the
/// end.
fn index_signed<T: Copy>(values: &[T], i: i64) -> Option<T> {
    let i = if i < 0 { to_i64(values.len()) + i } else { i };
    index(values, i).copied()
}

fn index<T>(values: &[T], i: i64) -> Option<&T> {
    values.get(usize::try_from(i).ok()?)
}

fn index_mut<T>(values: &mut [T], i: i64) -> Option<&mut T> {
    values.get_mut(usize::try_from(i).ok()?)
}

fn to_i64(n: usize) -> i64 {
    // OK because day indices and list lengths are tiny.
    i64::try_from(n).unwrap()
}

fn to_usize(n: i64) -> usize {
    // OK because this is only used for months and days, which the cursor
    // keeps positive.
    usize::try_from(n).unwrap()
}

fn to_i8(n: i64) -> i8 {
    // OK because this is only used for hours, minutes and seconds, which are
    // always normalized before building times.
    i8::try_from(n).unwrap()
}
