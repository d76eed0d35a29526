/*!
Queries over the occurrences of a rule.

Every query is answered by driving a `Visitor` over the occurrence iterator.
The visitor decides, for each occurrence, whether to keep it and whether
iteration should continue. Results of the non-callback queries are cached on
the rule, and once every occurrence is known, narrower queries are answered
by filtering that list instead of iterating again.
*/

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use jiff::civil::DateTime;

use crate::rule::Rule;

impl Rule {
    /// Returns every occurrence of this rule.
    ///
    /// This only terminates on its own when the rule has a `count` or an
    /// `until`. Otherwise, iteration continues until the end of year 9999,
    /// which is almost never what a caller wants. Use one of the bounded
    /// queries (or `Rule::iter`) for open-ended rules.
    pub fn all(&self) -> Vec<DateTime> {
        self.run(Query::All).into_list()
    }

    /// Like `Rule::all`, but calls `keep` on each occurrence along with the
    /// number of occurrences kept so far. When `keep` returns `false`, the
    /// occurrence is dropped and iteration stops.
    ///
    /// Results are never cached.
    pub fn all_with<F>(&self, keep: F) -> Vec<DateTime>
    where
        F: FnMut(DateTime, usize) -> bool,
    {
        self.visit(Visitor::with_callback(Query::All, keep)).into_list()
    }

    /// Returns every occurrence between `after` and `before`.
    ///
    /// When `inclusive` is true, occurrences equal to either bound are
    /// included.
    pub fn between(
        &self,
        after: DateTime,
        before: DateTime,
        inclusive: bool,
    ) -> Vec<DateTime> {
        self.run(Query::Between { after, before, inclusive }).into_list()
    }

    /// Like `Rule::between`, but with a callback that works like the one
    /// given to `Rule::all_with`.
    pub fn between_with<F>(
        &self,
        after: DateTime,
        before: DateTime,
        inclusive: bool,
        keep: F,
    ) -> Vec<DateTime>
    where
        F: FnMut(DateTime, usize) -> bool,
    {
        let query = Query::Between { after, before, inclusive };
        self.visit(Visitor::with_callback(query, keep)).into_list()
    }

    /// Returns the last occurrence before `dt`, or `dt` itself if it is an
    /// occurrence and `inclusive` is true.
    ///
    /// This has to scan every occurrence from the start of the rule up to
    /// `dt`.
    pub fn before(&self, dt: DateTime, inclusive: bool) -> Option<DateTime> {
        self.run(Query::Before { dt, inclusive }).into_one()
    }

    /// Returns the first occurrence after `dt`, or `dt` itself if it is an
    /// occurrence and `inclusive` is true.
    pub fn after(&self, dt: DateTime, inclusive: bool) -> Option<DateTime> {
        self.run(Query::After { dt, inclusive }).into_one()
    }

    /// Returns the total number of occurrences of this rule.
    ///
    /// This is the length of `Rule::all`, and the same caveats apply.
    pub fn count(&self) -> usize {
        self.all().len()
    }

    /// Answers the given query, from the cache when possible.
    fn run(&self, query: Query) -> Answer {
        if let Some(answer) = self.cached(&query) {
            return answer;
        }
        if matches!(query, Query::All) && !self.is_finite() {
            log::warn!(
                "computing every occurrence of `{self}`, which has neither \
                 a count nor an until date, iteration will only stop at the \
                 end of year 9999",
            );
        }
        let answer = self.visit(Visitor::new(query.clone()));
        if let Some(ref cache) = self.cache {
            lock(cache).insert(query, answer.clone());
        }
        answer
    }

    /// Returns a copy of the cached answer to the given query.
    ///
    /// When the query itself was never asked but every occurrence is known,
    /// the answer is computed from those occurrences and cached.
    fn cached(&self, query: &Query) -> Option<Answer> {
        let mut cache = lock(self.cache.as_ref()?);
        if let Some(answer) = cache.get(query) {
            log::trace!("answering {query:?} from cache");
            return Some(answer);
        }
        let all = cache.all.as_ref()?;
        log::trace!("answering {query:?} from cached occurrences");
        let mut visitor = Visitor::new(query.clone());
        for &dt in all.iter() {
            if !visitor.accept(dt) {
                break;
            }
        }
        let answer = visitor.finish();
        cache.insert(query.clone(), answer.clone());
        Some(answer)
    }

    fn visit<F>(&self, mut visitor: Visitor<F>) -> Answer
    where
        F: FnMut(DateTime, usize) -> bool,
    {
        for dt in self.iter() {
            if !visitor.accept(dt) {
                break;
            }
        }
        visitor.finish()
    }
}

/// The results of previous queries on a rule.
#[derive(Debug, Default)]
pub(crate) struct Cache {
    all: Option<Vec<DateTime>>,
    answers: HashMap<Query, Answer>,
}

impl Cache {
    /// Returns true when nothing has been cached yet.
    pub(crate) fn is_empty(&self) -> bool {
        self.all.is_none() && self.answers.is_empty()
    }

    fn get(&self, query: &Query) -> Option<Answer> {
        if matches!(*query, Query::All) {
            return self.all.clone().map(Answer::List);
        }
        self.answers.get(query).cloned()
    }

    fn insert(&mut self, query: Query, answer: Answer) {
        match (query, answer) {
            (Query::All, Answer::List(all)) => self.all = Some(all),
            (query, answer) => {
                self.answers.insert(query, answer);
            }
        }
    }
}

/// Locks the cache, ignoring poisoning.
///
/// A panic while the lock is held can't leave the cache half-written, since
/// every write is a single insert or assignment.
fn lock(cache: &Mutex<Cache>) -> MutexGuard<'_, Cache> {
    cache.lock().unwrap_or_else(|err| err.into_inner())
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
enum Query {
    All,
    Between { after: DateTime, before: DateTime, inclusive: bool },
    Before { dt: DateTime, inclusive: bool },
    After { dt: DateTime, inclusive: bool },
}

impl Query {
    /// Returns true when the occurrence given is before the lower bound of
    /// this query.
    fn too_early(&self, dt: DateTime) -> bool {
        match *self {
            Query::Between { after: min, inclusive, .. }
            | Query::After { dt: min, inclusive } => {
                if inclusive { dt < min } else { dt <= min }
            }
            Query::All | Query::Before { .. } => false,
        }
    }

    /// Returns true when the occurrence given is after the upper bound of
    /// this query.
    fn too_late(&self, dt: DateTime) -> bool {
        match *self {
            Query::Between { before: max, inclusive, .. }
            | Query::Before { dt: max, inclusive } => {
                if inclusive { dt > max } else { dt >= max }
            }
            Query::All | Query::After { .. } => false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Answer {
    List(Vec<DateTime>),
    One(Option<DateTime>),
}

impl Answer {
    fn into_list(self) -> Vec<DateTime> {
        match self {
            Answer::List(list) => list,
            Answer::One(one) => one.into_iter().collect(),
        }
    }

    fn into_one(self) -> Option<DateTime> {
        match self {
            Answer::List(list) => list.last().copied(),
            Answer::One(one) => one,
        }
    }
}

/// Decides which occurrences a query keeps and when iteration stops.
struct Visitor<F> {
    query: Query,
    found: Vec<DateTime>,
    keep: Option<F>,
}

/// The type of a visitor without a callback.
type NoCallback = fn(DateTime, usize) -> bool;

impl Visitor<NoCallback> {
    fn new(query: Query) -> Visitor<NoCallback> {
        Visitor { query, found: vec![], keep: None }
    }
}

impl<F: FnMut(DateTime, usize) -> bool> Visitor<F> {
    fn with_callback(query: Query, keep: F) -> Visitor<F> {
        Visitor { query, found: vec![], keep: Some(keep) }
    }

    /// Possibly keeps the given occurrence. Returns false when iteration
    /// should stop.
    fn accept(&mut self, dt: DateTime) -> bool {
        match self.query {
            Query::All => self.add(dt),
            Query::Between { .. } => {
                if self.query.too_early(dt) {
                    true
                } else if self.query.too_late(dt) {
                    false
                } else {
                    self.add(dt)
                }
            }
            Query::Before { .. } => {
                if self.query.too_late(dt) {
                    return false;
                }
                self.found.clear();
                self.add(dt)
            }
            Query::After { .. } => {
                if self.query.too_early(dt) {
                    return true;
                }
                self.add(dt);
                false
            }
        }
    }

    fn add(&mut self, dt: DateTime) -> bool {
        if let Some(ref mut keep) = self.keep {
            if !keep(dt, self.found.len()) {
                return false;
            }
        }
        self.found.push(dt);
        true
    }

    fn finish(self) -> Answer {
        match self.query {
            Query::All | Query::Between { .. } => Answer::List(self.found),
            Query::Before { .. } | Query::After { .. } => {
                Answer::One(self.found.last().copied())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use crate::{
        rule::{Frequency, Options},
        weekday::FR,
    };

    use super::*;

    fn daily(count: u32) -> Rule {
        Rule::builder(Frequency::Daily)
            .dtstart(date(2014, 1, 1).at(9, 0, 0, 0))
            .count(count)
            .build()
            .unwrap()
    }

    fn jan(day: i8) -> DateTime {
        date(2014, 1, day).at(9, 0, 0, 0)
    }

    #[test]
    fn rule_is_sync() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Rule>();
    }

    #[test]
    fn all_and_count() {
        let rule = daily(3);
        assert_eq!(rule.all(), vec![jan(1), jan(2), jan(3)]);
        assert_eq!(rule.count(), 3);
    }

    #[test]
    fn between_bounds() {
        let rule = daily(10);
        assert_eq!(
            rule.between(jan(3), jan(6), true),
            [jan(3), jan(4), jan(5), jan(6)],
        );
        assert_eq!(rule.between(jan(3), jan(6), false), [jan(4), jan(5)]);
        // Bounds that aren't occurrences behave the same either way.
        let after = date(2014, 1, 3).at(10, 0, 0, 0);
        let before = date(2014, 1, 5).at(8, 0, 0, 0);
        assert_eq!(rule.between(after, before, false), [jan(4)]);
        assert_eq!(rule.between(after, before, true), [jan(4)]);
    }

    #[test]
    fn between_single_occurrence_at_lower_bound() {
        let rule = daily(1);
        let later = date(2014, 2, 1).at(0, 0, 0, 0);
        assert_eq!(rule.between(jan(1), later, true), [jan(1)]);
        assert!(rule.between(jan(1), later, false).is_empty());
    }

    #[test]
    fn before_and_after() {
        let rule = daily(10);
        assert_eq!(rule.before(jan(5), false), Some(jan(4)));
        assert_eq!(rule.before(jan(5), true), Some(jan(5)));
        assert_eq!(rule.before(jan(1), false), None);
        assert_eq!(rule.after(jan(5), false), Some(jan(6)));
        assert_eq!(rule.after(jan(5), true), Some(jan(5)));
        assert_eq!(rule.after(jan(10), false), None);
        let earlier = date(2013, 1, 1).at(0, 0, 0, 0);
        assert_eq!(rule.after(earlier, false), Some(jan(1)));
    }

    #[test]
    fn queries_on_open_ended_rules() {
        let rule = Rule::builder(Frequency::Monthly)
            .dtstart(jan(1))
            .by_week_day(FR.nth(1).unwrap())
            .build()
            .unwrap();
        let feb7 = date(2014, 2, 7).at(9, 0, 0, 0);
        let mar7 = date(2014, 3, 7).at(9, 0, 0, 0);
        assert_eq!(rule.after(jan(10), false), Some(feb7));
        assert_eq!(
            rule.before(date(2014, 3, 1).at(0, 0, 0, 0), false),
            Some(feb7),
        );
        assert_eq!(
            rule.between(jan(1), date(2014, 4, 1).at(0, 0, 0, 0), false),
            [jan(3), feb7, mar7],
        );
    }

    #[test]
    fn no_occurrences() {
        // There is no February 30th.
        let rule = Rule::new(Options {
            freq: Some(Frequency::Yearly),
            dtstart: Some(jan(1)),
            bymonth: vec![2],
            bymonthday: vec![30],
            until: Some(date(2030, 1, 1).at(0, 0, 0, 0)),
            ..Options::default()
        })
        .unwrap();
        assert!(rule.all().is_empty());
        assert_eq!(rule.before(date(2020, 1, 1).at(0, 0, 0, 0), true), None);
        assert_eq!(rule.after(jan(1), true), None);
        assert_eq!(rule.count(), 0);
    }

    #[test]
    fn callback_stops_iteration() {
        let rule = daily(10);
        let mut seen = vec![];
        let kept = rule.all_with(|dt, i| {
            seen.push(i);
            dt < jan(4)
        });
        assert_eq!(kept, [jan(1), jan(2), jan(3)]);
        assert_eq!(seen, [0, 1, 2, 3]);

        let kept = rule.between_with(jan(2), jan(9), true, |_, i| i < 2);
        assert_eq!(kept, [jan(2), jan(3)]);
        assert!(rule.cache.as_ref().unwrap().lock().unwrap().is_empty());
    }

    #[test]
    fn answers_are_cached() {
        let rule = daily(10);
        assert_eq!(rule.after(jan(5), false), Some(jan(6)));
        {
            let cache = rule.cache.as_ref().unwrap().lock().unwrap();
            assert!(cache.all.is_none());
            assert_eq!(cache.answers.len(), 1);
        }
        assert_eq!(rule.after(jan(5), false), Some(jan(6)));
        {
            let cache = rule.cache.as_ref().unwrap().lock().unwrap();
            assert_eq!(cache.answers.len(), 1);
        }

        // Queries differing only by inclusivity are answered separately.
        assert_eq!(rule.after(jan(5), true), Some(jan(5)));
        for _ in 0..3 {
            assert_eq!(rule.between(jan(2), jan(4), false), [jan(3)]);
        }
        let cache = rule.cache.as_ref().unwrap().lock().unwrap();
        assert_eq!(cache.answers.len(), 3);
        let query = Query::After { dt: jan(5), inclusive: true };
        assert_eq!(cache.get(&query), Some(Answer::One(Some(jan(5)))));
    }

    #[test]
    fn narrower_queries_use_cached_occurrences() {
        let rule = daily(10);
        let all = rule.all();
        assert_eq!(all.len(), 10);
        assert_eq!(rule.between(jan(3), jan(6), false), [jan(4), jan(5)]);
        assert_eq!(rule.before(jan(3), false), Some(jan(2)));
        assert_eq!(rule.after(jan(9), true), Some(jan(9)));
        let cache = rule.cache.as_ref().unwrap().lock().unwrap();
        assert_eq!(cache.all.as_ref().unwrap().len(), 10);
        assert_eq!(cache.answers.len(), 3);
    }

    #[test]
    fn returned_lists_are_copies() {
        let rule = daily(3);
        let mut all = rule.all();
        all.clear();
        assert_eq!(rule.all().len(), 3);
    }

    #[test]
    fn uncached() {
        let rule = Rule::new_uncached(daily(3).original().clone()).unwrap();
        assert!(rule.cache.is_none());
        assert_eq!(rule.all().len(), 3);
        assert_eq!(rule.between(jan(1), jan(3), false), [jan(2)]);
    }
}
