use {
    jiff::civil::Weekday,
    serde::{Deserialize, Deserializer, Serialize, Serializer},
};

use crate::{
    calendar,
    error::{ConstructionError, Error, ParseError},
};

pub const MO: ByWeekday = ByWeekday::any(Weekday::Monday);
pub const TU: ByWeekday = ByWeekday::any(Weekday::Tuesday);
pub const WE: ByWeekday = ByWeekday::any(Weekday::Wednesday);
pub const TH: ByWeekday = ByWeekday::any(Weekday::Thursday);
pub const FR: ByWeekday = ByWeekday::any(Weekday::Friday);
pub const SA: ByWeekday = ByWeekday::any(Weekday::Saturday);
pub const SU: ByWeekday = ByWeekday::any(Weekday::Sunday);

/// The two letter RFC 5545 weekday codes, starting with Monday.
const CODES: [&str; 7] = ["MO", "TU", "WE", "TH", "FR", "SA", "SU"];

/// A type describing "day of week" inputs.
///
/// This is either any day with a particular weekday, or the nth occurrence
/// of a weekday within a month or year. For example, `+2MO` is the second
/// Monday and `-1FR` is the last Friday.
///
/// The occurrence number is never zero.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "WeekdayRepr", into = "String")]
pub struct ByWeekday {
    weekday: Weekday,
    nth: Option<i16>,
}

impl ByWeekday {
    /// Returns a weekday matching every day on the given weekday.
    pub const fn any(weekday: Weekday) -> ByWeekday {
        ByWeekday { weekday, nth: None }
    }

    /// Returns a weekday matching only the `nth` occurrence of the given
    /// weekday in its period. Negative numbers count from the end.
    ///
    /// This returns an error when `nth` is zero.
    pub fn numbered(
        nth: i16,
        weekday: Weekday,
    ) -> Result<ByWeekday, ConstructionError> {
        if nth == 0 {
            return Err(ConstructionError::ZeroWeekdayNumber);
        }
        Ok(ByWeekday { weekday, nth: Some(nth) })
    }

    /// Returns this weekday with its occurrence number replaced by `nth`.
    ///
    /// Returns this same weekday when `nth` is already its occurrence number.
    pub fn nth(self, nth: i16) -> Result<ByWeekday, ConstructionError> {
        if self.nth == Some(nth) {
            return Ok(self);
        }
        ByWeekday::numbered(nth, self.weekday)
    }

    /// Returns the weekday.
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Returns the occurrence number, if one was given.
    pub fn number(&self) -> Option<i16> {
        self.nth
    }

    /// Returns this weekday as an index, with Monday as `0`.
    pub fn index(&self) -> usize {
        calendar::weekday_index(self.weekday)
    }

    /// Returns the two letter code for this weekday, e.g., `MO`.
    pub fn code(&self) -> &'static str {
        CODES[self.index()]
    }

    /// Builds a weekday from an index with Monday as `0`.
    fn from_index(index: u8) -> Result<ByWeekday, ConstructionError> {
        if index > 6 {
            return Err(ConstructionError::InvalidValue {
                key: "weekday".to_string(),
                message: format!(
                    "`{index}` is not a weekday index \
                     (values must be in range 0..=6)"
                ),
            });
        }
        Ok(ByWeekday::any(calendar::weekday_from_index(usize::from(index))))
    }
}

impl From<Weekday> for ByWeekday {
    fn from(weekday: Weekday) -> ByWeekday {
        ByWeekday::any(weekday)
    }
}

impl std::fmt::Display for ByWeekday {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.nth {
            None => write!(f, "{}", self.code()),
            Some(nth) => write!(f, "{nth:+}{}", self.code()),
        }
    }
}

impl std::str::FromStr for ByWeekday {
    type Err = Error;

    /// Parses `MO`, `2MO`, `+2MO` or `-1FR`, ignoring case.
    fn from_str(s: &str) -> Result<ByWeekday, Error> {
        let malformed = || ParseError::MalformedToken(s.to_string());
        let split = s.len().checked_sub(2).ok_or_else(malformed)?;
        if !s.is_char_boundary(split) {
            return Err(malformed().into());
        }
        let (nth, code) = s.split_at(split);
        let index = CODES
            .iter()
            .position(|c| c.eq_ignore_ascii_case(code))
            .ok_or_else(malformed)?;
        let weekday = calendar::weekday_from_index(index);
        if nth.is_empty() {
            return Ok(ByWeekday::any(weekday));
        }
        let digits = nth.strip_prefix(['+', '-']).unwrap_or(nth);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed().into());
        }
        let nth: i16 = nth.parse().map_err(|_| malformed())?;
        Ok(ByWeekday::numbered(nth, weekday)?)
    }
}

impl From<ByWeekday> for String {
    fn from(wd: ByWeekday) -> String {
        wd.to_string()
    }
}

/// The ways a weekday may be written in JSON: `"MO"`, `"+2MO"` or `0`.
#[derive(Deserialize)]
#[serde(untagged)]
enum WeekdayRepr {
    Index(u8),
    Code(String),
}

impl TryFrom<WeekdayRepr> for ByWeekday {
    type Error = Error;

    fn try_from(repr: WeekdayRepr) -> Result<ByWeekday, Error> {
        match repr {
            WeekdayRepr::Index(index) => Ok(ByWeekday::from_index(index)?),
            WeekdayRepr::Code(code) => code.parse(),
        }
    }
}

/// (De)serializes the week start as a plain weekday code.
pub(crate) mod week_start {
    use super::*;

    pub fn serialize<S: Serializer>(
        wkst: &Option<Weekday>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match *wkst {
            None => s.serialize_none(),
            Some(wd) => s.serialize_some(ByWeekday::any(wd).code()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Weekday>, D::Error> {
        let wd: Option<ByWeekday> = Option::deserialize(d)?;
        Ok(wd.map(|wd| wd.weekday()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants() {
        assert_eq!(MO.index(), 0);
        assert_eq!(SU.index(), 6);
        assert_eq!(FR.weekday(), Weekday::Friday);
        assert_eq!(FR.number(), None);
        assert_eq!(FR.code(), "FR");
    }

    #[test]
    fn numbered() {
        let last_friday = FR.nth(-1).unwrap();
        assert_eq!(last_friday.number(), Some(-1));
        assert_eq!(last_friday.to_string(), "-1FR");
        assert_eq!(MO.nth(2).unwrap().to_string(), "+2MO");
        assert_ne!(MO.nth(2).unwrap(), MO);
        assert_eq!(MO.nth(2).unwrap(), MO.nth(2).unwrap());
        assert_eq!(
            MO.nth(0).unwrap_err(),
            ConstructionError::ZeroWeekdayNumber,
        );
        assert_eq!(
            ByWeekday::numbered(0, Weekday::Monday).unwrap_err(),
            ConstructionError::ZeroWeekdayNumber,
        );
    }

    #[test]
    fn parse() {
        assert_eq!("MO".parse::<ByWeekday>().unwrap(), MO);
        assert_eq!("su".parse::<ByWeekday>().unwrap(), SU);
        assert_eq!("+2MO".parse::<ByWeekday>().unwrap(), MO.nth(2).unwrap());
        assert_eq!("2MO".parse::<ByWeekday>().unwrap(), MO.nth(2).unwrap());
        assert_eq!(
            "-1FR".parse::<ByWeekday>().unwrap(),
            FR.nth(-1).unwrap(),
        );
        assert_eq!(
            "-20MO".parse::<ByWeekday>().unwrap(),
            MO.nth(-20).unwrap(),
        );

        insta::assert_snapshot!(
            "XX".parse::<ByWeekday>().unwrap_err(),
            @"failed to parse recurrence rule: malformed token `XX`",
        );
        insta::assert_snapshot!(
            "M".parse::<ByWeekday>().unwrap_err(),
            @"failed to parse recurrence rule: malformed token `M`",
        );
        insta::assert_snapshot!(
            "+MO".parse::<ByWeekday>().unwrap_err(),
            @"failed to parse recurrence rule: malformed token `+MO`",
        );
        insta::assert_snapshot!(
            "0MO".parse::<ByWeekday>().unwrap_err(),
            @"invalid recurrence rule: weekday occurrence number must not be zero",
        );
    }

    #[test]
    fn json() {
        let wds: Vec<ByWeekday> =
            serde_json::from_str(r#"["MO", "+2TU", 4, "-1SU"]"#).unwrap();
        assert_eq!(wds, vec![MO, TU.nth(2).unwrap(), FR, SU.nth(-1).unwrap()]);
        assert_eq!(
            serde_json::to_string(&wds).unwrap(),
            r#"["MO","+2TU","FR","-1SU"]"#,
        );
        assert!(serde_json::from_str::<ByWeekday>("7").is_err());
        assert!(serde_json::from_str::<ByWeekday>(r#""0MO""#).is_err());
    }
}
