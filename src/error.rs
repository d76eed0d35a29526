use thiserror::Error;

/// Every error that can occur while building or parsing a recurrence rule.
///
/// Iterating over a rule that has been successfully built never fails. It
/// simply stops once `count`, `until` or the maximum supported year is
/// reached.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("invalid recurrence rule: {0}")]
    Construction(ConstructionError),
    #[error("failed to parse recurrence rule: {0}")]
    Parse(ParseError),
}

/// An error found while validating or normalizing rule options.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConstructionError {
    #[error("unsupported option(s): {}", .0.join(", "))]
    UnsupportedOption(Vec<String>),
    #[error("invalid frequency `{0}`")]
    InvalidFrequency(String),
    #[error("a frequency is required unless 'byeaster' is set")]
    MissingFrequency,
    #[error(
        "interval value of `{0}` is invalid \
         (interval must be greater than or equal to 1)"
    )]
    InvalidInterval(i64),
    #[error(
        "count value of `{0}` is invalid \
         (count must be greater than or equal to 1)"
    )]
    InvalidCount(i64),
    #[error(
        "invalid 'bysetpos' value `{0}` \
         (values must be in range 1..=366 or -366..=-1)"
    )]
    InvalidSetPosition(i32),
    #[error("invalid '{option}' value `{value}` (values must be in range {range})")]
    OutOfRange { option: &'static str, value: i32, range: &'static str },
    #[error("weekday occurrence number must not be zero")]
    ZeroWeekdayNumber,
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// An error found while parsing the RRULE string format or English text.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseError {
    #[error("malformed token `{0}`")]
    MalformedToken(String),
    #[error("unknown property `{0}`")]
    UnknownProperty(String),
    #[error(
        "malformed date `{0}` \
         (expected YYYYMMDD or YYYYMMDDTHHMMSSZ)"
    )]
    MalformedDate(String),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected symbol at `{0}`")]
    UnexpectedSymbol(String),
    #[error("nth value `{0}` is out of range (must be in -366..=366)")]
    NthOutOfRange(i64),
    #[error("invalid token pattern `{pattern}`: {message}")]
    InvalidTokenPattern { pattern: String, message: String },
}

// Not `#[from]`: the inner error is already part of the message and must not
// also be reported as a source.
impl From<ConstructionError> for Error {
    fn from(err: ConstructionError) -> Error {
        Error::Construction(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl Error {
    /// Returns true when this error was found while validating options.
    pub fn is_construction(&self) -> bool {
        matches!(*self, Error::Construction(_))
    }

    /// Returns true when this error was found while parsing text.
    pub fn is_parse(&self) -> bool {
        matches!(*self, Error::Parse(_))
    }
}
