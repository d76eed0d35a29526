use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::ParseError,
    text::language::{ENGLISH, Language, Token},
};

/// A compiled token table.
#[derive(Debug)]
pub(crate) struct Lexer {
    rules: Vec<(Token, Regex)>,
}

impl Lexer {
    /// Compiles the token table of the given language.
    pub(crate) fn new(language: &Language) -> Result<Lexer, ParseError> {
        let mut rules = Vec::with_capacity(language.tokens.len());
        for &(token, pattern) in language.tokens.iter() {
            let re = Regex::new(&format!("(?i)^(?:{pattern})")).map_err(
                |err| ParseError::InvalidTokenPattern {
                    pattern: pattern.to_string(),
                    message: err.to_string(),
                },
            )?;
            rules.push((token, re));
        }
        Ok(Lexer { rules })
    }

    /// Returns the lexer for English.
    pub(crate) fn english() -> &'static Lexer {
        // OK because the English patterns are tested to compile.
        static LEXER: LazyLock<Lexer> =
            LazyLock::new(|| Lexer::new(&ENGLISH).unwrap());
        &LEXER
    }

    /// Returns the longest token at the start of `text`.
    fn longest<'t>(&self, text: &'t str) -> Option<Lexeme<'t>> {
        let mut best: Option<Lexeme<'t>> = None;
        for (token, re) in self.rules.iter() {
            let Some(caps) = re.captures(text) else { continue };
            // OK because group 0 always participates in a match.
            let m = caps.get(0).unwrap();
            if m.is_empty() {
                continue;
            }
            if best.as_ref().is_some_and(|b| b.text.len() >= m.len()) {
                continue;
            }
            best = Some(Lexeme {
                token: *token,
                text: m.as_str(),
                group: caps.get(1).map(|g| g.as_str()),
            });
        }
        best
    }
}

/// A single token matched in the input.
#[derive(Clone, Copy, Debug)]
struct Lexeme<'t> {
    token: Token,
    text: &'t str,
    group: Option<&'t str>,
}

/// A stream of symbols with one symbol of lookahead.
///
/// The current symbol is `None` either at the end of the input or when no
/// token matches at the current position. In the latter case, `unmatched`
/// returns the rest of the input.
#[derive(Clone, Debug)]
pub(crate) struct Symbols<'l, 't> {
    lexer: &'l Lexer,
    /// The input starting at the current symbol.
    here: &'t str,
    /// The input after the current symbol.
    rest: &'t str,
    current: Option<Lexeme<'t>>,
    unmatched: Option<&'t str>,
}

impl<'l, 't> Symbols<'l, 't> {
    /// Starts reading symbols from `text`, positioned on the first symbol.
    pub(crate) fn new(lexer: &'l Lexer, text: &'t str) -> Symbols<'l, 't> {
        let mut symbols = Symbols {
            lexer,
            here: text,
            rest: text,
            current: None,
            unmatched: None,
        };
        symbols.next_symbol();
        symbols
    }

    /// The current symbol.
    pub(crate) fn symbol(&self) -> Option<Token> {
        self.current.map(|lex| lex.token)
    }

    /// The text matched by the first capture group of the current symbol.
    pub(crate) fn group(&self) -> Option<&'t str> {
        self.current.and_then(|lex| lex.group)
    }

    /// The text matched by the current symbol.
    pub(crate) fn matched(&self) -> Option<&'t str> {
        self.current.map(|lex| lex.text)
    }

    /// The input starting at the current symbol.
    pub(crate) fn here(&self) -> &'t str {
        self.here
    }

    /// The input after the current symbol.
    pub(crate) fn rest(&self) -> &'t str {
        self.rest
    }

    /// The input at which no token matched, if that happened.
    pub(crate) fn unmatched(&self) -> Option<&'t str> {
        self.unmatched
    }

    /// Returns true when there are no symbols left.
    pub(crate) fn is_done(&self) -> bool {
        self.current.is_none()
    }

    /// Moves to the next symbol, skipping whitespace. Returns true when there
    /// is one.
    pub(crate) fn next_symbol(&mut self) -> bool {
        self.current = None;
        loop {
            if self.rest.is_empty() || self.unmatched.is_some() {
                self.here = self.rest;
                return false;
            }
            self.here = self.rest;
            let Some(lex) = self.lexer.longest(self.rest) else {
                log::trace!("no token matches at `{}`", self.rest);
                self.unmatched = Some(self.rest);
                return false;
            };
            self.rest = &self.rest[lex.text.len()..];
            if lex.token != Token::Skip {
                self.current = Some(lex);
                return true;
            }
        }
    }

    /// Moves past the current symbol if it is `token`.
    pub(crate) fn accept(&mut self, token: Token) -> bool {
        if self.symbol() != Some(token) {
            return false;
        }
        self.next_symbol();
        true
    }

    /// Like `accept`, but fails when the current symbol isn't `token`.
    pub(crate) fn expect(&mut self, token: Token) -> Result<(), ParseError> {
        if self.accept(token) {
            return Ok(());
        }
        Err(self.unexpected())
    }

    /// Consumes the rest of the input.
    pub(crate) fn finish(&mut self) {
        self.current = None;
        self.here = "";
        self.rest = "";
    }

    /// Returns an error describing the current position.
    pub(crate) fn unexpected(&self) -> ParseError {
        match self.unmatched {
            Some(text) => ParseError::UnexpectedSymbol(text.to_string()),
            None if self.is_done() => ParseError::UnexpectedEnd,
            None => ParseError::UnexpectedSymbol(self.here.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::Weekday;

    use super::*;

    fn tokens(text: &str) -> Vec<Token> {
        let mut symbols = Symbols::new(Lexer::english(), text);
        let mut out = vec![];
        while let Some(token) = symbols.symbol() {
            out.push(token);
            symbols.next_symbol();
        }
        assert_eq!(symbols.unmatched(), None, "unmatched input in {text:?}");
        out
    }

    #[test]
    fn longest_match_wins() {
        let thursday = Token::Weekday(Weekday::Thursday);
        assert_eq!(
            tokens("every 2 weeks on the 1st Thursday."),
            [
                Token::Every,
                Token::Number,
                Token::Weeks,
                Token::On,
                Token::The,
                Token::Nth,
                thursday,
            ],
        );
        assert_eq!(tokens("Every WEEKDAY"), [Token::Every, Token::Weekdays]);
        assert_eq!(tokens("every month"), [Token::Every, Token::Months]);
        assert_eq!(
            tokens("for one time"),
            [Token::For, Token::NumberAsText, Token::Times],
        );
        assert_eq!(tokens("third thu"), [Token::Third, thursday]);
        assert_eq!(
            tokens("mar, may and june"),
            [
                Token::Month(3),
                Token::Comma,
                Token::Month(5),
                Token::Comma,
                Token::Month(6),
            ],
        );
        assert_eq!(
            tokens("last day of the year"),
            [Token::Last, Token::DayOfYear],
        );
        assert_eq!(
            tokens("in week -1"),
            [Token::On, Token::Weeks, Token::Number],
        );
        assert_eq!(tokens("until"), [Token::Until]);
        assert_eq!(tokens("til"), [Token::Until]);
    }

    #[test]
    fn captures() {
        let symbols = Symbols::new(Lexer::english(), "23rd last");
        assert_eq!(symbols.symbol(), Some(Token::Nth));
        assert_eq!(symbols.matched(), Some("23rd"));
        assert_eq!(symbols.group(), Some("23"));
        assert_eq!(symbols.rest(), " last");
    }

    #[test]
    fn unmatched() {
        let mut symbols = Symbols::new(Lexer::english(), "every ? day");
        assert_eq!(symbols.symbol(), Some(Token::Every));
        assert!(!symbols.next_symbol());
        assert_eq!(symbols.unmatched(), Some("? day"));
        insta::assert_snapshot!(
            symbols.unexpected(),
            @"unexpected symbol at `? day`",
        );
    }

    #[test]
    fn invalid_pattern() {
        let language = Language {
            tokens: &[(Token::Every, "(every")],
            ..ENGLISH.clone()
        };
        let err = Lexer::new(&language).unwrap_err();
        assert!(matches!(err, ParseError::InvalidTokenPattern { .. }));
    }
}
