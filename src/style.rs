use std::{
    fmt::Display,
    io::IsTerminal,
    sync::{Arc, LazyLock},
};

use anstyle::{AnsiColor, Style};

/// A theme that indicates how log output should be styled.
///
/// When stderr isn't a tty, or colors have been disabled, every style is
/// empty and data is rendered as is.
#[derive(Clone, Debug)]
pub struct Theme {
    inner: Option<Arc<ThemeInner>>,
}

impl Theme {
    /// Returns a theme for stderr.
    pub fn stderr() -> &'static Theme {
        static THEME: LazyLock<Theme> = LazyLock::new(|| {
            if !std::io::stderr().is_terminal() || !can_use_colors() {
                return Theme { inner: None };
            }
            Theme { inner: Some(Arc::new(ThemeInner::default())) }
        });
        &*THEME
    }

    /// Styles the timestamp at the start of a log line.
    pub fn dim<T: Display>(&self, data: T) -> Styled<'_, T> {
        let style = self.inner.as_deref().map(|inner| &inner.dim);
        Styled { data, style }
    }

    /// Styles a log level according to its severity.
    pub fn level(&self, level: log::Level) -> Styled<'_, log::Level> {
        let style = self.inner.as_deref().map(|inner| match level {
            log::Level::Error => &inner.error,
            log::Level::Warn => &inner.warn,
            _ => &inner.other,
        });
        Styled { data: level, style }
    }
}

#[derive(Debug)]
struct ThemeInner {
    dim: Style,
    error: Style,
    warn: Style,
    other: Style,
}

impl Default for ThemeInner {
    fn default() -> ThemeInner {
        ThemeInner {
            dim: Style::new().dimmed(),
            error: Style::new().bold().fg_color(Some(AnsiColor::Red.into())),
            warn: Style::new().bold().fg_color(Some(AnsiColor::Yellow.into())),
            other: Style::new().bold().fg_color(Some(AnsiColor::Magenta.into())),
        }
    }
}

/// A possibly unstyled piece of renderable data.
#[derive(Clone, Debug)]
pub struct Styled<'s, T> {
    data: T,
    style: Option<&'s Style>,
}

impl<'s, T: Display> Display for Styled<'s, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Some(style) = self.style else {
            return self.data.fmt(f);
        };
        write!(f, "{style}{}{style:#}", self.data)
    }
}

/// Whether colors have been globally disabled or not.
fn can_use_colors() -> bool {
    static YES: LazyLock<bool> = LazyLock::new(|| {
        if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            return false;
        }
        std::env::var_os("TERM").is_none_or(|v| v != "dumb")
    });
    *YES
}
