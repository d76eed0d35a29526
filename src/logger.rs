// A tiny logger for the `log` crate. Each message goes to stderr as a single
// `time|LEVEL|file:line: message` line. Filtering happens through the global
// max level set in `main`.

use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use log::Log;

use crate::style::Theme;

#[derive(Debug)]
pub struct Logger(());

impl Logger {
    /// Installs this logger as the global logger.
    pub fn init() -> Result<(), log::SetLoggerError> {
        static LOGGER: Logger = Logger(());
        log::set_logger(&LOGGER)
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        // Wall clock time in UTC. Looking up the system time zone could
        // itself log, which would recurse back into here.
        let now = jiff::Timestamp::now();
        let theme = Theme::stderr();
        let (now, level) = (theme.dim(now), theme.level(record.level()));
        match (record.file(), record.line()) {
            (Some(file), Some(line)) => {
                eprintln!(
                    "{now}|{level}|{}:{line}: {}",
                    relative(file),
                    record.args(),
                );
            }
            (Some(file), None) => {
                eprintln!("{now}|{level}|{}: {}", relative(file), record.args());
            }
            _ => {
                eprintln!("{now}|{level}: {}", record.args());
            }
        }
    }

    fn flush(&self) {
        // `eprintln!` doesn't buffer.
    }
}

fn relative(path: &str) -> &str {
    let Some(cwd) = cwd() else { return path };
    let Ok(relative) = Path::new(path).strip_prefix(cwd) else { return path };
    relative.to_str().unwrap_or(path)
}

fn cwd() -> Option<&'static Path> {
    static CWD: LazyLock<Option<PathBuf>> =
        LazyLock::new(|| std::env::current_dir().ok());
    CWD.as_deref()
}
