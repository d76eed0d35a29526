use std::{env, io::Write, process::ExitCode, sync::LazyLock};

use {anyhow::Context, jiff::civil::DateTime};

mod args;
mod cmd;
mod logger;
mod style;

/// The time used as the start of rules that don't have one.
static NOW: LazyLock<DateTime> = LazyLock::new(|| {
    match read_env_recur_now() {
        Ok(Some(dt)) => {
            log::trace!(
                "setting current time to `{dt}` from `RECUR_NOW` \
                 environment variable",
            );
            dt
        }
        Ok(None) => {
            let now = recur::calendar::now();
            log::trace!(
                "`RECUR_NOW` environment variable not set, using \
                 current time `{now}`",
            );
            now
        }
        Err(err) => {
            let now = recur::calendar::now();
            log::warn!(
                "reading `RECUR_NOW` failed, using current time \
                 `{now}`: {err:#}",
            );
            now
        }
    }
});

fn main() -> ExitCode {
    let err = match run() {
        Ok(code) => return code,
        Err(err) => err,
    };
    if let Some(help) = err.root_cause().downcast_ref::<args::Help>() {
        // Nothing useful can be done when even this write fails.
        let _ = writeln!(&mut std::io::stdout(), "{help}");
        return ExitCode::SUCCESS;
    }
    if let Some(version) = err.root_cause().downcast_ref::<args::Version>() {
        let _ = writeln!(&mut std::io::stdout(), "{version}");
        return ExitCode::SUCCESS;
    }
    // A closed stdout (e.g., `recur seq ... | head`) isn't an error. The
    // Rust runtime ignores SIGPIPE, so this shows up as an I/O error.
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<std::io::Error>() {
            if err.kind() == std::io::ErrorKind::BrokenPipe {
                return ExitCode::SUCCESS;
            }
        }
        // `serde_json` wraps I/O errors hit by `to_writer`.
        if let Some(err) = cause.downcast_ref::<serde_json::Error>() {
            if err.io_error_kind() == Some(std::io::ErrorKind::BrokenPipe) {
                return ExitCode::SUCCESS;
            }
        }
    }
    if env::var("RUST_BACKTRACE").is_ok_and(|v| v == "1")
        && env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        let _ = writeln!(&mut std::io::stderr(), "{err:?}");
    } else {
        let _ = writeln!(&mut std::io::stderr(), "{err:#}");
    }
    ExitCode::from(1)
}

fn run() -> anyhow::Result<ExitCode> {
    let level = match env::var("RECUR_LOG") {
        Err(_) => log::LevelFilter::Warn,
        Ok(level) => match &*level {
            "" | "warn" => log::LevelFilter::Warn,
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            unk => anyhow::bail!("unrecognized log level '{unk}'"),
        },
    };
    log::set_max_level(level);
    logger::Logger::init()?;
    cmd::run(&mut lexopt::Parser::from_env())?;
    Ok(ExitCode::SUCCESS)
}

fn read_env_recur_now() -> anyhow::Result<Option<DateTime>> {
    let Some(val) = env::var_os("RECUR_NOW") else { return Ok(None) };
    let Some(val) = val.to_str() else {
        anyhow::bail!(
            "`RECUR_NOW` environment variable is not valid UTF-8: {val:?}"
        )
    };
    recur::calendar::parse_flexible(val)
        .context("`RECUR_NOW` environment variable is not a valid datetime")
        .map(Some)
}
