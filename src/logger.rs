// A custom logger that logs to stdout.
// Used when `--debug` is passed.

use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

use crate::error::print_error;

const BRIGHT_BLACK: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

pub fn init_logger(level: LevelFilter) {
    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            write!(buf, "{BRIGHT_BLACK}[{RESET}")?;
            write!(
                buf,
                "{style}{lvl}{style:#}",
                lvl = record.level(),
                style = buf.default_level_style(record.level()),
            )?;
            // Drop the crate prefix, `nullcheck_core::type_checker::checker` reads as `type_checker::checker`
            let target = record
                .target()
                .split_once("::")
                .map_or(record.target(), |(_, rest)| rest);
            write!(buf, " {}:{}", target, record.line().unwrap_or_default())?;
            write!(buf, "{BRIGHT_BLACK}]{RESET}")?;
            writeln!(buf, " {}", record.args())
        })
        .target(env_logger::Target::Stdout)
        .init()
}

pub fn parse_level(level: &str) -> Option<LevelFilter> {
    Some(match level {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => return None,
    })
}

pub fn init_logger_str(level: &str) {
    let Some(level) = parse_level(level) else {
        print_error(format!(
            "Invalid log level '{}', expected one of 'trace', 'debug', 'info', 'warn' or 'error'",
            level
        ));
        std::process::exit(1);
    };
    init_logger(level);
    log::info!("Setting log level to {}", level);
}
