use chrono::Datelike;
use clap::{arg, Arg, Command};
use colorful::Colorful;

use nullcheck_core::LANG_VERSION;

use crate::CLI_VERSION;

pub mod nullcheck_command {
    pub const CHECK: &str = "check";
    pub const EVAL: &str = "eval";
    pub const REPL: &str = "repl";
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Options shared by every command.
fn global_args() -> [Arg; 3] {
    [
        arg!(-d --debug [level] "Turns on additional debugging information")
            .value_parser(LOG_LEVELS)
            .default_missing_value("debug")
            .global(true),
        arg!(--plain "Prints violations in the fixed plain text format").global(true),
        arg!(--"no-prelude" "Checks without the built-in operations declared").global(true),
    ]
}

pub fn nullcheck_args() -> Command {
    let title_short = format!("{CLI_TITLE} {V}{CLI_VERSION}, {CORE_TITLE} {V}{LANG_VERSION}\nA static null-safety checker for annotated functions.",
        CLI_TITLE = "nullcheck cli".bold(),
        V = "v".yellow(),
        CLI_VERSION = CLI_VERSION.yellow(),
        CORE_TITLE = "checker".bold(),
        LANG_VERSION = LANG_VERSION.yellow());

    let title_long = format!(
        "\n\
{VL} {CLI_TITLE} version {CLI_VERSION} and {CORE_TITLE} version {LANG_VERSION}.
{VL} Finds every place where a possibly-null value flows into
{VL} an operation or return type that does not allow null.",
        VL = "|".dark_gray(),
        CLI_TITLE = "nullcheck cli".bold(),
        CLI_VERSION = CLI_VERSION.yellow(),
        CORE_TITLE = "checker".bold(),
        LANG_VERSION = LANG_VERSION.yellow(),
    );

    let examples = format!(
        "{EXAMPLES}
  {NC} a.nc b.nc                            Check a.nc and b.nc
  {NC} {CHECK} --plain a.nc                   Check a.nc, printing plain text
  {NC} {EVAL} \"fn f(a: Number) -> Number = a\"  Check an inline source
  {NC} {REPL}                                 Start the REPL",
        EXAMPLES = "Examples:".bold().underlined(),
        NC = "nullcheck".bold(),
        CHECK = "c".bold(),
        EVAL = "e".bold(),
        REPL = "r".bold(),
    );

    // Current year
    let copy = format!(
        "nullcheck is free and open source software under the MIT license.\nCopyright ©️{:?} the nullcheck contributors.\n",
        chrono::Local::now().year()
    )
    .dark_gray();

    Command::new("nullcheck CLI")
        .bin_name("nullcheck")
        .before_help(title_short)
        .before_long_help(title_long.clone())
        .arg(arg!([files] ... "Checks the given files in order"))
        .args(global_args())
        .version(CLI_VERSION)
        .long_version(title_long)
        .help_template("{before-help}{usage-heading} {usage}\n\n{all-args}{after-help}")
        .override_usage(format!("{} {}", "nullcheck".bold(), "[command] (options) (files)".dim()))
        .subcommand(
            Command::new(nullcheck_command::CHECK)
                .alias("c")
                .about("Check files")
                .long_about("Checks every function in the given files and reports each\nnull-safety violation found.")
                .override_usage(format!("{} {}", "nullcheck check".bold(), "(options) [files]".dim()))
                .arg(arg!(<files> ... "Sets the input file(s) to check")),
        )
        .subcommand(
            Command::new(nullcheck_command::EVAL)
                .alias("e")
                .about("Check a source string")
                .long_about("Checks the declarations given as a single argument.\nUse the REPL for interactive development.")
                .override_usage(format!("{} {}", "nullcheck eval".bold(), "(options) [source]".dim()))
                .arg(arg!(<source> "Sets the declarations to check")),
        )
        .subcommand(
            Command::new(nullcheck_command::REPL)
                .alias("r")
                .about("Start the REPL")
                .long_about("Reads declarations line by line and checks every function as it is defined.")
                .override_usage(format!("{} {}", "nullcheck repl".bold(), "(options)".dim()))
                .arg(arg!(-t --types "Prints the type of every function after it is checked")),
        )
        .after_help(format!("{}\n{}", examples, copy))
}
