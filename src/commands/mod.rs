pub mod eval;
pub mod files;
pub mod repl;

use clap::ArgMatches;
use colorful::Colorful;
use nullcheck_core::{
    lexer::lexer::InputSource,
    parser::{ast::Module, error::ParseError, parser},
    reporter::format_report,
    type_checker::{
        checker::{check, CheckReport},
        namespace::Namespace,
    },
};

use crate::error::{print_parse_error, print_type_error, print_violation};

/// Flags shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct CheckOptions {
    /// Print with the plain text reporter instead of diagnostics.
    pub plain: bool,
    pub prelude: bool,
}

impl CheckOptions {
    pub fn from_args(args: &ArgMatches) -> Self {
        CheckOptions {
            plain: args.get_flag("plain"),
            prelude: !args.get_flag("no-prelude"),
        }
    }

    pub fn namespace(&self) -> Namespace {
        if self.prelude {
            Namespace::with_prelude()
        } else {
            Namespace::new()
        }
    }
}

pub fn parse_source(content: &str, source: &InputSource, name: &str) -> Result<Module, ParseError> {
    parser::from_string(content.to_string(), source.clone()).parse_module(name)
}

/// Parse and check a whole source, printing the outcome.
/// Returns whether the source is free of errors and violations.
pub fn check_source(content: &str, source: &InputSource, options: &CheckOptions) -> bool {
    match parse_source(content, source, "main") {
        Ok(module) => check_module(&module, content, source, options),
        Err(err) => {
            print_parse_error(err, content, source);
            false
        }
    }
}

pub fn check_module(
    module: &Module,
    content: &str,
    source: &InputSource,
    options: &CheckOptions,
) -> bool {
    let mut namespace = options.namespace();
    namespace.load_module(module);
    let report = check(&namespace);
    print_report(&report, content, source, options);
    report.is_success()
}

pub fn print_report(
    report: &CheckReport,
    content: &str,
    source: &InputSource,
    options: &CheckOptions,
) {
    if options.plain {
        println!("{}", format_report(report));
        return;
    }
    for function in &report.functions {
        match &function.result {
            Ok(violations) => violations
                .iter()
                .for_each(|v| print_violation(v, content, source)),
            Err(err) => print_type_error(&function.name, err.clone(), content, source),
        }
    }
    print_summary(report, source);
}

fn print_summary(report: &CheckReport, source: &InputSource) {
    let checked = report.functions.len();
    if report.is_success() {
        println!(
            "{} {} function(s) in {}, no violations found",
            "Checked".light_green(),
            checked,
            source
        );
    } else {
        println!(
            "{} {} violation(s) in {} function(s) in {}, {} function(s) could not be checked",
            "Found".light_red(),
            report.violations().count(),
            checked,
            source,
            report.errors().count()
        );
    }
}
