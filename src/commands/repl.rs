use std::io::{self, Write};

use clap::ArgMatches;
use colorful::Colorful;
use nullcheck_core::{
    lexer::lexer::InputSource,
    parser::error::ParseError,
    reporter::{format_type_error, format_violation},
    type_checker::{
        checker::{FunctionReport, TypeChecker},
        namespace::Namespace,
    },
};

use crate::{
    error::{print_error, print_parse_error, print_type_error, print_violation},
    CLI_VERSION,
};

use super::{parse_source, CheckOptions};

pub fn handle_command_repl(args: &ArgMatches, options: &CheckOptions) {
    // Set the Ctrl-C handler to exit the program
    if let Err(err) = ctrlc::set_handler(|| std::process::exit(0)) {
        print_error(format!("Could not set the Ctrl-C handler: {}", err));
    }
    let print_types = args.get_flag("types");

    // Print the version of the CLI and the checker
    println!(
        "{CLI_TITLE} {V}{CLI_VERSION} {CORE_TITLE} {V}{LANG_VERSION}\n{SUBTEXT}",
        CLI_TITLE = "nullcheck cli".bold(),
        V = "v".yellow(),
        CLI_VERSION = CLI_VERSION.yellow(),
        CORE_TITLE = "checker".bold(),
        LANG_VERSION = nullcheck_core::LANG_VERSION.yellow(),
        SUBTEXT = "Interactive REPL, Ctrl+C to exit".dark_gray()
    );

    let mut session = Session::new(*options);
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => {
                print_error(format!("Could not read from {}: {}", InputSource::StdIn, err));
                break;
            }
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let first = session.namespace().functions().len();
        match session.check_line(line) {
            Ok(reports) => print_reports(&session, first, &reports, options, print_types),
            Err(err) => print_parse_error(err, &session.input(line), &InputSource::StdIn),
        }
    }
}

/// Everything entered so far. Each line is parsed together with the accepted lines
/// before it, so every location refers into the session text.
pub struct Session {
    content: String,
    namespace: Namespace,
    options: CheckOptions,
}

impl Session {
    pub fn new(options: CheckOptions) -> Self {
        Session {
            content: String::new(),
            namespace: options.namespace(),
            options,
        }
    }

    /// The session text once `line` is added.
    pub fn input(&self, line: &str) -> String {
        format!("{}{}", self.content, line)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Add the declarations of `line` to the session and check the functions it defines.
    /// A line that does not parse leaves the session unchanged.
    pub fn check_line(&mut self, line: &str) -> Result<Vec<FunctionReport>, ParseError> {
        let input = self.input(line);
        let module = parse_source(&input, &InputSource::StdIn, "repl")?;
        let first = self.namespace.functions().len();
        let mut namespace = self.options.namespace();
        namespace.load_module(&module);

        let checker = TypeChecker::new(&namespace);
        let reports = (first..namespace.functions().len())
            .filter_map(|index| checker.check_function(index))
            .collect();

        self.namespace = namespace;
        self.content = input;
        // Terminate on a fresh line so a trailing comment cannot swallow it
        self.content.push_str(if line.ends_with(';') { "\n" } else { "\n;\n" });
        Ok(reports)
    }
}

fn print_reports(
    session: &Session,
    first: usize,
    reports: &[FunctionReport],
    options: &CheckOptions,
    print_types: bool,
) {
    let content = session.content();
    let source = InputSource::StdIn;
    for (report, function) in reports.iter().zip(&session.namespace().functions()[first..]) {
        match &report.result {
            Ok(violations) if violations.is_empty() => {
                let ty = match (print_types, &function.ty) {
                    (true, Some(ty)) => format!(" : {}", ty.pretty_print_color()),
                    _ => String::new(),
                };
                println!("{} {}{}", "ok".light_green(), report.name, ty);
            }
            Ok(violations) => {
                for violation in violations {
                    if options.plain {
                        println!("{}", format_violation(violation));
                    } else {
                        print_violation(violation, content, &source);
                    }
                }
            }
            Err(err) if options.plain => println!("{}", format_type_error(&report.name, err)),
            Err(err) => print_type_error(&report.name, err.clone(), content, &source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(CheckOptions {
            plain: true,
            prelude: true,
        })
    }

    #[test]
    fn checks_only_new_functions() {
        let mut session = session();
        let reports = session.check_line("fn f(a: Number) -> Number = a").unwrap();
        assert_eq!(reports.len(), 1);
        let reports = session
            .check_line("fn g(a: Number | Null) -> Number = a + 1;")
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].name, "g");
        assert_eq!(reports[0].result.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn annotation_then_definition() {
        let mut session = session();
        assert!(session
            .check_line("ann f : (Number | Null) -> Number")
            .unwrap()
            .is_empty());
        let reports = session
            .check_line("fn f(a) = if a then a + 1 else 0")
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].result, Ok(vec![]));
    }

    #[test]
    fn parse_error_leaves_session_unchanged() {
        let mut session = session();
        session.check_line("fn f(a: Number) -> Number = a").unwrap();
        let content = session.content().to_string();
        assert!(session.check_line("fn g(a) = ").is_err());
        assert_eq!(session.content(), content);
        assert_eq!(session.namespace().functions().len(), 1);
    }

    #[test]
    fn trailing_comment_does_not_hide_the_next_line() {
        let mut session = session();
        session
            .check_line("fn f(a: Number) -> Number = a // identity")
            .unwrap();
        let reports = session.check_line("fn g(a: Number) -> Number = f(a)").unwrap();
        assert_eq!(reports[0].result, Ok(vec![]));
    }

    #[test]
    fn duplicate_label_points_into_the_session() {
        let mut session = session();
        session.check_line("fn f(a: Number) -> Number = a").unwrap();
        let reports = session.check_line("fn f(a: Number) -> Number = a").unwrap();
        let err = reports[0].result.as_ref().unwrap_err();
        let label = &err.inner.labels[0];
        assert_eq!(label.info.start.line, 1);
        assert_eq!(err.inner.info.start.line, 3);
        let length = session.content().chars().count();
        assert!(label.info.end.index <= length);
        assert!(err.inner.info.end.index <= length);
    }
}
