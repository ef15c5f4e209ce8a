use ariadne::{Color, ColorGenerator, Label, Report, ReportKind, Source};
use clap::Command;
use colorful::Colorful;
use nullcheck_core::{
    lexer::lexer::InputSource,
    parser::error::ParseError,
    type_checker::checker::{TypeError, Violation},
    util::error::BaseError,
};

pub fn print_parse_error(err: ParseError, content: &str, source: &InputSource) {
    print_error_report("parse error", err.inner, content, source);
}

pub fn print_type_error(function: &str, err: TypeError, content: &str, source: &InputSource) {
    let mut base = err.inner;
    base.message = format!("cannot check function '{}': {}", function, base.message);
    print_error_report("type error", base, content, source);
}

pub fn print_violation(violation: &Violation, content: &str, source: &InputSource) {
    let function = match violation.arity {
        Some(arity) => format!("'{}' (arity {})", violation.function, arity),
        None => format!("'{}'", violation.function),
    };
    let base = BaseError::new(
        format!("type mismatch in function {}", function),
        violation.info.clone(),
    )
    .with_label(
        format!(
            "expected {}, found {}",
            violation.mismatch.expected_text(),
            violation.mismatch.actual_text()
        ),
        violation.info.clone(),
    )
    .with_hint(violation.explanation.clone());
    print_error_report("null violation", base, content, source);
}

pub fn print_error_report(kind: &str, base: BaseError, content: &str, source: &InputSource) {
    let mut colors = ColorGenerator::new();
    let span = base.info.span();

    let mut report = Report::build(
        ReportKind::Custom(kind, Color::BrightRed),
        (source.name(), span.clone()),
    )
    .with_message(&base.message);

    if base.labels.is_empty() {
        report = report.with_label(
            Label::new((source.name(), span.clone()))
                .with_message(&base.message)
                .with_color(Color::BrightRed),
        );
    }

    for label in base.labels {
        report = report.with_label(
            Label::new((source.name(), label.info.span()))
                .with_message(label.message)
                .with_color(colors.next()),
        );
    }

    if let Some(hint) = base.hint {
        report = report.with_help(hint);
    }

    if base.info.end.eof {
        report = report.with_label(
            Label::new((source.name(), span))
                .with_message("to end of file")
                .with_color(Color::Yellow),
        );
    }

    if let Err(err) = report
        .finish()
        .print((source.name(), Source::from(content)))
    {
        // Fall back to the one-line form when the terminal rejects the report
        print_error_simple(kind, format!("{} ({})", base.message, err));
    }
}

pub fn print_error_simple(kind: &str, msg: String) {
    println!("{}: {}", kind.light_red(), msg);
}

pub fn print_error(msg: String) {
    print_error_simple("error", msg)
}

pub fn print_error_usage(msg: String, arg_parser: &mut Command) {
    print_error(msg);
    println!("{}\n", arg_parser.render_usage());
    println!("For more information try {}", "--help".bold().yellow())
}
