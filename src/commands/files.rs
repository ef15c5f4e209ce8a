use std::{fs, path::Path, process::exit};

use clap::{parser::ValuesRef, Command};
use colorful::Colorful;
use rayon::prelude::*;

use nullcheck_core::{lexer::lexer::InputSource, parser::ast::Module, parser::error::ParseError};

use crate::error::{print_error, print_error_usage, print_parse_error};

use super::{check_module, parse_source, CheckOptions};

/// A source file read and parsed ahead of checking.
struct ParsedFile {
    source: InputSource,
    content: String,
    module: Result<Module, ParseError>,
}

impl ParsedFile {
    fn parse(source: InputSource, content: String, name: &str) -> Self {
        ParsedFile {
            module: parse_source(&content, &source, name),
            source,
            content,
        }
    }
}

/// Check every file and exit with status 1 if any of them failed.
pub fn handle_command_files(
    files: ValuesRef<String>,
    options: &CheckOptions,
    arg_parser: &mut Command,
) {
    let files = files.map(Path::new).collect::<Vec<_>>();
    validate_files(&files, arg_parser);
    let parsed = parse_files(&files);
    if !check_files(&parsed, options).into_iter().all(|ok| ok) {
        exit(1)
    }
}

/// Check and report every file in order, returning whether each one passed.
/// A file that failed to parse is reported and does not stop the others.
fn check_files(parsed: &[ParsedFile], options: &CheckOptions) -> Vec<bool> {
    parsed
        .iter()
        .map(|file| {
            log::debug!("Reporting {}", file.source);
            match &file.module {
                Ok(module) => check_module(module, &file.content, &file.source, options),
                Err(err) => {
                    print_parse_error(err.clone(), &file.content, &file.source);
                    false
                }
            }
        })
        .collect()
}

/// Exit if any of the given files does not exist.
fn validate_files(files: &[&Path], arg_parser: &mut Command) {
    for file in files {
        if file.exists() {
            continue;
        }
        // A bare word without an extension is more likely a mistyped command
        if file.extension().is_none() && files.len() == 1 {
            print_error_usage(
                format!(
                    "Invalid command {}",
                    file.display().to_string().light_red()
                ),
                arg_parser,
            );
        } else {
            print_error(format!(
                "File not found: {}",
                file.display().to_string().light_red()
            ));
        }
        exit(1);
    }
}

/// Read and parse the files in parallel, keeping argument order.
fn parse_files(files: &[&Path]) -> Vec<ParsedFile> {
    files
        .par_iter()
        .map(|path| {
            let source = InputSource::File(path.to_path_buf());
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "main".to_string());
            match fs::read_to_string(path) {
                Ok(content) => ParsedFile::parse(source, content, &name),
                Err(err) => ParsedFile {
                    module: Err(ParseError::new(
                        format!("Could not read '{}': {}", path.display(), err),
                        Default::default(),
                    )),
                    source,
                    content: String::new(),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn file(name: &str, content: &str) -> ParsedFile {
        ParsedFile::parse(
            InputSource::File(PathBuf::from(name)),
            content.to_string(),
            name,
        )
    }

    #[test]
    fn parse_error_does_not_stop_later_files() {
        let options = CheckOptions {
            plain: true,
            prelude: true,
        };
        let parsed = vec![
            file("a.nc", "fn f(a: Number) -> Number = ;"),
            file("b.nc", "fn g(a: Number | Null) -> Number = if a then a else 0;"),
            file("c.nc", "fn h(a: Number | Null) -> Number = a + 1;"),
        ];
        assert!(parsed[0].module.is_err());
        assert_eq!(check_files(&parsed, &options), vec![false, true, false]);
    }

    #[test]
    fn unreadable_file_is_a_parse_error() {
        let missing = Path::new("definitely/not/here.nc");
        let parsed = parse_files(&[missing]);
        assert_eq!(parsed.len(), 1);
        let err = parsed[0].module.as_ref().unwrap_err();
        assert!(err.inner.message.starts_with("Could not read"));
    }
}
