use std::process::exit;

use clap::ArgMatches;
use nullcheck_core::lexer::lexer::InputSource;

use crate::error::print_error;

use super::{check_source, CheckOptions};

pub fn handle_command_eval(args: &ArgMatches, options: &CheckOptions) {
    let Some(content) = args.get_one::<String>("source") else {
        print_error("No source given to check".to_string());
        exit(1);
    };
    if !check_source(content, &InputSource::String, options) {
        exit(1)
    }
}
