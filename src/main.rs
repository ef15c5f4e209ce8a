mod args;
mod commands;
mod error;
mod logger;

use args::{nullcheck_args, nullcheck_command};
use commands::{
    eval::handle_command_eval, files::handle_command_files, repl::handle_command_repl,
    CheckOptions,
};
use logger::init_logger_str;

pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let mut arg_parser = nullcheck_args();
    let args = arg_parser.get_matches_mut();
    // Global options may follow the subcommand
    let options_args = args.subcommand().map_or(&args, |(_, sub_args)| sub_args);
    if let Some(debug_level) = options_args.get_one::<String>("debug") {
        init_logger_str(debug_level);
    }
    let options = CheckOptions::from_args(options_args);

    match args.subcommand() {
        Some((nullcheck_command::CHECK, sub_args)) => {
            if let Some(files) = sub_args.get_many::<String>("files") {
                handle_command_files(files, &options, &mut arg_parser);
            }
        }
        Some((nullcheck_command::EVAL, sub_args)) => handle_command_eval(sub_args, &options),
        Some((nullcheck_command::REPL, sub_args)) => handle_command_repl(sub_args, &options),
        _ => {
            if let Some(files) = args.get_many::<String>("files") {
                handle_command_files(files, &options, &mut arg_parser);
            } else if let Err(err) = arg_parser.print_help() {
                error::print_error(format!("could not print help: {}", err));
            }
        }
    }
}
