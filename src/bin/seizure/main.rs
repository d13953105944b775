use clap::Parser;

mod cli;
mod commands;
mod exit_codes;
mod output;
mod params;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let exit_code = match cli.command {
        cli::Command::Run(args) => commands::run::execute(args),
        cli::Command::Features(args) => commands::features::execute(args),
        cli::Command::Subjects(args) => commands::subjects::execute(args),
        cli::Command::Schema(args) => commands::schema::execute(args),
    };

    std::process::exit(exit_code);
}
