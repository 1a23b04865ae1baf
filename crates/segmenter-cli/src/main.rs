//! Segmenter CLI - rule-based dataset segmentation.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands, RuleCommands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Columns {
            file,
            delimiter,
            json,
        } => commands::columns::run(file, delimiter, json),

        Commands::Rule { command } => match command {
            RuleCommands::Add {
                rules,
                name,
                ranges,
                includes,
                data,
                delimiter,
            } => commands::rule::add(rules, name, ranges, includes, data, delimiter),
            RuleCommands::Remove { rules, position } => commands::rule::remove(rules, position),
            RuleCommands::List { rules, json } => commands::rule::list(rules, json),
            RuleCommands::Clear { rules } => commands::rule::clear(rules),
        },

        Commands::Segment {
            file,
            rules,
            delimiter,
            strict,
            json,
        } => commands::segment::run(file, rules, delimiter, strict, json),

        Commands::Export {
            file,
            rules,
            output,
            report,
            report_json,
            delimiter,
            strict,
            on_collision,
        } => commands::export::run(commands::export::ExportArgs {
            file,
            rules,
            output,
            report,
            report_json,
            delimiter,
            strict,
            on_collision,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
