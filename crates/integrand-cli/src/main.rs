//! Integrand CLI: the `integrand` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    support::init_tracing(cli.verbose);
    let config = support::load_config_or_exit(cli.config.as_deref());

    match cli.command {
        Commands::Show { stages, json } => commands::show::run(&stages, json),

        Commands::Resolve { strict, json } => {
            commands::resolve::run(strict || config.resolve.strict, json)
        }

        Commands::Latex { stages, out } => commands::latex::run(&stages, out, &config.latex),

        Commands::Registry { kinds, json } => commands::registry::run(&kinds, json),

        Commands::DegreeCheck { strict, json } => {
            commands::degree_check::run(strict || config.degree.strict, json)
        }
    }
}
