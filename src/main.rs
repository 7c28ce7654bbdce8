use clap::Parser;

use ci_config_diff::cli::{Cli, Commands};
use ci_config_diff::commands::{run_diff, run_init, run_lint, run_resolve};
use ci_config_diff::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let exit_code = match &cli.command {
        Commands::Resolve(args) => run_resolve(args, &cli),
        Commands::Diff(args) => run_diff(args, &cli),
        Commands::Lint(args) => run_lint(args, &cli),
        Commands::Init(args) => run_init(args),
    };

    std::process::exit(exit_code);
}
