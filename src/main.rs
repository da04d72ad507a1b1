use clap::Parser;
use symlinkit::cli::{AppContext, Cli};

fn main() {
    let cli = Cli::parse();

    symlinkit::infra::logging::init(cli.verbose);

    // Build a context once, pass everywhere
    let ctx = AppContext::from(&cli);

    symlinkit::core::finish_with_exit(symlinkit::core::run(cli, &ctx))
}
