mod cli;
mod runner;

use safe_recursive_mkdir::logging;

fn main() -> anyhow::Result<std::process::ExitCode> {
    logging::init();
    let cli = cli::parse();
    runner::run(cli)
}
