use std::process::ExitCode;

use clap::Parser;
use vmtc_drv::cli::{self, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(input) = cli.input().map(|path| path.to_path_buf()) else {
        println!("{}", cli::usage());
        return ExitCode::SUCCESS;
    };

    match translate(&cli, &input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn translate(cli: &Cli, input: &std::path::Path) -> anyhow::Result<()> {
    let mut config = cli::load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    cli::init_logging(config.verbose, cli.no_color)?;

    cli::run(cli, input, config)?;
    Ok(())
}
