// src/bin/cli.rs
use color_eyre::eyre::eyre;
use finsim_console::cli;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    cli::run(std::env::args().skip(1)).map_err(|e| eyre!("{e}"))
}
