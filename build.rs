//! Renders the `stepwise(1)` manual page from the demo binary's CLI.

use std::{env, fs, path::PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli.rs"]
mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-env-changed=STEPWISE_MAN_DIR");

    let out_dir = env::var_os("STEPWISE_MAN_DIR")
        .map_or_else(|| PathBuf::from("target/generated-man"), PathBuf::from);
    fs::create_dir_all(&out_dir)?;

    let man = Man::new(cli::Cli::command())
        .title("STEPWISE")
        .section("1")
        .manual("stepwise manual");
    let mut page = Vec::new();
    man.render(&mut page)?;
    fs::write(out_dir.join("stepwise.1"), page)?;

    Ok(())
}
