use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &["tokens-json", "tree-json", "treeviz", "source-map"];

fn input_arg(name: &'static str) -> Arg {
    Arg::new(name)
        .help("Input file path")
        .required(true)
        .index(1)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("marklight")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting, inspecting and editing markdown documents")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("inspect").arg(input_arg("path")).arg(
                Arg::new("transform")
                    .value_parser(clap::builder::PossibleValuesParser::new(
                        AVAILABLE_TRANSFORMS,
                    ))
                    .index(2),
            ),
        )
        .subcommand(
            Command::new("convert")
                .arg(input_arg("input"))
                .arg(Arg::new("from").long("from"))
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(["markdown", "json", "treeviz"]),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(Command::new("format").arg(input_arg("input")))
        .subcommand(
            Command::new("edit")
                .arg(input_arg("input"))
                .arg(Arg::new("block").long("block"))
                .arg(Arg::new("cursor").long("cursor"))
                .arg(Arg::new("keys").long("keys").required(true)),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "marklight", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "marklight", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "marklight", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
