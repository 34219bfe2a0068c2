//! `baterby` command-line front end
//!
//! Reads a program file, runs it, then prints the audit trail.

use anyhow::Context;
use baterby_vm::program::{read_program, SAMPLE_PROGRAM};
use baterby_vm::{Interpreter, PolicyConfig};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("baterby")
        .version(baterby_vm::VERSION)
        .about("Run a Baterby program; the interpreter may prefer not to")
        .arg(
            Arg::new("program")
                .value_parser(value_parser!(PathBuf))
                .help("Path to the program file (.btb)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_parser(value_parser!(PathBuf))
                .help("TOML policy configuration"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Random seed for reproducibility"),
        )
        .arg(
            Arg::new("probability")
                .long("probability")
                .value_parser(value_parser!(f64))
                .help("Chance of a random pause, within [0, 1]"),
        )
        .arg(
            Arg::new("max-actions")
                .long("max-actions")
                .value_parser(value_parser!(u32))
                .help("Actions tolerated before a PAUSE is required"),
        )
        .arg(
            Arg::new("keyword")
                .long("keyword")
                .action(ArgAction::Append)
                .help("Additional sensitive keyword (repeatable)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the audit trail as JSON"),
        )
        .arg(
            Arg::new("sample")
                .long("sample")
                .action(ArgAction::SetTrue)
                .help("Print a sample program and exit"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v debug, -vv trace)"),
        )
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &ArgMatches) -> anyhow::Result<PolicyConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => PolicyConfig::load(path)
            .with_context(|| format!("loading policy config from {}", path.display()))?,
        None => PolicyConfig::default(),
    };

    if let Some(seed) = args.get_one::<u64>("seed") {
        config = config.with_seed(*seed);
    }
    if let Some(probability) = args.get_one::<f64>("probability") {
        config = config.with_prefer_not_probability(*probability);
    }
    if let Some(max) = args.get_one::<u32>("max-actions") {
        config = config.with_max_actions_without_pause(*max);
    }
    if let Some(keywords) = args.get_many::<String>("keyword") {
        for keyword in keywords {
            config = config.with_sensitive_keyword(keyword.clone());
        }
    }

    config.validate().context("invalid policy configuration")?;
    Ok(config)
}

fn print_usage() {
    println!("Usage: baterby path/to/program.btb");
    println!("Example:");
    println!("{SAMPLE_PROGRAM}");
}

fn main() -> anyhow::Result<()> {
    let args = cli().get_matches();
    init_tracing(args.get_count("verbose"));

    if args.get_flag("sample") {
        println!("{SAMPLE_PROGRAM}");
        return Ok(());
    }

    let Some(path) = args.get_one::<PathBuf>("program") else {
        print_usage();
        return Ok(());
    };

    let config = build_config(&args)?;
    let lines = read_program(path).with_context(|| format!("reading program {}", path.display()))?;

    let mut vm = Interpreter::new(config);
    vm.run(&lines);

    if args.get_flag("json") {
        println!("{}", vm.audit_log().to_json()?);
    } else {
        println!("\n--- Audit ---");
        print!("{}", vm.audit_log().render());
    }
    Ok(())
}
