use clap::{App, AppSettings, Arg, SubCommand};
use num_enum::TryFromPrimitive;
use std::convert::TryFrom;

mod command_encode;
mod command_verify;
mod command_vote;
mod receipts;
mod rest;

pub use command_encode::*;
pub use command_verify::*;
pub use command_vote::*;

#[derive(TryFromPrimitive, PartialEq, Copy, Clone, Debug)]
#[repr(u8)]
pub enum Verbosity {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Verbosity {
    /// Each `-v` raises the level from `Warn`, each `-q` lowers it
    pub fn from_flags(verbose: u64, quiet: u64) -> Self {
        let level = (2 + verbose.min(2)).saturating_sub(quiet.min(2));
        Verbosity::try_from(level as u8).unwrap_or(Verbosity::Warn)
    }

    fn filter(self) -> &'static str {
        match self {
            Verbosity::Silent => "off",
            Verbosity::Error => "error",
            Verbosity::Warn => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
        }
    }
}

fn main() {
    let matches = App::new("BlindBallot CLI")
        .version("1.0")
        .author("Patrick Hayes <patrick.d.hayes@gmail.com>")
        .about("Casts blind-signed, zero-knowledge-proven ballots")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("uri")
                .long("uri")
                .takes_value(true)
                .global(true)
                .help("Set the blindballot uri - can also be set with BLINDBALLOT_URI"),
        )
        .arg(
            Arg::with_name("session")
                .long("session")
                .takes_value(true)
                .global(true)
                .help("Cookie carrying the voter's session - can also be set with BLINDBALLOT_SESSION"),
        )
        .arg(
            Arg::with_name("receipts")
                .long("receipts")
                .takes_value(true)
                .global(true)
                .help("Receipt file for re-voting - can also be set with BLINDBALLOT_RECEIPTS"),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Sets the level of verbosity"),
        )
        .arg(
            Arg::with_name("q")
                .short("q")
                .multiple(true)
                .global(true)
                .help("Lowers the level of verbosity: -q for errors only, -qq for silent"),
        )
        .subcommand(
            SubCommand::with_name("vote")
                .about("Encrypt, prove, get signed and submit a ballot")
                .arg(
                    Arg::with_name("params")
                        .long("params")
                        .takes_value(true)
                        .required(true)
                        .help("Election parameters (crypto.json)"),
                )
                .arg(
                    Arg::with_name("option")
                        .long("option")
                        .takes_value(true)
                        .required(true)
                        .help("Index of the chosen option, starting at 0"),
                )
                .arg(
                    Arg::with_name("options")
                        .long("options")
                        .takes_value(true)
                        .help("Number of options on the ballot, if not set in the parameters file"),
                )
                .arg(
                    Arg::with_name("user")
                        .long("user")
                        .takes_value(true)
                        .required(true)
                        .help("Voter identity as JSON, exactly as the server serializes it"),
                ),
        )
        .subcommand(
            SubCommand::with_name("verify-proof")
                .about("Verify a ballot proof offline")
                .arg(
                    Arg::with_name("params")
                        .long("params")
                        .takes_value(true)
                        .required(true)
                        .help("Election parameters (crypto.json)"),
                )
                .arg(
                    Arg::with_name("PROOF")
                        .index(1)
                        .required(true)
                        .help("Proof file in JSON format"),
                ),
        )
        .subcommand(
            SubCommand::with_name("encode")
                .about("Show the wire encodings of an integer")
                .arg(
                    Arg::with_name("INTEGER")
                        .index(1)
                        .required(true)
                        .help("Decimal integer"),
                ),
        )
        .get_matches();

    let verbosity = Verbosity::from_flags(matches.occurrences_of("v"), matches.occurrences_of("q"));
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(verbosity.filter()))
        .init();

    let uri_env = std::env::var("BLINDBALLOT_URI");
    let uri = match matches.value_of("uri") {
        Some(uri) => uri,
        None => uri_env.as_deref().unwrap_or("http://localhost:8080"),
    };
    log::info!("URI: {}", uri);

    let session_env = std::env::var("BLINDBALLOT_SESSION").ok();
    let session = matches
        .value_of("session")
        .map(str::to_string)
        .or(session_env);

    let receipts_env = std::env::var("BLINDBALLOT_RECEIPTS");
    let receipts = expand(match matches.value_of("receipts") {
        Some(path) => path,
        None => receipts_env
            .as_deref()
            .unwrap_or("~/.blindballot/receipts.json"),
    });

    // Subcommands
    if let Some(matches) = matches.subcommand_matches("vote") {
        command_vote(matches, uri, session, &receipts);
        std::process::exit(0);
    }
    if let Some(matches) = matches.subcommand_matches("verify-proof") {
        command_verify(matches);
        std::process::exit(0);
    }
    if let Some(matches) = matches.subcommand_matches("encode") {
        command_encode(matches);
        std::process::exit(0);
    }
}

pub fn expand(input: &str) -> String {
    shellexpand::full(input)
        .unwrap_or_else(|e| {
            eprintln!("blindballot: unable to expand {}: {}", input, e);
            std::process::exit(1);
        })
        .into_owned()
}

/// Read and parse an election parameters file
pub fn read_params(location: &str) -> blindballot::ElectionParams {
    let filename = expand(location);
    let json = std::fs::read_to_string(&filename).unwrap_or_else(|e| {
        eprintln!("blindballot: unable to read {}: {}", &filename, e);
        std::process::exit(1);
    });

    blindballot::ElectionParams::from_json(&json).unwrap_or_else(|e| {
        eprintln!("blindballot: unable to read {}: {}", &filename, e);
        std::process::exit(1);
    })
}
