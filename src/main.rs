use std::{
    path::PathBuf,
    process::exit,
    time::Duration,
};
use log::LevelFilter;
use structopt::{StructOpt, clap::ErrorKind};

use bindgen_flags::{extract, Error, Options, ProbeConfig, Selector};

/// Extract include and define flags of a translation unit for binding generation
#[derive(Debug, StructOpt)]
#[structopt(about)]
struct Args {
    /// Compilation database (compile_commands.json)
    #[structopt(parse(from_os_str))]
    database: PathBuf,

    /// Source file suffix to look up, or `all` for the first entry
    ///
    /// Put `--` before the positionals when a value starts with `-`.
    source: Selector,

    /// Flags output file
    #[structopt(parse(from_os_str))]
    output: PathBuf,

    /// Compiler to probe for system include paths
    #[structopt(short, long, parse(from_os_str))]
    compiler: Option<PathBuf>,

    /// Language mode of the compiler probe
    #[structopt(short = "x", long, default_value = "c++")]
    language: String,

    /// Skip system include paths detection
    #[structopt(short, long)]
    no_system_includes: bool,

    /// Compiler probe timeout in seconds
    #[structopt(short = "t", long, default_value = "30")]
    probe_timeout: u64,

    /// Log level
    #[structopt(short, long, env, parse(try_from_str), default_value = "off")]
    log_level: LevelFilter,
}

fn main() {
    let args = match Args::from_iter_safe(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => e.exit(),
            _ => {
                eprintln!("{}", e.message);
                exit(1);
            }
        },
    };

    {
        std::env::set_var("__LOG_LEVEL_FILTER__", args.log_level.to_string());
        pretty_env_logger::init_custom_env("__LOG_LEVEL_FILTER__");
    }

    let options = Options {
        database: args.database,
        selector: args.source,
        output: args.output,
        probe: ProbeConfig {
            compiler: args.compiler,
            language: args.language,
            timeout: Duration::from_secs(args.probe_timeout),
        },
        detect_isystem: !args.no_system_includes,
    };

    match extract(&options) {
        Ok(extraction) => {
            if let Some(e) = &extraction.probe_error {
                eprintln!("warning: {}", e);
            }
            println!("Extracted {} flags to {}", extraction.flags.len(), extraction.output.display());
        }
        Err(e @ Error::NoMatch(_)) => {
            eprintln!("{}", e);
            exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            exit(1);
        }
    }
}
