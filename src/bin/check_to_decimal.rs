//! Runs a checking campaign from the command line.
//!
//! `standard` is the binary32 standard campaign and `standard64` the
//! binary64 one. `positive` and `all` scan binary32 bit patterns
//! exhaustively.

use std::process;

use clap::{Parser, ValueEnum};
use decimal_oracle::{Campaign, CampaignConfig, CampaignReport, CampaignResult, ConverterKind};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Standard,
    #[value(name = "standard64")]
    Standard64,
    Positive,
    All,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ConverterArg {
    Shortest,
    Platform,
}

impl From<ConverterArg> for ConverterKind {
    fn from(arg: ConverterArg) -> Self {
        match arg {
            ConverterArg::Shortest => ConverterKind::Shortest,
            ConverterArg::Platform => ConverterKind::Platform,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Checks a float to decimal converter", long_about = None)]
struct Args {
    #[arg(value_enum, default_value_t = Mode::Standard)]
    mode: Mode,

    #[arg(long, value_enum, default_value_t = ConverterArg::Shortest)]
    converter: ConverterArg,

    #[arg(long, default_value_t = decimal_oracle::campaign::DEFAULT_RANDOM_COUNT)]
    random_count: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> CampaignConfig {
        CampaignConfig {
            random_count: self.random_count,
            seed: self.seed,
            converter: self.converter.into(),
            ..CampaignConfig::default()
        }
    }
}

fn run(args: &Args) -> CampaignResult<CampaignReport> {
    let config = args.config();
    match args.mode {
        Mode::Standard => Campaign::<f32>::from_config(config).run_seeded(),
        Mode::Standard64 => Campaign::<f64>::from_config(config).run_seeded(),
        Mode::Positive => Campaign::<f32>::from_config(config).run_positive(),
        Mode::All => Campaign::<f32>::from_config(config).run_all(),
    }
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::builder().filter_level(log_level).init();

    match run(&args) {
        Ok(report) => println!("{}: {} values checked, no failures", report.campaign, report.values_checked),
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1);
        }
    }
}
