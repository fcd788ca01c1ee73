use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use room_geojson::{process_file, DEFAULT_INPUT, DEFAULT_OUTPUT};
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("room-geojson")
        .version(clap::crate_version!())
        .about("Converts building room JSON into a GeoJSON FeatureCollection")
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .default_value(DEFAULT_INPUT)
                .help("Room JSON file keyed by room number"),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT")
                .default_value(DEFAULT_OUTPUT)
                .help("GeoJSON file to write"),
        )
        .arg(
            Arg::new("strict")
                .long("strict")
                .action(ArgAction::SetTrue)
                .help("Fail on rooms missing floor or label position fields"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log output (-v info, -vv debug, -vvv trace)"),
        )
}

fn log_level(matches: &ArgMatches) -> LevelFilter {
    match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let matches = cli().get_matches();

    env_logger::Builder::new()
        .filter_level(log_level(&matches))
        .parse_default_env()
        .format_timestamp(None)
        .init();

    // Both positionals carry defaults
    let input: PathBuf = matches
        .get_one::<String>("input")
        .map_or_else(|| PathBuf::from(DEFAULT_INPUT), PathBuf::from);
    let output: PathBuf = matches
        .get_one::<String>("output")
        .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from);
    let strict = matches.get_flag("strict");

    match process_file(&input, &output, strict) {
        Ok(count) => {
            println!("Successfully transformed {} rooms to GeoJSON", count);
            println!("Output saved to: {}", output.display());
        }
        Err(e) => {
            eprintln!("Error converting {}: {}", input.display(), e);
            if !input.exists() {
                eprintln!("Please check that the input file exists, or pass its path as the first argument.");
            }
            std::process::exit(1);
        }
    }
}
