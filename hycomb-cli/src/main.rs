use std::process;

use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use clap::{Parser, Subcommand};
use hycomb::{DecodeOptions, jet::JetSet, node::display::DEFAULT_DISPLAY_BUDGET};

mod address;
mod error;
mod info;

use error::CliError;

#[derive(Parser)]
#[command(name = "hycomb", version, about = "Inspect encoded combinator programs")]
pub struct Arguments {
    /// Print verbose logging output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a program and print what it commits to
    Info {
        /// The program, in base64 or hex
        program: String,

        /// Print output in YAML instead of JSON
        #[arg(short, long)]
        yaml: bool,

        /// Jet set used to resolve jet indices (core or elements)
        #[arg(long, default_value = "elements")]
        jets: JetSet,

        /// Largest number of nodes accepted
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Largest number of nodes shown in `commit_decode`
        #[arg(long, default_value_t = DEFAULT_DISPLAY_BUDGET)]
        max_display: usize,
    },
}

fn setup_logger(level: log::LevelFilter) {
    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();
    if let Err(error) = result {
        eprintln!("cannot install logger: {error}");
    }
}

fn report(program: &str, error: &CliError) {
    let CliError::Decode { source, encoding } = error else {
        eprintln!("Error: {error}");
        return;
    };
    let Some(position) = source.bit_position() else {
        eprintln!("Error: {error}");
        return;
    };

    let text = program.trim();
    let start = (position / encoding.bits_per_char()).min(text.len().saturating_sub(1));
    let span = ("<program>", start..(start + 1).min(text.len()));
    let mut colors = ColorGenerator::new();

    let _ = Report::build(ReportKind::Error, span.clone())
        .with_message(source.to_string())
        .with_label(
            Label::new(span)
                .with_message(format!("bit {position} is encoded here"))
                .with_color(colors.next()),
        )
        .finish()
        .eprint(("<program>", Source::from(text)));
}

fn run(command: &Command) -> Result<(), CliError> {
    match command {
        Command::Info {
            program,
            yaml,
            jets,
            max_nodes,
            max_display,
        } => {
            let mut options = DecodeOptions::default().with_jet_set(*jets);
            if let Some(max_nodes) = *max_nodes {
                options = options.with_max_nodes(max_nodes);
            }

            let decoded = info::parse_program(program, &options)?;
            let info = info::program_info(&decoded, *max_display)?;
            let output = if *yaml {
                serde_yaml::to_string(&info)?
            } else {
                serde_json::to_string_pretty(&info)?
            };
            println!("{}", output.trim_end());
            Ok(())
        }
    }
}

fn main() {
    let args = Arguments::parse();

    match args.verbose {
        true => setup_logger(log::LevelFilter::Trace),
        false => setup_logger(log::LevelFilter::Warn),
    }

    if let Err(error) = run(&args.command) {
        let Command::Info { program, .. } = &args.command;
        report(program, &error);
        process::exit(1);
    }
}
