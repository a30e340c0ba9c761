use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Args;

use crate::cli::{OutputFormat, SessionArgs};
use crate::core::reads::ReadBlock;
use crate::remote::{FindSelection, ReadBlockIterator, ReadOptions, RemoteServer};

#[derive(Args)]
pub struct ReadsArgs {
    /// Dataset id, as shown by `list`
    pub dataset: String,

    /// Classification the class id refers to
    #[arg(short, long, default_value = "Taxonomy")]
    pub classification: String,

    /// Class whose reads are listed
    #[arg(long, allow_negative_numbers = true)]
    pub class_id: i32,

    /// Drop matches with a lower bit score
    #[arg(long, default_value = "0")]
    pub min_score: f32,

    /// Fetch read sequences as well
    #[arg(long)]
    pub sequences: bool,

    /// Stop after this many reads
    #[arg(short = 'n', long)]
    pub limit: Option<u64>,
}

/// Read fields a search can look at
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SearchField {
    Name,
    Header,
    Sequence,
    Match,
}

#[derive(Args)]
pub struct FindArgs {
    /// Dataset id, as shown by `list`
    pub dataset: String,

    /// Text to search for
    pub text: String,

    /// Fields to search, comma-separated
    #[arg(long = "in", value_enum, value_delimiter = ',', default_value = "match")]
    pub fields: Vec<SearchField>,

    /// Stop after this many reads
    #[arg(short = 'n', long)]
    pub limit: Option<u64>,
}

/// Execute reads subcommand
///
/// # Errors
///
/// Returns an error if the session cannot be opened or a page cannot be fetched.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_reads(
    args: ReadsArgs,
    session: &SessionArgs,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let config = session.to_config()?;
    let server = RemoteServer::connect(&config)?;
    let options = ReadOptions {
        want_sequences: args.sequences,
        min_score: args.min_score,
        ..ReadOptions::default()
    };

    let reads = server.open(&args.dataset).get_reads_iterator(
        &args.classification,
        args.class_id,
        config.page_size,
        &options,
    );
    print_reads(reads, args.limit, format, verbose)
}

/// Execute find subcommand
///
/// # Errors
///
/// Returns an error if the session cannot be opened or a page cannot be fetched.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_find(args: FindArgs, session: &SessionArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let server = RemoteServer::connect(&session.to_config()?)?;
    let selection = FindSelection {
        read_name: args.fields.contains(&SearchField::Name),
        read_header: args.fields.contains(&SearchField::Header),
        read_sequence: args.fields.contains(&SearchField::Sequence),
        match_text: args.fields.contains(&SearchField::Match),
    };

    let reads = server.open(&args.dataset).get_find_all_reads_iterator(
        &args.text,
        &selection,
        Arc::new(AtomicBool::new(false)),
    );
    print_reads(reads, args.limit, format, verbose)
}

fn print_reads(
    mut reads: ReadBlockIterator,
    limit: Option<u64>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    if matches!(format, OutputFormat::Tsv) {
        println!("uid\tname\tlength\tmatches\tbest_score");
    }

    let limit = limit.unwrap_or(u64::MAX);
    while reads.position() < limit {
        let Some(read) = reads.next() else {
            break;
        };
        print_read(&read?, format)?;
    }

    if verbose {
        eprintln!("Read {} of {} reads", reads.position(), reads.maximum());
    }
    reads.close();
    Ok(())
}

fn print_read(read: &ReadBlock, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}\t{} bp\t{} matches", read.name, read.length, read.num_matches());
            if !read.sequence.is_empty() {
                println!("{}", read.sequence);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(read)?),
        OutputFormat::Tsv => {
            let best = read.best_score().map_or_else(String::new, |s| format!("{s:.1}"));
            println!(
                "{}\t{}\t{}\t{}\t{best}",
                read.uid,
                read.name,
                read.length,
                read.num_matches()
            );
        }
    }
    Ok(())
}
