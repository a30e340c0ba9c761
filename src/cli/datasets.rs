use clap::Args;
use serde_json::json;

use crate::cli::{OutputFormat, SessionArgs};
use crate::remote::RemoteServer;

#[derive(Args)]
pub struct InfoArgs {
    /// Dataset id, as shown by `list`
    pub dataset: String,
}

#[derive(Args)]
pub struct ClassificationArgs {
    /// Dataset id, as shown by `list`
    pub dataset: String,

    /// Classification name (Taxonomy, SEED, EGGNOG, INTERPRO2GO, ...)
    #[arg(default_value = "Taxonomy")]
    pub classification: String,

    /// Omit classes with a zero read count
    #[arg(long)]
    pub skip_empty: bool,
}

#[derive(Args)]
pub struct AuxArgs {
    /// Dataset id, as shown by `list`
    pub dataset: String,

    /// Print the content of this label as text instead of listing labels
    #[arg(long)]
    pub show: Option<String>,
}

/// Execute list subcommand
///
/// # Errors
///
/// Returns an error if the server cannot be reached or rejects the request.
pub fn run_list(session: &SessionArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let server = RemoteServer::connect(&session.to_config()?)?;
    let datasets = server.list_datasets()?;

    if verbose {
        eprintln!(
            "{} datasets on {}",
            datasets.len(),
            server.client().base_url()
        );
    }

    match format {
        OutputFormat::Text => {
            for dataset in &datasets {
                let flag = if dataset.read_only { " [read-only]" } else { "" };
                println!("{dataset}{flag}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&datasets)?),
        OutputFormat::Tsv => {
            println!("id\tname\tread_only");
            for dataset in &datasets {
                println!("{}\t{}\t{}", dataset.id, dataset.name, dataset.read_only);
            }
        }
    }

    Ok(())
}

/// Execute info subcommand
///
/// # Errors
///
/// Returns an error if any of the queries fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_info(args: InfoArgs, session: &SessionArgs, format: OutputFormat) -> anyhow::Result<()> {
    let server = RemoteServer::connect(&session.to_config()?)?;
    let connector = server.open(&args.dataset);

    let reads = connector.get_number_of_reads()?;
    let matches = connector.get_number_of_matches()?;
    let classifications = connector.get_classification_names()?;

    match format {
        OutputFormat::Text => {
            println!("Dataset:         {}", args.dataset);
            println!("Reads:           {reads}");
            println!("Matches:         {matches}");
            println!("Classifications: {}", classifications.join(", "));
        }
        OutputFormat::Json => {
            let output = json!({
                "dataset": args.dataset,
                "reads": reads,
                "matches": matches,
                "classifications": classifications,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("dataset\treads\tmatches\tclassifications");
            println!(
                "{}\t{reads}\t{matches}\t{}",
                args.dataset,
                classifications.join(",")
            );
        }
    }

    Ok(())
}

/// Execute classification subcommand
///
/// # Errors
///
/// Returns an error if the summary cannot be fetched or decoded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_classification(
    args: ClassificationArgs,
    session: &SessionArgs,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let server = RemoteServer::connect(&session.to_config()?)?;
    let summary = server
        .open(&args.dataset)
        .get_classification_block(&args.classification)?;

    if verbose {
        eprintln!(
            "{}: {} classes, {} assigned reads",
            summary.name(),
            summary.len(),
            summary.total()
        );
    }

    let rows: Vec<_> = summary
        .iter()
        .filter(|(_, counts)| !args.skip_empty || counts.sum > 0)
        .collect();

    match format {
        OutputFormat::Text | OutputFormat::Tsv => {
            println!("class_id\tweighted_sum\tsum");
            for (class_id, counts) in &rows {
                println!("{class_id}\t{}\t{}", counts.weighted_sum, counts.sum);
            }
        }
        OutputFormat::Json => {
            let classes: Vec<_> = rows
                .iter()
                .map(|(class_id, counts)| {
                    json!({
                        "class_id": class_id,
                        "weighted_sum": counts.weighted_sum,
                        "sum": counts.sum,
                    })
                })
                .collect();
            let output = json!({
                "classification": summary.name(),
                "classes": classes,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Execute aux subcommand
///
/// # Errors
///
/// Returns an error if the auxiliary data cannot be fetched or decoded, or the
/// requested label does not exist.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run_aux(args: AuxArgs, session: &SessionArgs, format: OutputFormat) -> anyhow::Result<()> {
    let server = RemoteServer::connect(&session.to_config()?)?;
    let aux = server.open(&args.dataset).get_auxiliary_data()?;

    if let Some(label) = &args.show {
        let data = aux
            .get(label)
            .ok_or_else(|| anyhow::anyhow!("No auxiliary data labelled '{label}'"))?;
        println!("{}", String::from_utf8_lossy(data));
        return Ok(());
    }

    match format {
        OutputFormat::Text | OutputFormat::Tsv => {
            println!("label\tbytes");
            for (label, data) in aux.iter() {
                println!("{label}\t{}", data.len());
            }
        }
        OutputFormat::Json => {
            let entries: Vec<_> = aux
                .iter()
                .map(|(label, data)| json!({ "label": label, "bytes": data.len() }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}
