use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use tabular_lens::data::features::{feature_names_out, passenger_features};
use tabular_lens::data::writer::write_csv;
use tabular_lens::{DatasetError, DatasetService, DatasetStore, ErrorKind, ErrorReport};

/// Upload, list and inspect CSV datasets
#[derive(Parser, Debug)]
#[command(name = "tabular-lens")]
#[command(about = "Upload, list and inspect CSV datasets")]
#[command(version)]
struct Args {
    /// Directory holding one file per dataset
    #[arg(long, env = "TABULAR_LENS_ROOT", default_value = "instance/dataset")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a CSV file as a dataset
    Upload {
        file: PathBuf,
        /// Dataset name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },
    /// List stored datasets
    List,
    /// Every column with its datatype and values
    Describe { name: String },
    /// Datatype and distinct values of one column
    Column { name: String, column: String },
    /// Render the passenger age histogram
    Hist {
        name: String,
        /// Output path (defaults to `<name>.hist.png`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Derive `Is_married` and `Cabin_type` columns
    Features {
        name: String,
        /// Store the enriched table as a new dataset
        #[arg(long)]
        save_as: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(err) = execute(args) {
        let report = error_report(&err);
        match serde_json::to_string(&report) {
            Ok(json) => eprintln!("{json}"),
            Err(_) => eprintln!("{}", report.message),
        }
        std::process::exit(1);
    }
}

fn execute(args: Args) -> Result<()> {
    let store = DatasetStore::open(&args.root)
        .with_context(|| format!("opening dataset root {}", args.root.display()))?;
    let service = DatasetService::new(store);
    run(&service, args.command)
}

/// Failure object for any error, dataset-layer or not. Errors that did not
/// come from the dataset layer are `io` when an I/O error caused them and
/// `invalid_input` otherwise.
fn error_report(err: &anyhow::Error) -> ErrorReport {
    let message = format!("{err:#}");
    if let Some(dataset_err) = err.downcast_ref::<DatasetError>() {
        return ErrorReport {
            message,
            ..ErrorReport::from(dataset_err)
        };
    }
    match err.root_cause().downcast_ref::<io::Error>() {
        Some(io_err) => ErrorReport {
            kind: ErrorKind::Io,
            message,
            detail: format!("{:?}", io_err.kind()),
        },
        None => ErrorReport {
            kind: ErrorKind::InvalidInput,
            message,
            detail: "No details".to_string(),
        },
    }
}

fn run(service: &DatasetService, command: Command) -> Result<()> {
    match command {
        Command::Upload { file, name } => {
            let name = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .context("file path has no usable file name")?
                    .to_string(),
            };
            let reader = BufReader::new(
                File::open(&file).with_context(|| format!("opening {}", file.display()))?,
            );
            let stored = service.upload_dataset(&name, reader)?;
            println!("{stored}");
        }
        Command::List => print_json(&service.list_datasets()?)?,
        Command::Describe { name } => print_json(&service.describe_dataset(&name)?)?,
        Command::Column { name, column } => {
            print_json(&service.describe_column(&name, &column)?)?
        }
        Command::Hist { name, output } => {
            let png = service.age_histogram_png(&name)?;
            let output = output.unwrap_or_else(|| PathBuf::from(format!("{name}.hist.png")));
            std::fs::write(&output, png)
                .with_context(|| format!("writing {}", output.display()))?;
            log::info!("histogram written to {}", output.display());
        }
        Command::Features { name, save_as } => {
            let mut table = service.store().load(&name)?;
            let derived = feature_names_out(&table.column_names());
            passenger_features(&mut table)?;
            if let Some(target) = save_as {
                let mut buf = Vec::new();
                write_csv(&table, &mut buf)?;
                let stored = service.upload_dataset(&target, buf.as_slice())?;
                log::info!("enriched table stored as {stored}");
            }
            print_json(&derived)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(root: &std::path::Path, command: Command) -> Args {
        Args {
            root: root.to_path_buf(),
            command,
        }
    }

    #[test]
    fn missing_local_file_reports_io() {
        let dir = TempDir::new().unwrap();
        let err = execute(args(
            dir.path(),
            Command::Upload {
                file: dir.path().join("nonexistent.csv"),
                name: None,
            },
        ))
        .unwrap_err();

        let report = error_report(&err);
        assert_eq!(report.kind, ErrorKind::Io);
        assert!(report.message.starts_with("opening "));
        assert_eq!(report.detail, "NotFound");
    }

    #[test]
    fn dataset_errors_keep_their_kind() {
        let dir = TempDir::new().unwrap();
        let err = execute(args(
            dir.path(),
            Command::Describe {
                name: "ghost.csv".into(),
            },
        ))
        .unwrap_err();

        let report = error_report(&err);
        assert_eq!(report.kind, ErrorKind::NotFound);
        assert_eq!(report.message, "not found: dataset 'ghost.csv'");
    }

    #[test]
    fn other_errors_are_invalid_input() {
        let err = anyhow::anyhow!("file path has no usable file name");
        let report = error_report(&err);
        assert_eq!(report.kind, ErrorKind::InvalidInput);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "invalid_input");
        assert_eq!(json["message"], "file path has no usable file name");
    }

    #[test]
    fn features_saves_enriched_copy() {
        let dir = TempDir::new().unwrap();
        let store = DatasetStore::open(dir.path()).unwrap();
        store
            .upload("p.csv", "Name,Cabin\n\"Cumings, Mrs. John\",C85\n".as_bytes())
            .unwrap();

        execute(args(
            dir.path(),
            Command::Features {
                name: "p.csv".into(),
                save_as: Some("p_features.csv".into()),
            },
        ))
        .unwrap();

        let enriched = store.load("p_features.csv").unwrap();
        assert_eq!(
            enriched.column_names(),
            vec!["Name", "Cabin", "Is_married", "Cabin_type"]
        );
    }
}
