use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use json_test_data_codegen::{generate, generate_to_file, StubConfig};
use json_test_data_core::{load_file, wrap_dir, LoadError, LoadOptions};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "json-test-data")]
#[command(about = "Check hierarchical JSON test fixtures and generate IDE accessor stubs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every fixture file in a directory and report broken ones
    Check {
        /// Fixture directory
        dir: PathBuf,

        /// Fixture file extension
        #[arg(long, default_value = "json")]
        extension: String,

        /// Do not descend into subdirectories
        #[arg(long)]
        no_recursive: bool,

        /// Print failures as a JSON array on stdout
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved test data of one fixture file as JSON
    Show {
        /// Fixture file
        input: PathBuf,

        /// Output file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Generate IDE accessor stubs for every fixture file in a directory
    Stubs {
        /// Fixture directory (overrides `data-dir` from --config)
        dir: Option<PathBuf>,

        /// Output stub file (defaults to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON config file with stub generation options
        #[arg(long)]
        config: Option<PathBuf>,

        /// Class name suffix
        #[arg(long)]
        suffix: Option<String>,

        /// Namespace declared at the top of the stub file
        #[arg(long)]
        namespace: Option<String>,

        /// Leave the generation timestamp out of the header
        #[arg(long)]
        no_timestamp: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for JSON and stubs
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            dir,
            extension,
            no_recursive,
            json,
        } => {
            let options = LoadOptions {
                extension,
                recursive: !no_recursive,
                ..LoadOptions::default()
            };
            let report = wrap_dir(&dir, &options)
                .map_err(|e| anyhow::Error::from(e).context("Check failed"))?;

            if json {
                write_json(&failures_json(&report.errors), None, OutputFormat::Pretty)?;
            } else {
                for (file, err) in &report.errors {
                    eprintln!("{file}: {}", describe(err));
                }
            }

            let tests: usize = report.data.values().map(|data| data.len()).sum();
            eprintln!(
                "Checked {} file(s), {} test(s), {} failure(s)",
                report.data.len() + report.errors.len(),
                tests,
                report.errors.len()
            );
            if !report.is_clean() {
                bail!("{} fixture file(s) failed", report.errors.len());
            }
        }
        Commands::Show {
            input,
            output,
            format,
        } => {
            let data = load_file(&input, &LoadOptions::default())
                .map_err(|e| anyhow::Error::from(e).context("Show failed"))?;
            write_json(&data, output.as_ref(), format)?;
        }
        Commands::Stubs {
            dir,
            output,
            config,
            suffix,
            namespace,
            no_timestamp,
        } => {
            let mut stub_config = match &config {
                Some(path) => StubConfig::from_file(path)?,
                None => StubConfig::default(),
            };
            if let Some(dir) = dir {
                stub_config.data_dir = dir;
            }
            if let Some(suffix) = suffix {
                stub_config.class_suffix = suffix;
            }
            if namespace.is_some() {
                stub_config.namespace = namespace;
            }
            stub_config.generated_at = if no_timestamp {
                None
            } else {
                Some(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
            };

            let generated = match &output {
                Some(path) => generate_to_file(&stub_config, path)?,
                None => {
                    let generated = generate(&stub_config)?;
                    let mut stdout = io::stdout().lock();
                    stdout
                        .write_all(generated.contents.as_bytes())
                        .context("Failed to write stubs")?;
                    generated
                }
            };

            for (file, err) in &generated.errors {
                eprintln!("Warning: skipped {file}: {}", describe(err));
            }
            if !generated.errors.is_empty() {
                bail!(
                    "{} fixture file(s) could not be processed",
                    generated.errors.len()
                );
            }
        }
    }

    Ok(())
}

/// The parse error alone when there is one; the file path is already the key.
fn describe(err: &LoadError) -> String {
    match err.parse_error() {
        Some(parse) => parse.to_string(),
        None => err.to_string(),
    }
}

fn failures_json(errors: &BTreeMap<String, LoadError>) -> serde_json::Value {
    errors
        .iter()
        .map(|(file, err)| {
            let mut entry = match err.parse_error() {
                Some(parse) => parse.to_json(),
                None => serde_json::json!({
                    "code": "io_error",
                    "message": err.to_string(),
                    "level": null,
                }),
            };
            entry["file"] = serde_json::Value::from(file.as_str());
            entry
        })
        .collect()
}

fn write_json<T: serde::Serialize>(
    val: &T,
    path: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut writer: Box<dyn Write> = if let Some(p) = path {
        let file = File::create(p)
            .with_context(|| format!("Failed to create output file: {}", p.display()))?;
        Box::new(BufWriter::new(file))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;
    writer.flush().context("Failed to flush output")?;

    Ok(())
}
