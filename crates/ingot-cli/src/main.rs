//! `ingot`: assemble configuration documents and convert assemblies between
//! the binary and text encodings.

mod logging;

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ingot::prelude::*;
use tracing::{debug, info};

use crate::logging::{LogFormat, LoggingBuilder};

#[derive(Debug, Parser)]
#[command(name = "ingot", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log line format
    #[arg(long, default_value_t = LogFormat::Compact, global = true)]
    log_format: LogFormat,

    /// Extra filter directive such as `ingot_conf=trace`; repeatable
    #[arg(long = "log-filter", value_name = "DIRECTIVE", global = true)]
    log_filters: Vec<String>,

    /// Omit module paths from log lines
    #[arg(long, global = true)]
    hide_log_target: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assemble documents into the binary encoding on stdout
    Assemble {
        /// Document to load; repeat to merge, later files win. Reads JSON
        /// from stdin when omitted.
        #[arg(short = 'c', long = "config", value_name = "FILE")]
        configs: Vec<PathBuf>,

        /// Root schema of the document
        #[arg(long, default_value_t = SchemaVersion::Auto)]
        schema: SchemaVersion,

        /// Merge INGOT_* environment variables over the documents
        #[arg(long)]
        env: bool,
    },
    /// Read the binary encoding from stdin and print it as text
    Reversepb {
        #[arg(short, long, default_value_t = TextFormat::Expanded)]
        format: TextFormat,
    },
    /// Read text from stdin and print the binary encoding
    Loadpb {
        #[arg(short, long, default_value_t = TextFormat::Expanded)]
        format: TextFormat,
    },
}

fn read_stdin() -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(bytes).context("failed to write stdout")?;
    stdout.flush().context("failed to write stdout")
}

fn run_assemble(configs: Vec<PathBuf>, schema: SchemaVersion, env: bool) -> Result<()> {
    let document = if configs.is_empty() && !env {
        debug!("Reading document from stdin");
        let text = String::from_utf8(read_stdin()?).context("document is not valid UTF-8")?;
        DocumentLoader::parse_str(&text, DocumentFormat::Json)?
    } else {
        let mut loader = configs
            .iter()
            .fold(DocumentLoader::new(), |loader, path| loader.file(path));
        if env {
            loader = loader.with_env();
        }
        loader.load()?
    };

    let types = TypeRegistry::collect_all();
    let assembly = assemble(&document, schema, &BuildContext::new(&types))
        .context("failed to assemble configuration")?;
    let bytes = assembly.encode()?;
    info!(bytes = bytes.len(), "Assembly encoded");
    write_stdout(&bytes)
}

fn run_reversepb(format: TextFormat) -> Result<()> {
    let assembly = RootAssembly::decode(&read_stdin()?).context("invalid binary assembly")?;
    let text = dump(&assembly, format, &CodecRegistry::collect_all())?;
    write_stdout(text.as_bytes())?;
    write_stdout(b"\n")
}

fn run_loadpb(format: TextFormat) -> Result<()> {
    let text = String::from_utf8(read_stdin()?).context("text input is not valid UTF-8")?;
    let assembly = load(&text, format, &CodecRegistry::collect_all())
        .with_context(|| format!("invalid {format} assembly"))?;
    write_stdout(&assembly.encode()?)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Assemble {
            configs,
            schema,
            env,
        } => run_assemble(configs, schema, env),
        Command::Reversepb { format } => run_reversepb(format),
        Command::Loadpb { format } => run_loadpb(format),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.log_filters
        .iter()
        .fold(LoggingBuilder::from_verbosity(cli.verbose), |builder, directive| {
            builder.directive(directive)
        })
        .format(cli.log_format)
        .with_target(!cli.hide_log_target)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            for cause in err.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}
