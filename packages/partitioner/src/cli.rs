//! Command-line interface for levelmark.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use levelmark_engine::config::{DEFAULT_ADVERB_FILE, DEFAULT_BLACKLIST_FILE};
use levelmark_engine::{
    conllu, Classifier, ClassifierOptions, FormTable, LexicalResources, NoSynthesizer, Report,
    Synthesizer,
};

use crate::config::{validate_output_dir, DEFAULT_OUTPUT_DIR};
use crate::error::{PartitionError, Result};
use crate::partition::LevelPartition;
use crate::scan::collect_files;

/// Levelmark - syntactic complexity levels for CoNLL-U tree banks.
#[derive(Parser)]
#[command(name = "levelmark")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mark excluded sentences and word levels in a tree bank.
    Mark {
        /// Input CoNLL-U file (default: stdin)
        input: Option<PathBuf>,

        /// Output file for the marked tree bank (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Blacklisted lemmas, whitespace separated
        #[arg(long, default_value = DEFAULT_BLACKLIST_FILE)]
        blacklist: PathBuf,

        /// Excluded adverbs, one per line
        #[arg(long, default_value = DEFAULT_ADVERB_FILE)]
        adverbs: PathBuf,

        /// Tab-separated table of nominative and genitive singular forms
        #[arg(long)]
        forms: Option<PathBuf>,

        /// Write the run report as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Still try levels 11-12 on "NotTrv" sentences
        #[arg(long)]
        late_bands_for_nontrivial: bool,

        /// Let levels 9-10 accept nominative or partitive copular subjects
        #[arg(long)]
        copular_case_membership: bool,
    },

    /// Divide marked tree banks into one corpus per level.
    Divide {
        /// Folder of marked tree banks, scanned recursively
        folder: PathBuf,

        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Mark {
            input,
            output,
            blacklist,
            adverbs,
            forms,
            report,
            late_bands_for_nontrivial,
            copular_case_membership,
        } => {
            let options = ClassifierOptions {
                late_bands_for_nontrivial,
                copular_case_membership,
                ..ClassifierOptions::default()
            };
            mark_command(&MarkArgs {
                input: input.as_deref(),
                output: output.as_deref(),
                blacklist: &blacklist,
                adverbs: &adverbs,
                forms: forms.as_deref(),
                report: report.as_deref(),
                options,
            })
        }
        Commands::Divide { folder, output } => divide_command(&folder, output.as_deref()),
    }
}

/// Arguments of the mark command.
struct MarkArgs<'a> {
    input: Option<&'a Path>,
    output: Option<&'a Path>,
    blacklist: &'a Path,
    adverbs: &'a Path,
    forms: Option<&'a Path>,
    report: Option<&'a Path>,
    options: ClassifierOptions,
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Execute the mark command.
fn mark_command(args: &MarkArgs<'_>) -> Result<()> {
    // Resources are loaded before any input is read
    let resources = LexicalResources::load(args.blacklist, args.adverbs)?;
    let synthesizer: Box<dyn Synthesizer> = match args.forms {
        Some(path) => Box::new(FormTable::load(path)?),
        None => Box::new(NoSynthesizer),
    };

    let text = match args.input {
        Some(path) => std::fs::read_to_string(path).map_err(|source| PartitionError::Read {
            path: path.to_path_buf(),
            source,
        })?,
        None => io::read_to_string(io::stdin())?,
    };

    let pb = spinner("Classifying sentences...");
    let mut classifier =
        Classifier::with_options(&resources, synthesizer.as_ref(), args.options.clone());
    let (sentences, report) = classifier.classify(conllu::parse_document(&text));
    pb.finish_and_clear();

    match args.output {
        Some(path) => {
            let write = || -> io::Result<()> {
                let mut out = BufWriter::new(File::create(path)?);
                conllu::write_document(&mut out, &sentences)?;
                out.flush()
            };
            write().map_err(|source| PartitionError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        None => {
            let mut out = io::stdout().lock();
            conllu::write_document(&mut out, &sentences)?;
            out.flush()?;
        }
    }

    if let Some(path) = args.report {
        let json = report.to_json()?;
        std::fs::write(path, json).map_err(|source| PartitionError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    print_mark_summary(&report, args.output);
    Ok(())
}

fn print_mark_summary(report: &Report, output: Option<&Path>) {
    eprintln!(
        "{} {} sentences",
        style("Marked").bold(),
        style(report.sentences).cyan()
    );
    eprintln!("  Level labels: {}", report.total);
    if report.malformed > 0 {
        eprintln!(
            "  Malformed: {}",
            style(report.malformed).yellow().bold()
        );
    }
    if let Some(path) = output {
        eprintln!("{} {}", style("Saved to:").green().bold(), path.display());
    }
}

/// Execute the divide command.
fn divide_command(folder: &Path, output: Option<&Path>) -> Result<()> {
    let files = collect_files(folder)?;
    let output_dir = output.unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR));
    validate_output_dir(output_dir)?;

    println!(
        "{} {} files from {}",
        style("Dividing").bold(),
        style(files.len()).cyan(),
        style(folder.display()).green()
    );

    let pb = ProgressBar::new(files.len() as u64);
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid template"),
    );

    let mut partition = LevelPartition::new();
    for path in &files {
        pb.set_message(path.display().to_string());
        if let Err(e) = partition.add_file(path) {
            pb.finish_and_clear();
            return Err(e);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let written = partition.write_all(output_dir)?;

    println!("  Sentences: {}", partition.len());
    if partition.excluded() > 0 {
        println!("  Excluded: {}", partition.excluded());
    }
    if partition.duplicates() > 0 {
        println!("  Duplicates skipped: {}", partition.duplicates());
    }
    if partition.malformed() > 0 {
        println!(
            "  Malformed: {}",
            style(partition.malformed()).yellow().bold()
        );
    }
    println!();
    for level in &written {
        println!(
            "{} {} ({} sentences)",
            style("Saved to:").green().bold(),
            level.path.display(),
            level.sentences
        );
    }

    Ok(())
}
