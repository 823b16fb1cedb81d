//! docnorm CLI - Word document formatting normalizer

mod prompt;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docnorm::normalize::collect_style_names;
use docnorm::{
    detect_format_from_path, find_anomalies, JsonFormat, LanguageCode, NormalizeReport, Normalizer,
    RuleSet, ScanOptions, StripPreset,
};

use prompt::PromptDecisions;

#[derive(Parser)]
#[command(name = "docnorm")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Normalize formatting in Word documents", long_about = None)]
struct Cli {
    /// Input .docx file (prompted when missing)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output .docx file (prompted when missing)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    clean: CleanArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Clone)]
struct CleanArgs {
    /// JSON rules file answering every question (no prompts)
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Stripping preset
    #[arg(long, value_enum)]
    preset: Option<PresetLevel>,

    /// Language code to force onto every run (e.g. en-US)
    #[arg(long, value_name = "CODE")]
    lang: Option<String>,

    /// Write a JSON report of what was changed
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a document (default)
    Clean {
        /// Input .docx file (prompted when missing)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output .docx file (prompted when missing)
        #[arg(value_name = "OUTPUT")]
        output: Option<PathBuf>,

        #[command(flatten)]
        clean: CleanArgs,
    },

    /// List isolated formatting without changing anything
    Scan {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Characters of context on each side
        #[arg(long, default_value = "30")]
        radius: usize,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show document information
    Info {
        /// Input .docx file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PresetLevel {
    /// Fonts, sizes, spacing and alignment
    Minimal,
    /// Also colors, highlight, shading, underline detail and indents (default)
    Standard,
    /// Clear every manual run override
    Aggressive,
}

impl From<PresetLevel> for StripPreset {
    fn from(level: PresetLevel) -> Self {
        match level {
            PresetLevel::Minimal => StripPreset::Minimal,
            PresetLevel::Standard => StripPreset::Standard,
            PresetLevel::Aggressive => StripPreset::Aggressive,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Clean {
            input,
            output,
            clean,
        }) => cmd_clean(input, output, &clean),
        Some(Commands::Scan { input, radius, json }) => cmd_scan(&input, radius, json),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_clean(cli.input, cli.output, &cli.clean),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(80));
    pb.set_message(message);
    pb
}

fn cmd_clean(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    args: &CleanArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let mut prompt = PromptDecisions::new(stdin.lock(), io::stdout());

    let input = match input {
        Some(path) => path,
        None => prompt.ask_path("Enter input .docx path: "),
    };
    let output = match output {
        Some(path) => path,
        None => prompt.ask_path("Enter output .docx path: "),
    };

    if !input.exists() {
        return Err(docnorm::Error::InputNotFound(input).into());
    }

    let language = match args.lang {
        Some(ref code) => Some(LanguageCode::parse(code)?),
        None => None,
    };

    let pb = spinner("Reading document...");
    let loaded = docnorm::open(&input);
    pb.finish_and_clear();
    let mut doc = loaded?;

    let mut normalizer = Normalizer::new();
    if let Some(level) = args.preset {
        normalizer = normalizer.preset(level.into());
    }

    let report = match args.rules {
        Some(ref path) => {
            let mut rules = RuleSet::from_path(path)?;
            if let Some(code) = language {
                rules = rules.with_language(code);
            }
            normalizer.run(&mut doc, &mut rules)?
        }
        None => {
            let prompt = prompt.with_style_count(collect_style_names(&doc).len());
            let mut decisions = match language {
                Some(code) => prompt.with_language(code),
                None => prompt,
            };
            normalizer.run(&mut doc, &mut decisions)?
        }
    };

    let pb = spinner("Saving...");
    let saved = docnorm::save(&doc, &output);
    pb.finish_and_clear();
    saved?;

    println!(
        "\n{} {}",
        "Cleaned file successfully saved to:".green().bold(),
        output.display()
    );
    println!("  {} {}", "└─".dimmed(), report.summary());

    if let Some(ref path) = args.report {
        write_report(&report, path)?;
        println!("{} {}", "Report saved to".green(), path.display());
    }

    Ok(())
}

fn write_report(report: &NormalizeReport, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = docnorm::to_json(report, JsonFormat::Pretty)?;
    fs::write(path, json)?;
    Ok(())
}

fn cmd_scan(input: &Path, radius: usize, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = docnorm::open(input)?;
    let options = ScanOptions::default().with_context_radius(radius);
    let anomalies = find_anomalies(&doc, &options);

    if json {
        println!("{}", docnorm::to_json(&anomalies, JsonFormat::Pretty)?);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in &anomalies {
        writeln!(
            out,
            "{} {}:{}  {}  {}",
            "¶".dimmed(),
            record.paragraph_index + 1,
            record.offset,
            record.labels().join(", ").yellow(),
            record.context
        )?;
    }
    writeln!(
        out,
        "\n{} {} isolated formatting candidates",
        "Found".green().bold(),
        anomalies.len()
    )?;
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = docnorm::open_with_options(input, docnorm::ParseOptions::new().lenient())?;
    let format = detect_format_from_path(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);

    for field in docnorm::MetadataField::ALL {
        if let Some(value) = doc.metadata.get(field).filter(|v| !v.is_empty()) {
            println!("{}: {}", field.to_string().bold(), value);
        }
    }
    if let Some(ref created) = doc.metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = doc.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = doc.plain_text();
    println!("{}: {}", "Paragraphs".bold(), doc.paragraph_count());
    println!("{}: {}", "Runs".bold(), doc.run_count());
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Styles defined".bold(), doc.styles.len());

    let mut in_use: BTreeMap<String, usize> = BTreeMap::new();
    for paragraph in doc.paragraphs() {
        *in_use.entry(doc.style_name(paragraph)).or_default() += 1;
    }

    println!();
    println!("{}", "Styles In Use".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for (name, count) in &in_use {
        println!("{:>6}  {}", count, name);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docnorm".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Word document formatting normalizer");
    println!();
    println!("License: MIT");
}
