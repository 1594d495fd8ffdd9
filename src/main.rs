//! Command-line front end: one subcommand per analysis task

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use review_sentiment::{
    tasks, AnalysisConfig, ClassifierKind, PatternLexicon, ReviewTable, Table, ValenceLexicon,
    VectorizerKind,
};

#[derive(Parser)]
#[command(name = "review-sentiment")]
#[command(about = "Review sentiment analysis: cleaning, lexicon scoring and supervised evaluation", long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info", env = "REVIEW_SENTIMENT_LOG")]
    log_level: String,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count reviews per sentiment label
    Inspect {
        csv: PathBuf,
    },

    /// Normalize the Review column
    Clean {
        csv: PathBuf,

        /// Keep the sentiment column for supervised training
        #[arg(long)]
        with_sentiment: bool,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Polarity and subjectivity of the Clean Review column
    Polarity {
        csv: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compound valence of the Review column
    Valence {
        csv: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score a single sentence
    Sentence {
        text: String,
    },

    /// Train on the leading rows and evaluate on the rest
    Evaluate {
        csv: PathBuf,

        #[arg(long, value_enum)]
        classifier: Option<ClassifierArg>,

        #[arg(long, value_enum)]
        features: Option<FeaturesArg>,

        /// Number of leading rows used for training
        #[arg(long)]
        train_rows: Option<usize>,

        /// Write the classification report as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassifierArg {
    LinearSvm,
    LogisticRegression,
    GradientBoosting,
    RandomForest,
}

impl From<ClassifierArg> for ClassifierKind {
    fn from(arg: ClassifierArg) -> Self {
        match arg {
            ClassifierArg::LinearSvm => ClassifierKind::LinearSvm,
            ClassifierArg::LogisticRegression => ClassifierKind::LogisticRegression,
            ClassifierArg::GradientBoosting => ClassifierKind::GradientBoosting,
            ClassifierArg::RandomForest => ClassifierKind::RandomForest,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FeaturesArg {
    Bow,
    Tfidf,
}

impl From<FeaturesArg> for VectorizerKind {
    fn from(arg: FeaturesArg) -> Self {
        match arg {
            FeaturesArg::Bow => VectorizerKind::Count,
            FeaturesArg::Tfidf => VectorizerKind::Tfidf,
        }
    }
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .try_init()
        .ok();
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_json_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn load_table(path: &Path) -> Result<ReviewTable> {
    let table = ReviewTable::from_path(path)
        .with_context(|| format!("Failed to read CSV: {}", path.display()))?;
    info!(rows = table.len(), path = %path.display(), "loaded dataset");
    Ok(table)
}

fn write_table(table: &Table, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            table
                .to_path(path)
                .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
            info!(rows = table.len(), path = %path.display(), "wrote table");
        }
        None => table.write_csv(io::stdout().lock())?,
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { csv } => {
            let counts = tasks::inspect(&load_table(&csv)?)?;
            println!("{}", counts);
        }
        Commands::Clean { csv, with_sentiment, output } => {
            let table = load_table(&csv)?;
            let normalizer = config.normalizer.build();
            let cleaned = if with_sentiment {
                tasks::clean_with_sentiment(&table, &normalizer)?
            } else {
                tasks::clean(&table, &normalizer)?
            };
            write_table(&cleaned, output.as_deref())?;
        }
        Commands::Polarity { csv, output } => {
            let scored = tasks::score_polarity(&load_table(&csv)?, &PatternLexicon::english())?;
            write_table(&scored.table, output.as_deref())?;
            eprintln!("{}", scored.counts);
        }
        Commands::Valence { csv, output } => {
            let scored = tasks::score_valence(
                &load_table(&csv)?,
                &ValenceLexicon::english(),
                &config.valence,
            )?;
            write_table(&scored.table, output.as_deref())?;
            eprintln!("{}", scored.counts);
        }
        Commands::Sentence { text } => {
            let score = tasks::try_sentence(&text, &PatternLexicon::english())?;
            println!("Polarity: {}", score.polarity);
            println!("Subjectivity: {}", score.subjectivity);
            println!("Sentiment: {}", score.sentiment);
        }
        Commands::Evaluate { csv, classifier, features, train_rows, output, json } => {
            if let Some(kind) = classifier {
                config.classifier.kind = kind.into();
            }
            if let Some(kind) = features {
                config.features.kind = kind.into();
            }
            if let Some(n) = train_rows {
                config.split.train_rows = n;
            }
            config.validate()?;

            let outcome = tasks::evaluate(&load_table(&csv)?, &config)?;
            let report = outcome.report_table();
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}\n", outcome.summary);
                println!("{}\n", outcome.confusion);
                println!("{}", report);
            }
            if let Some(path) = output {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("Failed to create report: {}", path.display()))?;
                report.write_csv(file)?;
                info!(path = %path.display(), "wrote classification report");
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
