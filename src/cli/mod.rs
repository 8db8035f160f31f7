//! Command-line interface for starpulse.
//!
//! Batch entry points over JSONL input: admissibility filtering, heat
//! scoring, hostility evaluation, opinion summaries. Each command reads one
//! JSON record per line, skips and counts malformed lines, and writes
//! results as JSON.

use std::collections::HashMap;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AnalysisConfig;
use crate::domain::{HostilityRecord, PostActivity, TextFragment};
use crate::filter::AdmissibilityFilter;
use crate::heat::windowed::{DailyCounters, WindowedHeatScorer};
use crate::heat::HeatScorer;
use crate::hostility::{ranking, CommentSentiment, HostilityDetector};
use crate::sentiment::opinion::{self, OpinionComment};

/// starpulse - Social-media monitoring analytics
#[derive(Parser, Debug)]
#[command(name = "starpulse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Analysis parameters (YAML, defaults used if omitted)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Judge text fragments for admissibility
    Filter {
        /// Input file of JSONL fragments (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Score an entity's posts and build a heat report
    Heat {
        /// Entity whose posts these are
        #[arg(short, long)]
        entity_id: String,

        /// Input file of JSONL post activities (stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Build a smoothed daily heat series from activity counters
    WindowedHeat {
        /// Entity the counters belong to
        #[arg(short, long)]
        entity_id: String,

        /// Input file of JSONL daily counters (stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Evaluate commenters for hostility and profile the population
    Hostility {
        /// Entity the comments target
        #[arg(short, long)]
        entity_id: String,

        /// Input file of JSONL classified comments (stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Summarize public opinion over a classified comment set
    Opinion {
        /// Entity the comments target
        #[arg(short, long)]
        entity_id: String,

        /// Input file of JSONL classified comments (stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };

        match self.command {
            Commands::Filter { input } => run_filter(&config, input).await,
            Commands::Heat { entity_id, input } => run_heat(&config, &entity_id, input),
            Commands::WindowedHeat { entity_id, input } => {
                run_windowed_heat(&config, &entity_id, input)
            }
            Commands::Hostility { entity_id, input } => {
                run_hostility(&config, &entity_id, input)
            }
            Commands::Opinion { entity_id, input } => run_opinion(&config, &entity_id, input),
            Commands::Config => show_config(&config),
        }
    }
}

/// Read the whole input, from a file or stdin.
fn read_input(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Parse JSONL into records, skipping and counting malformed lines.
fn parse_lines<T: serde::de::DeserializeOwned>(raw: &str) -> (Vec<T>, usize) {
    let mut records = Vec::new();
    let mut malformed = 0usize;
    for (number, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(line = number + 1, %err, "skipping malformed input line");
                malformed += 1;
            }
        }
    }
    (records, malformed)
}

async fn run_filter(config: &AnalysisConfig, input: Option<PathBuf>) -> Result<()> {
    let raw = read_input(input)?;
    let (fragments, malformed) = parse_lines::<TextFragment>(&raw);

    // No encoder on the command line; semantic-ambiguous text falls through
    // to the lexical rules.
    let filter = AdmissibilityFilter::lexical_only(&config.filter);
    let texts: Vec<String> = fragments.iter().map(|f| f.text.clone()).collect();
    let batch = filter.is_meaningful_batch(&texts).await;

    for (fragment, admitted) in fragments.iter().zip(&batch.verdicts) {
        println!(
            "{}",
            serde_json::json!({ "id": fragment.id, "admitted": admitted })
        );
    }
    eprintln!(
        "[{} fragments, {} admitted, {} malformed lines skipped]",
        fragments.len(),
        batch.admitted,
        malformed
    );
    Ok(())
}

fn run_heat(config: &AnalysisConfig, entity_id: &str, input: Option<PathBuf>) -> Result<()> {
    let raw = read_input(input)?;
    let (posts, malformed) = parse_lines::<PostActivity>(&raw);

    let scorer = HeatScorer::new(config.heat.clone());
    let outcome = scorer.analyze_entity(entity_id, &posts, Utc::now());
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if malformed > 0 {
        eprintln!("[{malformed} malformed lines skipped]");
    }
    Ok(())
}

fn run_windowed_heat(
    config: &AnalysisConfig,
    entity_id: &str,
    input: Option<PathBuf>,
) -> Result<()> {
    let raw = read_input(input)?;
    let (counters, malformed) = parse_lines::<DailyCounters>(&raw);

    let start = counters.iter().map(|c| c.date).min();
    let end = counters.iter().map(|c| c.date).max();
    let (Some(start), Some(end)) = (start, end) else {
        anyhow::bail!("no counters in input");
    };

    let scorer = WindowedHeatScorer::new(config.windowed_heat.clone());
    let series = scorer.series(entity_id, &counters, start, end);
    println!("{}", serde_json::to_string_pretty(&series)?);
    if malformed > 0 {
        eprintln!("[{malformed} malformed lines skipped]");
    }
    Ok(())
}

fn run_hostility(config: &AnalysisConfig, entity_id: &str, input: Option<PathBuf>) -> Result<()> {
    let raw = read_input(input)?;
    let (comments, malformed) = parse_lines::<AuthoredComment>(&raw);
    let now = Utc::now();

    let mut by_author: HashMap<String, Vec<CommentSentiment>> = HashMap::new();
    for comment in comments {
        by_author
            .entry(comment.author_id)
            .or_default()
            .push(comment.sentiment);
    }

    let detector = HostilityDetector::new(config.hostility.clone());
    let mut records: Vec<HostilityRecord> = Vec::new();
    for (author_id, author_comments) in &by_author {
        let outcome = detector.evaluate(author_id, entity_id, author_comments, now);
        println!("{}", serde_json::to_string(&outcome)?);
        if let Some(record) = outcome.record() {
            records.push(record.clone());
        }
    }

    if let Some(profile) = ranking::profile(&records, &HashMap::new(), now) {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    }
    if malformed > 0 {
        eprintln!("[{malformed} malformed lines skipped]");
    }
    Ok(())
}

fn run_opinion(config: &AnalysisConfig, entity_id: &str, input: Option<PathBuf>) -> Result<()> {
    let raw = read_input(input)?;
    let (comments, malformed) = parse_lines::<OpinionComment>(&raw);

    let detector = HostilityDetector::new(config.hostility.clone());
    match opinion::summarize(entity_id, &comments, &detector, Utc::now()) {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => anyhow::bail!("no comments in input"),
    }
    if malformed > 0 {
        eprintln!("[{malformed} malformed lines skipped]");
    }
    Ok(())
}

fn show_config(config: &AnalysisConfig) -> Result<()> {
    println!("{}", serde_yaml::to_string(config)?);
    Ok(())
}

/// Hostility input line: one classified comment with its author.
#[derive(Debug, serde::Deserialize)]
struct AuthoredComment {
    author_id: String,
    #[serde(flatten)]
    sentiment: CommentSentiment,
}
