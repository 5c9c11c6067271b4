use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use pdfqa::chat::{ChatService, NOT_FOUND_MESSAGE};
use pdfqa::config::{AppConfig, FallbackStrategy};
use pdfqa::models::{ChatRequest, ExcerptSource, IntentCategory};

#[derive(Parser, Debug)]
#[command(name = "eval")]
#[command(about = "Run a question/answer evaluation set against the document")]
struct Cli {
    #[arg(long, default_value = "eval/prompts.jsonl")]
    file: String,
    #[arg(long)]
    document: Option<PathBuf>,
    #[arg(long)]
    fallback: Option<FallbackStrategy>,
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

#[derive(Debug, Deserialize)]
struct EvalPrompt {
    id: String,
    question: String,
    #[serde(default)]
    expect_category: Option<IntentCategory>,
    #[serde(default)]
    expect_source: Option<ExcerptSource>,
    #[serde(default)]
    expect_contains: Vec<String>,
    #[serde(default)]
    expect_not_found: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(document) = cli.document {
        config.document_path = document;
    }
    if let Some(fallback) = cli.fallback {
        config.fallback = fallback;
    }
    let chat = ChatService::from_config(&config)?;

    let prompts = load_prompts(&cli.file)?;
    if prompts.is_empty() {
        anyhow::bail!("no prompts found in {}", cli.file);
    }

    let mut total = 0usize;
    let mut category_checked = 0usize;
    let mut category_hits = 0usize;
    let mut pass_contains = 0usize;
    let mut matched_count = 0usize;
    let mut not_found_count = 0usize;

    for prompt in prompts {
        total += 1;
        let request = ChatRequest {
            question: prompt.question.clone(),
        };

        let answer = chat
            .answer(request)
            .await
            .with_context(|| format!("failed eval prompt {}", prompt.id))?;

        let is_not_found = answer.response == NOT_FOUND_MESSAGE;
        if is_not_found {
            not_found_count += 1;
        }
        if answer.source == ExcerptSource::Matched {
            matched_count += 1;
        }

        if let Some(expected) = prompt.expect_category {
            category_checked += 1;
            if expected == answer.category {
                category_hits += 1;
            }
        }

        let answer_lower = answer.response.to_ascii_lowercase();
        let mut contains_pass = prompt
            .expect_contains
            .iter()
            .all(|needle| answer_lower.contains(&needle.to_ascii_lowercase()));

        if prompt.expect_not_found.unwrap_or(false) != is_not_found {
            contains_pass = false;
        }
        if let Some(expected) = prompt.expect_source {
            if expected != answer.source {
                contains_pass = false;
            }
        }

        if contains_pass {
            pass_contains += 1;
        }

        if cli.verbose || !contains_pass {
            println!("--- {} {} ---", prompt.id, if contains_pass { "ok" } else { "FAIL" });
            println!("Q: {}", prompt.question);
            println!("Category: {} ({})", answer.category, answer.source.as_str());
            println!("A: {}", answer.response.replace('\n', " "));
            println!();
        }
    }

    println!("Eval prompts: {}", total);
    println!("Contains/expected accuracy: {:.1}%", ratio(pass_contains, total) * 100.0);
    if category_checked > 0 {
        println!(
            "Category accuracy: {:.1}% ({}/{})",
            ratio(category_hits, category_checked) * 100.0,
            category_hits,
            category_checked
        );
    }
    println!("Pattern-match rate: {:.1}%", ratio(matched_count, total) * 100.0);
    println!("Not-found rate: {:.1}%", ratio(not_found_count, total) * 100.0);

    Ok(())
}

fn load_prompts(path: &str) -> Result<Vec<EvalPrompt>> {
    let file = File::open(path).with_context(|| format!("failed opening {}", path))?;
    let reader = BufReader::new(file);
    let mut prompts = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parsed: EvalPrompt = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid JSON at {} line {}", path, idx + 1))?;
        prompts.push(parsed);
    }

    Ok(prompts)
}

fn ratio(n: usize, d: usize) -> f32 {
    if d == 0 {
        return 0.0;
    }
    n as f32 / d as f32
}
