use std::path::Path;

use anyhow::{Context, Result};
use tokio::process::Command;

/// Text of a PDF. Prefers poppler's `pdftotext`, which keeps line breaks
/// closer to the page layout, and falls back to `pdf-extract`.
pub async fn extract_pdf_text(pdf_path: &Path, bytes: Vec<u8>) -> Result<String> {
    if has_command("pdftotext").await {
        match run_pdftotext(pdf_path).await {
            Ok(text) if !text.trim().is_empty() => return Ok(text),
            Ok(_) => tracing::debug!("pdftotext produced no text; trying pdf-extract"),
            Err(err) => tracing::warn!("pdftotext failed, trying pdf-extract: {:#}", err),
        }
    }

    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .context("PDF extraction task panicked")?
        .context("failed to extract text from PDF")
}

async fn run_pdftotext(pdf_path: &Path) -> Result<String> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg("-nopgbrk")
        .arg(pdf_path)
        .arg("-")
        .output()
        .await
        .context("failed to run pdftotext")?;

    if !output.status.success() {
        anyhow::bail!("pdftotext exited with {}", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

async fn has_command(binary: &str) -> bool {
    // Some poppler tools exit non-zero for --version, so look on PATH instead.
    Command::new("which")
        .arg(binary)
        .output()
        .await
        .map(|out| out.status.success() && !out.stdout.is_empty())
        .unwrap_or(false)
}
