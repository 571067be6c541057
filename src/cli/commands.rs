use std::path::Path;

use crate::CheckContext;
use crate::browser::session::BrowserSession;
use crate::cli::config::{AppConfig, build_matcher_config};
use crate::error::AuditError;
use crate::extract::element::Element;
use crate::extract::extractor::{build_elements, page_title};
use crate::matching::matcher::{MatchStats, match_elements};
use crate::matching::similarity::{EmbeddingOracle, SimilarityOracle};
use crate::report::console::format_console_report;
use crate::report::csv::write_csv_report;
use crate::report::sqlite::write_sqlite_report;
use crate::run_check;
use crate::scoring::judge::{OllamaJudge, TranslationJudge};
use crate::trace::logger::TraceLogger;

// ============================================================================
// check subcommand
// ============================================================================

/// Run the full audit and return whether it came back clean.
pub fn cmd_check(
    url: Option<&str>,
    format: &str,
    output_dir: Option<&str>,
    embeddings: &str,
    judge_name: &str,
    config: &AppConfig,
    verbose: u8,
) -> Result<bool, Box<dyn std::error::Error>> {
    let url = url
        .or(config.check.url.as_deref())
        .ok_or("No URL given: pass --url or set check.url in locale-audit.yaml")?;
    let output_dir = Path::new(output_dir.unwrap_or(&config.check.output_dir));

    let oracle = build_oracle(embeddings, config);
    let judge = build_judge(judge_name, config);
    let matcher_config = build_matcher_config(config);

    let tracer = TraceLogger::new(&config.check.trace_file);
    let ctx = CheckContext {
        url,
        source_profile: &config.locales.source,
        target_profile: &config.locales.target,
        matcher_config: &matcher_config,
        oracle: oracle.as_deref(),
        judge: judge.as_deref(),
        output_dir,
        server_script: &config.browser.server_script,
        ssim_threshold: config.check.ssim_threshold,
        verbose,
    };

    if verbose > 0 {
        eprintln!(
            "Auditing {} ({} vs {})...",
            url, config.locales.source.name, config.locales.target.name
        );
    }

    let report = run_check(&ctx, &tracer);

    // Persist the tabular artifacts
    let csv_path = output_dir.join("translation_report.csv");
    write_csv_report(&report, &csv_path)?;
    let db_path = output_dir.join("translation_report.db");
    write_sqlite_report(&report, &db_path)?;

    if format != "none" {
        print!("{}", format_console_report(&report));
    }
    println!("Report written to {}", csv_path.display());

    Ok(report.is_clean())
}

// ============================================================================
// match subcommand
// ============================================================================

/// Match two offline element dumps and print the pairing.
pub fn cmd_match(
    source_path: &str,
    target_path: &str,
    embeddings: &str,
    config: &AppConfig,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = load_element_dump(source_path)?;
    let target = load_element_dump(target_path)?;

    if verbose > 0 {
        eprintln!(
            "Matching {} source elements against {} target elements...",
            source.len(),
            target.len()
        );
    }

    let oracle = build_oracle(embeddings, config);
    let matcher_config = build_matcher_config(config);
    let pairs = match_elements(source, target, oracle.as_deref(), &matcher_config);
    let stats = MatchStats::from_pairs(&pairs);

    for pair in &pairs {
        match (&pair.source, &pair.target) {
            (Some(s), Some(t)) => println!("MATCH        #{} \"{}\" -> #{} \"{}\"", s.serial, s.text, t.serial, t.text),
            (Some(s), None) => println!("SOURCE ONLY  #{} \"{}\"", s.serial, s.text),
            (None, Some(t)) => println!("TARGET ONLY  #{} \"{}\"", t.serial, t.text),
            (None, None) => {}
        }
    }

    println!(
        "\n{} matched, {} unmatched source, {} unmatched target",
        stats.matched, stats.unmatched_source, stats.unmatched_target
    );
    Ok(())
}

/// Load a JSON element dump (an array of elements).
pub fn load_element_dump(path: &str) -> Result<Vec<Element>, AuditError> {
    let content = std::fs::read_to_string(path).map_err(|e| AuditError::Io {
        context: format!("read {}", path),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| AuditError::JsonParse {
        context: format!("element dump {}", path),
        source: e,
    })
}

// ============================================================================
// extract subcommand
// ============================================================================

/// Render one locale and dump its extracted elements as JSON.
pub fn cmd_extract(
    url: &str,
    locale: &str,
    output: &str,
    config: &AppConfig,
    verbose: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let profile = match locale {
        "target" => &config.locales.target,
        _ => &config.locales.source,
    };

    if verbose > 0 {
        eprintln!("Extracting {} as {}...", url, profile.name);
    }

    let mut session = BrowserSession::launch(profile, &config.browser.server_script)?;
    session.navigate(&profile.localized_url(url))?;
    let raw = session.extract()?;
    session.quit()?;

    if verbose > 0 {
        eprintln!("Page title: {}", page_title(&raw));
    }

    let mut serial_counter: u64 = 1;
    let elements = build_elements(&raw, &mut serial_counter)?;

    let json = serde_json::to_string_pretty(&elements).map_err(|e| AuditError::JsonSerialize {
        context: "element dump".into(),
        source: e,
    })?;
    std::fs::write(output, json).map_err(|e| AuditError::Io {
        context: format!("write {}", output),
        source: e,
    })?;

    println!("Wrote {} elements to {}", elements.len(), output);
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the similarity oracle named on the command line, if any.
fn build_oracle(name: &str, config: &AppConfig) -> Option<Box<dyn SimilarityOracle>> {
    match name {
        "ollama" => Some(Box::new(EmbeddingOracle::new(
            &config.ollama.embed_endpoint,
            &config.ollama.embed_model,
        ))),
        _ => None,
    }
}

/// Build the translation judge named on the command line, if any.
fn build_judge(name: &str, config: &AppConfig) -> Option<Box<dyn TranslationJudge>> {
    match name {
        "ollama" => Some(Box::new(OllamaJudge::new(
            &config.ollama.generate_endpoint,
            &config.ollama.judge_model,
            &config.locales.source.name,
            &config.locales.target.name,
        ))),
        _ => None,
    }
}
