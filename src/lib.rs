use std::path::{Path, PathBuf};

use crate::{
    browser::{
        locale::{LocaleProfile, verify_locale},
        session::BrowserSession,
    },
    extract::{element::Element, extractor::build_elements},
    matching::{
        matcher::{MatchPair, MatchStats, MatcherConfig, match_elements},
        similarity::SimilarityOracle,
    },
    report::report_model::{AuditReport, ReportRow},
    scoring::judge::{TranslationJudge, TranslationScore, score_with_fallback},
    trace::{logger::TraceLogger, trace::TraceEvent},
    vision::{crop::capture_element_crop, ssim::ssim_files},
};

pub mod browser;
pub mod cli;
pub mod error;
pub mod extract;
pub mod matching;
pub mod report;
pub mod scoring;
pub mod trace;
pub mod vision;

/// Everything a check run needs, injected by the caller. Oracles and judges
/// are trait objects so offline runs and tests can swap them out or omit
/// them entirely.
pub struct CheckContext<'a> {
    pub url: &'a str,
    pub source_profile: &'a LocaleProfile,
    pub target_profile: &'a LocaleProfile,
    pub matcher_config: &'a MatcherConfig,
    pub oracle: Option<&'a dyn SimilarityOracle>,
    pub judge: Option<&'a dyn TranslationJudge>,
    pub output_dir: &'a Path,
    pub server_script: &'a str,
    pub ssim_threshold: f64,
    pub verbose: u8,
}

/// What one locale's browser pass produced. A failed pass leaves the
/// elements empty and the screenshot absent; the failure itself lands in
/// the run's UI issues.
struct LocaleCapture {
    elements: Vec<Element>,
    screenshot: Option<PathBuf>,
}

/// Run the full cross-locale audit: render both locales, extract and verify,
/// match, score, capture issue crops, measure page drift, and assemble the
/// report. Report artifacts (CSV, SQLite, console) are the caller's job.
pub fn run_check(ctx: &CheckContext, tracer: &TraceLogger) -> AuditReport {
    let mut issues: Vec<String> = Vec::new();
    let mut serial_counter: u64 = 1;

    let source_capture = capture_locale(ctx, ctx.source_profile, &mut serial_counter, &mut issues, tracer);
    let target_capture = capture_locale(ctx, ctx.target_profile, &mut serial_counter, &mut issues, tracer);

    // ---- Match ----
    let mut pairs = match_elements(
        source_capture.elements,
        target_capture.elements,
        ctx.oracle,
        ctx.matcher_config,
    );
    let stats = MatchStats::from_pairs(&pairs);
    if ctx.verbose > 0 {
        eprintln!(
            "Matched {} pairs, {} unmatched {}, {} unmatched {}",
            stats.matched,
            stats.unmatched_source,
            ctx.source_profile.name,
            stats.unmatched_target,
            ctx.target_profile.name
        );
    }
    tracer.log(&TraceEvent::now("match").with_stats(&stats));

    // ---- Score ----
    let verdicts = score_pairs(&pairs, ctx, tracer);

    // Review crops: a matched pair that fails the quality check gets a crop
    // of its target element, unless truncation already produced one.
    if let Some(screenshot) = &target_capture.screenshot {
        for (pair, verdict) in pairs.iter_mut().zip(&verdicts) {
            if !verdict.needs_review() {
                continue;
            }
            let Some(target_el) = pair.target.as_mut() else {
                continue;
            };
            if pair.source.is_none() || target_el.screenshot_path.is_some() {
                continue;
            }

            let crop_path = issue_crop_path(
                ctx.output_dir,
                target_el.serial,
                &ctx.target_profile.name,
                "translation",
            );
            match capture_element_crop(screenshot, &target_el.rect, &crop_path) {
                Ok(()) => target_el.screenshot_path = Some(crop_path.display().to_string()),
                Err(e) => eprintln!("Warning: issue crop failed for #{}: {}", target_el.serial, e),
            }
        }
    }

    // ---- Overall page drift ----
    let mut overall_ssim = None;
    if let (Some(a), Some(b)) = (&source_capture.screenshot, &target_capture.screenshot) {
        match ssim_files(a, b) {
            Ok(score) => {
                tracer.log(&TraceEvent::now("ssim").with_score(score));
                if score < ctx.ssim_threshold {
                    issues.push(format!(
                        "Significant overall UI differences detected (SSIM: {:.2}).",
                        score
                    ));
                }
                overall_ssim = Some(score);
            }
            Err(e) => issues.push(format!("SSIM computation failed: {}", e)),
        }
    }

    // ---- Assemble ----
    let rows: Vec<ReportRow> = pairs
        .iter()
        .zip(&verdicts)
        .enumerate()
        .map(|(i, (pair, verdict))| ReportRow::from_pair(i + 1, pair, verdict))
        .collect();

    let mut report = AuditReport::new(ctx.url, rows, &stats).with_issues(issues);
    if let Some(score) = overall_ssim {
        report = report.with_ssim(score);
    }
    tracer.log(&TraceEvent::now("report").with_elements(report.rows.len()));
    report
}

/// One locale's browser pass: launch, navigate, screenshot, extract, verify,
/// truncation crops. Any session error degrades to an empty capture plus a
/// UI issue, so the other locale still gets a valid (fully-unmatched) run.
fn capture_locale(
    ctx: &CheckContext,
    profile: &LocaleProfile,
    serial_counter: &mut u64,
    issues: &mut Vec<String>,
    tracer: &TraceLogger,
) -> LocaleCapture {
    match try_capture_locale(ctx, profile, serial_counter, tracer) {
        Ok(mut capture) => {
            if !verify_locale(&capture.elements, profile) {
                issues.push(format!(
                    "Failed to confirm {} locale: no marker text found on the page.",
                    profile.name
                ));
            }
            tracer.log(
                &TraceEvent::now("extract")
                    .with_locale(&profile.name)
                    .with_elements(capture.elements.len()),
            );
            if ctx.verbose > 0 {
                eprintln!("Extracted {} elements for {}", capture.elements.len(), profile.name);
            }

            capture_truncation_crops(ctx, profile, &mut capture);
            capture
        }
        Err(e) => {
            issues.push(format!("Processing error for {}: {}", profile.name, e));
            tracer.log(
                &TraceEvent::now("extract")
                    .with_locale(&profile.name)
                    .with_detail(e.to_string()),
            );
            LocaleCapture {
                elements: Vec::new(),
                screenshot: None,
            }
        }
    }
}

fn try_capture_locale(
    ctx: &CheckContext,
    profile: &LocaleProfile,
    serial_counter: &mut u64,
    tracer: &TraceLogger,
) -> Result<LocaleCapture, crate::error::AuditError> {
    let mut session = BrowserSession::launch(profile, ctx.server_script)?;

    let url = profile.localized_url(ctx.url);
    if ctx.verbose > 0 {
        eprintln!("Navigating to {} for {}", url, profile.name);
    }
    session.navigate(&url)?;
    tracer.log(&TraceEvent::now("navigate").with_locale(&profile.name).with_detail(&url));

    let locale_dir = ctx.output_dir.join(&profile.name);
    std::fs::create_dir_all(&locale_dir).map_err(|e| crate::error::AuditError::Io {
        context: format!("create {}", locale_dir.display()),
        source: e,
    })?;
    let screenshot_path = locale_dir.join("page.png");
    session.screenshot(&screenshot_path.display().to_string())?;

    let raw = session.extract()?;
    let elements = build_elements(&raw, serial_counter)?;
    session.quit()?;

    Ok(LocaleCapture {
        elements,
        screenshot: Some(screenshot_path),
    })
}

/// Crop every truncated element out of its locale's full-page screenshot.
/// Crop failures are warnings, not run failures.
fn capture_truncation_crops(ctx: &CheckContext, profile: &LocaleProfile, capture: &mut LocaleCapture) {
    let Some(screenshot) = &capture.screenshot else {
        return;
    };

    for el in capture.elements.iter_mut().filter(|e| e.is_truncated) {
        let crop_path = issue_crop_path(ctx.output_dir, el.serial, &profile.name, "truncation");
        match capture_element_crop(screenshot, &el.rect, &crop_path) {
            Ok(()) => el.screenshot_path = Some(crop_path.display().to_string()),
            Err(e) => eprintln!("Warning: truncation crop failed for #{}: {}", el.serial, e),
        }
    }
}

/// Score every pair: matched pairs go through the judge (with the
/// back-translation fallback), unmatched pairs are mismatches by
/// definition, and a missing judge leaves matched pairs unscored.
fn score_pairs(pairs: &[MatchPair], ctx: &CheckContext, tracer: &TraceLogger) -> Vec<TranslationScore> {
    pairs
        .iter()
        .map(|pair| match (&pair.source, &pair.target) {
            (Some(source_el), Some(target_el)) => {
                let verdict = match ctx.judge {
                    Some(judge) => score_with_fallback(judge, &source_el.text, &target_el.text),
                    None => TranslationScore::unscored(),
                };
                tracer.log(
                    &TraceEvent::now("score")
                        .with_detail(format!("#{} -> #{}", source_el.serial, target_el.serial))
                        .with_score(verdict.score),
                );
                verdict
            }
            (Some(_), None) => TranslationScore::mismatch("No matching element in target locale."),
            (None, Some(_)) => TranslationScore::mismatch("No matching element in source locale."),
            (None, None) => TranslationScore::mismatch("Empty pair."),
        })
        .collect()
}

fn issue_crop_path(output_dir: &Path, serial: u64, locale: &str, kind: &str) -> PathBuf {
    output_dir
        .join("issue_screenshots")
        .join(format!("issue_{}_{}_{}.png", serial, locale, kind))
}
