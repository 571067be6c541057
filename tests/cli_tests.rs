mod common;

use std::io::Write;

use common::element;
use locale_audit::browser::locale::{LocaleProfile, verify_locale};
use locale_audit::cli::commands::load_element_dump;
use locale_audit::cli::config::{build_matcher_config, load_config};
use locale_audit::matching::matcher::MatcherConfig;

// ============================================================================
// 1. Config loading — defaults and overrides
// ============================================================================

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let config = load_config(Some("/nonexistent/locale-audit.yaml"));

    assert_eq!(config.check.output_dir, "data/output");
    assert_eq!(config.check.ssim_threshold, 0.85);
    assert_eq!(config.matcher.position_tolerance, 100.0);
    assert_eq!(config.matcher.similarity_threshold, 0.5);
    assert_eq!(config.locales.source.name, "english");
    assert_eq!(config.locales.target.name, "spanish");
    assert_eq!(config.browser.server_script, "scripts/browser_server.js");
}

#[test]
fn malformed_config_file_falls_back_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "not: [valid").unwrap();

    let config = load_config(file.path().to_str());
    assert_eq!(config.check.output_dir, "data/output");
}

#[test]
fn partial_config_file_keeps_defaults_for_missing_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
check:
  url: https://example.com
  output_dir: out
matcher:
  position_tolerance: 250.0
locales:
  target:
    name: french
    locale: fr_FR
    lang: fr
    accept_language: "fr-FR,fr;q=0.9"
"#
    )
    .unwrap();

    let config = load_config(file.path().to_str());

    assert_eq!(config.check.url.as_deref(), Some("https://example.com"));
    assert_eq!(config.check.output_dir, "out");
    assert_eq!(config.check.ssim_threshold, 0.85, "Unset fields keep their defaults");
    assert_eq!(config.matcher.position_tolerance, 250.0);
    assert_eq!(config.matcher.similarity_threshold, 0.5);
    assert_eq!(config.locales.target.name, "french");
    assert!(config.locales.target.markers.is_empty(), "Markers default to empty");
    assert_eq!(config.locales.source.name, "english", "Source profile stays default");
}

#[test]
fn matcher_config_built_from_section() {
    let config = load_config(Some("/nonexistent/locale-audit.yaml"));
    let matcher = build_matcher_config(&config);
    assert_eq!(matcher, MatcherConfig::default());
}

// ============================================================================
// 2. Element dumps (offline match input)
// ============================================================================

#[test]
fn element_dump_roundtrips_through_disk() {
    let elements = vec![
        element("Log In", 0.0, 0.0, 50.0, 20.0, 1),
        element("Help", 0.0, 40.0, 30.0, 20.0, 2),
    ];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("english.json");
    std::fs::write(&path, serde_json::to_string_pretty(&elements).unwrap()).unwrap();

    let loaded = load_element_dump(path.to_str().unwrap()).unwrap();
    assert_eq!(loaded, elements);
}

#[test]
fn element_dump_missing_file_is_an_error() {
    assert!(load_element_dump("/nonexistent/dump.json").is_err());
}

// ============================================================================
// 3. Locale profiles
// ============================================================================

#[test]
fn localized_url_appends_locale_parameter() {
    let profile = LocaleProfile {
        name: "english".into(),
        locale: "en_US".into(),
        lang: "en-US".into(),
        accept_language: "en-US,en;q=0.9".into(),
        markers: vec![],
    };

    assert_eq!(
        profile.localized_url("https://example.com"),
        "https://example.com?locale=en_US"
    );
    assert_eq!(
        profile.localized_url("https://example.com?tab=home"),
        "https://example.com?tab=home&locale=en_US",
        "Existing query strings get an ampersand"
    );
}

// ============================================================================
// 4. Locale verification
// ============================================================================

#[test]
fn verify_locale_finds_marker_case_insensitively() {
    let profile = LocaleProfile {
        name: "spanish".into(),
        locale: "es_ES".into(),
        lang: "es".into(),
        accept_language: "es-ES,es;q=0.9".into(),
        markers: vec!["iniciar sesión".into()],
    };

    let elements = vec![element("Iniciar Sesión", 0.0, 0.0, 50.0, 20.0, 1)];
    assert!(verify_locale(&elements, &profile));

    let wrong_language = vec![element("Log In", 0.0, 0.0, 50.0, 20.0, 1)];
    assert!(!verify_locale(&wrong_language, &profile));
}

#[test]
fn verify_locale_matches_marker_inside_longer_text() {
    let profile = LocaleProfile {
        name: "spanish".into(),
        locale: "es_ES".into(),
        lang: "es".into(),
        accept_language: "es-ES,es;q=0.9".into(),
        markers: vec!["crear una cuenta".into()],
    };

    let elements = vec![element("Crear una cuenta nueva", 0.0, 0.0, 80.0, 20.0, 1)];
    assert!(verify_locale(&elements, &profile), "Containment, not equality");
}

#[test]
fn verify_locale_without_markers_always_passes() {
    let profile = LocaleProfile {
        name: "english".into(),
        locale: "en_US".into(),
        lang: "en-US".into(),
        accept_language: "en-US,en;q=0.9".into(),
        markers: vec![],
    };

    assert!(verify_locale(&[], &profile));
}

#[test]
fn verify_locale_empty_page_fails_with_markers() {
    let profile = LocaleProfile {
        name: "english".into(),
        locale: "en_US".into(),
        lang: "en-US".into(),
        accept_language: "en-US,en;q=0.9".into(),
        markers: vec!["log in".into()],
    };

    assert!(!verify_locale(&[], &profile));
}
