use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::browser::locale::{LocaleProfile, default_source_profile, default_target_profile};
use crate::browser::session::DEFAULT_SERVER_SCRIPT;
use crate::matching::matcher::MatcherConfig;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "locale-audit",
    version,
    about = "Cross-locale UI translation QA: extract, match, score, report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: locale-audit.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full check: render both locales, match, score, report
    Check {
        /// Page URL to audit (falls back to the config file)
        #[arg(long)]
        url: Option<String>,

        /// Output format for the terminal: console or none
        #[arg(long, default_value = "console")]
        format: String,

        /// Directory for reports, screenshots, and issue crops
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Similarity oracle: ollama or none
        #[arg(long, default_value = "ollama")]
        embeddings: String,

        /// Translation judge: ollama or none
        #[arg(long, default_value = "ollama")]
        judge: String,
    },

    /// Match two offline element dumps (JSON arrays of elements)
    Match {
        /// Source-locale element dump
        #[arg(long)]
        source: String,

        /// Target-locale element dump
        #[arg(long)]
        target: String,

        /// Similarity oracle: ollama or none
        #[arg(long, default_value = "none")]
        embeddings: String,
    },

    /// Render one locale and dump its extracted elements as JSON
    Extract {
        /// Page URL to render
        #[arg(long)]
        url: String,

        /// Which configured profile to use: source or target
        #[arg(long, default_value = "source")]
        locale: String,

        /// Output JSON path
        #[arg(short, long)]
        output: String,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `locale-audit.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub check: CheckConfig,
    #[serde(default)]
    pub matcher: MatcherSection,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub locales: LocalesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    pub url: Option<String>,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Overall page-drift alarm: SSIM below this becomes a UI issue.
    #[serde(default = "default_ssim_threshold")]
    pub ssim_threshold: f64,

    #[serde(default = "default_trace_file")]
    pub trace_file: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            url: None,
            output_dir: default_output_dir(),
            ssim_threshold: default_ssim_threshold(),
            trace_file: default_trace_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherSection {
    #[serde(default = "default_position_tolerance")]
    pub position_tolerance: f64,

    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    #[serde(default = "default_weight")]
    pub distance_weight: f64,

    #[serde(default = "default_weight")]
    pub similarity_weight: f64,
}

impl Default for MatcherSection {
    fn default() -> Self {
        Self {
            position_tolerance: default_position_tolerance(),
            similarity_threshold: default_similarity_threshold(),
            distance_weight: default_weight(),
            similarity_weight: default_weight(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_generate_endpoint")]
    pub generate_endpoint: String,

    #[serde(default = "default_embed_endpoint")]
    pub embed_endpoint: String,

    #[serde(default = "default_judge_model")]
    pub judge_model: String,

    #[serde(default = "default_embed_model")]
    pub embed_model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            generate_endpoint: default_generate_endpoint(),
            embed_endpoint: default_embed_endpoint(),
            judge_model: default_judge_model(),
            embed_model: default_embed_model(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_server_script")]
    pub server_script: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            server_script: default_server_script(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalesConfig {
    #[serde(default = "default_source_profile")]
    pub source: LocaleProfile,

    #[serde(default = "default_target_profile")]
    pub target: LocaleProfile,
}

impl Default for LocalesConfig {
    fn default() -> Self {
        Self {
            source: default_source_profile(),
            target: default_target_profile(),
        }
    }
}

// Serde default helpers
fn default_output_dir() -> String { "data/output".to_string() }
fn default_ssim_threshold() -> f64 { 0.85 }
fn default_trace_file() -> String { "audit_trace.jsonl".to_string() }
fn default_position_tolerance() -> f64 { 100.0 }
fn default_similarity_threshold() -> f64 { 0.5 }
fn default_weight() -> f64 { 1.0 }
fn default_generate_endpoint() -> String { "http://localhost:11434/api/generate".to_string() }
fn default_embed_endpoint() -> String { "http://localhost:11434/api/embed".to_string() }
fn default_judge_model() -> String { "qwen2.5:1.5b".to_string() }
fn default_embed_model() -> String { "nomic-embed-text".to_string() }
fn default_server_script() -> String { DEFAULT_SERVER_SCRIPT.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing or
/// malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("locale-audit.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

/// Matcher tunables from the config file section.
pub fn build_matcher_config(config: &AppConfig) -> MatcherConfig {
    MatcherConfig {
        position_tolerance: config.matcher.position_tolerance,
        similarity_threshold: config.matcher.similarity_threshold,
        distance_weight: config.matcher.distance_weight,
        similarity_weight: config.matcher.similarity_weight,
    }
}
