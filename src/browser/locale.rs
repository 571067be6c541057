use serde::{Deserialize, Serialize};

use crate::extract::element::Element;

/// A language/region configuration under which the page is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleProfile {
    /// Short name used in paths and report columns, e.g. "english".
    pub name: String,

    /// Value for the `?locale=` URL parameter, e.g. "en_US".
    pub locale: String,

    /// BCP-47 tag passed to the browser, e.g. "en-US".
    pub lang: String,

    /// Accept-Language header value, e.g. "en-US,en;q=0.9".
    pub accept_language: String,

    /// Texts expected somewhere on a correctly-localized page. Empty list
    /// disables verification for this profile.
    #[serde(default)]
    pub markers: Vec<String>,
}

impl LocaleProfile {
    /// The page URL with this profile's locale parameter appended.
    pub fn localized_url(&self, base_url: &str) -> String {
        let separator = if base_url.contains('?') { '&' } else { '?' };
        format!("{}{}locale={}", base_url, separator, self.locale)
    }
}

/// Built-in source profile (English), matching the defaults the check
/// command ships with.
pub fn default_source_profile() -> LocaleProfile {
    LocaleProfile {
        name: "english".to_string(),
        locale: "en_US".to_string(),
        lang: "en-US".to_string(),
        accept_language: "en-US,en;q=0.9".to_string(),
        markers: vec![
            "log in".to_string(),
            "create new account".to_string(),
            "forgot password?".to_string(),
        ],
    }
}

/// Built-in target profile (Spanish).
pub fn default_target_profile() -> LocaleProfile {
    LocaleProfile {
        name: "spanish".to_string(),
        locale: "es_ES".to_string(),
        lang: "es".to_string(),
        accept_language: "es-ES,es;q=0.9".to_string(),
        markers: vec![
            "iniciar sesión".to_string(),
            "crear una cuenta".to_string(),
            "¿has olvidado la contraseña?".to_string(),
        ],
    }
}

/// Single-probe locale verification: does any marker text appear among the
/// extracted element texts (case-insensitive containment)?
///
/// No switching, no retries: a failed probe becomes a report-level UI issue,
/// not an error. Profiles without markers always verify.
pub fn verify_locale(elements: &[Element], profile: &LocaleProfile) -> bool {
    if profile.markers.is_empty() {
        return true;
    }

    let haystack: Vec<String> = elements.iter().map(|e| e.text.to_lowercase()).collect();
    profile.markers.iter().any(|marker| {
        let needle = marker.to_lowercase();
        haystack.iter().any(|text| text.contains(&needle))
    })
}
