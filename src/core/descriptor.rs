//! Content descriptor (`content/content.json`).
//!
//! Wraps the slides with the fixed display, summary and localization settings
//! the presentation player expects.

use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::Slide;

const SHARE_MESSAGE: &str = "I scored @score out of @maxScore on a task at @currentpageurl.";

/// UI strings shown by the presentation player
const L10N: [(&str, &str); 26] = [
    ("slide", "Slide"),
    ("score", "Score"),
    ("yourScore", "Your Score"),
    ("maxScore", "Max Score"),
    ("total", "Total"),
    ("totalScore", "Total Score"),
    ("showSolutions", "Show solutions"),
    ("retry", "Retry"),
    ("exportAnswers", "Export text"),
    ("hideKeywords", "Hide sidebar navigation menu"),
    ("showKeywords", "Show sidebar navigation menu"),
    ("fullscreen", "Fullscreen"),
    ("exitFullscreen", "Exit fullscreen"),
    ("prevSlide", "Previous slide"),
    ("nextSlide", "Next slide"),
    ("currentSlide", "Current slide"),
    ("lastSlide", "Last slide"),
    ("solutionModeTitle", "Exit solution mode"),
    ("solutionModeText", "Solution Mode"),
    ("summaryMultipleTaskText", "Multiple tasks"),
    ("scoreMessage", "You achieved:"),
    ("shareFacebook", "Share on Facebook"),
    ("shareTwitter", "Share on Twitter"),
    ("shareGoogle", "Share on Google+"),
    ("summary", "Summary"),
    ("solutionsButtonTitle", "Show comments"),
];

/// Slides plus display settings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub slides: Vec<Slide>,
    pub keyword_list_enabled: bool,
    pub global_background_selector: Value,
    pub keyword_list_always_show: bool,
    pub keyword_list_auto_hide: bool,
    pub keyword_list_opacity: u8,
}

/// Full `content.json` payload
#[derive(Debug, Clone, Serialize)]
pub struct ContentDescriptor {
    pub presentation: Presentation,
    #[serde(rename = "override")]
    pub overrides: Value,
    pub l10n: Value,
}

impl ContentDescriptor {
    /// Wrap slides with the default presentation settings
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            presentation: Presentation {
                slides,
                keyword_list_enabled: true,
                global_background_selector: json!({}),
                keyword_list_always_show: false,
                keyword_list_auto_hide: false,
                keyword_list_opacity: 90,
            },
            overrides: default_overrides(),
            l10n: default_l10n(),
        }
    }

    /// Number of slides in the presentation
    pub fn slide_count(&self) -> usize {
        self.presentation.slides.len()
    }
}

fn default_overrides() -> Value {
    json!({
        "activeSurface": false,
        "hideSummarySlide": false,
        "summarySlideSolutionButton": true,
        "summarySlideRetryButton": true,
        "enablePrintButton": false,
        "social": {
            "showFacebookShare": false,
            "facebookShare": {
                "url": "@currentpageurl",
                "quote": SHARE_MESSAGE,
            },
            "showTwitterShare": false,
            "twitterShare": {
                "statement": SHARE_MESSAGE,
                "url": "@currentpageurl",
                "hashtags": "h5p, course",
            },
            "showGoogleShare": false,
            "googleShareUrl": "@currentpageurl",
        },
    })
}

fn default_l10n() -> Value {
    Value::Object(
        L10N.iter()
            .map(|(key, text)| (key.to_string(), Value::String(text.to_string())))
            .collect(),
    )
}
