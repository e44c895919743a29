//! Folder appearance catalog: which icon and accent color a collection is shown with.

use serde::{Deserialize, Serialize};

use crate::fs::nfc;

/// Visual attributes a UI applies to a folder card or navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    /// Icon identifier understood by the front-end icon set.
    pub icon: String,
    /// Any CSS color expression.
    pub color: String,
}

impl Appearance {
    pub fn new(icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self { icon: icon.into(), color: color.into() }
    }
}

/// Applies to every folder whose name contains `contains`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRule {
    pub contains: String,
    #[serde(flatten)]
    pub appearance: Appearance,
}

impl DisplayRule {
    pub fn new(contains: impl Into<String>, appearance: Appearance) -> Self {
        Self { contains: contains.into(), appearance }
    }
}

/// Ordered rule list; the first matching rule wins, otherwise `fallback` applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub rules: Vec<DisplayRule>,
    pub fallback: Appearance,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                DisplayRule::new("논문", Appearance::new("graduation-cap", "var(--accent-primary)")),
                DisplayRule::new("뉴스레터", Appearance::new("newspaper", "#10b981")),
                DisplayRule::new("프로덕트", Appearance::new("zap", "#f59e0b")),
            ],
            fallback: Appearance::new("folder", "var(--text-muted)"),
        }
    }
}

impl DisplayConfig {
    pub fn appearance_for(&self, folder: &str) -> &Appearance {
        let name = nfc(folder);
        self.rules
            .iter()
            .find(|rule| name.contains(&nfc(&rule.contains)))
            .map(|rule| &rule.appearance)
            .unwrap_or(&self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_match_by_substring() {
        let display = DisplayConfig::default();
        assert_eq!(display.appearance_for("AI 논문 리뷰").icon, "graduation-cap");
        assert_eq!(display.appearance_for("주간 뉴스레터").color, "#10b981");
        assert_eq!(display.appearance_for("프로덕트 소식").icon, "zap");
        assert_eq!(display.appearance_for("Misc"), &display.fallback);
    }

    #[test]
    fn decomposed_folder_names_still_match() {
        use unicode_normalization::UnicodeNormalization;

        let display = DisplayConfig::default();
        let decomposed: String = "뉴스레터".nfd().collect();
        assert_eq!(display.appearance_for(&decomposed).icon, "newspaper");
    }

    #[test]
    fn first_matching_rule_wins() {
        let display = DisplayConfig {
            rules: vec![
                DisplayRule::new("News", Appearance::new("newspaper", "green")),
                DisplayRule::new("Newsletter", Appearance::new("mail", "blue")),
            ],
            fallback: Appearance::new("folder", "gray"),
        };
        assert_eq!(display.appearance_for("Newsletter").icon, "newspaper");
    }
}
