//! Preset work/break pairs selectable with `--template`.

use std::time::Duration;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Serialize;

use crate::error::TemplateError;
use crate::timer::format_minutes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Lookup key, e.g. `deep-work`.
    pub key: &'static str,
    /// Label shown on the frame for WORK intervals.
    pub name: &'static str,
    pub work: Duration,
    pub rest: Duration,
}

const fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

/// Built-in templates, sorted by key.
pub const TEMPLATES: &[Template] = &[
    Template {
        key: "deep-work",
        name: "Deep Work",
        work: minutes(50),
        rest: minutes(10),
    },
    Template {
        key: "focus",
        name: "Focus",
        work: minutes(25),
        rest: minutes(5),
    },
    Template {
        key: "sprint",
        name: "Sprint",
        work: minutes(15),
        rest: minutes(3),
    },
    Template {
        key: "study",
        name: "Study",
        work: minutes(45),
        rest: minutes(15),
    },
];

/// Case-insensitive lookup.
///
/// # Errors
/// [`TemplateError::Unknown`] carrying the closest key, if any.
pub fn find(name: &str) -> Result<&'static Template, TemplateError> {
    let wanted = name.trim().to_lowercase();
    TEMPLATES
        .iter()
        .find(|t| t.key == wanted)
        .ok_or_else(|| TemplateError::Unknown {
            name: name.to_string(),
            suggestion: suggest(&wanted).map(str::to_string),
        })
}

/// Closest template key for a misspelled name, by skim-style fuzzy score.
pub fn suggest(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let matcher = SkimMatcherV2::default();
    TEMPLATES
        .iter()
        .filter_map(|t| matcher.fuzzy_match(t.key, &input).map(|score| (score, t.key)))
        .max_by_key(|(score, _)| *score)
        .map(|(_, key)| key)
}

/// Aligned table of every template, one per line.
pub fn table() -> String {
    let mut out = String::from("Available templates:\n");
    for t in TEMPLATES {
        out.push_str(&format!(
            "  {:<10} {:<10} work {:>4}  break {:>4}\n",
            t.key,
            t.name,
            format_minutes(t.work),
            format_minutes(t.rest),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let t = find("Deep-Work").unwrap();
        assert_eq!(t.name, "Deep Work");
        assert_eq!(t.work, Duration::from_secs(50 * 60));
        assert_eq!(t.rest, Duration::from_secs(10 * 60));
        assert_eq!(find("SPRINT").unwrap().rest, Duration::from_secs(180));
    }

    #[test]
    fn unknown_template_suggests_closest_key() {
        let err = find("dw").unwrap_err();
        assert_eq!(
            err,
            TemplateError::Unknown {
                name: "dw".into(),
                suggestion: Some("deep-work".into()),
            }
        );
    }

    #[test]
    fn suggestion_prefers_tight_matches() {
        assert_eq!(suggest("stdy"), Some("study"));
        assert_eq!(suggest("spr"), Some("sprint"));
        assert_eq!(suggest("foc"), Some("focus"));
    }

    #[test]
    fn suggestion_ignores_case_and_dashes() {
        assert_eq!(suggest("DeepWork"), Some("deep-work"));
        assert_eq!(suggest("sprnt"), Some("sprint"));
    }

    #[test]
    fn no_suggestion_for_unrelated_input() {
        assert_eq!(suggest("zzzzzz"), None);
        assert_eq!(suggest(""), None);
    }

    #[test]
    fn table_lists_every_template() {
        let table = table();
        for t in TEMPLATES {
            assert!(table.contains(t.key));
            assert!(table.contains(t.name));
        }
        assert!(table.contains("50m"));
    }
}
