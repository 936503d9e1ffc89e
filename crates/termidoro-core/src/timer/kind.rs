use serde::{Deserialize, Serialize};

/// Which half of a cycle an interval belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalKind {
    Work,
    Break,
}

impl IntervalKind {
    /// Header label for this kind. WORK intervals may carry a custom name;
    /// BREAK intervals are always labelled `BREAK`.
    pub fn display_label(self, custom_name: &str) -> String {
        match self {
            IntervalKind::Work if !custom_name.trim().is_empty() => custom_name.trim().to_string(),
            IntervalKind::Work => "WORK".into(),
            IntervalKind::Break => "BREAK".into(),
        }
    }
}

impl std::fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntervalKind::Work => f.write_str("work"),
            IntervalKind::Break => f.write_str("break"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_label_uses_custom_name() {
        assert_eq!(IntervalKind::Work.display_label("Deep Work"), "Deep Work");
        assert_eq!(IntervalKind::Work.display_label("   "), "WORK");
    }

    #[test]
    fn break_label_ignores_custom_name() {
        assert_eq!(IntervalKind::Break.display_label("Deep Work"), "BREAK");
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&IntervalKind::Break).unwrap();
        assert_eq!(json, "\"break\"");
    }
}
