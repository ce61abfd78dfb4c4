//! Structural roles assigned to chart records at ingestion

/// Title of the body that becomes the single chart root when present.
pub const DEFAULT_ROOT_TITLE: &str = "GENEL KURUL";

/// Title of the body that is rendered as a leaf regardless of linkage.
pub const DEFAULT_TERMINAL_TITLE: &str = "DENETİM KURULU";

/// How the assembler treats a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Preferred as the only output root
    Root,
    /// Children linked to it are dropped
    Terminal,
    Member,
}

/// Title-to-role mapping.
///
/// Matching is exact and case-sensitive; titles are not trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRules {
    pub root_title: String,
    pub terminal_title: String,
}

impl Default for RoleRules {
    fn default() -> Self {
        Self {
            root_title: DEFAULT_ROOT_TITLE.to_string(),
            terminal_title: DEFAULT_TERMINAL_TITLE.to_string(),
        }
    }
}

impl RoleRules {
    pub fn new(root_title: impl Into<String>, terminal_title: impl Into<String>) -> Self {
        Self {
            root_title: root_title.into(),
            terminal_title: terminal_title.into(),
        }
    }

    pub fn classify(&self, title: &str) -> NodeRole {
        if title == self.root_title {
            NodeRole::Root
        } else if title == self.terminal_title {
            NodeRole::Terminal
        } else {
            NodeRole::Member
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("GENEL KURUL", NodeRole::Root)]
    #[case("DENETİM KURULU", NodeRole::Terminal)]
    #[case("YÖNETİM KURULU", NodeRole::Member)]
    #[case("genel kurul", NodeRole::Member)]
    #[case("GENEL KURUL ", NodeRole::Member)]
    #[case("DENETIM KURULU", NodeRole::Member)]
    fn given_default_rules_when_classifying_then_matches_exact_title(
        #[case] title: &str,
        #[case] expected: NodeRole,
    ) {
        assert_eq!(RoleRules::default().classify(title), expected);
    }

    #[test]
    fn given_custom_rules_when_classifying_then_uses_configured_titles() {
        let rules = RoleRules::new("Board", "Audit");
        assert_eq!(rules.classify("Board"), NodeRole::Root);
        assert_eq!(rules.classify("Audit"), NodeRole::Terminal);
        assert_eq!(rules.classify(DEFAULT_ROOT_TITLE), NodeRole::Member);
    }
}
