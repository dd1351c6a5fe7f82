//! robots.txt parsing and allow/deny evaluation.
//!
//! Parsing is permissive by default: blank lines, comments, and malformed
//! lines are skipped without error, and an empty or unparseable document
//! yields a policy that allows everything.

/// Per-host robots.txt rules: ordered `(agent, disallow-path-prefix)` pairs.
///
/// Cached by the fetcher for the process lifetime, one policy per host.
#[derive(Debug, Default)]
pub struct RobotsPolicy {
    rules: Vec<(String, String)>,
}

impl RobotsPolicy {
    /// Parse a robots.txt document line by line.
    ///
    /// A `User-agent:` line sets the current agent context; a `Disallow:`
    /// line under a non-null agent context appends a rule tied to that
    /// agent. Directive names match case-insensitively. Everything else is
    /// ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut rules = Vec::new();
        let mut agent: Option<String> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let lower = line.to_lowercase();
            if lower.starts_with("user-agent:") {
                if let Some((_, value)) = line.split_once(':') {
                    agent = Some(value.trim().to_string());
                }
            } else if lower.starts_with("disallow:") {
                if let (Some(ua), Some((_, value))) = (&agent, line.split_once(':')) {
                    rules.push((ua.clone(), value.trim().to_string()));
                }
            }
        }

        Self { rules }
    }

    /// Returns `false` iff some rule's agent is `*` or equals `agent`, its
    /// path is non-empty, and `url_path` starts with that rule's path.
    ///
    /// An empty `Disallow:` value never denies — it is the robots.txt idiom
    /// for "allow everything".
    #[must_use]
    pub fn allowed(&self, url_path: &str, agent: &str) -> bool {
        let path = if url_path.is_empty() { "/" } else { url_path };
        for (ua, disallow) in &self.rules {
            if (ua == "*" || ua == agent) && !disallow.is_empty() && path.starts_with(disallow) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_allows_everything() {
        let policy = RobotsPolicy::parse("");
        assert!(policy.allowed("/anything", "*"));
        assert!(policy.allowed("/", "shelfwatch"));
    }

    #[test]
    fn garbage_document_allows_everything() {
        let policy = RobotsPolicy::parse("<<<%% not robots at all\n\x01\x02");
        assert!(policy.allowed("/products/widget", "*"));
    }

    #[test]
    fn wildcard_disallow_denies_matching_prefix() {
        let policy = RobotsPolicy::parse("User-agent: *\nDisallow: /private");
        assert!(!policy.allowed("/private", "*"));
        assert!(!policy.allowed("/private/page", "*"));
        assert!(policy.allowed("/public", "*"));
    }

    #[test]
    fn agent_specific_rule_only_binds_that_agent() {
        let policy = RobotsPolicy::parse("User-agent: badbot\nDisallow: /");
        assert!(!policy.allowed("/anything", "badbot"));
        assert!(policy.allowed("/anything", "goodbot"));
    }

    #[test]
    fn wildcard_rule_binds_every_agent() {
        let policy = RobotsPolicy::parse("User-agent: *\nDisallow: /cart");
        assert!(!policy.allowed("/cart/checkout", "anybot"));
    }

    #[test]
    fn empty_disallow_value_never_denies() {
        let policy = RobotsPolicy::parse("User-agent: *\nDisallow:");
        assert!(policy.allowed("/anything", "*"));
    }

    #[test]
    fn disallow_before_any_user_agent_is_skipped() {
        let policy = RobotsPolicy::parse("Disallow: /private\nUser-agent: *\nDisallow: /cart");
        assert!(policy.allowed("/private", "*"));
        assert!(!policy.allowed("/cart", "*"));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let text = "# robots for shop.example.com\n\nUser-agent: *\n# keep bots out of checkout\nDisallow: /checkout\n";
        let policy = RobotsPolicy::parse(text);
        assert!(!policy.allowed("/checkout", "*"));
        assert!(policy.allowed("/products", "*"));
    }

    #[test]
    fn directive_names_match_case_insensitively() {
        let policy = RobotsPolicy::parse("USER-AGENT: *\nDISALLOW: /admin");
        assert!(!policy.allowed("/admin", "*"));
    }

    #[test]
    fn later_agent_context_applies_to_following_disallows() {
        let text = "User-agent: alpha\nDisallow: /a\nUser-agent: beta\nDisallow: /b\n";
        let policy = RobotsPolicy::parse(text);
        assert!(!policy.allowed("/a", "alpha"));
        assert!(policy.allowed("/b", "alpha"));
        assert!(!policy.allowed("/b", "beta"));
        assert!(policy.allowed("/a", "beta"));
    }

    #[test]
    fn empty_path_is_treated_as_root() {
        let policy = RobotsPolicy::parse("User-agent: *\nDisallow: /");
        assert!(!policy.allowed("", "*"));
    }
}
