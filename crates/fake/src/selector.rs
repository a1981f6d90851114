//! Equality-based label selectors, as understood by the API server.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Requirement {
    Equals(String, String),
    NotEquals(String, String),
    Exists(String),
    Absent(String),
}

/// A parsed selector; the empty selector matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelector {
    requirements: Vec<Requirement>,
}

impl LabelSelector {
    /// Parse `k=v`, `k==v`, `k!=v`, `k` and `!k` terms separated by commas.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut requirements = Vec::new();
        for term in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let req = if let Some((k, v)) = term.split_once("!=") {
                Requirement::NotEquals(key(k, raw)?, v.trim().to_string())
            } else if let Some((k, v)) = term.split_once("==").or_else(|| term.split_once('=')) {
                Requirement::Equals(key(k, raw)?, v.trim().to_string())
            } else if let Some(k) = term.strip_prefix('!') {
                Requirement::Absent(key(k, raw)?)
            } else {
                Requirement::Exists(key(term, raw)?)
            };
            requirements.push(req);
        }
        Ok(Self { requirements })
    }

    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|req| match req {
            Requirement::Equals(k, v) => labels.get(k) == Some(v),
            Requirement::NotEquals(k, v) => labels.get(k) != Some(v),
            Requirement::Exists(k) => labels.contains_key(k),
            Requirement::Absent(k) => !labels.contains_key(k),
        })
    }
}

fn key(raw_key: &str, selector: &str) -> Result<String, String> {
    let k = raw_key.trim();
    if k.is_empty() || k.contains(char::is_whitespace) {
        return Err(format!("unable to parse requirement: invalid label key in {selector:?}"));
    }
    Ok(k.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_matches_all() {
        let sel = LabelSelector::parse("").unwrap();
        assert!(sel.matches(&labels(&[])));
        assert!(sel.matches(&labels(&[("a", "b")])));
    }

    #[test]
    fn every_term_must_hold() {
        let sel = LabelSelector::parse("app=nginx,tier==web").unwrap();
        assert!(sel.matches(&labels(&[("app", "nginx"), ("tier", "web"), ("x", "y")])));
        assert!(!sel.matches(&labels(&[("app", "nginx")])));
    }

    #[test]
    fn negation_and_existence() {
        let sel = LabelSelector::parse("env!=prod,team,!legacy").unwrap();
        assert!(sel.matches(&labels(&[("team", "a")])));
        assert!(!sel.matches(&labels(&[("team", "a"), ("env", "prod")])));
        assert!(!sel.matches(&labels(&[("team", "a"), ("legacy", "1")])));
        assert!(!sel.matches(&labels(&[("env", "dev")])));
    }

    #[test]
    fn blank_key_is_rejected() {
        assert!(LabelSelector::parse("=v").is_err());
    }
}
