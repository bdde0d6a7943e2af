use serde::{Deserialize, Serialize};

/// A repository as listed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub name: String,
}

/// Repositories known to the platform, in the order it listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryCatalog {
    #[serde(rename = "response")]
    pub repositories: Vec<Repository>,
}

impl RepositoryCatalog {
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self { repositories }
    }

    /// First repository whose name matches exactly (case-sensitive).
    pub fn find(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|repo| repo.name == name)
    }
}

/// Outcome of resolving repository names against a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Comma-joined identifiers of every name that matched, in request order
    pub ids: String,
    /// Requested names with no catalog entry, in request order
    pub unmatched: Vec<String>,
}

/// Map repository names to the identifiers the platform filters on.
///
/// Unknown names are left out of `ids` and reported in `unmatched`; the
/// caller decides whether that is a warning or an error.
pub fn resolve<S: AsRef<str>>(names: &[S], catalog: &RepositoryCatalog) -> Resolution {
    let mut ids = Vec::new();
    let mut unmatched = Vec::new();

    for name in names {
        let name = name.as_ref();
        match catalog.find(name) {
            Some(repo) => ids.push(repo.id.as_str()),
            None => unmatched.push(name.to_string()),
        }
    }

    Resolution {
        ids: ids.join(","),
        unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RepositoryCatalog {
        RepositoryCatalog::new(vec![
            Repository { id: "7".into(), name: "RepoA".into() },
            Repository { id: "9".into(), name: "RepoB".into() },
            Repository { id: "12".into(), name: "RepoA".into() },
        ])
    }

    #[test]
    fn test_unknown_names_are_dropped_and_reported() {
        let catalog = RepositoryCatalog::new(vec![Repository {
            id: "7".into(),
            name: "RepoA".into(),
        }]);

        let resolution = resolve(&["RepoA", "Ghost"], &catalog);
        assert_eq!(resolution.ids, "7");
        assert_eq!(resolution.unmatched, vec!["Ghost"]);
        assert!(!resolution.unmatched.is_empty());
    }

    #[test]
    fn test_first_match_wins_and_order_follows_request() {
        let resolution = resolve(&["RepoB", "RepoA"], &catalog());
        assert_eq!(resolution.ids, "9,7");
        assert!(resolution.unmatched.is_empty());
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let resolution = resolve(&["repoa"], &catalog());
        assert_eq!(resolution.ids, "");
        assert_eq!(resolution.unmatched, vec!["repoa"]);
    }

    #[test]
    fn test_empty_input_yields_empty_string() {
        let names: [&str; 0] = [];
        assert_eq!(resolve(&names, &catalog()), Resolution::default());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let names = vec!["RepoA".to_string(), "Ghost".to_string(), "RepoB".to_string()];
        let catalog = catalog();
        assert_eq!(resolve(&names, &catalog), resolve(&names, &catalog));
    }

    #[test]
    fn test_catalog_parses_platform_response() {
        let body = r#"{"type":"regular","response":[{"id":"1","name":"Lab","description":""},{"id":"2","name":"Prod"}],"error_code":0}"#;
        let catalog: RepositoryCatalog = serde_json::from_str(body).unwrap();
        assert_eq!(catalog.repositories.len(), 2);
        assert_eq!(catalog.find("Prod").map(|r| r.id.as_str()), Some("2"));
    }
}
