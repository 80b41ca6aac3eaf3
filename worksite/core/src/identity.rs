use crate::storage::UserScope;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::form_urlencoded;

const FIRST_NAME_PARAM: &str = "firstName";
const LAST_NAME_PARAM: &str = "lastName";

/// Identity claim returned by the verification service and carried between
/// views as a `firstName=..&lastName=..` query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub first_name: String,
    pub last_name: String,
}

impl Identity {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Encodes the identity as a URL query string (without the leading `?`).
    pub fn to_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair(FIRST_NAME_PARAM, &self.first_name)
            .append_pair(LAST_NAME_PARAM, &self.last_name)
            .finish()
    }

    /// Parses an identity out of a query string. Both names must be present;
    /// a leading `?` is tolerated.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut first_name = None;
        let mut last_name = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                FIRST_NAME_PARAM => first_name = Some(value.into_owned()),
                LAST_NAME_PARAM => last_name = Some(value.into_owned()),
                _ => {}
            }
        }
        Some(Self {
            first_name: first_name?,
            last_name: last_name?,
        })
    }

    /// The local storage namespace owned by this user.
    pub fn scope(&self) -> UserScope {
        UserScope::new(&self.first_name, &self.last_name)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_query() {
        let identity = Identity::new("Jane", "Doe");

        assert_eq!(identity.to_query(), "firstName=Jane&lastName=Doe");
    }

    #[test]
    fn test_to_query_escapes_reserved_characters() {
        let identity = Identity::new("Anne Marie", "O'Neil&Co");

        let query = identity.to_query();

        assert!(!query.contains(' '));
        assert!(query.contains("O%27Neil%26Co"));
        assert_eq!(Identity::from_query(&query), Some(identity));
    }

    #[test]
    fn test_from_query_ignores_unknown_params_and_leading_question_mark() {
        let parsed = Identity::from_query("?lastName=Doe&state=xyz&firstName=Jane");

        assert_eq!(parsed, Some(Identity::new("Jane", "Doe")));
    }

    #[test]
    fn test_from_query_requires_both_names() {
        assert_eq!(Identity::from_query("firstName=Jane"), None);
        assert_eq!(Identity::from_query(""), None);
    }

    #[test]
    fn test_deserialize_camel_case_claims() {
        let json = r#"{"firstName":"Jane","lastName":"Doe","employeeId":"42"}"#;

        let identity: Identity = serde_json::from_str(json).unwrap();

        assert_eq!(identity, Identity::new("Jane", "Doe"));
    }

    #[test]
    fn test_scope_joins_names_with_dot() {
        let identity = Identity::new("Jane", "Doe");

        assert_eq!(identity.scope().as_str(), "Jane.Doe");
    }
}
