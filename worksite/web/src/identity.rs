use std::fmt;
use worksite_core::Identity;

/// Route query carrying the verified identity, `firstName=..&lastName=..`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IdentityQuery(pub Option<Identity>);

impl From<&str> for IdentityQuery {
    fn from(query: &str) -> Self {
        Self(Identity::from_query(query))
    }
}

impl From<Identity> for IdentityQuery {
    fn from(identity: Identity) -> Self {
        Self(Some(identity))
    }
}

impl fmt::Display for IdentityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(identity) => f.write_str(&identity.to_query()),
            None => Ok(()),
        }
    }
}
