//! Who owns the repositories we create.

use crate::core::error::{Result, SpaceriniError};

/// Resolves the namespace (user or organization) repositories live under
pub trait IdentityResolver {
    fn namespace(&self) -> Result<String>;
}

impl<T: IdentityResolver + ?Sized> IdentityResolver for &T {
    fn namespace(&self) -> Result<String> {
        (**self).namespace()
    }
}

/// A fixed namespace, typically an organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticNamespace(pub String);

impl IdentityResolver for StaticNamespace {
    fn namespace(&self) -> Result<String> {
        if self.0.trim().is_empty() {
            return Err(SpaceriniError::ConfigError(
                "Namespace cannot be empty".to_string(),
            ));
        }
        Ok(self.0.clone())
    }
}

/// `namespace/slug`
pub fn repo_id(identity: &dyn IdentityResolver, slug: &str) -> Result<String> {
    if slug.trim().is_empty() || slug.contains('/') {
        return Err(SpaceriniError::ConfigError(format!(
            "Invalid repository name '{slug}'"
        )));
    }
    Ok(format!("{}/{}", identity.namespace()?, slug))
}
