//! Process-wide credential loaded from configuration.

use async_trait::async_trait;

use crate::ports::{ApiCredential, CredentialError, CredentialResolver};

/// Resolves every request to the same credential.
#[derive(Debug, Clone)]
pub struct StaticCredentialResolver {
    credential: ApiCredential,
}

impl StaticCredentialResolver {
    pub fn new(credential: ApiCredential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl CredentialResolver for StaticCredentialResolver {
    fn requires_key_name(&self) -> bool {
        false
    }

    async fn resolve(&self, _key_name: Option<&str>) -> Result<ApiCredential, CredentialError> {
        Ok(self.credential.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ignores_key_name() {
        let resolver = StaticCredentialResolver::new(ApiCredential::new("sk-env"));

        assert!(!resolver.requires_key_name());
        assert_eq!(resolver.resolve(None).await.unwrap().expose(), "sk-env");
        assert_eq!(resolver.resolve(Some("other")).await.unwrap().expose(), "sk-env");
    }
}
