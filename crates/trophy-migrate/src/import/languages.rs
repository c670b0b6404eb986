//! Target languages from configuration.

use async_trait::async_trait;

use crate::core::traits::{LanguageProvider, TargetLanguage};
use crate::error::Result;

/// A fixed list of target languages.
#[derive(Debug, Clone, Default)]
pub struct StaticLanguages {
    languages: Vec<TargetLanguage>,
}

impl StaticLanguages {
    pub fn new(languages: Vec<TargetLanguage>) -> Self {
        Self { languages }
    }
}

#[async_trait]
impl LanguageProvider for StaticLanguages {
    async fn languages(&self) -> Result<Vec<TargetLanguage>> {
        Ok(self.languages.clone())
    }
}
