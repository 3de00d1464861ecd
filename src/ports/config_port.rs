//! Configuration access port trait.

use crate::domain::error::FoliolabError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Like `get_string`, but blank or absent values are `ConfigMissing`.
    fn require_string(&self, section: &str, key: &str) -> Result<String, FoliolabError> {
        self.get_string(section, key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| FoliolabError::ConfigMissing {
                section: section.into(),
                key: key.into(),
            })
    }
}
