//! Attachment value object for files and links carried by proposals.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// A named file or link attached to a proposal.
///
/// The content is opaque to the negotiation core. It is either a URL or a
/// storage reference resolved by the platform backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Attachment {
    /// Display name shown to both parties.
    name: String,
    /// URL or storage reference.
    content: String,
}

impl Attachment {
    /// Creates an attachment.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name or the content is blank.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let content = content.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("attachment name must not be empty"));
        }
        if content.trim().is_empty() {
            return Err(DomainError::validation(
                "attachment content must not be empty",
            ));
        }
        Ok(Self { name, content })
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the URL or storage reference.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}
