//! Caller-facing access level.

use serde::{Deserialize, Serialize};

/// Visibility of an object, collapsed from its ACL.
///
/// The string forms match the S3 canned ACL names so a mirror can re-apply the
/// level with `x-amz-acl` on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccessLevel {
    /// Default variant.
    #[default]
    #[serde(rename = "private")]
    Private,
    #[serde(rename = "public-read")]
    PublicRead,
    #[serde(rename = "public-read-write")]
    PublicReadWrite,
}

impl AccessLevel {
    /// Returns the canned ACL name of this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
            Self::PublicReadWrite => "public-read-write",
        }
    }

    /// Whether anonymous clients may read the object.
    #[must_use]
    pub fn is_public(&self) -> bool {
        !matches!(self, Self::Private)
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
