//! S3 access control policy types.
//!
//! These follow the shape of the `AccessControlPolicy` XML document served by
//! Ceph RGW (and AWS S3) for `GET /<bucket>/<key>?acl`.

/// Grantee URI of the group representing unauthenticated public access.
pub const ALL_USERS_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// Grantee URI of the group of any authenticated principal.
pub const AUTHENTICATED_USERS_URI: &str =
    "http://acs.amazonaws.com/groups/global/AuthenticatedUsers";

/// Grantee URI of the server access log delivery group.
pub const LOG_DELIVERY_URI: &str = "http://acs.amazonaws.com/groups/s3/LogDelivery";

/// S3 AccessControlPolicy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControlPolicy {
    pub owner: Option<Owner>,
    pub grants: Vec<Grant>,
}

/// S3 Owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owner {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

/// S3 Grant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grant {
    pub grantee: Option<Grantee>,
    pub permission: Option<Permission>,
}

impl Grant {
    /// Grantee URI of this grant, or `""` when the grantee has none.
    #[must_use]
    pub fn grantee_uri(&self) -> &str {
        self.grantee
            .as_ref()
            .and_then(|g| g.uri.as_deref())
            .unwrap_or("")
    }

    /// Permission string of this grant, or `""` when absent.
    #[must_use]
    pub fn permission_str(&self) -> &str {
        self.permission.as_ref().map_or("", Permission::as_str)
    }
}

/// S3 Grantee.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grantee {
    pub display_name: Option<String>,
    pub email_address: Option<String>,
    pub id: Option<String>,
    pub grantee_type: Option<GranteeType>,
    pub uri: Option<String>,
}

impl Grantee {
    /// Grantee for a well-known group URI.
    #[must_use]
    pub fn group(uri: impl Into<String>) -> Self {
        Self {
            grantee_type: Some(GranteeType::Group),
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    /// Grantee for a canonical user id.
    #[must_use]
    pub fn canonical_user(id: impl Into<String>) -> Self {
        Self {
            grantee_type: Some(GranteeType::CanonicalUser),
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Value of the `xsi:type` attribute on `<Grantee>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GranteeType {
    AmazonCustomerByEmail,
    CanonicalUser,
    Group,
    Other(String),
}

impl GranteeType {
    /// Returns the string value of this enum variant.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::AmazonCustomerByEmail => "AmazonCustomerByEmail",
            Self::CanonicalUser => "CanonicalUser",
            Self::Group => "Group",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for GranteeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for GranteeType {
    fn from(s: &str) -> Self {
        match s {
            "AmazonCustomerByEmail" => Self::AmazonCustomerByEmail,
            "CanonicalUser" => Self::CanonicalUser,
            "Group" => Self::Group,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// S3 Permission.
///
/// Unknown values are kept verbatim in [`Permission::Other`] so that they never
/// masquerade as a known permission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permission {
    FullControl,
    Read,
    ReadAcp,
    Write,
    WriteAcp,
    Other(String),
}

impl Permission {
    /// Returns the string value of this enum variant.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::FullControl => "FULL_CONTROL",
            Self::Read => "READ",
            Self::ReadAcp => "READ_ACP",
            Self::Write => "WRITE",
            Self::WriteAcp => "WRITE_ACP",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Permission {
    fn from(s: &str) -> Self {
        match s {
            "FULL_CONTROL" => Self::FullControl,
            "READ" => Self::Read,
            "READ_ACP" => Self::ReadAcp,
            "WRITE" => Self::Write,
            "WRITE_ACP" => Self::WriteAcp,
            other => Self::Other(other.to_owned()),
        }
    }
}
