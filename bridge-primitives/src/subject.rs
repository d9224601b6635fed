//! Caller identity types.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

/// Unique identifier for an authenticated subject.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(Uuid);

impl SubjectId {
    /// Generates a random subject identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl Display for SubjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for SubjectId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for SubjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = Uuid::parse_str(s).map_err(Error::from)?;
        Ok(Self::from_uuid(uuid))
    }
}

/// Attributes of an authenticated caller.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    id: SubjectId,
    username: String,
    #[serde(default)]
    staff: bool,
    #[serde(default)]
    superuser: bool,
}

impl Identity {
    /// Creates an identity with no elevated privileges.
    #[must_use]
    pub fn new(id: SubjectId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            staff: false,
            superuser: false,
        }
    }

    /// Grants staff privileges.
    #[must_use]
    pub fn with_staff(mut self) -> Self {
        self.staff = true;
        self
    }

    /// Grants superuser privileges. Superusers are implicitly staff.
    #[must_use]
    pub fn with_superuser(mut self) -> Self {
        self.staff = true;
        self.superuser = true;
        self
    }

    /// Returns the subject identifier.
    #[must_use]
    pub const fn id(&self) -> SubjectId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns `true` when the identity carries staff privileges.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        self.staff
    }

    /// Returns `true` when the identity carries superuser privileges.
    #[must_use]
    pub const fn is_superuser(&self) -> bool {
        self.superuser
    }
}

/// The caller on whose behalf a tool invocation runs.
///
/// Permission predicates only ever observe this type; the bridge never hands
/// them a raw credential.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subject {
    /// No credential was presented, or the presented credential did not
    /// resolve to an identity.
    Anonymous,
    /// A resolved, authenticated identity.
    Authenticated(Identity),
}

impl Subject {
    /// Returns `true` when the subject is authenticated.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// Returns the identity for authenticated subjects.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(identity) => Some(identity),
        }
    }

    /// Returns the subject identifier for authenticated subjects.
    #[must_use]
    pub fn id(&self) -> Option<SubjectId> {
        self.identity().map(Identity::id)
    }

    /// Returns `true` for authenticated staff subjects.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.identity().is_some_and(Identity::is_staff)
    }

    /// Returns `true` for authenticated superuser subjects.
    #[must_use]
    pub fn is_superuser(&self) -> bool {
        self.identity().is_some_and(Identity::is_superuser)
    }
}

impl Default for Subject {
    fn default() -> Self {
        Self::Anonymous
    }
}

impl From<Identity> for Subject {
    fn from(identity: Identity) -> Self {
        Self::Authenticated(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_subject_id() {
        let id = SubjectId::random();
        let parsed = id.to_string().parse::<SubjectId>().expect("parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn anonymous_subject_has_no_privileges() {
        let subject = Subject::Anonymous;
        assert!(!subject.is_authenticated());
        assert!(!subject.is_staff());
        assert!(!subject.is_superuser());
        assert!(subject.id().is_none());
    }

    #[test]
    fn superuser_implies_staff() {
        let identity = Identity::new(SubjectId::random(), "root").with_superuser();
        let subject = Subject::from(identity);
        assert!(subject.is_staff());
        assert!(subject.is_superuser());
    }
}
