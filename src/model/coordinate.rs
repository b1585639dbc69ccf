use std::fmt::{Display, Formatter};

use regex_lite::Regex;
use serde::Serialize;

use crate::model::ParseError;

/// Marker some hosts use in place of a missing version.
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// Maps the host's "unspecified" marker (and empty strings) to an absent version.
pub fn unspecified_to_none(version: Option<&str>) -> Option<String> {
    match version {
        None | Some("") | Some(UNSPECIFIED_VERSION) => None,
        Some(version) => Some(version.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
pub struct GroupArtifact {
    pub group: String,
    pub artifact: String,
}

impl GroupArtifact {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        GroupArtifact {
            group: group.into(),
            artifact: artifact.into(),
        }
    }
}

impl Display for GroupArtifact {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
pub struct GroupArtifactVersion {
    pub group: String,
    pub artifact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl GroupArtifactVersion {
    /// Builds a versioned coordinate, normalizing "unspecified" to an absent version.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: Option<&str>,
    ) -> Self {
        GroupArtifactVersion {
            group: group.into(),
            artifact: artifact.into(),
            version: unspecified_to_none(version),
        }
    }

    pub fn from_coordinate(coordinate: &str) -> Result<Self, ParseError> {
        let (group, artifact, version) = split_coordinate(coordinate)?;
        Ok(GroupArtifactVersion::new(group, artifact, version))
    }

    pub fn group_artifact(&self) -> GroupArtifact {
        GroupArtifact::new(self.group.as_str(), self.artifact.as_str())
    }
}

impl Display for GroupArtifactVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group, self.artifact, version),
            None => write!(f, "{}:{}", self.group, self.artifact),
        }
    }
}

/// A coordinate after conflict resolution. `repository` and `dated_snapshot_version`
/// describe where the artifact came from; the resolver does not expose them yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize)]
pub struct ResolvedGroupArtifactVersion {
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dated_snapshot_version: Option<String>,
}

impl ResolvedGroupArtifactVersion {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        ResolvedGroupArtifactVersion {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            repository: None,
            dated_snapshot_version: None,
        }
    }

    pub fn from_coordinate(coordinate: &str) -> Result<Self, ParseError> {
        match split_coordinate(coordinate)? {
            (group, artifact, Some(version)) => {
                Ok(ResolvedGroupArtifactVersion::new(group, artifact, version))
            }
            (_, _, None) => Err(ParseError::MissingVersion(coordinate.to_string())),
        }
    }

    pub fn group_artifact(&self) -> GroupArtifact {
        GroupArtifact::new(self.group.as_str(), self.artifact.as_str())
    }
}

impl Display for ResolvedGroupArtifactVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

fn split_coordinate(coordinate: &str) -> Result<(&str, &str, Option<&str>), ParseError> {
    let re: Regex = Regex::new(
        r"^(?P<group>[^:\s]+):(?P<artifact>[^:\s]+)(?::(?P<version>[^:\s]+))?$",
    )
    .expect("coordinate pattern is valid");
    let captures = re
        .captures(coordinate.trim())
        .ok_or_else(|| ParseError::InvalidCoordinate(coordinate.to_string()))?;

    // Both groups are mandatory in the pattern, so a match always carries them.
    let group = captures
        .name("group")
        .ok_or_else(|| ParseError::InvalidCoordinate(coordinate.to_string()))?;
    let artifact = captures
        .name("artifact")
        .ok_or_else(|| ParseError::InvalidCoordinate(coordinate.to_string()))?;
    let version = captures.name("version").map(|m| m.as_str());

    Ok((group.as_str(), artifact.as_str(), version))
}
