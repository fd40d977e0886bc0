// aim-common/src/model/version.rs
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::Prerelease;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AimError, Result};

/// Release identifier of an artifact: dotted numeric segments with an optional
/// pre-release suffix, e.g. `2.10.5` or `3.2.0-SNAPSHOT`.
///
/// Segments compare numerically from left to right; when one segment list is a
/// prefix of the other the shorter one sorts first. A pre-release sorts below the
/// release with the same segments, and two suffixes compare with SemVer
/// pre-release precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    segments: Vec<u64>,
    pre: Option<Prerelease>,
}

impl Version {
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || AimError::InvalidVersionFormat(s.to_string());

        let (numeric, suffix) = match s.split_once('-') {
            Some((numeric, suffix)) => (numeric, Some(suffix)),
            None => (s, None),
        };

        let segments = numeric
            .split('.')
            .map(|segment| {
                let well_formed = !segment.is_empty()
                    && segment.bytes().all(|b| b.is_ascii_digit())
                    && (segment == "0" || !segment.starts_with('0'));
                if !well_formed {
                    return Err(invalid());
                }
                segment.parse::<u64>().map_err(|_| invalid())
            })
            .collect::<Result<Vec<_>>>()?;

        let pre = match suffix {
            Some("") => return Err(invalid()),
            Some(suffix) => Some(Prerelease::new(suffix).map_err(|_| invalid())?),
            None => None,
        };

        Ok(Self { segments, pre })
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre.is_some()
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments
            .cmp(&other.segments)
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = AimError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}

// Serialized as its string form so property maps and config files stay readable
impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Version::from_str(&s).map_err(serde::de::Error::custom)
    }
}
