use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One arc of an OID path.
///
/// A segment is either a resolved sub-identifier or the symbolic token that
/// could not be resolved, kept verbatim so callers can tell the two apart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
#[serde(untagged)]
pub enum OidSegment {
    Num(u32),
    Sym(String),
}

impl OidSegment {
    pub fn is_numeric(&self) -> bool {
        matches!(self, OidSegment::Num(_))
    }

    pub fn as_num(&self) -> Option<u32> {
        match self {
            OidSegment::Num(n) => Some(*n),
            OidSegment::Sym(_) => None,
        }
    }

    /// Parse a single dotted-path label. Anything that is not a valid
    /// sub-identifier stays symbolic.
    pub fn parse(label: &str) -> Self {
        match label.parse::<u32>() {
            Ok(n) if label.bytes().all(|b| b.is_ascii_digit()) => OidSegment::Num(n),
            _ => OidSegment::Sym(label.to_string()),
        }
    }
}

/// Numeric segments order before symbolic ones; numbers compare by value,
/// symbols by their text.
impl Ord for OidSegment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (OidSegment::Num(a), OidSegment::Num(b)) => a.cmp(b),
            (OidSegment::Num(_), OidSegment::Sym(_)) => Ordering::Less,
            (OidSegment::Sym(_), OidSegment::Num(_)) => Ordering::Greater,
            (OidSegment::Sym(a), OidSegment::Sym(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for OidSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OidSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OidSegment::Num(n) => write!(f, "{}", n),
            OidSegment::Sym(s) => f.write_str(s),
        }
    }
}

/// An object identifier path, possibly partially symbolic.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, JsonSchema)]
#[serde(transparent)]
pub struct Oid(Vec<OidSegment>);

impl Oid {
    pub fn from_numbers(numbers: &[u32]) -> Self {
        Self(numbers.iter().copied().map(OidSegment::Num).collect())
    }

    /// Parse a dotted string such as `1.3.6.1` or `enterprises.9.1`.
    /// Empty labels are dropped.
    pub fn parse(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(OidSegment::parse)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[OidSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the path is non-empty and every segment is numeric.
    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(OidSegment::is_numeric)
    }

    /// The numeric arcs, if the whole path is resolved.
    pub fn numbers(&self) -> Option<Vec<u32>> {
        if self.0.is_empty() {
            return None;
        }
        self.0.iter().map(OidSegment::as_num).collect()
    }

    pub fn push(&mut self, segment: OidSegment) {
        self.0.push(segment);
    }

    pub fn extend(&mut self, other: &Oid) {
        self.0.extend(other.0.iter().cloned());
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
