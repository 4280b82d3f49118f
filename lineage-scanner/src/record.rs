use serde::{Deserialize, Serialize};
use std::fmt;

/// Key naming one memorial record on the source site.
///
/// Opaque on purpose: the site uses numeric ids, but nothing downstream
/// relies on that beyond [`Identifier::from_memorial_path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Pull the record id out of a memorial link such as
    /// `/memorial/120297053/jane-doe` or a full URL to the same page.
    pub fn from_memorial_path(href: &str) -> Option<Self> {
        let path = href.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/');

        segments.find(|segment| *segment == "memorial")?;
        let id = segments.next()?;

        if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
            Some(Self(id.to_string()))
        } else {
            None
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Identifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for Identifier {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A dated, placed life event (birth or death). Either half may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vital {
    pub date: Option<String>,
    pub place: Option<String>,
}

impl Vital {
    /// Returns `None` when neither a date nor a place is known, so callers can
    /// tell "no event recorded" apart from "event with partial data".
    pub fn from_parts(date: Option<String>, place: Option<String>) -> Option<Self> {
        if date.is_none() && place.is_none() {
            None
        } else {
            Some(Self { date, place })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Parent,
    Sibling,
    Spouse,
    Unknown,
}

impl RelationKind {
    /// Classify a family section heading as printed on a memorial page.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().trim_end_matches(':').trim().to_lowercase();
        match normalized.as_str() {
            "parent" | "parents" => RelationKind::Parent,
            "sibling" | "siblings" | "half sibling" | "half siblings" => RelationKind::Sibling,
            "spouse" | "spouses" => RelationKind::Spouse,
            _ => RelationKind::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Parent => "parent",
            RelationKind::Sibling => "sibling",
            RelationKind::Spouse => "spouse",
            RelationKind::Unknown => "unknown",
        }
    }
}

/// A reference from one memorial to a relative's memorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRef {
    pub id: Identifier,
    pub name: Option<String>,
    pub kind: RelationKind,
    /// Section heading the reference was found under, if any.
    pub label: Option<String>,
}

impl RelationRef {
    pub fn new(id: impl Into<Identifier>, kind: RelationKind) -> Self {
        Self {
            id: id.into(),
            name: None,
            kind,
            label: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Everything an extractor can read off a single memorial page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFields {
    pub name: Option<String>,
    pub birth: Option<Vital>,
    pub death: Option<Vital>,
    pub relations: Vec<RelationRef>,
}
