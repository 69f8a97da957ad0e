use serde::{Deserialize, Serialize};

/// Which information source a query is directed at.
///
/// Sources are consulted in declaration order: the primary source is a
/// direct web search, the secondary one a reference-site lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Primary,
    Secondary,
}

impl SourceKind {
    pub const ALL: [Self; 2] = [Self::Primary, Self::Secondary];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }

    /// The source to try after this one, if any.
    #[must_use]
    pub fn fallback(&self) -> Option<Self> {
        match self {
            Self::Primary => Some(Self::Secondary),
            Self::Secondary => None,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            _ => Err(crate::Error::InvalidSourceKind(s.to_string())),
        }
    }
}

/// Where a finished resolution got its answer from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Primary,
    Secondary,
    NotFound,
}

impl ResultSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::NotFound => "not_found",
        }
    }

    /// Human-readable label used in tabular output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::Secondary => "Secondary",
            Self::NotFound => "Not Found",
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

impl From<SourceKind> for ResultSource {
    fn from(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Primary => Self::Primary,
            SourceKind::Secondary => Self::Secondary,
        }
    }
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResultSource {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Self::Primary),
            "secondary" => Ok(Self::Secondary),
            "not_found" => Ok(Self::NotFound),
            _ => Err(crate::Error::InvalidResultSource(s.to_string())),
        }
    }
}
