use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Generates a short random identifier for newly created entities.
#[must_use]
pub fn generate_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    raw[..12].to_owned()
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the underlying string value
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a Question, stable across sessions.
    QuestionId
);

string_id!(
    /// Identifier of an option, unique within its question.
    OptionId
);

string_id!(
    /// Unique identifier for a quiz result.
    ResultId
);

string_id!(
    /// Unique identifier for a Category.
    ///
    /// Two reserved values exist: the mixed/review sentinel used by retake
    /// sessions whose questions span several categories, and the empty
    /// unknown marker used when no owning category could be resolved.
    CategoryId
);

const MIXED_CATEGORY: &str = "mixed";

impl CategoryId {
    /// Placeholder category for retake sessions spanning several categories.
    #[must_use]
    pub fn mixed() -> Self {
        Self::new(MIXED_CATEGORY)
    }

    /// Marker for a question whose owning category could not be found.
    #[must_use]
    pub fn unknown() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn is_mixed(&self) -> bool {
        self.0 == MIXED_CATEGORY
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for CategoryId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError {
                kind: "CategoryId".to_string(),
            });
        }
        Ok(CategoryId::new(trimmed))
    }
}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError {
                kind: "QuestionId".to_string(),
            });
        }
        Ok(QuestionId::new(trimmed))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
