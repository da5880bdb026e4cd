//! Kinds of documents the engine can annotate

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of entity whose text is being processed.
///
/// Self-link permissions and per-kind processing switches are keyed by this.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A blog post or article
    Post,
    /// A static page
    Page,
    /// A reader comment
    Comment,
    /// Anything else (archives, widgets, custom types)
    #[default]
    Other,
}

impl EntityKind {
    /// Every kind, in declaration order
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Post,
        EntityKind::Page,
        EntityKind::Comment,
        EntityKind::Other,
    ];

    /// Lowercase name used in files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Post => "post",
            EntityKind::Page => "page",
            EntityKind::Comment => "comment",
            EntityKind::Other => "other",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(EntityKind::Post),
            "page" => Ok(EntityKind::Page),
            "comment" => Ok(EntityKind::Comment),
            "other" => Ok(EntityKind::Other),
            other => Err(format!("unknown entity kind '{}'", other)),
        }
    }
}
