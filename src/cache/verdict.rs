//! Verdict Module
//!
//! Outcome of an unchanged-check.

use std::fmt;

use crate::document::Document;

// == Miss Reason ==
/// Why a write cannot be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissReason {
    /// Nothing was ever recorded under the key
    NotCached,
    /// The submitted document differs from the last recorded one
    SubmittedChanged,
    /// No candidate's spec matches the recorded persisted spec
    NoMatchingCandidate,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NotCached => "not-cached",
            Self::SubmittedChanged => "submitted-changed",
            Self::NoMatchingCandidate => "no-matching-candidate",
        };
        f.write_str(reason)
    }
}

// == Verdict ==
/// Either the live candidate that already holds the desired state, or the
/// reason the write must happen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict<'a> {
    Hit(&'a Document),
    Miss(MissReason),
}

impl<'a> Verdict<'a> {
    /// The matched candidate, if any.
    pub fn hit(self) -> Option<&'a Document> {
        match self {
            Self::Hit(candidate) => Some(candidate),
            Self::Miss(_) => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    pub fn miss_reason(&self) -> Option<MissReason> {
        match self {
            Self::Hit(_) => None,
            Self::Miss(reason) => Some(*reason),
        }
    }
}
