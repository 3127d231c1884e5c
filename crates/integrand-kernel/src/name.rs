//! Polynomial names with a structured family qualifier.
//!
//! Indexed families (`InstructionRa(0)`, `InstructionRa(1)`, ...) share a
//! base name and differ only in the qualifier. A name built with
//! [`PolyName::family`] stands for every member at once; the claim tracker
//! relies on that tag instead of inspecting display text.

use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Qualifier {
    /// A symbolic family index (`i`, `cf_i`), quantified over all members.
    Index(String),
    /// One concrete member or flavour (`0`, `Load`, `iM+j`).
    Member(String),
}

impl Qualifier {
    pub fn as_str(&self) -> &str {
        match self {
            Qualifier::Index(s) | Qualifier::Member(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PolyName {
    pub base: String,
    pub qualifier: Option<Qualifier>,
}

impl PolyName {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            qualifier: None,
        }
    }

    pub fn member(base: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            qualifier: Some(Qualifier::Member(member.into())),
        }
    }

    pub fn family(base: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            qualifier: Some(Qualifier::Index(index.into())),
        }
    }

    /// True when this name quantifies over a whole indexed family.
    pub fn is_family(&self) -> bool {
        matches!(self.qualifier, Some(Qualifier::Index(_)))
    }

    /// True when `other` is a qualified name in the same family.
    pub fn covers(&self, other: &PolyName) -> bool {
        self.is_family() && other.qualifier.is_some() && self.base == other.base
    }
}

impl fmt::Display for PolyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}({})", self.base, q.as_str()),
            None => f.write_str(&self.base),
        }
    }
}

impl Serialize for PolyName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<&str> for PolyName {
    fn from(base: &str) -> Self {
        PolyName::new(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_qualifier() {
        assert_eq!(PolyName::new("RdInc").to_string(), "RdInc");
        assert_eq!(PolyName::member("OpFlags", "Load").to_string(), "OpFlags(Load)");
        assert_eq!(
            PolyName::family("InstructionRa", "i").to_string(),
            "InstructionRa(i)"
        );
    }

    #[test]
    fn family_covers_members_of_same_base() {
        let family = PolyName::family("InstructionRa", "i");
        assert!(family.covers(&PolyName::member("InstructionRa", "0")));
        assert!(family.covers(&PolyName::member("InstructionRa", "iM+j")));
        assert!(!family.covers(&PolyName::member("BytecodeRa", "0")));
        assert!(!family.covers(&PolyName::new("InstructionRa")));
    }

    #[test]
    fn members_never_cover() {
        let member = PolyName::member("OpFlags", "Load");
        assert!(!member.is_family());
        assert!(!member.covers(&PolyName::member("OpFlags", "Store")));
    }

    #[test]
    fn serializes_as_display_string() {
        let json = serde_json::to_value(PolyName::member("OpFlags", "Jump")).unwrap();
        assert_eq!(json, serde_json::json!("OpFlags(Jump)"));
    }
}
