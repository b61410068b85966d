use serde::Serialize;
use std::fmt;

/// Coarse fuel-type category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Motorization {
    Fossil,
    Hybrid,
    Electric,
    #[serde(rename = "Other/Unclassified")]
    Other,
}

impl Motorization {
    pub const ALL: [Motorization; 4] = [
        Motorization::Fossil,
        Motorization::Hybrid,
        Motorization::Electric,
        Motorization::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Motorization::Fossil => "Fossil",
            Motorization::Hybrid => "Hybrid",
            Motorization::Electric => "Electric",
            Motorization::Other => "Other/Unclassified",
        }
    }

    pub fn is_electrified(self) -> bool {
        matches!(self, Motorization::Hybrid | Motorization::Electric)
    }
}

impl fmt::Display for Motorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const FOSSIL_LABELS: &[&str] = &["Petrol", "Diesel"];

// "plug in hyrbrid" is the spelling used in the source dataset.
const HYBRID_LABELS: &[&str] = &["Hybrid", "plug in hybrid", "plug in hyrbrid"];

const ELECTRIC_LABEL: &str = "Electric";

/// Maps a raw fuel-type label to its [`Motorization`].
///
/// Matching is exact and case-sensitive; any label not listed, including a
/// missing one, is [`Motorization::Other`].
///
/// | Label                                          | Class    |
/// |------------------------------------------------|----------|
/// | `Petrol`, `Diesel`                             | Fossil   |
/// | `Hybrid`, `plug in hybrid`, `plug in hyrbrid`  | Hybrid   |
/// | `Electric`                                     | Electric |
/// | anything else                                  | Other    |
pub fn classify(label: Option<&str>) -> Motorization {
    match label {
        Some(l) if FOSSIL_LABELS.contains(&l) => Motorization::Fossil,
        Some(l) if HYBRID_LABELS.contains(&l) => Motorization::Hybrid,
        Some(ELECTRIC_LABEL) => Motorization::Electric,
        _ => Motorization::Other,
    }
}
