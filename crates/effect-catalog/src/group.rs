//! Effect families.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the eight fixed effect families.
///
/// Declaration order is the catalog's group order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectGroup {
    Perspective,
    Rotation,
    #[serde(rename = "Fold Corners")]
    FoldCorners,
    #[serde(rename = "Fold Axes")]
    FoldAxes,
    Crumpled,
    #[serde(rename = "Crease Corners")]
    CreaseCorners,
    #[serde(rename = "Crease Axes")]
    CreaseAxes,
    Curled,
}

impl EffectGroup {
    /// All groups in catalog order.
    pub const ALL: [EffectGroup; 8] = [
        EffectGroup::Perspective,
        EffectGroup::Rotation,
        EffectGroup::FoldCorners,
        EffectGroup::FoldAxes,
        EffectGroup::Crumpled,
        EffectGroup::CreaseCorners,
        EffectGroup::CreaseAxes,
        EffectGroup::Curled,
    ];

    /// Human-readable group name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Perspective => "Perspective",
            Self::Rotation => "Rotation",
            Self::FoldCorners => "Fold Corners",
            Self::FoldAxes => "Fold Axes",
            Self::Crumpled => "Crumpled",
            Self::CreaseCorners => "Crease Corners",
            Self::CreaseAxes => "Crease Axes",
            Self::Curled => "Curled",
        }
    }

    /// Whether renders in this family need smooth-shaded geometry.
    pub fn requires_smooth_shading(&self) -> bool {
        matches!(self, Self::Curled)
    }
}

impl fmt::Display for EffectGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a group name does not match any family.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown effect group: {0:?}")]
pub struct UnknownGroup(pub String);

impl FromStr for EffectGroup {
    type Err = UnknownGroup;

    /// Accepts the label in any case, with spaces, dashes or underscores
    /// ("Fold Corners", "fold-corners", "FOLD_CORNERS").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        EffectGroup::ALL
            .into_iter()
            .find(|group| group.label().replace(' ', "").to_lowercase() == normalized)
            .ok_or_else(|| UnknownGroup(s.to_string()))
    }
}
