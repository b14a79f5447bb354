//! The effect registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use docwarp_common::error::{DocwarpError, DocwarpResult};
use serde::{Deserialize, Serialize};

use crate::group::EffectGroup;

/// Built-in effects in authored presentation order: group, identifier,
/// preset file name (relative to the presets directory).
pub const BUILTIN_EFFECTS: &[(EffectGroup, &str, &str)] = &[
    (EffectGroup::Perspective, "Y-Left", "left.blend"),
    (EffectGroup::Perspective, "Y-Right", "right.blend"),
    (EffectGroup::Perspective, "X-Top", "top.blend"),
    (EffectGroup::Perspective, "X-Bottom", "bottom.blend"),
    (EffectGroup::Rotation, "90°", "90.blend"),
    (EffectGroup::Rotation, "180°", "180.blend"),
    (EffectGroup::Rotation, "270°", "270.blend"),
    (EffectGroup::Rotation, "360", "360.blend"),
    (EffectGroup::FoldCorners, "Fold TL", "fold_tl.blend"),
    (EffectGroup::FoldCorners, "Fold TR", "fold_tr.blend"),
    (EffectGroup::FoldCorners, "Fold BL", "fold_bl.blend"),
    (EffectGroup::FoldCorners, "Fold BR", "fold_br.blend"),
    (EffectGroup::FoldCorners, "Fold Both Right", "fold_both_r.blend"),
    (EffectGroup::FoldCorners, "Fold Both Left", "fold_both_l.blend"),
    (EffectGroup::FoldCorners, "Fold Both Top", "fold_both_t.blend"),
    (EffectGroup::FoldCorners, "Fold Both Bottom", "fold_both_b.blend"),
    (EffectGroup::FoldAxes, "Fold Vertical", "fold_v.blend"),
    (EffectGroup::FoldAxes, "Fold Horizontal", "fold_h.blend"),
    (EffectGroup::FoldAxes, "Fold Diagonal 1", "fold_d1.blend"),
    (EffectGroup::FoldAxes, "Fold Diagonal 2", "fold_d2.blend"),
    (EffectGroup::Crumpled, "Easy Crumpled 1", "easy_crumpled_1.blend"),
    (EffectGroup::Crumpled, "Easy Crumpled 2", "easy_crumpled_2.blend"),
    (EffectGroup::Crumpled, "Hard Crumpled 1", "hard_crumpled_1.blend"),
    (EffectGroup::Crumpled, "Hard Crumpled 2", "hard_crumpled_2.blend"),
    (EffectGroup::CreaseCorners, "Crease TL", "crease_tl.blend"),
    (EffectGroup::CreaseCorners, "Crease TR", "crease_tr.blend"),
    (EffectGroup::CreaseCorners, "Crease BL", "crease_bl.blend"),
    (EffectGroup::CreaseCorners, "Crease BR", "crease_br.blend"),
    (EffectGroup::CreaseCorners, "Crease Both Right", "crease_both_r.blend"),
    (EffectGroup::CreaseCorners, "Crease Both Left", "crease_both_l.blend"),
    (EffectGroup::CreaseCorners, "Crease Both Top", "crease_both_t.blend"),
    (EffectGroup::CreaseCorners, "Crease Both Bottom", "crease_both_b.blend"),
    (EffectGroup::CreaseCorners, "Crease All Corners", "crease_all.blend"),
    (EffectGroup::CreaseAxes, "Crease Vertical", "crease_v_single.blend"),
    (EffectGroup::CreaseAxes, "Crease Multiple Vertical", "crease_v_multiple.blend"),
    (EffectGroup::CreaseAxes, "Crease Horizontal", "crease_h_single.blend"),
    (EffectGroup::CreaseAxes, "Crease Multiple Horizontal", "crease_h_multiple.blend"),
    (EffectGroup::CreaseAxes, "Crease Diagonal 1", "crease_d1.blend"),
    (EffectGroup::CreaseAxes, "Crease Diagonal 2", "crease_d2.blend"),
    (EffectGroup::CreaseAxes, "Plus(+)", "crease_plus.blend"),
    (EffectGroup::CreaseAxes, "Cross(X)", "crease_cross.blend"),
    (EffectGroup::Curled, "Curl TL", "curl_tl.blend"),
    (EffectGroup::Curled, "Curl TR", "curl_tr.blend"),
    (EffectGroup::Curled, "Curl BL", "curl_bl.blend"),
    (EffectGroup::Curled, "Curl BR", "curl_br.blend"),
    (EffectGroup::Curled, "Curl Both Right", "curl_both_r.blend"),
    (EffectGroup::Curled, "Curl Both Left", "curl_both_l.blend"),
    (EffectGroup::Curled, "Curl Both Top", "curl_both_t.blend"),
    (EffectGroup::Curled, "Curl Both Bottom", "curl_both_b.blend"),
    (EffectGroup::Curled, "Curl All Corners", "curl_all_corners.blend"),
];

/// Number of effects shipped in the built-in catalog.
pub const BUILTIN_EFFECT_COUNT: usize = BUILTIN_EFFECTS.len();

/// A single registered effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    /// Stable identifier shown to users and embedded in dataset file names.
    pub effect_id: String,

    /// Family the effect belongs to.
    pub group: EffectGroup,

    /// Scene preset file the renderer loads for this effect.
    pub preset_locator: PathBuf,
}

impl EffectDescriptor {
    pub fn new(
        group: EffectGroup,
        effect_id: impl Into<String>,
        preset_locator: impl Into<PathBuf>,
    ) -> Self {
        Self {
            effect_id: effect_id.into(),
            group,
            preset_locator: preset_locator.into(),
        }
    }

    /// Whether the render should smooth-shade the target geometry.
    pub fn requires_smooth_shading(&self) -> bool {
        self.group.requires_smooth_shading()
    }
}

/// Immutable registry of effects.
#[derive(Debug, Clone)]
pub struct EffectCatalog {
    /// Descriptors in authored presentation order.
    descriptors: Vec<EffectDescriptor>,

    /// Effect id → position in `descriptors`.
    index: HashMap<String, usize>,

    /// Grouped, then alphabetical within each group.
    ordered_ids: Vec<String>,
}

impl EffectCatalog {
    /// The built-in 50-effect catalog with presets under `presets_dir`.
    pub fn builtin(presets_dir: impl AsRef<Path>) -> Self {
        let presets_dir = presets_dir.as_ref();
        let descriptors = BUILTIN_EFFECTS
            .iter()
            .map(|(group, id, file)| EffectDescriptor::new(*group, *id, presets_dir.join(file)))
            .collect();

        // The built-in table is unique and non-empty by construction.
        Self::build(descriptors)
    }

    /// Build a catalog from caller-supplied descriptors.
    ///
    /// Rejects empty identifiers, empty locators, and duplicate identifiers.
    pub fn from_descriptors(descriptors: Vec<EffectDescriptor>) -> DocwarpResult<Self> {
        let mut seen = HashMap::new();
        for descriptor in &descriptors {
            if descriptor.effect_id.trim().is_empty() {
                return Err(DocwarpError::config("Effect identifier must not be empty"));
            }
            if descriptor.preset_locator.as_os_str().is_empty() {
                return Err(DocwarpError::config(format!(
                    "Effect {:?} has an empty preset locator",
                    descriptor.effect_id
                )));
            }
            if seen.insert(descriptor.effect_id.as_str(), ()).is_some() {
                return Err(DocwarpError::config(format!(
                    "Duplicate effect identifier {:?}",
                    descriptor.effect_id
                )));
            }
        }
        Ok(Self::build(descriptors))
    }

    fn build(descriptors: Vec<EffectDescriptor>) -> Self {
        let index = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (d.effect_id.clone(), i))
            .collect();

        let mut ordered: Vec<&EffectDescriptor> = descriptors.iter().collect();
        ordered.sort_by(|a, b| {
            a.group
                .cmp(&b.group)
                .then_with(|| a.effect_id.cmp(&b.effect_id))
        });
        let ordered_ids = ordered.into_iter().map(|d| d.effect_id.clone()).collect();

        tracing::debug!(effects = descriptors.len(), "Effect catalog built");

        Self {
            descriptors,
            index,
            ordered_ids,
        }
    }

    /// Resolve an effect identifier to its preset locator.
    pub fn resolve(&self, effect_id: &str) -> DocwarpResult<&Path> {
        self.descriptor(effect_id)
            .map(|d| d.preset_locator.as_path())
            .ok_or_else(|| DocwarpError::unknown_effect(effect_id))
    }

    /// Full descriptor for an identifier, if registered.
    pub fn descriptor(&self, effect_id: &str) -> Option<&EffectDescriptor> {
        self.index.get(effect_id).map(|&i| &self.descriptors[i])
    }

    pub fn contains(&self, effect_id: &str) -> bool {
        self.index.contains_key(effect_id)
    }

    /// Every identifier, grouped in fixed group order and sorted within each
    /// group. This is the default batch iteration order.
    pub fn all_effect_ids(&self) -> &[String] {
        &self.ordered_ids
    }

    /// Descriptors in authored presentation order.
    pub fn descriptors(&self) -> &[EffectDescriptor] {
        &self.descriptors
    }

    /// Effects of one group, in authored presentation order.
    pub fn effects_in_group(&self, group: EffectGroup) -> Vec<&EffectDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.group == group)
            .collect()
    }

    /// Non-empty groups with their effects, in group order.
    pub fn groups(&self) -> Vec<(EffectGroup, Vec<&EffectDescriptor>)> {
        EffectGroup::ALL
            .into_iter()
            .map(|group| (group, self.effects_in_group(group)))
            .filter(|(_, effects)| !effects.is_empty())
            .collect()
    }

    /// Descriptors whose preset file does not exist on disk.
    pub fn missing_presets(&self) -> Vec<&EffectDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| !d.preset_locator.is_file())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_has_fifty_unique_effects() {
        let catalog = EffectCatalog::builtin("warp presets");
        assert_eq!(catalog.len(), 50);
        assert_eq!(BUILTIN_EFFECT_COUNT, 50);

        let ids = catalog.all_effect_ids();
        assert_eq!(ids.len(), 50);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn test_all_effect_ids_are_grouped_then_sorted() {
        let catalog = EffectCatalog::builtin("warp presets");
        let ids = catalog.all_effect_ids();

        let groups: Vec<_> = ids
            .iter()
            .map(|id| catalog.descriptor(id).unwrap().group)
            .collect();
        assert!(groups.windows(2).all(|w| w[0] <= w[1]));

        for pair in ids.windows(2) {
            let a = catalog.descriptor(&pair[0]).unwrap();
            let b = catalog.descriptor(&pair[1]).unwrap();
            if a.group == b.group {
                assert!(a.effect_id < b.effect_id, "{pair:?}");
            }
        }

        assert_eq!(ids.first().map(String::as_str), Some("X-Bottom"));
        assert_eq!(ids.last().map(String::as_str), Some("Curl TR"));
    }

    #[test]
    fn test_group_sizes() {
        let catalog = EffectCatalog::builtin("p");
        let sizes: Vec<_> = catalog
            .groups()
            .iter()
            .map(|(g, effects)| (*g, effects.len()))
            .collect();
        assert_eq!(
            sizes,
            vec![
                (EffectGroup::Perspective, 4),
                (EffectGroup::Rotation, 4),
                (EffectGroup::FoldCorners, 8),
                (EffectGroup::FoldAxes, 4),
                (EffectGroup::Crumpled, 4),
                (EffectGroup::CreaseCorners, 9),
                (EffectGroup::CreaseAxes, 8),
                (EffectGroup::Curled, 9),
            ]
        );
    }

    #[test]
    fn test_resolve_known_effects() {
        let catalog = EffectCatalog::builtin("/srv/presets");
        assert_eq!(
            catalog.resolve("Fold TL").unwrap(),
            Path::new("/srv/presets/fold_tl.blend")
        );
        assert_eq!(
            catalog.resolve("Y-Left").unwrap(),
            Path::new("/srv/presets/left.blend")
        );
        assert_eq!(
            catalog.resolve("Crease Multiple Vertical").unwrap(),
            Path::new("/srv/presets/crease_v_multiple.blend")
        );
        assert_eq!(
            catalog.resolve("Fold Both Left").unwrap(),
            Path::new("/srv/presets/fold_both_l.blend")
        );
    }

    #[test]
    fn test_every_preset_file_is_distinct() {
        let catalog = EffectCatalog::builtin("p");
        let locators: HashSet<_> = catalog
            .descriptors()
            .iter()
            .map(|d| d.preset_locator.clone())
            .collect();
        assert_eq!(locators.len(), catalog.len());
    }

    #[test]
    fn test_resolve_unknown_effect() {
        let catalog = EffectCatalog::builtin("p");
        let err = catalog.resolve("Curved").unwrap_err();
        assert!(matches!(err, DocwarpError::UnknownEffect { ref effect_id } if effect_id == "Curved"));
        assert!(catalog.resolve("fold tl").is_err());
    }

    #[test]
    fn test_curl_effects_require_smoothing() {
        let catalog = EffectCatalog::builtin("p");
        assert!(catalog.descriptor("Curl TL").unwrap().requires_smooth_shading());
        assert!(!catalog.descriptor("Y-Left").unwrap().requires_smooth_shading());
        assert!(!catalog
            .descriptor("Hard Crumpled 2")
            .unwrap()
            .requires_smooth_shading());
    }

    #[test]
    fn test_from_descriptors_rejects_duplicates() {
        let result = EffectCatalog::from_descriptors(vec![
            EffectDescriptor::new(EffectGroup::Rotation, "90°", "a.blend"),
            EffectDescriptor::new(EffectGroup::Rotation, "90°", "b.blend"),
        ]);
        assert!(matches!(result, Err(DocwarpError::Config { .. })));
    }

    #[test]
    fn test_from_descriptors_rejects_empty_locator() {
        let result = EffectCatalog::from_descriptors(vec![EffectDescriptor::new(
            EffectGroup::Rotation,
            "90°",
            "",
        )]);
        assert!(matches!(result, Err(DocwarpError::Config { .. })));
    }

    #[test]
    fn test_missing_presets_reports_absent_files() {
        let dir = std::env::temp_dir().join("docwarp_test_missing_presets");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("left.blend"), b"preset").unwrap();

        let catalog = EffectCatalog::builtin(&dir);
        let missing = catalog.missing_presets();
        assert_eq!(missing.len(), 49);
        assert!(missing.iter().all(|d| d.effect_id != "Y-Left"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
