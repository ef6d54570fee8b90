use serde::{Deserialize, Serialize};

use crate::filtering::infrastructure::adjustments::Preset;
use crate::filtering::infrastructure::filter_factory::{FilterKind, FilterSettings};
use crate::segmentation::domain::background_remover::BackgroundSettings;
use crate::shared::constants::DEFAULT_WAND_TOLERANCE;
use crate::shared::region::Point;

fn default_wand_tolerance() -> u8 {
    DEFAULT_WAND_TOLERANCE
}

/// One user-level editing action.
///
/// Serialized with an `op` tag so a recipe file is a plain JSON array:
///
/// ```json
/// [
///   { "op": "filter", "filter": "posterize", "settings": { "posterize_levels": 4 } },
///   { "op": "preset", "preset": "cinematic" },
///   { "op": "remove-background", "settings": { "method": "color", "tolerance": 40 } },
///   { "op": "magic-wand", "seed": { "x": 3, "y": 7 }, "tolerance": 20 },
///   { "op": "copy" },
///   { "op": "paste" }
/// ]
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum EditOperation {
    /// Run one kernel over the whole image. `settings` overrides the
    /// session's filter settings for this step only.
    Filter {
        filter: FilterKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        settings: Option<FilterSettings>,
    },
    /// Run the adjustment pipeline with a named preset's slider values.
    Preset {
        preset: Preset,
    },
    RemoveBackground {
        #[serde(default)]
        settings: BackgroundSettings,
    },
    MagicWand {
        seed: Point,
        #[serde(default = "default_wand_tolerance")]
        tolerance: u8,
    },
    SelectRectangle {
        from: Point,
        to: Point,
    },
    SelectAll,
    ClearSelection,
    InvertSelection,
    ExpandSelection,
    ContractSelection,
    Copy,
    Paste,
}

impl EditOperation {
    pub fn filter(kind: FilterKind) -> Self {
        EditOperation::Filter {
            filter: kind,
            settings: None,
        }
    }

    /// Short name used for history entries and timing.
    pub fn label(&self) -> String {
        match self {
            EditOperation::Filter { filter, .. } => filter.name().to_string(),
            EditOperation::Preset { preset } => format!("preset ({})", preset),
            EditOperation::RemoveBackground { settings } => {
                format!("remove-background ({})", settings.method)
            }
            EditOperation::MagicWand { .. } => "magic-wand".to_string(),
            EditOperation::SelectRectangle { .. } => "select-rectangle".to_string(),
            EditOperation::SelectAll => "select-all".to_string(),
            EditOperation::ClearSelection => "clear-selection".to_string(),
            EditOperation::InvertSelection => "invert-selection".to_string(),
            EditOperation::ExpandSelection => "expand-selection".to_string(),
            EditOperation::ContractSelection => "contract-selection".to_string(),
            EditOperation::Copy => "copy".to_string(),
            EditOperation::Paste => "paste".to_string(),
        }
    }

    /// Whether a successful run changes pixels and therefore records a
    /// history snapshot.
    pub fn modifies_pixels(&self) -> bool {
        matches!(
            self,
            EditOperation::Filter { .. }
                | EditOperation::Preset { .. }
                | EditOperation::RemoveBackground { .. }
                | EditOperation::Paste
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::domain::background_remover::BackgroundMethod;
    use rstest::rstest;

    #[test]
    fn test_parse_recipe() {
        let json = r#"[
            { "op": "filter", "filter": "posterize", "settings": { "posterize_levels": 4 } },
            { "op": "filter", "filter": "rotate-90" },
            { "op": "remove-background", "settings": { "method": "color", "tolerance": 40 } },
            { "op": "magic-wand", "seed": { "x": 3, "y": 7 } },
            { "op": "select-rectangle", "from": { "x": 0, "y": 0 }, "to": { "x": 4, "y": 4 } },
            { "op": "invert-selection" },
            { "op": "paste" }
        ]"#;
        let ops: Vec<EditOperation> = serde_json::from_str(json).unwrap();
        assert_eq!(ops.len(), 7);

        match &ops[0] {
            EditOperation::Filter {
                filter,
                settings: Some(settings),
            } => {
                assert_eq!(*filter, FilterKind::Posterize);
                assert_eq!(settings.posterize_levels, 4);
                assert_eq!(settings.blur_px, FilterSettings::default().blur_px);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(ops[1], EditOperation::filter(FilterKind::Rotate90));
        match &ops[2] {
            EditOperation::RemoveBackground { settings } => {
                assert_eq!(settings.method, BackgroundMethod::Color);
                assert_eq!(settings.tolerance, 40);
                assert_eq!(settings.feather, BackgroundSettings::default().feather);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            ops[3],
            EditOperation::MagicWand {
                seed: Point::new(3, 7),
                tolerance: DEFAULT_WAND_TOLERANCE
            }
        );
        assert_eq!(ops[6], EditOperation::Paste);
    }

    #[test]
    fn test_remove_background_defaults_to_smart() {
        let op: EditOperation = serde_json::from_str(r#"{ "op": "remove-background" }"#).unwrap();
        assert_eq!(
            op,
            EditOperation::RemoveBackground {
                settings: BackgroundSettings::default()
            }
        );
    }

    #[test]
    fn test_parse_preset() {
        let op: EditOperation =
            serde_json::from_str(r#"{ "op": "preset", "preset": "cinematic" }"#).unwrap();
        assert_eq!(
            op,
            EditOperation::Preset {
                preset: Preset::Cinematic
            }
        );
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        assert!(serde_json::from_str::<EditOperation>(r#"{ "op": "fisheye" }"#).is_err());
    }

    #[test]
    fn test_serialize_uses_op_tag() {
        let json = serde_json::to_string(&EditOperation::filter(FilterKind::Vintage)).unwrap();
        assert_eq!(json, r#"{"op":"filter","filter":"vintage"}"#);
    }

    #[rstest]
    #[case::filter(EditOperation::filter(FilterKind::Sketch), true, "sketch")]
    #[case::paste(EditOperation::Paste, true, "paste")]
    #[case::preset(EditOperation::Preset { preset: Preset::Vintage }, true, "preset (vintage)")]
    #[case::copy(EditOperation::Copy, false, "copy")]
    #[case::select_all(EditOperation::SelectAll, false, "select-all")]
    #[case::wand(EditOperation::MagicWand { seed: Point::new(0, 0), tolerance: 5 }, false, "magic-wand")]
    fn test_label_and_history(
        #[case] op: EditOperation,
        #[case] modifies: bool,
        #[case] label: &str,
    ) {
        assert_eq!(op.modifies_pixels(), modifies);
        assert_eq!(op.label(), label);
    }

    #[test]
    fn test_background_label_names_method() {
        let op = EditOperation::RemoveBackground {
            settings: BackgroundSettings {
                method: BackgroundMethod::Edge,
                ..BackgroundSettings::default()
            },
        };
        assert_eq!(op.label(), "remove-background (edge)");
    }
}
