use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

/// The closed set of issue categories.
///
/// Every report and every worker assignment carries one of these values.
/// Adding a category is a coordinated change: the database enum, the
/// classifier keyword table below, and worker assignments all move together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_category", rename_all = "snake_case")]
pub enum Category {
    Pothole,
    Streetlight,
    Trash,
    WaterLeakage,
    Other,
}

/// Keyword triggers per category, in priority order. First match wins.
const KEYWORD_TABLE: &[(Category, &[&str])] = &[
    (Category::Pothole, &["pothole", "road damage", "manhole"]),
    (Category::Streetlight, &["streetlight", "street light", "lamp"]),
    (Category::Trash, &["trash", "garbage", "waste", "bin"]),
    (Category::WaterLeakage, &["water leak", "pipe", "sewerage"]),
];

impl Category {
    /// Fold free-form classifier output into exactly one category.
    ///
    /// Total and deterministic: case-insensitive substring matching over the
    /// keyword table, falling back to `Other` for anything unrecognized so an
    /// unreliable classifier can never block submission.
    pub fn from_classifier_text(text: &str) -> Category {
        let text = text.to_lowercase();
        for (category, keywords) in KEYWORD_TABLE {
            if keywords.iter().any(|kw| text.contains(kw)) {
                return *category;
            }
        }
        Category::Other
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Pothole => write!(f, "Pothole"),
            Category::Streetlight => write!(f, "Streetlight"),
            Category::Trash => write!(f, "Trash"),
            Category::WaterLeakage => write!(f, "WaterLeakage"),
            Category::Other => write!(f, "Other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_pothole_keywords() {
        assert_eq!(
            Category::from_classifier_text("This looks like a large pothole near a manhole"),
            Category::Pothole
        );
        assert_eq!(
            Category::from_classifier_text("severe ROAD DAMAGE on the highway"),
            Category::Pothole
        );
    }

    #[test]
    fn test_maps_streetlight_keywords() {
        assert_eq!(
            Category::from_classifier_text("a broken street light"),
            Category::Streetlight
        );
        assert_eq!(
            Category::from_classifier_text("the lamp is flickering"),
            Category::Streetlight
        );
    }

    #[test]
    fn test_maps_trash_keywords() {
        assert_eq!(
            Category::from_classifier_text("overflowing garbage bin"),
            Category::Trash
        );
        assert_eq!(
            Category::from_classifier_text("waste dumped on the sidewalk"),
            Category::Trash
        );
    }

    #[test]
    fn test_maps_water_leakage_keywords() {
        assert_eq!(
            Category::from_classifier_text("a burst pipe flooding the street"),
            Category::WaterLeakage
        );
        // "water leakage" contains the "water leak" trigger
        assert_eq!(
            Category::from_classifier_text("water leakage from the main"),
            Category::WaterLeakage
        );
    }

    #[test]
    fn test_garbled_input_falls_back_to_other() {
        assert_eq!(Category::from_classifier_text("???"), Category::Other);
        assert_eq!(Category::from_classifier_text(""), Category::Other);
        assert_eq!(
            Category::from_classifier_text("a cat sitting on a fence"),
            Category::Other
        );
    }

    #[test]
    fn test_priority_order_first_match_wins() {
        // "lamp" (Streetlight) outranks "trash" (Trash)
        assert_eq!(
            Category::from_classifier_text("trash bags piled under a lamp post"),
            Category::Streetlight
        );
        // "manhole" (Pothole) outranks "water leak" (WaterLeakage)
        assert_eq!(
            Category::from_classifier_text("water leak coming out of a manhole"),
            Category::Pothole
        );
    }

    #[test]
    fn test_deterministic_for_identical_input() {
        let text = "garbage next to a pipe";
        assert_eq!(
            Category::from_classifier_text(text),
            Category::from_classifier_text(text)
        );
    }

    #[test]
    fn test_json_uses_variant_names() {
        assert_eq!(
            serde_json::to_string(&Category::WaterLeakage).unwrap(),
            "\"WaterLeakage\""
        );
        let category: Category = serde_json::from_str("\"Pothole\"").unwrap();
        assert_eq!(category, Category::Pothole);
    }

    #[test]
    fn test_json_rejects_values_outside_taxonomy() {
        assert!(serde_json::from_str::<Category>("\"Graffiti\"").is_err());
    }
}
