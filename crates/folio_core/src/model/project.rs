//! Project record consumed by the project detail view.
//!
//! Boundary names follow the `projects` table, which mixes capitalized
//! (`Title`, `Img`, ...) and lowercase (`features`, `technologies`) columns.

use crate::model::null_as_default;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(rename = "Title", default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "Description", default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "Img", default, deserialize_with = "null_as_default")]
    pub img: String,
    #[serde(rename = "Link", default)]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
}

impl ProjectRecord {
    /// Returns the live demo link when one is set.
    pub fn live_link(&self) -> Option<&str> {
        self.link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }

    pub fn has_features(&self) -> bool {
        !self.features.is_empty()
    }

    pub fn has_technologies(&self) -> bool {
        !self.technologies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectRecord;

    #[test]
    fn decodes_mixed_case_columns_and_null_lists() {
        let project: ProjectRecord = serde_json::from_str(
            r#"{"id":3,"Title":"Folio","Description":"Site","Img":"a.png","Link":"","features":null,"technologies":["Rust"]}"#,
        )
        .expect("row should decode");
        assert_eq!(project.title, "Folio");
        assert!(!project.has_features());
        assert!(project.has_technologies());
        assert_eq!(project.live_link(), None);
    }

    #[test]
    fn null_text_columns_default_to_empty() {
        let project: ProjectRecord = serde_json::from_str(
            r#"{"id":4,"Title":"Notes","Description":null,"Img":null,"Link":null,"features":["Sync"],"technologies":null}"#,
        )
        .expect("row with null columns should decode");
        assert_eq!(project.title, "Notes");
        assert!(project.description.is_empty());
        assert!(project.img.is_empty());
        assert_eq!(project.live_link(), None);
        assert_eq!(project.features, vec!["Sync".to_string()]);
        assert!(!project.has_technologies());
    }
}
