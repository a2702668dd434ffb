use serde::{Deserialize, Serialize};

use crate::utils::PUBLISHED_STATUS;

fn default_status() -> String {
    PUBLISHED_STATUS.to_string()
}

/// One stored article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub primary_keyword: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    /// RFC 3339 timestamp of the last content write
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Article {
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == PUBLISHED_STATUS
    }

    /// The fields the link scorer looks at.
    #[must_use]
    pub fn to_link_candidate(&self) -> LinkCandidate {
        LinkCandidate {
            id: self.id.clone(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            tags: self.tags.clone(),
            primary_keyword: self.primary_keyword.clone(),
        }
    }
}

/// A published article reduced to what link scoring needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCandidate {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub primary_keyword: Option<String>,
}

/// Which published articles a batch should load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArticleSelection {
    #[default]
    All,
    Only(Vec<String>),
    Excluding(String),
}

impl ArticleSelection {
    /// `Only` for a non-empty id list, otherwise `All`.
    #[must_use]
    pub fn from_ids(ids: Option<Vec<String>>) -> Self {
        match ids {
            Some(ids) if !ids.is_empty() => Self::Only(ids),
            _ => Self::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_json_defaults() {
        let article: Article = serde_json::from_str(
            r#"{"id":"1","title":"T","slug":"t","content":"<p>x</p>","primaryKeyword":"kw"}"#,
        )
        .unwrap();
        assert!(article.is_published());
        assert!(article.tags.is_empty());
        assert_eq!(article.primary_keyword.as_deref(), Some("kw"));
        assert_eq!(article.to_link_candidate().slug, "t");
    }

    #[test]
    fn empty_id_list_selects_everything() {
        assert_eq!(ArticleSelection::from_ids(Some(vec![])), ArticleSelection::All);
        assert_eq!(ArticleSelection::from_ids(None), ArticleSelection::All);
        assert_eq!(
            ArticleSelection::from_ids(Some(vec!["a".into()])),
            ArticleSelection::Only(vec!["a".into()])
        );
    }
}
