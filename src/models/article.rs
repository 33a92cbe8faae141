use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ArticleCategory {
    #[default]
    Respiration,
    Meditation,
    WellBeing,
    MentalHealth,
    Exercises,
    Techniques,
    Guides,
    News,
    Other(String),
}

impl ArticleCategory {
    pub const ALL: [ArticleCategory; 8] = [
        ArticleCategory::Respiration,
        ArticleCategory::Meditation,
        ArticleCategory::WellBeing,
        ArticleCategory::MentalHealth,
        ArticleCategory::Exercises,
        ArticleCategory::Techniques,
        ArticleCategory::Guides,
        ArticleCategory::News,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ArticleCategory::Respiration => "Respiration",
            ArticleCategory::Meditation => "Méditation",
            ArticleCategory::WellBeing => "Bien-être",
            ArticleCategory::MentalHealth => "Santé mentale",
            ArticleCategory::Exercises => "Exercices",
            ArticleCategory::Techniques => "Techniques",
            ArticleCategory::Guides => "Guides",
            ArticleCategory::News => "Actualités",
            ArticleCategory::Other(value) => value,
        }
    }

    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        Self::ALL
            .iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| ArticleCategory::Other(trimmed.to_string()))
    }
}

impl Serialize for ArticleCategory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ArticleCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .map(|v| ArticleCategory::parse(&v))
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: ArticleCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    pub title: String,
    pub content: String,
    pub category: ArticleCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Spring-style paginated response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

/// Listing endpoints answer with either a bare array or a page.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Items(Vec<T>),
    Paged(Page<T>),
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Items(items) => items,
            Listing::Paged(page) => page.content,
        }
    }
}
