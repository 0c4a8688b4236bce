use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Genre used when the remote record or the form leaves it blank.
pub const DEFAULT_GENRE: &str = "Unknown";

/// A book record. The id is assigned by the remote store and never
/// produced locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    pub author: String,
    pub year: i64,
    #[serde(default = "default_genre", deserialize_with = "deserialize_genre")]
    pub genre: String,
}

impl Book {
    /// Single-line rendering used by the list views.
    pub fn display_line(&self) -> String {
        format!(
            "{} by {} ({}) · {}",
            self.title, self.author, self.year, self.genre
        )
    }

    /// Question shown before a delete is issued.
    pub fn confirm_prompt(&self) -> String {
        format!("Delete \"{}\"?", self.title)
    }
}

/// Body of `POST /books`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i64,
    pub genre: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Author is required")]
    MissingAuthor,

    #[error("Year must be a whole number")]
    InvalidYear,
}

/// Raw contents of the create form's input fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub year: String,
    pub genre: String,
}

impl BookForm {
    pub fn validate(&self) -> Result<NewBook, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let author = self.author.trim();
        if author.is_empty() {
            return Err(ValidationError::MissingAuthor);
        }

        let year = self
            .year
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidYear)?;

        let genre = match self.genre.trim() {
            "" => DEFAULT_GENRE.to_string(),
            g => g.to_string(),
        };

        Ok(NewBook {
            title: title.to_string(),
            author: author.to_string(),
            year,
            genre,
        })
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.author.clear();
        self.year.clear();
        self.genre.clear();
    }
}

fn default_genre() -> String {
    DEFAULT_GENRE.to_string()
}

// Remote stores disagree on whether ids are strings or numbers; keep them opaque
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de;

    struct IdVisitor;

    impl<'de> de::Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

fn deserialize_genre<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let genre: Option<String> = Option::deserialize(deserializer)?;
    Ok(genre
        .filter(|g| !g.trim().is_empty())
        .unwrap_or_else(default_genre))
}
