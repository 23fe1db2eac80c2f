use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

/// One scraped book, before it has a database identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRecord {
    pub title: String,
    pub description: String,
    pub language: String,
    pub isbn: String,
}

/// A book as stored in the `books` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredBook {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub language: String,
    pub isbn: Option<String>,
}

/// Listing envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Books<T> {
    pub number_books: usize,
    pub books: Vec<T>,
}

impl<T> From<Vec<T>> for Books<T> {
    fn from(books: Vec<T>) -> Self {
        Self {
            number_books: books.len(),
            books,
        }
    }
}

/// Body of a manual `create` call. Every field is required but may be
/// absent or null on the wire, so validation happens after parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub language: Option<String>,
}

impl CreateBookRequest {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|_| anyhow!("Failed to parse JSON string into CreateBookRequest"))
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("Title", &self.title),
            ("Description", &self.description),
            ("ISBN", &self.isbn),
            ("Language", &self.language),
        ];

        let errors: Vec<String> = fields
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
            .map(|(name, _)| format!("{} cannot be null nor empty", name))
            .collect();

        if !errors.is_empty() {
            bail!(errors.join("; "));
        }
        Ok(())
    }

    /// Validate and convert into a record ready for insertion.
    pub fn into_record(self) -> Result<BookRecord> {
        self.validate()?;
        Ok(BookRecord {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            language: self.language.unwrap_or_default(),
            isbn: self.isbn.unwrap_or_default(),
        })
    }
}
