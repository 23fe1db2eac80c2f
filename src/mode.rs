/// What a `run` invocation does with the scraped books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkingMode {
    /// Only list what is already stored.
    #[default]
    RetrieveAll,
    /// Scrape and print, touch nothing.
    ScrapOnly,
    /// Scrape, upsert by title, then list everything stored.
    ScrapAndStore,
}

impl WorkingMode {
    /// Case-insensitive; anything unrecognised means `RetrieveAll`.
    pub fn from_str_lossy(mode: &str) -> Self {
        match mode.to_uppercase().as_str() {
            "SCRAP_ONLY" => WorkingMode::ScrapOnly,
            "SCRAP_AND_STORE" => WorkingMode::ScrapAndStore,
            _ => WorkingMode::RetrieveAll,
        }
    }
}
