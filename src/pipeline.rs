use log::{debug, error, info};

use crate::config::{ModeInput, ValidScan};
use crate::delay_manager::DelayPolicy;
use crate::extractor::{extract_contacts, ContactInfo};
use crate::page_fetcher::{FetchFailure, PageFetcher};
use crate::query_builder::{self, ROLE_TERMS};
use crate::search_engine::{SearchEngine, SearchError, SearchItem, SearchPage};

pub const DISPLAY_LIMIT: usize = 500;
pub const FIRST_START: u32 = 1;
pub const PAGE_STEP: u32 = 10;

pub trait SearchBackend {
    fn search(&self, query: &str, start: u32) -> Result<SearchPage, SearchError>;
}

impl SearchBackend for SearchEngine {
    fn search(&self, query: &str, start: u32) -> Result<SearchPage, SearchError> {
        SearchEngine::search(self, query, start)
    }
}

pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String, FetchFailure>;
}

impl PageSource for PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchFailure> {
        PageFetcher::fetch(self, url)
    }
}

/// What differs between a trainer scan and a plain profile scan: how the
/// query is built, which text contacts come from, and whether items are
/// filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanMode {
    Trainer {
        technology_terms: Vec<String>,
        role_terms: Vec<String>,
        location: String,
    },
    Profile {
        keywords: String,
    },
}

impl ScanMode {
    pub fn from_input(input: &ModeInput) -> Self {
        match input {
            ModeInput::Trainer {
                technology,
                related_tools,
                location,
            } => ScanMode::Trainer {
                technology_terms: query_builder::technology_terms(technology, related_tools),
                role_terms: ROLE_TERMS.iter().map(|r| r.to_string()).collect(),
                location: location.clone(),
            },
            ModeInput::Profile { keywords } => ScanMode::Profile {
                keywords: keywords.clone(),
            },
        }
    }

    pub fn query(&self) -> String {
        match self {
            ScanMode::Trainer {
                technology_terms,
                role_terms,
                location,
            } => {
                let roles: Vec<&str> = role_terms.iter().map(String::as_str).collect();
                query_builder::build_trainer_query(technology_terms, &roles, location)
            }
            ScanMode::Profile { keywords } => query_builder::build_profile_query(keywords),
        }
    }

    /// Trainer scans read the full page and fall back to the snippet when the
    /// page is unavailable. Profile scans only ever use the snippet.
    fn source_text<P: PageSource>(&self, item: &SearchItem, pages: &P) -> String {
        match self {
            ScanMode::Trainer { .. } => match pages.fetch(&item.link) {
                Ok(body) if !body.is_empty() => body,
                Ok(_) => item.snippet.clone(),
                Err(e) => {
                    debug!("Using snippet for {}: {}", item.link, e);
                    item.snippet.clone()
                }
            },
            ScanMode::Profile { .. } => item.snippet.clone(),
        }
    }

    pub fn is_relevant(&self, title: &str, text: &str) -> bool {
        match self {
            ScanMode::Trainer {
                technology_terms,
                role_terms,
                ..
            } => {
                let text = text.to_lowercase();
                let title = title.to_lowercase();
                let role_match = role_terms.iter().any(|r| {
                    let r = r.to_lowercase();
                    text.contains(&r) || title.contains(&r)
                });
                let combined = format!("{}{}", text, title);
                let tech_match = technology_terms
                    .iter()
                    .any(|t| combined.contains(&t.to_lowercase()));
                role_match && tech_match
            }
            ScanMode::Profile { .. } => true,
        }
    }

    fn display_text(&self, text: String) -> String {
        match self {
            ScanMode::Trainer { .. } => truncate_display(&text, DISPLAY_LIMIT),
            ScanMode::Profile { .. } => text,
        }
    }

    pub fn export_file_name(&self) -> &'static str {
        match self {
            ScanMode::Trainer { .. } => "trainer_results_full.csv",
            ScanMode::Profile { .. } => "linkedin_results.csv",
        }
    }
}

/// First `limit` characters plus `...` when the text is longer, else unchanged.
pub fn truncate_display(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub name: String,
    pub profile_url: String,
    pub display_text: String,
    pub contacts: ContactInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// Ran out of pages or hit an empty page.
    Completed,
    /// The search API failed; rows from earlier pages are kept.
    FailedSoftly,
}

#[derive(Debug)]
pub struct ScanOutcome {
    pub query: String,
    pub rows: Vec<ResultRow>,
    pub status: ScanStatus,
    pub pages_scanned: u32,
    pub search_error: Option<SearchError>,
}

pub struct Pipeline<S, P> {
    search: S,
    pages: P,
    mode: ScanMode,
    max_pages: u32,
    delay: DelayPolicy,
}

impl Pipeline<SearchEngine, PageFetcher> {
    /// Wires the real Custom Search client and page fetcher.
    pub fn from_scan(scan: &ValidScan) -> Result<Self, SearchError> {
        let search = SearchEngine::new(&scan.api_key, &scan.engine_id)?;
        Ok(Pipeline::new(search, PageFetcher::new(), scan))
    }
}

impl<S: SearchBackend, P: PageSource> Pipeline<S, P> {
    pub fn new(search: S, pages: P, scan: &ValidScan) -> Self {
        Pipeline {
            search,
            pages,
            mode: ScanMode::from_input(&scan.mode),
            max_pages: scan.max_pages,
            delay: scan.delay,
        }
    }

    pub fn mode(&self) -> &ScanMode {
        &self.mode
    }

    pub fn query(&self) -> String {
        self.mode.query()
    }

    fn process_item(&self, item: &SearchItem) -> Option<ResultRow> {
        let text = self.mode.source_text(item, &self.pages);
        if !self.mode.is_relevant(&item.title, &text) {
            return None;
        }

        let contacts = extract_contacts(&text);
        Some(ResultRow {
            name: item.title.clone(),
            profile_url: item.link.clone(),
            display_text: self.mode.display_text(text),
            contacts,
        })
    }

    pub fn run(&self) -> ScanOutcome {
        let query = self.query();
        info!("Searching for: {}", query);

        let mut rows = Vec::new();
        let mut start = FIRST_START;
        let mut pages_scanned = 0;
        let mut status = ScanStatus::Completed;
        let mut search_error = None;

        for page_no in 0..self.max_pages {
            let page = match self.search.search(&query, start) {
                Ok(page) => page,
                Err(e) => {
                    error!("Stopping after {} page(s): {}", page_no, e);
                    status = ScanStatus::FailedSoftly;
                    search_error = Some(e);
                    break;
                }
            };

            if page.is_empty() {
                info!("No more results at offset {}.", start);
                break;
            }

            let before = rows.len();
            rows.extend(page.items().iter().filter_map(|item| self.process_item(item)));
            pages_scanned += 1;
            info!(
                "Page {} / {}: {} item(s), {} kept",
                page_no + 1,
                self.max_pages,
                page.items().len(),
                rows.len() - before
            );

            start += PAGE_STEP;
            self.delay.pause();
        }

        info!("Scan finished with {} row(s).", rows.len());
        ScanOutcome {
            query,
            rows,
            status,
            pages_scanned,
            search_error,
        }
    }
}
