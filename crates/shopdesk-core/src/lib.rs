//! Core dashboard logic: pagination, search, the record directory and the cart

pub mod cart;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod query;
pub mod reports;
pub mod types;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shopdesk_loader::{RecordSet, SourceRef};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

pub use cart::{Cart, CartError, CartSummary, DueStatus, LineItem, SummaryRequest};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use filter::SearchFilter;
pub use query::{DateRange, ListPage, ListQuery};
pub use reports::{Grouping, ReportKind, ReportPage, ReportQuery};
pub use types::{Column, ColumnFormat, EntityKind, Record};

/// Outcome of a (re)load
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub counts: BTreeMap<EntityKind, usize>,
    /// File stems that did not name a known entity
    pub skipped: Vec<String>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadSummary {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// All records, grouped by kind
pub struct Directory {
    source: SourceRef,
    data_path: Option<PathBuf>,
    records: HashMap<EntityKind, Vec<Record>>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Directory {
    pub fn new(source: SourceRef) -> Self {
        Self {
            source,
            data_path: None,
            records: HashMap::new(),
            loaded_at: None,
        }
    }

    /// Read every record file under `data_path`.
    ///
    /// The path is remembered even when loading fails, so a later `reload`
    /// retries it. On failure the previously loaded records are kept.
    pub async fn load(&mut self, data_path: PathBuf) -> CoreResult<LoadSummary> {
        self.data_path = Some(data_path.clone());
        let sets = self.source.load_dir(data_path.clone()).await?;
        let (records, skipped) = Self::group(sets);

        let loaded_at = Utc::now();
        self.records = records;
        self.loaded_at = Some(loaded_at);

        let summary = LoadSummary {
            counts: self.counts(),
            skipped,
            loaded_at,
        };
        log::info!("Loaded {} records from {}", summary.total(), data_path.display());
        Ok(summary)
    }

    /// Load again from the last data path
    pub async fn reload(&mut self) -> CoreResult<LoadSummary> {
        match self.data_path.clone() {
            Some(path) => self.load(path).await,
            None => Err(CoreError::NotLoaded),
        }
    }

    fn group(sets: Vec<RecordSet>) -> (HashMap<EntityKind, Vec<Record>>, Vec<String>) {
        let mut records: HashMap<EntityKind, Vec<Record>> = HashMap::new();
        let mut skipped = Vec::new();

        for set in sets {
            match set.name.parse::<EntityKind>() {
                Ok(kind) => records.entry(kind).or_default().extend(set.records),
                Err(_) => {
                    log::warn!("Skipping unrecognised data file: {}", set.name);
                    skipped.push(set.name);
                }
            }
        }

        (records, skipped)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    fn records_of(&self, kind: EntityKind) -> CoreResult<&[Record]> {
        if !self.is_loaded() {
            return Err(CoreError::NotLoaded);
        }
        Ok(self.records.get(&kind).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// One page of `kind` records: search, date range and status, then slice
    pub fn list(&self, kind: EntityKind, query: &ListQuery) -> CoreResult<ListPage> {
        let records = self.records_of(kind)?;
        let filter = SearchFilter::new(kind.search_keys().iter().copied());

        let mut matched = filter.apply(records, query.search.as_deref().unwrap_or(""));
        if let Some(field) = kind.date_field() {
            matched.retain(|r| query.dates.contains_record(r, field));
        }
        matched.retain(|r| query.matches_status(r));

        let total_count = matched.len();
        let page_records = matched
            .into_iter()
            .skip(query.offset())
            .take(query.limit)
            .cloned()
            .collect();

        Ok(ListPage {
            records: page_records,
            total_count,
            page: query.page,
            limit: query.limit,
        })
    }

    /// Record of `kind` whose `id` field equals `id`
    pub fn record(&self, kind: EntityKind, id: &str) -> CoreResult<Record> {
        self.records_of(kind)?
            .iter()
            .find(|r| types::record_id(r).as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| CoreError::RecordNotFound {
                entity: kind.plural().to_string(),
                id: id.to_string(),
            })
    }

    /// Autocomplete matches over the kind's search keys
    pub fn suggest(&self, kind: EntityKind, query: &str, max: usize) -> CoreResult<Vec<Record>> {
        let records = self.records_of(kind)?;
        let filter = SearchFilter::new(kind.search_keys().iter().copied());
        Ok(filter.suggest(records, query, max).into_iter().cloned().collect())
    }

    /// One page of a report, totals computed over every matching row
    pub fn report(&self, kind: ReportKind, query: &ReportQuery) -> CoreResult<ReportPage> {
        let sources = reports::ReportSources {
            sheets: self.records_of(EntityKind::Sheets)?,
            progress: self.records_of(EntityKind::Progress)?,
            employees: self.records_of(EntityKind::Employees)?,
            customers: self.records_of(EntityKind::Customers)?,
        };
        Ok(reports::build_report(kind, &sources, query))
    }

    /// Record count per kind; kinds without a data file count as zero
    pub fn counts(&self) -> BTreeMap<EntityKind, usize> {
        EntityKind::ALL
            .iter()
            .map(|kind| (*kind, self.records.get(kind).map_or(0, Vec::len)))
            .collect()
    }
}

// ==================== Tests ====================
