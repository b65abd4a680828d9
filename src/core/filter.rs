// EstateHub - core/filter.rs
//
// Composable filter-sort engine shared by the property listing, the
// service catalogue and the CRM lead panel.
// All active criteria are AND-combined; sorting is stable.
// Core layer: pure logic, no I/O.

use crate::core::content::format_currency;
use crate::core::model::{
    Lead, LeadTemperature, ListingStatus, Property, RequestStatus, ServiceCategory, ServiceOffer,
};
use crate::util::constants::BEDROOM_TOP_BUCKET;
use crate::util::error::FilterError;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::str::FromStr;

// =============================================================================
// Item and criteria traits
// =============================================================================

/// What the engine needs to know about an item to search and sort it.
pub trait Sortable {
    /// Fields searched by the free-text criterion.
    fn search_fields(&self) -> Vec<&str>;

    /// Price used by the price sorts. `None` compares equal to everything.
    fn price(&self) -> Option<f64>;

    /// Creation date used by the "latest" sort.
    fn created_at(&self) -> DateTime<Utc>;
}

/// A predicate over one kind of item.
pub trait Criteria<T> {
    fn matches(&self, item: &T) -> bool;
}

impl Sortable for Property {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.location.as_str(),
            self.description.as_str(),
        ]
    }

    fn price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Sortable for ServiceOffer {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Sortable for Lead {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.location.as_str(),
        ]
    }

    fn price(&self) -> Option<f64> {
        None
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// =============================================================================
// Criterion building blocks
// =============================================================================

/// Case-insensitive substring query. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextQuery {
    raw: String,
    lower: String,
}

impl TextQuery {
    pub fn new(query: &str) -> Self {
        let raw = query.trim().to_string();
        let lower = raw.to_lowercase();
        Self { raw, lower }
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// The query as typed (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True if any field contains the query.
    pub fn matches_any(&self, fields: &[&str]) -> bool {
        self.lower.is_empty()
            || fields
                .iter()
                .any(|field| field.to_lowercase().contains(&self.lower))
    }
}

/// Equality criterion with an "all" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T: FromStr<Err = FilterError>> Selection<T> {
    /// Parse a select-box value: `"all"` (or empty) bypasses the filter.
    pub fn parse(value: &str) -> Result<Self, FilterError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Ok(Selection::All)
        } else {
            trimmed.parse().map(Selection::Only)
        }
    }
}

/// Inclusive price bounds. `min > max` admits nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }

    /// Bounds covering every priced item, or `None` if nothing has a price.
    pub fn spanning<T: Sortable>(items: &[T]) -> Option<Self> {
        items
            .iter()
            .filter_map(Sortable::price)
            .fold(None, |acc: Option<Self>, price| match acc {
                None => Some(Self::new(price, price)),
                Some(r) => Some(Self::new(r.min.min(price), r.max.max(price))),
            })
    }

    /// True if this range excludes part of `outer`.
    pub fn is_narrower_than(&self, outer: &PriceRange) -> bool {
        self.min > outer.min || self.max < outer.max
    }
}

/// Bedroom criterion.
///
/// A plain count below [`BEDROOM_TOP_BUCKET`] is exact; the top bucket
/// (and anything above it, or an explicit `N+`) is a minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BedroomFilter {
    #[default]
    Any,
    Exactly(u32),
    AtLeast(u32),
}

impl BedroomFilter {
    pub fn admits(&self, bedrooms: u32) -> bool {
        match *self {
            BedroomFilter::Any => true,
            BedroomFilter::Exactly(n) => bedrooms == n,
            BedroomFilter::AtLeast(n) => bedrooms >= n,
        }
    }

    /// Chip label, e.g. "1 Bedroom", "2 Bedrooms", "4+ Bedrooms".
    pub fn label(&self) -> Option<String> {
        match *self {
            BedroomFilter::Any => None,
            BedroomFilter::Exactly(1) => Some("1 Bedroom".to_string()),
            BedroomFilter::Exactly(n) => Some(format!("{n} Bedrooms")),
            BedroomFilter::AtLeast(n) => Some(format!("{n}+ Bedrooms")),
        }
    }
}

impl FromStr for BedroomFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("any") {
            return Ok(BedroomFilter::Any);
        }
        let (digits, plus) = match trimmed.strip_suffix('+') {
            Some(d) => (d.trim(), true),
            None => (trimmed, false),
        };
        let n: u32 = digits.parse().map_err(|_| FilterError::InvalidNumber {
            field: "bedrooms",
            value: s.to_string(),
        })?;
        if plus || n >= BEDROOM_TOP_BUCKET {
            Ok(BedroomFilter::AtLeast(n))
        } else {
            Ok(BedroomFilter::Exactly(n))
        }
    }
}

/// Sort order for listing views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    /// Creation date, newest first.
    #[default]
    Latest,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::Latest => "latest",
        }
    }
}

impl FromStr for SortKey {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price-asc" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "latest" => Ok(SortKey::Latest),
            _ => Err(FilterError::UnknownValue {
                field: "sort key",
                value: s.to_string(),
                expected: "price-asc, price-desc, latest".to_string(),
            }),
        }
    }
}

// =============================================================================
// Per-entity criteria
// =============================================================================

/// Property listing filters.
#[derive(Debug, Clone, Default)]
pub struct PropertyCriteria {
    pub search: TextQuery,
    /// `None` = no price bound.
    pub price: Option<PriceRange>,
    pub bedrooms: BedroomFilter,
    pub status: Selection<ListingStatus>,
}

impl Criteria<Property> for PropertyCriteria {
    fn matches(&self, item: &Property) -> bool {
        self.search.matches_any(&item.search_fields())
            && self.price.map_or(true, |r| r.contains(item.price))
            && self.bedrooms.admits(item.bedrooms)
            && self.status.admits(&item.status)
    }
}

impl PropertyCriteria {
    /// Human-readable chips for the active filters.
    ///
    /// The price chip only appears when the range is narrower than
    /// `default_range` (or when there is no default to compare against).
    pub fn active_labels(&self, default_range: Option<PriceRange>) -> Vec<String> {
        let mut labels = Vec::new();
        if !self.search.is_empty() {
            labels.push(format!("Search: \"{}\"", self.search.as_str()));
        }
        if let Some(range) = self.price {
            let narrowed = default_range.map_or(true, |outer| range.is_narrower_than(&outer));
            if narrowed {
                labels.push(format!(
                    "Price: {} - {}",
                    format_currency(range.min),
                    format_currency(range.max)
                ));
            }
        }
        if let Some(label) = self.bedrooms.label() {
            labels.push(label);
        }
        if let Selection::Only(status) = self.status {
            labels.push(format!("Status: {}", status.label()));
        }
        labels
    }
}

/// Service catalogue filters.
#[derive(Debug, Clone, Default)]
pub struct ServiceCriteria {
    pub search: TextQuery,
    pub category: Selection<ServiceCategory>,
    pub price: Option<PriceRange>,
}

impl Criteria<ServiceOffer> for ServiceCriteria {
    fn matches(&self, item: &ServiceOffer) -> bool {
        self.search.matches_any(&item.search_fields())
            && self.category.admits(&item.category)
            && self.price.map_or(true, |r| r.contains(item.price))
    }
}

/// CRM lead panel filters.
#[derive(Debug, Clone, Default)]
pub struct LeadCriteria {
    pub search: TextQuery,
    pub status: Selection<RequestStatus>,
    pub temperature: Selection<LeadTemperature>,
    /// Lowercased location fragment; `None` = all locations.
    pub location: Option<String>,
}

impl LeadCriteria {
    /// Normalise a location picker value: `"all"` or empty disables it.
    pub fn location_filter(value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(trimmed.to_lowercase())
        }
    }
}

impl Criteria<Lead> for LeadCriteria {
    fn matches(&self, item: &Lead) -> bool {
        self.search.matches_any(&item.search_fields())
            && self.status.admits(&item.status)
            && self.temperature.admits(&item.temperature)
            && self
                .location
                .as_deref()
                .map_or(true, |loc| item.location.to_lowercase().contains(loc))
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Apply criteria and sort, returning indices into `items`.
///
/// Indices avoid copying items and let callers keep a cheap filtered view
/// over the full collection.
pub fn filter_indices<T, C>(items: &[T], criteria: &C, sort: SortKey) -> Vec<usize>
where
    T: Sortable,
    C: Criteria<T> + ?Sized,
{
    let mut indices: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| criteria.matches(item))
        .map(|(idx, _)| idx)
        .collect();
    // sort_by is stable: ties keep their original array order.
    indices.sort_by(|&a, &b| compare(&items[a], &items[b], sort));
    indices
}

/// Apply criteria and sort, returning references to the matching items.
pub fn filter_and_sort<'a, T, C>(items: &'a [T], criteria: &C, sort: SortKey) -> Vec<&'a T>
where
    T: Sortable,
    C: Criteria<T> + ?Sized,
{
    filter_indices(items, criteria, sort)
        .into_iter()
        .map(|idx| &items[idx])
        .collect()
}

/// Stable sort of an already-filtered view.
pub fn sort_items<T: Sortable>(items: &mut [&T], sort: SortKey) {
    items.sort_by(|a, b| compare(*a, *b, sort));
}

fn compare<T: Sortable>(a: &T, b: &T, sort: SortKey) -> Ordering {
    match sort {
        SortKey::PriceAsc => compare_price(a.price(), b.price(), false),
        SortKey::PriceDesc => compare_price(a.price(), b.price(), true),
        SortKey::Latest => b.created_at().cmp(&a.created_at()),
    }
}

/// Priced items first; unpriced items keep their relative order at the end.
fn compare_price(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if descending => y.total_cmp(&x),
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// =============================================================================
// Pagination and facets
// =============================================================================

/// One page of a filtered view.
#[derive(Debug, Clone)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    /// 1-based page number that was requested.
    pub page: usize,
    pub page_size: usize,
    /// Number of items across all pages.
    pub total: usize,
    pub total_pages: usize,
}

/// Slice a filtered view into a 1-based page.
///
/// Page 0 is treated as page 1; a page past the end is empty. A zero page
/// size is clamped to 1.
pub fn paginate<'a, T>(items: &[&'a T], page: usize, page_size: usize) -> Page<'a, T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);
    let slice = if start < total {
        &items[start..(start + page_size).min(total)]
    } else {
        &[]
    };
    Page {
        items: slice.to_vec(),
        page,
        page_size,
        total,
        total_pages,
    }
}

/// Distinct categories in first-seen order (for the category picker).
pub fn service_categories(offers: &[ServiceOffer]) -> Vec<ServiceCategory> {
    let mut seen = Vec::new();
    for offer in offers {
        if !seen.contains(&offer.category) {
            seen.push(offer.category);
        }
    }
    seen
}

/// Distinct lead regions in first-seen order (for the location picker).
pub fn lead_regions(leads: &[Lead]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for lead in leads {
        let region = lead.region();
        if !seen.iter().any(|r| r == region) {
            seen.push(region.to_string());
        }
    }
    seen
}
