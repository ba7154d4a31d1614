//! Listing extraction from result-page markup
//!
//! A result page holds a list of listing cards. Each card is re-parsed as its
//! own fragment before its fields are looked up, so a field selector can never
//! pick up text from a neighbouring card.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Placeholder stored when an optional field is absent from a card
pub const NOT_SPECIFIED: &str = "Не указана";

static CARD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".vacancy-search-item__card").expect("invalid selector: card")
});
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"span[class*="vacancy-name"]"#).expect("invalid selector: title")
});
static SALARY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"span[class*="compensation-text"]"#).expect("invalid selector: salary")
});
static COMPANY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"span[class*="company-info-text"]"#).expect("invalid selector: company")
});
static LOCATION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"span[data-qa*="vacancy-serp__vacancy-address"]"#)
        .expect("invalid selector: location")
});

/// One job posting extracted from a listing card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub title: String,
    pub salary: String,
    pub company: String,
    pub location: String,
}

/// Fields a card cannot be recorded without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Location,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title => write!(f, "title"),
            Self::Location => write!(f, "location"),
        }
    }
}

/// A listing card lacks a required field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("card {card_index} is missing required field `{missing_field}`")]
pub struct ExtractionFault {
    /// Zero-based position of the card on its page
    pub card_index: usize,
    pub missing_field: RequiredField,
}

/// Extracts all listing records from one result page
///
/// Cards are returned in document order. A page without any card yields an
/// empty vector; that is the normal end-of-pagination signal, not an error.
///
/// # Errors
///
/// Returns `ExtractionFault` for the first card whose title or location is
/// missing or blank. The whole page fails, malformed cards are never skipped.
///
/// # Example
///
/// ```
/// use vacancy_harvester::harvester::extract_records;
///
/// let html = r#"<div class="vacancy-search-item__card">
///     <span class="serp-item__vacancy-name">Rust developer</span>
///     <span data-qa="vacancy-serp__vacancy-address">Москва</span>
/// </div>"#;
/// let records = extract_records(html).unwrap();
/// assert_eq!(records[0].title, "Rust developer");
/// assert_eq!(records[0].salary, "Не указана");
/// ```
pub fn extract_records(html: &str) -> Result<Vec<ListingRecord>, ExtractionFault> {
    let document = Html::parse_document(html);

    document
        .select(&CARD_SELECTOR)
        .enumerate()
        .map(|(card_index, card)| extract_card(card_index, card))
        .collect()
}

/// Extracts one card inside its own isolated fragment
fn extract_card(card_index: usize, card: ElementRef) -> Result<ListingRecord, ExtractionFault> {
    let fragment = Html::parse_fragment(&card.html());

    let required = |selector: &Selector, field: RequiredField| {
        field_text(&fragment, selector)
            .filter(|text| !text.is_empty())
            .ok_or(ExtractionFault {
            card_index,
            missing_field: field,
        })
    };

    let title = required(&TITLE_SELECTOR, RequiredField::Title)?;
    let location = required(&LOCATION_SELECTOR, RequiredField::Location)?;

    let salary = field_text(&fragment, &SALARY_SELECTOR).unwrap_or_else(not_specified);
    let company = field_text(&fragment, &COMPANY_SELECTOR).unwrap_or_else(not_specified);

    Ok(ListingRecord {
        title,
        salary,
        company,
        location,
    })
}

/// Trimmed text of the first matching element, `None` if absent
fn field_text(fragment: &Html, selector: &Selector) -> Option<String> {
    fragment
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

fn not_specified() -> String {
    NOT_SPECIFIED.to_string()
}
