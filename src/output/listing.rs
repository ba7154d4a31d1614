//! Query surface over the stored snapshot

use crate::harvester::ListingRecord;
use crate::output::OutputResult;
use crate::storage::{RecordFilter, SnapshotStore};
use serde::Serialize;

/// One listing as a positional `[title, salary, company, location]` row
pub type ListingRow<'a> = (&'a str, &'a str, &'a str, &'a str);

/// JSON body returned for a listing query
#[derive(Debug, Serialize)]
pub struct ListingResponse<'a> {
    pub vacancies: Vec<ListingRow<'a>>,
}

impl<'a> ListingResponse<'a> {
    pub fn new(records: &'a [ListingRecord]) -> Self {
        let vacancies = records
            .iter()
            .map(|r| {
                (
                    r.title.as_str(),
                    r.salary.as_str(),
                    r.company.as_str(),
                    r.location.as_str(),
                )
            })
            .collect();
        Self { vacancies }
    }
}

/// Reads the stored listings matching `filter`
///
/// Logs the applied filters and the number of listings found.
pub fn list_vacancies(
    store: &dyn SnapshotStore,
    filter: &RecordFilter,
) -> OutputResult<Vec<ListingRecord>> {
    tracing::info!(
        "Listing vacancies (company: {}, salary: {}, location: {})",
        describe(&filter.company),
        describe(&filter.salary),
        describe(&filter.location)
    );

    let records = store.list(filter)?;

    tracing::info!("Found {} vacancies", records.len());

    Ok(records)
}

/// Renders listings as `{"vacancies": [[title, salary, company, location], ...]}`
pub fn render_json(records: &[ListingRecord]) -> OutputResult<String> {
    let response = ListingResponse::new(records);
    Ok(serde_json::to_string_pretty(&response)?)
}

/// Prints listings to stdout, one block per record
pub fn print_listings(records: &[ListingRecord]) {
    if records.is_empty() {
        println!("No vacancies found");
        return;
    }

    println!("=== Vacancies ({}) ===\n", records.len());

    for (index, record) in records.iter().enumerate() {
        println!("{}. {}", index + 1, record.title);
        println!("   Company:  {}", record.company);
        println!("   Salary:   {}", record.salary);
        println!("   Location: {}", record.location);
        println!();
    }
}

fn describe(term: &Option<String>) -> &str {
    match term.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => "any",
    }
}
