//! Search query construction
//!
//! The inbound trigger carries raw numeric selections (`SearchRequest`).
//! They are validated into a typed `SearchQuery` before any network activity,
//! and the query is then rendered into the remote site's URL parameters.

mod lookup;

pub use lookup::{Education, Employment, Experience, LookupOption};

use crate::{QueryError, QueryResult};
use std::collections::BTreeSet;

/// Separator the remote form uses for multi-valued filters
const MULTI_VALUE_SEPARATOR: &str = "&";

/// Raw search request as received from the trigger layer
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// Free-text search phrase
    pub text: String,

    /// Index into the experience table, 0 = unset
    pub experience_id: usize,

    /// Indices into the education table, 0 entries are ignored
    pub education_options: Vec<usize>,

    /// Indices into the employment table, 0 entries are ignored
    pub employment_options: Vec<usize>,
}

impl SearchRequest {
    /// Creates a request with only the search text set
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Validated search query consumed by one harvest run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub area: u32,
    pub experience: Option<Experience>,
    pub education: BTreeSet<Education>,
    pub employment: BTreeSet<Employment>,
}

impl SearchQuery {
    /// Validates a raw request
    ///
    /// # Errors
    ///
    /// * `QueryError::MissingText` - the search text is empty or blank
    /// * `QueryError::OutOfRange` - a selection index is outside its table
    pub fn from_request(request: &SearchRequest, area: u32) -> QueryResult<Self> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(QueryError::MissingText);
        }

        Ok(Self {
            text: text.to_string(),
            area,
            experience: Experience::from_index(request.experience_id)?,
            education: collect_options(&request.education_options)?,
            employment: collect_options(&request.employment_options)?,
        })
    }

    /// Renders the query as URL parameters, without the `page` parameter
    ///
    /// Unset filters are omitted entirely. Multi-valued filters are sent as
    /// one parameter whose tokens are joined with `&`.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("text".to_string(), self.text.clone()),
            ("area".to_string(), self.area.to_string()),
        ];

        if let Some(experience) = self.experience {
            params.push(("experience".to_string(), experience.token().to_string()));
        }

        if let Some(value) = join_tokens(&self.education) {
            params.push(("education".to_string(), value));
        }

        if let Some(value) = join_tokens(&self.employment) {
            params.push(("employment".to_string(), value));
        }

        params
    }
}

/// Resolves every non-zero index, rejecting any out-of-range entry
fn collect_options<T: LookupOption + Ord>(indices: &[usize]) -> QueryResult<BTreeSet<T>> {
    let mut options = BTreeSet::new();
    for &index in indices {
        if let Some(option) = T::from_index(index)? {
            options.insert(option);
        }
    }
    Ok(options)
}

fn join_tokens<T: LookupOption>(options: &BTreeSet<T>) -> Option<String> {
    if options.is_empty() {
        return None;
    }

    Some(
        options
            .iter()
            .map(|o| o.token())
            .collect::<Vec<_>>()
            .join(MULTI_VALUE_SEPARATOR),
    )
}
