//! Fixed filter enumerations of the remote search form
//!
//! Callers select filters by numeric index, index 0 being the "unset"
//! sentinel. Each enumeration maps a selection to the token the remote site
//! expects in its query string.

use crate::{QueryError, QueryResult};

/// Required work experience (`experience` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Experience {
    NoExperience,
    Between1And3,
    Between3And6,
    MoreThan6,
}

/// Required education level (`education` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Education {
    NotRequiredOrNotSpecified,
    Higher,
    SpecialSecondary,
}

/// Employment type (`employment` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Employment {
    Full,
    Part,
    Probation,
    Project,
    Volunteer,
}

/// Shared index-table behaviour of the filter enumerations
pub trait LookupOption: Sized + Copy + 'static {
    /// Table name used in validation errors
    const TABLE: &'static str;

    /// All selectable values, in index order starting at index 1
    const VALUES: &'static [Self];

    /// Query-string token sent to the remote site
    fn token(&self) -> &'static str;

    /// Resolves a caller index; 0 is unset and yields `None`
    fn from_index(index: usize) -> QueryResult<Option<Self>> {
        match index {
            0 => Ok(None),
            i if i <= Self::VALUES.len() => Ok(Some(Self::VALUES[i - 1])),
            i => Err(QueryError::OutOfRange {
                table: Self::TABLE,
                index: i,
                max: Self::VALUES.len(),
            }),
        }
    }
}

impl LookupOption for Experience {
    const TABLE: &'static str = "experience";
    const VALUES: &'static [Self] = &[
        Self::NoExperience,
        Self::Between1And3,
        Self::Between3And6,
        Self::MoreThan6,
    ];

    fn token(&self) -> &'static str {
        match self {
            Self::NoExperience => "noExperience",
            Self::Between1And3 => "between1And3",
            Self::Between3And6 => "between3And6",
            Self::MoreThan6 => "moreThan6",
        }
    }
}

impl LookupOption for Education {
    const TABLE: &'static str = "education";
    const VALUES: &'static [Self] = &[
        Self::NotRequiredOrNotSpecified,
        Self::Higher,
        Self::SpecialSecondary,
    ];

    fn token(&self) -> &'static str {
        match self {
            Self::NotRequiredOrNotSpecified => "not_required_or_not_specified",
            Self::Higher => "higher",
            Self::SpecialSecondary => "special_secondary",
        }
    }
}

impl LookupOption for Employment {
    const TABLE: &'static str = "employment";
    const VALUES: &'static [Self] = &[
        Self::Full,
        Self::Part,
        Self::Probation,
        Self::Project,
        Self::Volunteer,
    ];

    fn token(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Part => "part",
            Self::Probation => "probation",
            Self::Project => "project",
            Self::Volunteer => "volunteer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_unset() {
        assert_eq!(Experience::from_index(0), Ok(None));
        assert_eq!(Education::from_index(0), Ok(None));
        assert_eq!(Employment::from_index(0), Ok(None));
    }

    #[test]
    fn test_indices_follow_form_order() {
        assert_eq!(
            Experience::from_index(2).unwrap().map(|e| e.token()),
            Some("between1And3")
        );
        assert_eq!(
            Education::from_index(1).unwrap().map(|e| e.token()),
            Some("not_required_or_not_specified")
        );
        assert_eq!(
            Employment::from_index(5).unwrap().map(|e| e.token()),
            Some("volunteer")
        );
    }

    #[test]
    fn test_out_of_range_index() {
        assert_eq!(
            Experience::from_index(5),
            Err(QueryError::OutOfRange {
                table: "experience",
                index: 5,
                max: 4
            })
        );
        assert!(Education::from_index(4).is_err());
        assert!(Employment::from_index(6).is_err());
    }
}
