//! Shared domain enumerations aligned with the backend's wire values.

use std::fmt;
use std::str::FromStr;

pub use quire_api_types::{CommentSort, CommentStatus, Role, UnknownVariant};

/// Ordering applied to article listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Latest,
    Popular,
    Views,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Latest => "latest",
            SortBy::Popular => "popular",
            SortBy::Views => "views",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(SortBy::Latest),
            "popular" => Ok(SortBy::Popular),
            "views" => Ok(SortBy::Views),
            other => Err(UnknownVariant::new("sort_by", other)),
        }
    }
}

/// Publication window applied to article listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    All,
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::All => "all",
            TimeRange::Day => "day",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TimeRange::All),
            "day" => Ok(TimeRange::Day),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            other => Err(UnknownVariant::new("time_range", other)),
        }
    }
}
