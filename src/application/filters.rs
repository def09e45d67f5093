//! Article search filters and their URL query representation.

use std::collections::BTreeSet;
use std::str::FromStr;

use tracing::debug;
use url::Url;
use url::form_urlencoded;

use crate::domain::types::{SortBy, TimeRange};

const KEY_KEYWORD: &str = "keyword";
const KEY_AUTHOR: &str = "author";
const KEY_SORT_BY: &str = "sort_by";
const KEY_TIME_RANGE: &str = "time_range";
const KEY_CATEGORY_IDS: &str = "category_ids";
const KEY_TAG_IDS: &str = "tag_ids";
const KEY_CATEGORY: &str = "category";
const KEY_PAGE: &str = "page";
const KEY_AUTO_SEARCH: &str = "auto_search";

/// Filter fields of the article search form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub keyword: Option<String>,
    pub author: Option<String>,
    pub sort_by: SortBy,
    pub time_range: TimeRange,
    pub category_ids: BTreeSet<i64>,
    pub tag_ids: BTreeSet<i64>,
}

impl FilterState {
    /// Query parameters understood by `GET api/articles`.
    pub fn api_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(keyword) = &self.keyword {
            pairs.push((KEY_KEYWORD, keyword.clone()));
        }
        if let Some(author) = &self.author {
            pairs.push((KEY_AUTHOR, author.clone()));
        }
        pairs.push((KEY_SORT_BY, self.sort_by.as_str().to_string()));
        pairs.push((KEY_TIME_RANGE, self.time_range.as_str().to_string()));
        if !self.category_ids.is_empty() {
            pairs.push((KEY_CATEGORY_IDS, join_ids(&self.category_ids)));
        }
        if !self.tag_ids.is_empty() {
            pairs.push((KEY_TAG_IDS, join_ids(&self.tag_ids)));
        }
        pairs
    }
}

/// Everything the search page reads from its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlFilters {
    pub state: FilterState,
    /// Category given by display name, to be resolved to an ID.
    pub category_name: Option<String>,
    pub page: u32,
    /// Request to run the search immediately after navigation.
    pub auto_search: bool,
    /// Parameters this page does not own, kept verbatim.
    pub extra: Vec<(String, String)>,
}

impl Default for UrlFilters {
    fn default() -> Self {
        Self {
            state: FilterState::default(),
            category_name: None,
            page: 1,
            auto_search: false,
            extra: Vec::new(),
        }
    }
}

impl UrlFilters {
    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    /// Parse a raw query string. Values that do not parse are skipped.
    pub fn from_query(query: &str) -> Self {
        let mut filters = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                KEY_KEYWORD => filters.state.keyword = non_blank(&value),
                KEY_AUTHOR => filters.state.author = non_blank(&value),
                KEY_SORT_BY => {
                    if let Some(sort_by) = parse_or_skip(KEY_SORT_BY, &value) {
                        filters.state.sort_by = sort_by;
                    }
                }
                KEY_TIME_RANGE => {
                    if let Some(range) = parse_or_skip(KEY_TIME_RANGE, &value) {
                        filters.state.time_range = range;
                    }
                }
                KEY_CATEGORY_IDS => {
                    extend_ids(&mut filters.state.category_ids, KEY_CATEGORY_IDS, &value);
                }
                KEY_TAG_IDS => extend_ids(&mut filters.state.tag_ids, KEY_TAG_IDS, &value),
                KEY_CATEGORY => filters.category_name = non_blank(&value),
                KEY_PAGE => match value.trim().parse::<u32>() {
                    Ok(page) if page >= 1 => filters.page = page,
                    _ => debug!(key = KEY_PAGE, value = %value, "ignoring query value"),
                },
                KEY_AUTO_SEARCH => {
                    filters.auto_search = matches!(value.trim(), "true" | "1");
                }
                _ => filters.extra.push((key.into_owned(), value.into_owned())),
            }
        }
        filters
    }

    /// Rewrite the query of `url` from this state.
    ///
    /// Only non-default fields are written. The one-shot `auto_search` flag
    /// and the `category` name never survive a write-back.
    pub fn write_to_url(&self, url: &mut Url) {
        let query = self.to_query();
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&query));
        }
    }

    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.extra {
            serializer.append_pair(key, value);
        }
        let state = &self.state;
        if let Some(keyword) = &state.keyword {
            serializer.append_pair(KEY_KEYWORD, keyword);
        }
        if let Some(author) = &state.author {
            serializer.append_pair(KEY_AUTHOR, author);
        }
        if state.sort_by != SortBy::default() {
            serializer.append_pair(KEY_SORT_BY, state.sort_by.as_str());
        }
        if state.time_range != TimeRange::default() {
            serializer.append_pair(KEY_TIME_RANGE, state.time_range.as_str());
        }
        if !state.category_ids.is_empty() {
            serializer.append_pair(KEY_CATEGORY_IDS, &join_ids(&state.category_ids));
        }
        if !state.tag_ids.is_empty() {
            serializer.append_pair(KEY_TAG_IDS, &join_ids(&state.tag_ids));
        }
        if self.page > 1 {
            serializer.append_pair(KEY_PAGE, &self.page.to_string());
        }
        serializer.finish()
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_or_skip<T: FromStr>(key: &'static str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!(key, value, "ignoring query value");
            None
        }
    }
}

fn extend_ids(ids: &mut BTreeSet<i64>, key: &'static str, value: &str) {
    for piece in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if let Some(id) = parse_or_skip(key, piece) {
            ids.insert(id);
        }
    }
}

fn join_ids(ids: &BTreeSet<i64>) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_key() {
        let filters = UrlFilters::from_query(
            "keyword=async%20rust&author=ada&sort_by=views&time_range=week\
             &category_ids=5,3&tag_ids=9&tag_ids=2&category=Rust&page=3&auto_search=1",
        );
        assert_eq!(filters.state.keyword.as_deref(), Some("async rust"));
        assert_eq!(filters.state.author.as_deref(), Some("ada"));
        assert_eq!(filters.state.sort_by, SortBy::Views);
        assert_eq!(filters.state.time_range, TimeRange::Week);
        assert_eq!(filters.state.category_ids, BTreeSet::from([3, 5]));
        assert_eq!(filters.state.tag_ids, BTreeSet::from([2, 9]));
        assert_eq!(filters.category_name.as_deref(), Some("Rust"));
        assert_eq!(filters.page, 3);
        assert!(filters.auto_search);
        assert!(filters.extra.is_empty());
    }

    #[test]
    fn bad_values_are_ignored() {
        let filters =
            UrlFilters::from_query("sort_by=oldest&time_range=decade&category_ids=5,x,&page=0");
        assert_eq!(filters.state.sort_by, SortBy::Latest);
        assert_eq!(filters.state.time_range, TimeRange::All);
        assert_eq!(filters.state.category_ids, BTreeSet::from([5]));
        assert_eq!(filters.page, 1);
    }

    #[test]
    fn auto_search_only_accepts_true_or_one() {
        assert!(UrlFilters::from_query("auto_search=true").auto_search);
        assert!(!UrlFilters::from_query("auto_search=yes").auto_search);
        assert!(!UrlFilters::from_query("").auto_search);
    }

    #[test]
    fn write_back_keeps_unknown_keys_and_drops_one_shot_keys() {
        let mut url = Url::parse(
            "https://blog.example.com/search?utm_source=feed&category_ids=7&category=Go&auto_search=true",
        )
        .unwrap();
        let filters = UrlFilters::from_url(&url);
        filters.write_to_url(&mut url);
        assert_eq!(url.query(), Some("utm_source=feed&category_ids=7"));
    }

    #[test]
    fn default_state_clears_the_query() {
        let mut url = Url::parse("https://blog.example.com/search?sort_by=latest&page=1").unwrap();
        UrlFilters::from_url(&url).write_to_url(&mut url);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn ids_are_written_sorted_and_comma_joined() {
        let filters = UrlFilters::from_query("tag_ids=9&tag_ids=2,4");
        assert_eq!(filters.to_query(), "tag_ids=2%2C4%2C9");
        let pairs = filters.state.api_pairs();
        assert!(pairs.contains(&("tag_ids", "2,4,9".to_string())));
    }

    #[test]
    fn api_pairs_always_carry_ordering() {
        let pairs = FilterState::default().api_pairs();
        assert_eq!(
            pairs,
            vec![
                ("sort_by", "latest".to_string()),
                ("time_range", "all".to_string())
            ]
        );
    }
}
