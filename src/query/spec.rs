use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Limit value meaning "no limit"
pub const UNLIMITED: u32 = u32::MAX;

/// How search terms are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryMode {
    /// Partial (prefix) matching for as-you-type search
    #[default]
    Incremental,
    /// Whole-word matching
    Standard,
}

/// Which parts of a document participate in matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryMatch {
    #[default]
    TitleOnly,
    TitleAndSynopsis,
}

/// Result ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuerySort {
    #[default]
    Relevance,
    SequenceNumber,
    Date,
    Alphabetical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryOrder {
    #[default]
    Ascending,
    Descending,
}

macro_rules! enum_names {
    ($ty:ident { $($variant:ident => $name:literal),* $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)*
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)*
                    _ => Err(format!(
                        "unknown {} '{}', expected one of: {}",
                        stringify!($ty),
                        s,
                        [$($name),*].join(", ")
                    )),
                }
            }
        }
    };
}

enum_names!(QueryMode { Incremental => "incremental", Standard => "standard" });
enum_names!(QueryMatch { TitleOnly => "title-only", TitleAndSynopsis => "title-and-synopsis" });
enum_names!(QuerySort {
    Relevance => "relevance",
    SequenceNumber => "sequence-number",
    Date => "date",
    Alphabetical => "alphabetical",
});
enum_names!(QueryOrder { Ascending => "ascending", Descending => "descending" });

/// Immutable description of a search against a content database.
///
/// All values are fixed at construction. Use [`QuerySpec::builder`] to create
/// one, or [`QuerySpec::to_builder`] to derive a new spec with a few values
/// changed:
///
/// ```
/// use knowledge_query::query::{QuerySpec, QueryMatch};
///
/// let spec = QuerySpec::builder().search_terms("cat").build();
/// let wider = spec.to_builder().match_(QueryMatch::TitleAndSynopsis).build();
/// assert_eq!(wider.search_terms(), Some("cat"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySpec {
    app_id: Option<String>,
    search_terms: Option<String>,
    corrected_terms: Option<String>,
    stopword_free_terms: Option<String>,
    literal_query: Option<String>,
    content_type: Option<String>,
    excluded_content_type: Option<String>,
    mode: QueryMode,
    #[serde(rename = "match")]
    match_: QueryMatch,
    sort: QuerySort,
    order: QueryOrder,
    limit: u32,
    offset: u32,
    tags_match_all: BTreeSet<String>,
    tags_match_any: BTreeSet<String>,
    ids: Vec<String>,
    excluded_ids: Vec<String>,
    excluded_tags: BTreeSet<String>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            app_id: None,
            search_terms: None,
            corrected_terms: None,
            stopword_free_terms: None,
            literal_query: None,
            content_type: None,
            excluded_content_type: None,
            mode: QueryMode::default(),
            match_: QueryMatch::default(),
            sort: QuerySort::default(),
            order: QueryOrder::default(),
            limit: UNLIMITED,
            offset: 0,
            tags_match_all: BTreeSet::new(),
            tags_match_any: BTreeSet::new(),
            ids: Vec::new(),
            excluded_ids: Vec::new(),
            excluded_tags: BTreeSet::new(),
        }
    }
}

impl QuerySpec {
    pub fn builder() -> QuerySpecBuilder {
        QuerySpecBuilder::default()
    }

    /// Builder pre-filled with every value of `self`
    pub fn to_builder(&self) -> QuerySpecBuilder {
        QuerySpecBuilder { spec: self.clone() }
    }

    /// App id of the database to query; filled in by the engine when absent
    pub fn app_id(&self) -> Option<&str> {
        self.app_id.as_deref()
    }

    /// Query text as typed by the user
    pub fn search_terms(&self) -> Option<&str> {
        self.search_terms.as_deref()
    }

    /// `search_terms` with typos corrected
    pub fn corrected_terms(&self) -> Option<&str> {
        self.corrected_terms.as_deref()
    }

    /// `search_terms` without stopwords. Carried for callers; not used when
    /// building the query.
    pub fn stopword_free_terms(&self) -> Option<&str> {
        self.stopword_free_terms.as_deref()
    }

    /// Literal backend query overriding everything else (debugging aid)
    pub fn literal_query(&self) -> Option<&str> {
        self.literal_query.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn excluded_content_type(&self) -> Option<&str> {
        self.excluded_content_type.as_deref()
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    pub fn match_(&self) -> QueryMatch {
        self.match_
    }

    pub fn sort(&self) -> QuerySort {
        self.sort
    }

    pub fn order(&self) -> QueryOrder {
        self.order
    }

    /// Maximum number of results, [`UNLIMITED`] for no limit
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of results to skip
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn tags_match_all(&self) -> &BTreeSet<String> {
        &self.tags_match_all
    }

    pub fn tags_match_any(&self) -> &BTreeSet<String> {
        &self.tags_match_any
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn excluded_ids(&self) -> &[String] {
        &self.excluded_ids
    }

    pub fn excluded_tags(&self) -> &BTreeSet<String> {
        &self.excluded_tags
    }

    /// True when the spec has no search terms, i.e. it matches everything
    /// allowed by its filters
    pub fn is_match_all(&self) -> bool {
        self.search_terms.is_none()
    }

    /// Human-readable dump of every non-default value, for logs and tests.
    /// The format is not stable and must not be parsed.
    pub fn debug_describe(&self) -> String {
        let mut props: Vec<String> = Vec::new();

        let strings = [
            ("app_id", &self.app_id),
            ("search_terms", &self.search_terms),
            ("corrected_terms", &self.corrected_terms),
            ("stopword_free_terms", &self.stopword_free_terms),
            ("literal_query", &self.literal_query),
            ("content_type", &self.content_type),
            ("excluded_content_type", &self.excluded_content_type),
        ];
        for (name, value) in strings {
            if let Some(v) = value {
                props.push(format!("{}: \"{}\"", name, v));
            }
        }

        if self.mode != QueryMode::default() {
            props.push(format!("mode: {}", self.mode));
        }
        if self.match_ != QueryMatch::default() {
            props.push(format!("match: {}", self.match_));
        }
        if self.sort != QuerySort::default() {
            props.push(format!("sort: {}", self.sort));
        }
        if self.order != QueryOrder::default() {
            props.push(format!("order: {}", self.order));
        }
        if self.limit != UNLIMITED {
            props.push(format!("limit: {}", self.limit));
        }
        if self.offset != 0 {
            props.push(format!("offset: {}", self.offset));
        }

        push_list(&mut props, "tags_match_all", &self.tags_match_all);
        push_list(&mut props, "tags_match_any", &self.tags_match_any);
        push_list(&mut props, "ids", &self.ids);
        push_list(&mut props, "excluded_ids", &self.excluded_ids);
        push_list(&mut props, "excluded_tags", &self.excluded_tags);

        format!("Query({{{}}})", props.join(", "))
    }
}

fn push_list<'a, I>(props: &mut Vec<String>, name: &str, values: I)
where
    I: IntoIterator<Item = &'a String>,
{
    let quoted: Vec<String> = values.into_iter().map(|v| format!("\"{}\"", v)).collect();
    if !quoted.is_empty() {
        props.push(format!("{}: [{}]", name, quoted.join(", ")));
    }
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_describe())
    }
}

/// Builder for [`QuerySpec`]
#[derive(Debug, Clone, Default)]
pub struct QuerySpecBuilder {
    spec: QuerySpec,
}

macro_rules! string_setters {
    ($($field:ident),* $(,)?) => {
        $(
            pub fn $field(mut self, value: impl Into<String>) -> Self {
                self.spec.$field = Some(value.into());
                self
            }
        )*
    };
}

macro_rules! set_setters {
    ($($field:ident),* $(,)?) => {
        $(
            pub fn $field<I, S>(mut self, values: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.spec.$field = values.into_iter().map(Into::into).collect();
                self
            }
        )*
    };
}

impl QuerySpecBuilder {
    string_setters!(
        app_id,
        search_terms,
        corrected_terms,
        stopword_free_terms,
        literal_query,
        content_type,
        excluded_content_type,
    );

    set_setters!(tags_match_all, tags_match_any, ids, excluded_ids, excluded_tags);

    pub fn mode(mut self, mode: QueryMode) -> Self {
        self.spec.mode = mode;
        self
    }

    pub fn match_(mut self, match_: QueryMatch) -> Self {
        self.spec.match_ = match_;
        self
    }

    pub fn sort(mut self, sort: QuerySort) -> Self {
        self.spec.sort = sort;
        self
    }

    pub fn order(mut self, order: QueryOrder) -> Self {
        self.spec.order = order;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.spec.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.spec.offset = offset;
        self
    }

    /// Unset the search terms, turning the spec into a match-all query
    pub fn clear_search_terms(mut self) -> Self {
        self.spec.search_terms = None;
        self.spec.corrected_terms = None;
        self.spec.stopword_free_terms = None;
        self
    }

    pub fn build(self) -> QuerySpec {
        self.spec
    }
}
