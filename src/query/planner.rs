use super::spec::{QueryMatch, QueryOrder, QuerySort, QuerySpec, UNLIMITED};
use crate::utils::CompilerConfig;
use serde::Serialize;

/// Value slot holding the sequence number of a document
pub const SEQUENCE_NUMBER_SLOT: u32 = 0;
/// Value slot holding the publication date
pub const PUBLISHED_DATE_SLOT: u32 = 1;
/// Value slot holding the alphabetical sort key
pub const ALPHABETICAL_SLOT: u32 = 2;

/// Backend execution context the sort decision is applied to
pub trait ExecutionContext {
    /// Order results by a value slot instead of relevance
    fn configure_sort(&mut self, slot: u32, descending: bool);

    /// Drop results scoring below `percent` of the best match
    fn configure_cutoff(&mut self, percent: u32);
}

/// How results of a spec are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SortPlan {
    /// Sort by a value slot; relevance ranking is bypassed
    Value { slot: u32, descending: bool },
    /// Relevance ranking with a minimum score percentage
    Relevance { cutoff: u32 },
}

impl SortPlan {
    /// Plan the sort for `spec`
    pub fn for_spec(spec: &QuerySpec, config: &CompilerConfig) -> Self {
        match sort_slot(spec.sort()) {
            Some(slot) => SortPlan::Value {
                slot,
                descending: spec.order() == QueryOrder::Descending,
            },
            None => {
                let cutoff = match spec.match_() {
                    QueryMatch::TitleAndSynopsis => config.synopsis_cutoff,
                    QueryMatch::TitleOnly => config.default_cutoff,
                };
                SortPlan::Relevance { cutoff }
            }
        }
    }

    /// Apply the plan to a backend execution context
    pub fn apply<C: ExecutionContext + ?Sized>(&self, ctx: &mut C) {
        match *self {
            SortPlan::Value { slot, descending } => ctx.configure_sort(slot, descending),
            SortPlan::Relevance { cutoff } => ctx.configure_cutoff(cutoff),
        }
    }
}

/// Value slot for a sort key, `None` for relevance ordering
pub fn sort_slot(sort: QuerySort) -> Option<u32> {
    match sort {
        QuerySort::SequenceNumber => Some(SEQUENCE_NUMBER_SLOT),
        QuerySort::Date => Some(PUBLISHED_DATE_SLOT),
        QuerySort::Alphabetical => Some(ALPHABETICAL_SLOT),
        QuerySort::Relevance => None,
    }
}

/// Configure `ctx` with the sort or cutoff requested by `spec`
pub fn configure_execution<C: ExecutionContext + ?Sized>(spec: &QuerySpec, ctx: &mut C) {
    SortPlan::for_spec(spec, &CompilerConfig::default()).apply(ctx);
}

/// Execution settings for one spec, as a plain value.
///
/// Implements [`ExecutionContext`] so it can stand in for a backend enquire
/// object, e.g. to report or log what would be executed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    pub sort: Option<SortPlan>,
    pub offset: u32,
    /// `None` when unlimited
    pub limit: Option<u32>,
}

impl ExecutionPlan {
    pub fn for_spec(spec: &QuerySpec, config: &CompilerConfig) -> Self {
        let mut plan = ExecutionPlan {
            sort: None,
            offset: spec.offset(),
            limit: (spec.limit() != UNLIMITED).then_some(spec.limit()),
        };
        SortPlan::for_spec(spec, config).apply(&mut plan);
        plan
    }
}

impl ExecutionContext for ExecutionPlan {
    fn configure_sort(&mut self, slot: u32, descending: bool) {
        self.sort = Some(SortPlan::Value { slot, descending });
    }

    fn configure_cutoff(&mut self, percent: u32) {
        self.sort = Some(SortPlan::Relevance { cutoff: percent });
    }
}
