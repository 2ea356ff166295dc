//! Plan-application engine for candidate search.
//!
//! Every function here is pure: records are borrowed, never mutated, and results are new
//! vectors of references into the caller's slice.

pub mod aggregate;
pub mod field;
pub mod filter;
pub mod plan;
pub mod predicate;
pub mod quick;
pub mod rank;
pub mod record;

pub use aggregate::{SkillCount, Summary, aggregate};
pub use field::{FieldKind, FieldTable, SortKey, resolve_value};
pub use filter::{FilterImpact, FilterOutcome, FilterPlan, FilterStageImpact, filter_records, filter_with_impact};
pub use plan::{Plan, PlanDefaults, PlanExtractError, extract_json_object};
pub use predicate::{Criterion, CriterionValue, Operator, Predicate, matches};
pub use rank::{RankPlan, rank_records};
pub use record::{Record, RecordError, RecordId, record_ids};
