pub mod filter_where;

pub use filter_where::{FilterOp, LeadColumn, LeadFilter, WhereCondition};
