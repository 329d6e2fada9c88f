use crate::detail::Tag;
use thiserror::Error;

/// Failures raised while resolving precomputed card details.
///
/// Every variant signals that upstream precomputation broke the write
/// invariants of a detail map; callers propagate these instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailError {
    #[error("case not found: {tag}-{unit_member}-{attr_member}")]
    CaseNotFound {
        tag: Tag,
        unit_member: u8,
        attr_member: u8,
    },
    #[error("reference skill registered without a reference component")]
    MissingReference,
    #[error("deck must contain at least one card")]
    EmptyDeck,
    #[error("no support deck rate for card {card_id} ({field})")]
    MissingSupportRate { card_id: u32, field: &'static str },
}
