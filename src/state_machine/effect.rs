//! Effects produced by state transitions

/// Effects applied to the call context when a transition is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Commit the caller's confirmation
    RecordConfirmation,

    /// Flag the order for review by the operations team
    AuditOrder { option: String },
}
