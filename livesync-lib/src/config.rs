/// What the stylesheet synchronizer does when a parsed rule is rejected on insertion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuleFailurePolicy {
    /// Stop at the rejected rule and report it. Rules before it stay in place.
    #[default]
    Abort,
    /// Log the rejected rule and keep inserting the rest.
    Skip,
}

/// Settings for a [`LivePreview`](crate::sync::LivePreview).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewConfig {
    pub rule_failure: RuleFailurePolicy,
}

impl PreviewConfig {
    pub fn with_rule_failure(mut self, policy: RuleFailurePolicy) -> Self {
        self.rule_failure = policy;
        self
    }
}
