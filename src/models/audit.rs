//! Audit trail models and the observability hook.
//!
//! Calculators return [`AuditStep`]s alongside their results instead of
//! logging, so the core stays free of side effects. A caller that wants to
//! observe a calculation passes a [`TraceHook`].

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

impl AuditStep {
    /// Creates a step.
    pub fn new(
        step_number: u32,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning: reasoning.into(),
        }
    }
}

/// A warning generated during calculation.
///
/// Warnings flag input the engine degraded around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: &str, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// Receives the audit steps and warnings of a calculation as they are produced.
pub trait TraceHook {
    /// Called once per audit step, in step order.
    fn on_step(&mut self, step: &AuditStep);

    /// Called once per warning.
    fn on_warning(&mut self, _warning: &AuditWarning) {}
}

/// A hook that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl TraceHook for NoTrace {
    fn on_step(&mut self, _step: &AuditStep) {}
}

impl<F: FnMut(&AuditStep)> TraceHook for F {
    fn on_step(&mut self, step: &AuditStep) {
        self(step)
    }
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl TraceHook for AuditTrace {
    fn on_step(&mut self, step: &AuditStep) {
        self.steps.push(step.clone());
    }

    fn on_warning(&mut self, warning: &AuditWarning) {
        self.warnings.push(warning.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_step(step_number: u32) -> AuditStep {
        AuditStep {
            step_number,
            rule_id: "daily_threshold".to_string(),
            rule_name: "Daily Threshold".to_string(),
            input: serde_json::json!({"total_hours": "9"}),
            output: serde_json::json!({"extra_hours": "1"}),
            reasoning: "9 hours exceed the 8 hour day".to_string(),
        }
    }

    #[test]
    fn test_audit_trace_collects_steps_and_warnings() {
        let mut trace = AuditTrace::default();
        trace.on_step(&sample_step(1));
        trace.on_step(&sample_step(2));
        trace.on_warning(&AuditWarning::new("MALFORMED_TIME", "bad time", "low"));

        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.steps[1].step_number, 2);
        assert_eq!(trace.warnings[0].code, "MALFORMED_TIME");
    }

    #[test]
    fn test_closure_hook_receives_steps() {
        let mut seen = Vec::new();
        {
            let mut hook = |step: &AuditStep| seen.push(step.rule_id.clone());
            hook.on_step(&sample_step(1));
            hook.on_warning(&AuditWarning::new("X", "ignored", "low"));
        }
        assert_eq!(seen, vec!["daily_threshold".to_string()]);
    }

    #[test]
    fn test_audit_step_serialization() {
        let json = serde_json::to_string(&sample_step(3)).unwrap();
        assert!(json.contains("\"step_number\":3"));
        assert!(json.contains("\"rule_id\":\"daily_threshold\""));
    }
}
