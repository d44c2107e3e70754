//! Well-known outbound event type names.
//!
//! Automations subscribe to these names; an automation with an empty
//! subscription list receives every type.

/// A deal was created from the pipeline page.
pub const DEAL_CREATED: &str = "saleflow.deal.created";

/// A deal was created through the quick "new flow" form.
pub const FLOW_CREATED: &str = "saleflow.flow.created";

/// A deal moved to a different pipeline stage.
pub const STAGE_CHANGED: &str = "saleflow.stage.changed";

/// Synthetic event type used by the automation test endpoint.
pub const AUTOMATION_TEST: &str = "automation.test";

/// Every event type an automation may subscribe to.
pub const SUBSCRIBABLE: [&str; 3] = [DEAL_CREATED, FLOW_CREATED, STAGE_CHANGED];

/// Whether `name` is a recognized subscribable event type.
pub fn is_subscribable(name: &str) -> bool {
    SUBSCRIBABLE.contains(&name)
}
