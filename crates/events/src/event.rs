//! Canonical outbound event envelope.
//!
//! Every emitter goes through the constructors here, so the three event
//! types share a single payload schema instead of each call site assembling
//! its own JSON. The payload is frozen into the outbox row at enqueue time;
//! the dispatcher later POSTs those exact bytes.

use chrono::Utc;
use serde_json::json;

use hiperflow_core::events as event_types;
use hiperflow_core::outbox::event_key;
use hiperflow_core::types::{DbId, Timestamp};
use hiperflow_db::models::deal::Deal;

/// An outbound domain event, ready to be fanned out to automations.
#[derive(Debug, Clone)]
pub struct FlowEvent {
    /// Dot-separated event name, e.g. `"saleflow.stage.changed"`.
    pub event_type: &'static str,
    pub team_id: DbId,
    /// The deal this event is about, if any (test pings have none).
    pub deal_id: Option<DbId>,
    /// When the event was emitted (UTC). Part of the idempotency key.
    pub emitted_at: Timestamp,
    /// The JSON body delivered to automations.
    pub payload: serde_json::Value,
    /// Entity id the idempotency key is derived from. The deal for deal
    /// events, the automation for test pings.
    key_entity_id: DbId,
}

impl FlowEvent {
    /// Event for a deal created through the regular deals endpoint.
    pub fn deal_created(deal: &Deal, owner_username: &str, link: &str) -> Self {
        Self::created(event_types::DEAL_CREATED, deal, owner_username, link)
    }

    /// Event for a deal created through the quick "new flow" form.
    pub fn flow_created(deal: &Deal, owner_username: &str, link: &str) -> Self {
        Self::created(event_types::FLOW_CREATED, deal, owner_username, link)
    }

    /// Event for a deal moving between pipeline stages. `from_stage` is the
    /// stage before the move; `deal` already carries the new one.
    pub fn stage_changed(deal: &Deal, from_stage: &str) -> Self {
        let emitted_at = Utc::now();
        let payload = json!({
            "event": event_types::STAGE_CHANGED,
            "emitted_at": emitted_at,
            "deal": deal_snapshot(deal),
            "stage_change": {
                "from": from_stage,
                "to": deal.stage,
            },
        });
        Self {
            event_type: event_types::STAGE_CHANGED,
            team_id: deal.team_id,
            deal_id: Some(deal.id),
            emitted_at,
            payload,
            key_entity_id: deal.id,
        }
    }

    /// Synthetic ping used by the automation test endpoint. Not tied to a
    /// deal; keyed by the automation itself so repeated tests each deliver.
    pub fn automation_test(team_id: DbId, automation_id: DbId, automation_name: &str) -> Self {
        let emitted_at = Utc::now();
        let payload = json!({
            "event": event_types::AUTOMATION_TEST,
            "emitted_at": emitted_at,
            "automation": {
                "id": automation_id,
                "name": automation_name,
            },
            "message": "Test delivery from HiperFlow",
        });
        Self {
            event_type: event_types::AUTOMATION_TEST,
            team_id,
            deal_id: None,
            emitted_at,
            payload,
            key_entity_id: automation_id,
        }
    }

    /// The idempotency key for this event: derived from the subject entity
    /// and emission instant, never random. Re-emitting the same event
    /// produces the same key.
    pub fn event_key(&self) -> String {
        event_key(self.key_entity_id, self.emitted_at.timestamp_millis())
    }

    fn created(event_type: &'static str, deal: &Deal, owner_username: &str, link: &str) -> Self {
        let emitted_at = Utc::now();
        let payload = json!({
            "event": event_type,
            "emitted_at": emitted_at,
            "deal": deal_snapshot(deal),
            "owner": owner_username,
            "link": link,
        });
        Self {
            event_type,
            team_id: deal.team_id,
            deal_id: Some(deal.id),
            emitted_at,
            payload,
            key_entity_id: deal.id,
        }
    }
}

/// The deal fields every payload carries, straight from the denormalized row.
fn deal_snapshot(deal: &Deal) -> serde_json::Value {
    json!({
        "id": deal.id,
        "title": deal.title,
        "stage": deal.stage,
        "amount_cents": deal.amount_cents,
        "currency": deal.currency,
        "status": deal.status,
        "contact_name": deal.contact_name,
        "contact_email": deal.contact_email,
        "company_name": deal.company_name,
        "next_action": deal.next_action,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_deal() -> Deal {
        let now = Utc::now();
        Deal {
            id: 7,
            team_id: 1,
            title: "Website redesign".to_string(),
            stage: "propuesta".to_string(),
            amount_cents: 250_000,
            currency: "EUR".to_string(),
            status: "activo".to_string(),
            owner_id: 3,
            contact_id: Some(11),
            contact_name: Some("Ana Ruiz".to_string()),
            contact_email: Some("ana@initech.example".to_string()),
            company_id: Some(4),
            company_name: Some("Initech".to_string()),
            next_action: Some("Send proposal".to_string()),
            last_activity_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn created_events_share_the_snapshot_schema() {
        let deal = sample_deal();
        let event = FlowEvent::deal_created(&deal, "alice", "https://app.example/saleflow?deal=7");

        assert_eq!(event.event_type, "saleflow.deal.created");
        assert_eq!(event.team_id, 1);
        assert_eq!(event.deal_id, Some(7));

        let payload = &event.payload;
        assert_eq!(payload["event"], "saleflow.deal.created");
        assert_eq!(payload["deal"]["id"], 7);
        assert_eq!(payload["deal"]["amount_cents"], 250_000);
        assert_eq!(payload["deal"]["contact_name"], "Ana Ruiz");
        assert_eq!(payload["deal"]["company_name"], "Initech");
        assert_eq!(payload["owner"], "alice");
        assert_eq!(payload["link"], "https://app.example/saleflow?deal=7");
        assert!(payload.get("stage_change").is_none());
    }

    #[test]
    fn flow_created_differs_only_in_event_type() {
        let deal = sample_deal();
        let event = FlowEvent::flow_created(&deal, "alice", "https://app.example/saleflow?deal=7");
        assert_eq!(event.event_type, "saleflow.flow.created");
        assert_eq!(event.payload["event"], "saleflow.flow.created");
        assert_eq!(event.payload["deal"]["id"], 7);
    }

    #[test]
    fn stage_changed_carries_prior_and_new_stage() {
        let deal = sample_deal();
        let event = FlowEvent::stage_changed(&deal, "contactado");

        assert_eq!(event.event_type, "saleflow.stage.changed");
        assert_eq!(event.payload["stage_change"]["from"], "contactado");
        assert_eq!(event.payload["stage_change"]["to"], "propuesta");
        assert_eq!(event.payload["deal"]["stage"], "propuesta");
    }

    #[test]
    fn event_key_is_stable_for_same_deal_and_instant() {
        let deal = sample_deal();
        let mut a = FlowEvent::stage_changed(&deal, "contactado");
        let mut b = FlowEvent::stage_changed(&deal, "contactado");
        let instant = Utc::now();
        a.emitted_at = instant;
        b.emitted_at = instant;

        assert_eq!(a.event_key(), b.event_key());
    }

    #[test]
    fn test_ping_has_no_deal_and_keys_by_automation() {
        let mut a = FlowEvent::automation_test(1, 9, "Make hook");
        let mut b = FlowEvent::automation_test(1, 10, "Other hook");
        let instant = Utc::now();
        a.emitted_at = instant;
        b.emitted_at = instant;

        assert_eq!(a.deal_id, None);
        assert_eq!(a.payload["automation"]["id"], 9);
        assert_eq!(a.payload["event"], "automation.test");
        assert_ne!(a.event_key(), b.event_key());
    }
}
