//! # Ledger Events
//!
//! Events recorded by transaction execution during a block.
//!
//! Raw events arrive with a string type tag and byte-string attributes, the
//! way the consensus engine hands them over. They are decoded once into
//! [`Event`], whose type tag and attribute keys are closed enumerations, so
//! consumers dispatch on variants instead of comparing strings.
//!
//! ## Bank Transfer Events
//!
//! | Type     | Attribute Key | Attribute Value    |
//! | -------- | ------------- | ------------------ |
//! | transfer | recipient     | {recipientAddress} |
//! | transfer | sender        | {senderAddress}    |
//! | transfer | amount        | {amount}           |
//! | message  | module        | bank               |
//! | message  | action        | send / multisend   |
//! | message  | sender        | {senderAddress}    |

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// =============================================================================
// RAW (WIRE) FORM
// =============================================================================

/// An attribute as produced by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAttribute {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl RawAttribute {
    pub fn new(key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
            value: value.as_ref().to_vec(),
        }
    }
}

/// An event as produced by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub ty: String,
    pub attributes: Vec<RawAttribute>,
}

// =============================================================================
// TYPED FORM
// =============================================================================

/// Event type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A balance moved between accounts.
    Transfer,
    /// Message bookkeeping emitted alongside every handled message.
    Message,
    /// Any other event type; carried so nothing is lost.
    Other(String),
}

impl EventKind {
    pub const TRANSFER: &'static str = "transfer";
    pub const MESSAGE: &'static str = "message";

    pub fn parse(tag: &str) -> Self {
        match tag {
            Self::TRANSFER => Self::Transfer,
            Self::MESSAGE => Self::Message,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Transfer => Self::TRANSFER,
            Self::Message => Self::MESSAGE,
            Self::Other(tag) => tag,
        }
    }
}

/// Attribute key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKey {
    Sender,
    Recipient,
    Amount,
    Module,
    Action,
    /// Unknown keys, including keys that are not valid UTF-8.
    Other(Vec<u8>),
}

impl AttributeKey {
    pub fn parse(key: &[u8]) -> Self {
        match key {
            b"sender" => Self::Sender,
            b"recipient" => Self::Recipient,
            b"amount" => Self::Amount,
            b"module" => Self::Module,
            b"action" => Self::Action,
            other => Self::Other(other.to_vec()),
        }
    }

    /// True for the keys naming an account whose balance may have changed.
    pub fn is_party(&self) -> bool {
        matches!(self, Self::Sender | Self::Recipient)
    }
}

/// A decoded attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventAttribute {
    pub key: AttributeKey,
    pub value: Vec<u8>,
}

impl EventAttribute {
    /// The value as text. Invalid UTF-8 is replaced, never dropped, so a
    /// malformed address still reaches the codec and is reported there.
    pub fn value_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}

/// A decoded event. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: EventKind,
    attributes: Vec<EventAttribute>,
}

impl Event {
    pub fn new(kind: EventKind, attributes: Vec<EventAttribute>) -> Self {
        Self { kind, attributes }
    }

    /// Convenience constructor for a bank transfer.
    pub fn transfer(sender: &str, recipient: &str, amount: &str) -> Self {
        Self::from(RawEvent {
            ty: EventKind::TRANSFER.to_string(),
            attributes: vec![
                RawAttribute::new("recipient", recipient),
                RawAttribute::new("sender", sender),
                RawAttribute::new("amount", amount),
            ],
        })
    }

    /// Convenience constructor for the `message` event accompanying a send.
    pub fn bank_message(sender: &str, action: &str) -> Self {
        Self::from(RawEvent {
            ty: EventKind::MESSAGE.to_string(),
            attributes: vec![
                RawAttribute::new("module", "bank"),
                RawAttribute::new("action", action),
                RawAttribute::new("sender", sender),
            ],
        })
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn attributes(&self) -> &[EventAttribute] {
        &self.attributes
    }
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        Self {
            kind: EventKind::parse(&raw.ty),
            attributes: raw
                .attributes
                .into_iter()
                .map(|a| EventAttribute {
                    key: AttributeKey::parse(&a.key),
                    value: a.value,
                })
                .collect(),
        }
    }
}

/// Collects the events of the block being executed.
///
/// Owned by the block context; append-only while transactions execute and
/// read-only at finalization.
#[derive(Debug, Clone, Default)]
pub struct EventManager {
    history: Vec<Event>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: Event) {
        self.history.push(event);
    }

    pub fn emit_raw(&mut self, raw: RawEvent) {
        self.history.push(Event::from(raw));
    }

    /// Every event recorded so far, in emission order.
    pub fn event_history(&self) -> &[Event] {
        &self.history
    }
}
