//! Core types for the entitlement engine.

pub mod decision;
pub mod item;
pub mod range;
pub mod user;

pub use decision::{AccessDecision, ReasonCode};
pub use item::{Item, ItemId};
pub use range::{RangeKey, WindowRange};
pub use user::{Tier, UserContext, DEFAULT_GUEST_WINDOW_DAYS};
