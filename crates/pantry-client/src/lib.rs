//! Network half of the Pantry sync core.
//!
//! [`Rest`] wraps the backend's REST surface behind the [`Backend`] trait,
//! [`Gateway`] consumes the push socket, and one context per surface
//! ([`chats`], [`notifications`], [`feed`]) reconciles fetched pages with
//! pushed events over the containers from `pantry-sync`. [`Client`] ties
//! the contexts together and routes every push event to its owner.

pub mod chats;
pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod gateway;
pub mod notifications;
pub mod rest;

pub use client::Client;
pub use config::ClientConfig;
pub use error::ClientError;
pub use gateway::Gateway;
pub use rest::{Backend, LONG_TIMEOUT, Rest, SHORT_TIMEOUT};
