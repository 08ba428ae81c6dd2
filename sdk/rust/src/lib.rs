//! Client for posting notifications to a running notify-hub.

mod client;

pub use client::HubClient;
