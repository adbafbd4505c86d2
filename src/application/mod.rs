//! Application layer orchestrating one payment attempt end to end.
//!
//! This module defines the `PaymentDispatcher`, which admits a payment
//! against the account's rate and concurrency budgets, issues the gateway
//! call under a hard deadline and records the outcome through the journal
//! port.

pub mod dispatcher;
