//! Notification channel implementations.

pub mod slack;
