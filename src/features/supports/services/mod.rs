mod support_service;

pub use support_service::{SupportOutcome, SupportResult, SupportService};
