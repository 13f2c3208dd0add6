//! Command handlers, one module per page.

pub mod bounties;
pub mod buckets;
pub mod bugs;
pub mod dashboard;
pub mod export;
pub mod report;
pub mod teams;
