//! Typed schema contract for the rental operations store.
//!
//! Every table is a sea-orm entity; no dynamically typed row access anywhere
//! in the crate.

pub mod inventory_item;
pub mod inventory_movement;
pub mod pull_sheet;
pub mod pull_sheet_item;
pub mod pull_sheet_item_scan;
pub mod pull_sheet_scan;
pub mod substitution;
pub mod token_account;
pub mod token_transaction;
