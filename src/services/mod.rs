pub mod inventory;
pub mod pull_sheets;
pub mod returns;
pub mod scans;
pub mod substitutions;
pub mod tokens;
