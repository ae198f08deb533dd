pub mod record_scan_command;

pub use record_scan_command::{RecordScanCommand, RecordScanResult};
