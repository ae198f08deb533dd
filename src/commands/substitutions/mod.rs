pub mod record_substitution_command;

pub use record_substitution_command::{RecordSubstitutionCommand, RecordSubstitutionResult};
