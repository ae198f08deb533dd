pub mod record_warehouse_return_command;

pub use record_warehouse_return_command::{
    RecordWarehouseReturnCommand, RecordWarehouseReturnResult,
};
