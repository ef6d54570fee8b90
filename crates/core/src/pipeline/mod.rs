pub mod edit_image_use_case;
pub mod edit_operation;
pub mod edit_session;
pub mod infrastructure;
pub mod operation_logger;
