pub mod leader;
pub mod seal_status;
