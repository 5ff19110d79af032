pub mod file_size;
pub mod file_walker;
pub mod mime;
