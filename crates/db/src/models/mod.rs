pub mod conversion_status;
pub mod event;
pub mod video;
