pub mod conversion_status_repo;
pub mod event_repo;
pub mod video_repo;

pub use conversion_status_repo::ConversionStatusRepo;
pub use event_repo::EventRepo;
pub use video_repo::VideoRepo;
