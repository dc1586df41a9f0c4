//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod filter_template_repo;
pub mod point_repo;
pub mod profile_repo;
pub mod video_config_repo;
pub mod webcam_repo;

pub use filter_template_repo::FilterTemplateRepo;
pub use point_repo::PointWebcamRepo;
pub use profile_repo::ProfileRepo;
pub use video_config_repo::VideoConfigRepo;
pub use webcam_repo::WebcamRepo;
