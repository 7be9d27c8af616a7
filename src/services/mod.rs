pub mod publish_service;

pub use publish_service::{validate_thread, PublishError, PublishReport, PublishService};
