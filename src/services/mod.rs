pub mod activity;
pub mod delivery;
pub mod feedback;
pub mod health_service;
pub mod projects;
pub mod resume;
pub mod sessions;
pub mod submission;
