pub mod project;

pub(crate) use project::ProjectRecord;
