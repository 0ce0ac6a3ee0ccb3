pub mod activity;
pub mod contact;
pub mod delivery;
pub mod project;
