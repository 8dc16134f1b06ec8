pub mod app;
pub mod dashboard;

pub use app::{ReviewApp, View};
