pub mod documentation;
pub mod health;

pub use documentation::DocumentationController;
pub use health::HealthController;
