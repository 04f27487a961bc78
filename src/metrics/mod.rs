pub mod loader;
pub mod types;
pub mod validate;

pub use loader::load_metrics;
pub use types::{
    CommunityMetrics, GithubActivity, PopularityMetrics, ProjectMetrics, Release, ReleaseHistory,
    SecurityReport, StackExchangeActivity, TwitterActivity,
};
pub use validate::validate_metrics;
