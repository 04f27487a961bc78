use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One fully-resolved input record per project, produced by the external
/// collectors. The engine consumes it read-only.
///
/// Each dimension block is optional: an absent block means "not collected"
/// and the dimension is excluded from the composite, which is not the same
/// as a block full of zeroes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetrics {
    pub project: String,
    #[serde(default)]
    pub popularity: Option<PopularityMetrics>,
    #[serde(default)]
    pub community: Option<CommunityMetrics>,
    /// License identifier, resolved against the license table at scoring time.
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub security: Option<SecurityReport>,
    #[serde(default)]
    pub releases: Option<ReleaseHistory>,
}

/// Registry and repository counts feeding the popularity score.
///
/// The two download fields stay optional: collectors distinguish "no
/// downloads data" from "zero downloads", and the scorer dispatches to a
/// different weight table instead of filling in a zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularityMetrics {
    pub contributions_count: u64,
    pub subscribers_count: u64,
    pub dependent_repos_count: u64,
    pub stargazers_count: u64,
    pub dependents_count: u64,
    pub forks_count: u64,
    /// Downloads over the trailing 90 days.
    #[serde(default)]
    pub recent_downloads: Option<u64>,
    #[serde(default)]
    pub total_downloads: Option<u64>,
}

/// Community signals from GitHub, Twitter, and StackExchange.
///
/// The activity blocks default to zero activity when omitted; for these
/// counts "nothing collected" and "nothing happened" score identically, so
/// no separate absent state is needed (unlike downloads).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunityMetrics {
    #[serde(default)]
    pub documentation: bool,
    #[serde(default)]
    pub contribution_guidelines: bool,
    #[serde(default)]
    pub readme: bool,
    #[serde(default)]
    pub governance: bool,
    #[serde(default)]
    pub github: GithubActivity,
    #[serde(default)]
    pub twitter: TwitterActivity,
    #[serde(default)]
    pub stack_exchange: StackExchangeActivity,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GithubActivity {
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub closed_issues_count: u64,
    #[serde(default)]
    pub open_pr_count: u64,
    #[serde(default)]
    pub closed_pr_count: u64,
    #[serde(default)]
    pub weekly_commits: u64,
    /// Commit count per contributor, in any order. The scorer derives the
    /// contributor-concentration figure from this distribution.
    #[serde(default)]
    pub contributor_commits: Vec<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwitterActivity {
    #[serde(default)]
    pub num_tweets: u64,
    #[serde(default)]
    pub num_tweet_likes: u64,
    #[serde(default)]
    pub num_retweets: u64,
    #[serde(default)]
    pub num_tweet_quotes: u64,
    #[serde(default)]
    pub num_tweet_replies: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StackExchangeActivity {
    #[serde(default)]
    pub num_questions: u64,
    #[serde(default)]
    pub num_answered: u64,
    #[serde(default)]
    pub num_views: u64,
    #[serde(default)]
    pub num_answers: u64,
}

/// Structured output of the external Scorecard run for one repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityReport {
    /// Check name -> result in 0..=10, or None when the check did not run.
    #[serde(default)]
    pub checks: BTreeMap<String, Option<u8>>,
}

/// Chronology of published releases for one project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseHistory {
    pub releases: Vec<Release>,
    /// Horizon for the age computation, normally the collector's last
    /// database refresh.
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub version: String,
    pub published_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record_parses() {
        let json = r#"{ "project": "leftpad" }"#;
        let metrics: ProjectMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.project, "leftpad");
        assert!(metrics.popularity.is_none());
        assert!(metrics.license.is_none());
    }

    #[test]
    fn test_absent_downloads_stay_none() {
        let json = r#"{
            "contributions_count": 10,
            "subscribers_count": 2,
            "dependent_repos_count": 0,
            "stargazers_count": 50,
            "dependents_count": 1,
            "forks_count": 4
        }"#;
        let pop: PopularityMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(pop.recent_downloads, None);
        assert_eq!(pop.total_downloads, None);
    }

    #[test]
    fn test_negative_count_is_rejected_at_parse_time() {
        let json = r#"{
            "contributions_count": -3,
            "subscribers_count": 0,
            "dependent_repos_count": 0,
            "stargazers_count": 0,
            "dependents_count": 0,
            "forks_count": 0
        }"#;
        assert!(serde_json::from_str::<PopularityMetrics>(json).is_err());
    }

    #[test]
    fn test_security_report_nullable_checks() {
        let json = r#"{ "checks": { "Fuzzing": null, "Code-Review": 8 } }"#;
        let report: SecurityReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.checks["Fuzzing"], None);
        assert_eq!(report.checks["Code-Review"], Some(8));
    }
}
