use super::normalize::{ratio_or_zero, round2, s_shape};
use crate::metrics::types::{
    CommunityMetrics, GithubActivity, StackExchangeActivity, TwitterActivity,
};

/// The four community sub-scores and their rounded total.
///
/// Weights: fundamental 20, GitHub activity 40, Twitter 20, StackExchange 20.
/// The sub-scores are reported as-is; like popularity, the activity formulas
/// have a natural maximum below their nominal weight and are not clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommunityParts {
    pub fundamental: f64,
    pub github: f64,
    pub twitter: f64,
    pub stack_exchange: f64,
    pub total: f64,
}

pub fn community_score(metrics: &CommunityMetrics) -> CommunityParts {
    let fundamental = fundamental_score(metrics);
    let github = github_score(&metrics.github);
    let twitter = twitter_score(&metrics.twitter);
    let stack_exchange = stack_score(&metrics.stack_exchange);

    CommunityParts {
        fundamental,
        github,
        twitter,
        stack_exchange,
        total: round2(fundamental + github + twitter + stack_exchange),
    }
}

/// Boolean hygiene signals, 20 points total:
/// documentation 0.4, contribution guidelines 0.3, readme 0.2, governance 0.1.
fn fundamental_score(metrics: &CommunityMetrics) -> f64 {
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    round2(
        20.0 * (0.4 * flag(metrics.documentation)
            + 0.3 * flag(metrics.contribution_guidelines)
            + 0.2 * flag(metrics.readme)
            + 0.1 * flag(metrics.governance)),
    )
}

/// Issue/PR churn plus commit cadence and contributor spread, 40 points.
/// `s_shape` is applied to the raw counts here, not to pre-squashed values.
fn github_score(activity: &GithubActivity) -> f64 {
    let open_closed = 5.0
        * (s_shape(activity.open_issues_count as f64)
            + s_shape(activity.open_pr_count as f64)
            + s_shape(activity.closed_issues_count as f64)
            + s_shape(activity.closed_pr_count as f64));

    let spread = contributor_spread(&activity.contributor_commits);
    let cadence =
        10.0 * (s_shape(activity.weekly_commits as f64) + s_shape(spread as f64));

    round2(open_closed + cadence)
}

/// Minimum number of top contributors whose cumulative commits reach at
/// least 55% of all commits. A higher value means the activity is spread
/// across more people, i.e. less concentration risk.
pub fn contributor_spread(commits: &[u64]) -> u64 {
    let total: u64 = commits.iter().sum();
    if total == 0 {
        return 0;
    }

    let mut sorted = commits.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let mut cumulative = 0u64;
    for (i, count) in sorted.iter().enumerate() {
        cumulative += count;
        // cumulative / total >= 0.55, kept in integer arithmetic
        if cumulative * 20 >= total * 11 {
            return (i + 1) as u64;
        }
    }
    sorted.len() as u64
}

/// Tweet volume and engagement ratios, 20 points. Ratios over a zero tweet
/// count contribute 0 rather than erroring.
fn twitter_score(activity: &TwitterActivity) -> f64 {
    let tweets = activity.num_tweets as f64;
    let like_ratio = ratio_or_zero(activity.num_tweet_likes as f64, tweets);
    let retweet_ratio = ratio_or_zero(activity.num_retweets as f64, tweets);
    let quote_replies = (activity.num_tweet_quotes + activity.num_tweet_replies) as f64;

    round2(
        5.0 * (s_shape(tweets)
            + s_shape(quote_replies)
            + s_shape(like_ratio)
            + s_shape(retweet_ratio)),
    )
}

/// Question volume and answer/view ratios, 20 points.
fn stack_score(activity: &StackExchangeActivity) -> f64 {
    let questions = activity.num_questions as f64;
    let answered_ratio = ratio_or_zero(activity.num_answered as f64, questions);
    let viewed_ratio = ratio_or_zero(activity.num_views as f64, questions);
    let reaction_ratio = ratio_or_zero(activity.num_answers as f64, questions);

    round2(
        5.0 * (s_shape(questions)
            + s_shape(answered_ratio)
            + s_shape(viewed_ratio)
            + s_shape(reaction_ratio)),
    )
}
