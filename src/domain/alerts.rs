// src/domain/alerts.rs

use crate::domain::prospect::StoredProspect;

/// An active alert subscription joined with its owner's contact info.
/// Read-only to this pipeline; the dashboard owns the rows.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub alert_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub email: Option<String>,
    /// Comma-separated address substrings, e.g. "강남,서초". None/empty = any.
    pub region_filter: Option<String>,
    /// Comma-separated prospect kinds, e.g. "NEW_BUILD". None/empty = any.
    pub type_filter: Option<String>,
    /// Minimum fit score. None = any.
    pub min_score: Option<i64>,
    pub email_enabled: bool,
    pub push_enabled: bool,
}

/// All three filters must pass (logical AND); an unset filter is vacuously
/// true. Region matching is case-sensitive substring containment, matching
/// how users enter district names.
pub fn matches(sub: &Subscription, prospect: &StoredProspect) -> bool {
    if let Some(min) = sub.min_score {
        if prospect.fit_score < min {
            return false;
        }
    }

    if let Some(filter) = nonempty(sub.type_filter.as_deref()) {
        let allowed = filter
            .split(',')
            .map(str::trim)
            .any(|t| t == prospect.kind.as_str());
        if !allowed {
            return false;
        }
    }

    if let Some(filter) = nonempty(sub.region_filter.as_deref()) {
        let hit = filter
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .any(|r| prospect.address.contains(r));
        if !hit {
            return false;
        }
    }

    true
}

fn nonempty(filter: Option<&str>) -> Option<&str> {
    filter.map(str::trim).filter(|s| !s.is_empty())
}

/// One user's matched prospects for this pass. `prospects` preserves the
/// input ordering, so with a score-descending input the first element is the
/// user's top prospect.
#[derive(Debug)]
pub struct SubscriptionMatches<'a> {
    pub subscription: &'a Subscription,
    pub prospects: Vec<&'a StoredProspect>,
}

impl SubscriptionMatches<'_> {
    pub fn top(&self) -> &StoredProspect {
        self.prospects[0]
    }
}

/// Evaluate every subscription against the prospect list. Subscriptions with
/// zero matches are dropped entirely — no empty notifications.
pub fn match_subscriptions<'a>(
    subscriptions: &'a [Subscription],
    prospects: &'a [StoredProspect],
) -> Vec<SubscriptionMatches<'a>> {
    subscriptions
        .iter()
        .filter_map(|sub| {
            let matched: Vec<&StoredProspect> =
                prospects.iter().filter(|p| matches(sub, p)).collect();
            if matched.is_empty() {
                None
            } else {
                Some(SubscriptionMatches {
                    subscription: sub,
                    prospects: matched,
                })
            }
        })
        .collect()
}
