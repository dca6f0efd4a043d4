//! Banner targeting: which of a placement's banners a given viewer sees right now.

use chrono::{DateTime, Utc};

use crate::site::models::{BannerAudience, BannerRow};

/// At most this many banners are returned per placement.
pub const MAX_BANNERS_PER_PLACEMENT: usize = 3;

/// The kind of visitor a banner request comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Guest,
    /// Logged in without a candidate or company profile.
    Member,
    Candidate,
    Company,
}

impl Viewer {
    fn sees(&self, audience: &str) -> bool {
        let wanted = match self {
            Viewer::Guest => Some(BannerAudience::Guests),
            Viewer::Member => None,
            Viewer::Candidate => Some(BannerAudience::Candidates),
            Viewer::Company => Some(BannerAudience::Companies),
        };
        audience == BannerAudience::All.as_str() || wanted.is_some_and(|a| a.as_str() == audience)
    }
}

fn in_window(banner: &BannerRow, now: DateTime<Utc>) -> bool {
    banner.starts_at.map_or(true, |start| start <= now) && banner.ends_at.map_or(true, |end| now < end)
}

/// Active banners for `placement` whose window contains `now` and whose audience
/// includes `viewer`. Highest priority first, newest first among equals.
pub fn select_banners(
    banners: &[BannerRow],
    placement: &str,
    viewer: Viewer,
    now: DateTime<Utc>,
) -> Vec<BannerRow> {
    let mut live: Vec<BannerRow> = banners
        .iter()
        .filter(|b| b.active && b.placement == placement)
        .filter(|b| in_window(b, now) && viewer.sees(&b.audience))
        .cloned()
        .collect();
    live.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    live.truncate(MAX_BANNERS_PER_PLACEMENT);
    live
}
