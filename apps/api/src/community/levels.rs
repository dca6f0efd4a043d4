//! Points → level lookup.

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Level {
    pub name: &'static str,
    pub min_points: i64,
}

/// Ascending by `min_points`; the first entry starts at zero.
pub const LEVELS: &[Level] = &[
    Level { name: "Iniciante", min_points: 0 },
    Level { name: "Colaborador", min_points: 50 },
    Level { name: "Engajado", min_points: 150 },
    Level { name: "Referência", min_points: 400 },
    Level { name: "Lenda", min_points: 1000 },
];

/// Points granted or revoked per community action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointReason {
    PostCreated,
    CommentAdded,
    LikeReceived,
    LikeRevoked,
}

impl PointReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointReason::PostCreated => "post_created",
            PointReason::CommentAdded => "comment_added",
            PointReason::LikeReceived => "like_received",
            PointReason::LikeRevoked => "like_revoked",
        }
    }

    pub fn points(&self) -> i32 {
        match self {
            PointReason::PostCreated => 10,
            PointReason::CommentAdded => 5,
            PointReason::LikeReceived => 2,
            PointReason::LikeRevoked => -2,
        }
    }
}

/// What a like toggle did to the `(post, user)` like row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeChange {
    Added,
    Removed,
    /// A concurrent toggle already inserted the row.
    Unchanged,
}

/// Ledger entry for the post author after a like toggle, if any.
/// Liking one's own post earns nothing.
pub fn like_award(author_id: Uuid, actor_id: Uuid, change: LikeChange) -> Option<PointReason> {
    if author_id == actor_id {
        return None;
    }
    match change {
        LikeChange::Added => Some(PointReason::LikeReceived),
        LikeChange::Removed => Some(PointReason::LikeRevoked),
        LikeChange::Unchanged => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    pub points: i64,
    pub level: Level,
    pub next_level: Option<Level>,
    pub points_to_next: Option<i64>,
}

/// Highest level whose threshold is ≤ `points`. Negative totals clamp to zero.
pub fn level_for(points: i64) -> LevelProgress {
    let points = points.max(0);
    let idx = LEVELS
        .iter()
        .rposition(|l| l.min_points <= points)
        .unwrap_or(0);
    let next_level = LEVELS.get(idx + 1).copied();
    LevelProgress {
        points,
        level: LEVELS[idx],
        next_level,
        points_to_next: next_level.map(|n| n.min_points - points),
    }
}
