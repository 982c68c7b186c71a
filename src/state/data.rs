/// Shared data structures for the ranking session
///
/// These structs mirror the remote service's JSON wire format and are the
/// read-only, possibly-stale copies the client works with. Ratings are
/// computed entirely server-side; the client only displays them.

use serde::{Deserialize, Serialize};

/// A ranked wallpaper, owned by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallpaper {
    /// Stable identity assigned by the service
    pub id: i64,
    pub filename: String,
    pub path: String,
    /// Rating mean
    pub rating_mu: f64,
    /// Rating uncertainty
    pub rating_sigma: f64,
    pub comparisons_count: i64,
}

/// Aggregate ranking progress, replaced wholesale on each refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressStats {
    pub total_wallpapers: i64,
    pub total_comparisons: i64,
    pub evaluated_count: i64,
    pub participated_count: i64,
    pub percentage: f64,
}

/// Two distinct wallpapers presented for a single preference decision
///
/// Pairs are ephemeral: generated fresh by the service per request and
/// replaced wholesale, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub left: Wallpaper,
    pub right: Wallpaper,
}

impl Pair {
    /// Build a pair, rejecting one whose items share an id
    pub fn new(left: Wallpaper, right: Wallpaper) -> Option<Self> {
        if left.id == right.id {
            return None;
        }
        Some(Pair { left, right })
    }

    /// Both item ids, left first
    pub fn ids(&self) -> [i64; 2] {
        [self.left.id, self.right.id]
    }

    /// The (winner, loser) ids implied by voting for `side`
    pub fn outcome(&self, side: Side) -> (i64, i64) {
        match side {
            Side::Left => (self.left.id, self.right.id),
            Side::Right => (self.right.id, self.left.id),
        }
    }
}

/// Which half of the comparison a vote targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Resolution tier served by `GET /images/{id}?size=...`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    Small,
    Medium,
    Full,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Full => "full",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallpaper(id: i64) -> Wallpaper {
        Wallpaper {
            id,
            filename: format!("img{id}.jpg"),
            path: format!("/walls/img{id}.jpg"),
            rating_mu: 1500.0,
            rating_sigma: 350.0,
            comparisons_count: 0,
        }
    }

    #[test]
    fn test_pair_rejects_duplicate_ids() {
        assert!(Pair::new(wallpaper(3), wallpaper(3)).is_none());
        assert!(Pair::new(wallpaper(3), wallpaper(7)).is_some());
    }

    #[test]
    fn test_pair_outcome_by_side() {
        let pair = Pair::new(wallpaper(5), wallpaper(9)).unwrap();
        assert_eq!(pair.outcome(Side::Left), (5, 9));
        assert_eq!(pair.outcome(Side::Right), (9, 5));
    }

    #[test]
    fn test_wallpaper_wire_shape() {
        let json = r#"{
            "id": 42,
            "filename": "sunset.png",
            "path": "/walls/sunset.png",
            "rating_mu": 1523.4,
            "rating_sigma": 210.9,
            "comparisons_count": 12
        }"#;

        let w: Wallpaper = serde_json::from_str(json).unwrap();
        assert_eq!(w.id, 42);
        assert_eq!(w.filename, "sunset.png");
        assert_eq!(w.comparisons_count, 12);
    }

    #[test]
    fn test_progress_wire_shape() {
        let json = r#"{
            "total_wallpapers": 120,
            "total_comparisons": 340,
            "evaluated_count": 98,
            "participated_count": 115,
            "percentage": 81.7
        }"#;

        let stats: ProgressStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_wallpapers, 120);
        assert!((stats.percentage - 81.7).abs() < f64::EPSILON);
    }
}
