/// Ranking session controller
///
/// Owns all session-scoped mutable state: the active view, the pair slots,
/// the progress snapshot, and the in-flight vote marker. This is pure state
/// logic with no I/O; the application loop asks it what remote work to start
/// and feeds completions back in. The presentation layer only reads from it
/// and dispatches intents, never mutates it directly.
///
/// Two mutual-exclusion invariants live here and are enforced with explicit
/// flags rather than scheduler behavior:
/// - at most one vote submission is in flight at any time
/// - at most one background fetch per pair slot is outstanding

use super::data::{Pair, ProgressStats, Side};

/// Top-level screen. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// Initial screen: directory path entry
    #[default]
    Scan,
    /// Pairwise comparison screen
    Rank,
    /// Low-rated item review screen
    Review,
}

/// How a resolved vote should be carried out by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VotePlan {
    /// The prefetched pair was promoted; record the vote, refresh progress,
    /// and repopulate `next` — all fire-and-forget.
    Warm {
        winner_id: i64,
        loser_id: i64,
    },
    /// No prefetched pair; record the vote and await it before advancing.
    Cold {
        winner_id: i64,
        loser_id: i64,
    },
}

/// What a skipped pair requires from the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipPlan {
    /// The prefetched pair took over; repopulate `next`.
    Promoted,
    /// No prefetched pair; the current slot was cleared and needs a fetch.
    Refetch,
}

/// Session-scoped state, created at startup and torn down with the process
#[derive(Debug, Default)]
pub struct Session {
    view: View,
    progress: Option<ProgressStats>,
    current: Option<Pair>,
    next: Option<Pair>,
    fetching_current: bool,
    fetching_next: bool,
    voting: Option<Side>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn progress(&self) -> Option<&ProgressStats> {
        self.progress.as_ref()
    }

    pub fn current(&self) -> Option<&Pair> {
        self.current.as_ref()
    }

    pub fn next(&self) -> Option<&Pair> {
        self.next.as_ref()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn voting(&self) -> Option<Side> {
        self.voting
    }

    /// True while the displayed pair is being block-fetched
    pub fn loading_current(&self) -> bool {
        self.fetching_current
    }

    // ----- view transitions -----

    /// Apply a fresh progress snapshot, replacing the previous one wholesale.
    ///
    /// Returns true when the snapshot triggers the automatic, one-directional
    /// `Scan -> Rank` transition (items exist and we are still on the scan
    /// screen).
    pub fn apply_progress(&mut self, stats: ProgressStats) -> bool {
        let transition = stats.total_wallpapers > 0 && self.view == View::Scan;
        self.progress = Some(stats);
        if transition {
            self.view = View::Rank;
        }
        transition
    }

    /// Record a completed scan. A positive count moves `Scan -> Rank`;
    /// zero stays on the scan screen (valid outcome, not an error).
    pub fn scan_succeeded(&mut self, count: i64) -> bool {
        if count > 0 && self.view == View::Scan {
            self.view = View::Rank;
            true
        } else {
            false
        }
    }

    /// Explicit user transition to the review screen. The pair slots are
    /// left untouched so ranking resumes without a refetch.
    pub fn open_review(&mut self) -> bool {
        if self.view == View::Rank {
            self.view = View::Review;
            true
        } else {
            false
        }
    }

    /// Explicit user transition back to ranking.
    pub fn close_review(&mut self) -> bool {
        if self.view == View::Review {
            self.view = View::Rank;
            true
        } else {
            false
        }
    }

    // ----- pair prefetch queue -----

    /// Claim the right to fetch the displayed pair. Returns true at most
    /// once per empty slot: concurrent calls while a fetch is outstanding
    /// must not issue duplicate requests.
    pub fn begin_current_fetch(&mut self) -> bool {
        if self.current.is_some() || self.fetching_current {
            return false;
        }
        self.fetching_current = true;
        true
    }

    /// Deliver the result of a current-slot fetch. A failed fetch leaves the
    /// slot empty; the next `begin_current_fetch` retries naturally.
    pub fn finish_current_fetch(&mut self, pair: Option<Pair>) {
        self.fetching_current = false;
        if let Some(pair) = pair {
            if self.current.is_none() {
                self.current = Some(pair);
            }
        }
    }

    /// Claim the right to prefetch the next pair. Only valid while a current
    /// pair is displayed, and never while a prefetch is already outstanding.
    pub fn begin_next_fetch(&mut self) -> bool {
        if self.next.is_some() || self.current.is_none() || self.fetching_next {
            return false;
        }
        self.fetching_next = true;
        true
    }

    /// Deliver the result of a prefetch. A completion whose slot is no
    /// longer relevant (slot filled meanwhile, or no current pair left to
    /// stand behind) is discarded.
    pub fn finish_next_fetch(&mut self, pair: Option<Pair>) {
        self.fetching_next = false;
        if let Some(pair) = pair {
            if self.next.is_none() && self.current.is_some() {
                self.next = Some(pair);
            }
        }
    }

    /// Atomically move `next` into `current`; returns whether a promotion
    /// occurred.
    pub fn promote_next(&mut self) -> bool {
        match self.next.take() {
            Some(pair) => {
                self.current = Some(pair);
                true
            }
            None => false,
        }
    }

    // ----- vote pipeline -----

    /// Mark a vote as in flight. Rejected (silent no-op) while another vote
    /// is pending or no pair is loaded; click and keyboard intents both
    /// funnel through here so the exclusion holds in one place.
    pub fn begin_vote(&mut self, side: Side) -> bool {
        if self.voting.is_some() || self.current.is_none() || self.fetching_current {
            return false;
        }
        self.voting = Some(side);
        true
    }

    /// Resolve the pending vote after the feedback dwell has elapsed.
    ///
    /// Warm path: the prefetched pair is promoted immediately and the marker
    /// cleared, so the user keeps ranking while the vote is recorded in the
    /// background. Cold path: the marker stays set until the vote round-trip
    /// completes. Returns None for a stale dwell with no vote pending.
    pub fn resolve_vote(&mut self) -> Option<VotePlan> {
        let side = self.voting?;
        let (winner_id, loser_id) = match &self.current {
            Some(pair) => pair.outcome(side),
            None => {
                self.voting = None;
                return None;
            }
        };

        if self.promote_next() {
            self.voting = None;
            Some(VotePlan::Warm { winner_id, loser_id })
        } else {
            Some(VotePlan::Cold { winner_id, loser_id })
        }
    }

    /// Complete a cold-path vote. On success the judged pair is dropped and
    /// the caller fetches a fresh one; on failure the old pair stays up so
    /// the user can retry. Either way the in-flight marker clears.
    pub fn finish_cold_vote(&mut self, recorded: bool) -> bool {
        self.voting = None;
        if recorded {
            self.current = None;
        }
        recorded
    }

    /// Discard the displayed pair without voting.
    pub fn skip_pair(&mut self) -> Option<SkipPlan> {
        if self.voting.is_some() || self.current.is_none() || self.fetching_current {
            return None;
        }
        if self.promote_next() {
            Some(SkipPlan::Promoted)
        } else {
            self.current = None;
            Some(SkipPlan::Refetch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Wallpaper;

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

    fn pair(a: i64, b: i64) -> Pair {
        Pair::new(wallpaper(a), wallpaper(b)).unwrap()
    }

    fn stats(total: i64) -> ProgressStats {
        ProgressStats {
            total_wallpapers: total,
            total_comparisons: 0,
            evaluated_count: 0,
            participated_count: 0,
            percentage: 0.0,
        }
    }

    /// Session with a current pair loaded, still on the rank screen
    fn ranking_session() -> Session {
        let mut session = Session::new();
        session.apply_progress(stats(12));
        assert!(session.begin_current_fetch());
        session.finish_current_fetch(Some(pair(5, 9)));
        session
    }

    #[test]
    fn test_scan_transition_requires_items() {
        let mut session = Session::new();

        assert!(!session.apply_progress(stats(0)));
        assert_eq!(session.view(), View::Scan);

        assert!(session.apply_progress(stats(12)));
        assert_eq!(session.view(), View::Rank);

        // One-directional: a later empty snapshot does not go back
        assert!(!session.apply_progress(stats(12)));
        assert_eq!(session.view(), View::Rank);
    }

    #[test]
    fn test_scan_zero_count_stays_on_scan() {
        let mut session = Session::new();
        assert!(!session.scan_succeeded(0));
        assert_eq!(session.view(), View::Scan);

        assert!(session.scan_succeeded(12));
        assert_eq!(session.view(), View::Rank);
    }

    #[test]
    fn test_review_round_trip_preserves_pairs() {
        let mut session = ranking_session();
        assert!(session.begin_next_fetch());
        session.finish_next_fetch(Some(pair(3, 7)));

        assert!(session.open_review());
        assert_eq!(session.view(), View::Review);
        assert!(session.close_review());

        assert_eq!(session.current().unwrap().ids(), [5, 9]);
        assert!(session.has_next());
    }

    #[test]
    fn test_current_fetch_is_idempotent() {
        let mut session = Session::new();
        assert!(session.begin_current_fetch());
        // A concurrent caller must not issue a duplicate request
        assert!(!session.begin_current_fetch());

        session.finish_current_fetch(Some(pair(5, 9)));
        assert!(!session.begin_current_fetch());
    }

    #[test]
    fn test_next_fetch_is_idempotent() {
        let mut session = ranking_session();
        assert!(session.begin_next_fetch());
        assert!(!session.begin_next_fetch());

        session.finish_next_fetch(Some(pair(3, 7)));
        assert!(!session.begin_next_fetch());
    }

    #[test]
    fn test_next_never_populated_ahead_of_current() {
        let mut session = Session::new();
        assert!(!session.begin_next_fetch());

        // A stale prefetch completing after current vanished is discarded
        let mut session = ranking_session();
        assert!(session.begin_next_fetch());
        assert_eq!(session.skip_pair(), Some(SkipPlan::Refetch));
        session.finish_next_fetch(Some(pair(3, 7)));
        assert!(!session.has_next());
    }

    #[test]
    fn test_warm_vote_promotes_and_clears_marker() {
        let mut session = ranking_session();
        assert!(session.begin_next_fetch());
        session.finish_next_fetch(Some(pair(3, 7)));

        assert!(session.begin_vote(Side::Left));
        let plan = session.resolve_vote().unwrap();

        assert_eq!(
            plan,
            VotePlan::Warm {
                winner_id: 5,
                loser_id: 9
            }
        );
        assert_eq!(session.current().unwrap().ids(), [3, 7]);
        assert!(!session.has_next());
        assert!(session.voting().is_none());
        // The vacated slot is immediately refillable
        assert!(session.begin_next_fetch());
    }

    #[test]
    fn test_cold_vote_holds_marker_until_recorded() {
        let mut session = ranking_session();

        assert!(session.begin_vote(Side::Right));
        let plan = session.resolve_vote().unwrap();
        assert_eq!(
            plan,
            VotePlan::Cold {
                winner_id: 9,
                loser_id: 5
            }
        );
        // Cold path: busy until the round trip completes
        assert_eq!(session.voting(), Some(Side::Right));

        assert!(session.finish_cold_vote(true));
        assert!(session.voting().is_none());
        assert!(session.current().is_none());
        assert!(session.begin_current_fetch());
    }

    #[test]
    fn test_cold_vote_failure_keeps_old_pair() {
        let mut session = ranking_session();
        assert!(session.begin_vote(Side::Left));
        session.resolve_vote().unwrap();

        assert!(!session.finish_cold_vote(false));
        assert!(session.voting().is_none());
        // Old pair stays up for a retry
        assert_eq!(session.current().unwrap().ids(), [5, 9]);
    }

    #[test]
    fn test_second_vote_is_dropped_while_one_in_flight() {
        let mut session = ranking_session();
        assert!(session.begin_next_fetch());
        session.finish_next_fetch(Some(pair(3, 7)));

        assert!(session.begin_vote(Side::Left));
        assert!(!session.begin_vote(Side::Right));

        // The dropped attempt altered no slot state
        assert_eq!(session.current().unwrap().ids(), [5, 9]);
        assert!(session.has_next());
        assert_eq!(session.voting(), Some(Side::Left));
    }

    #[test]
    fn test_vote_requires_loaded_pair() {
        let mut session = Session::new();
        assert!(!session.begin_vote(Side::Left));

        let mut session = Session::new();
        session.begin_current_fetch();
        // Still loading: keyboard mashing does nothing
        assert!(!session.begin_vote(Side::Left));
    }

    #[test]
    fn test_stale_dwell_resolves_to_nothing() {
        let mut session = ranking_session();
        assert!(session.resolve_vote().is_none());
    }

    #[test]
    fn test_skip_with_prefetched_pair() {
        let mut session = ranking_session();
        assert!(session.begin_next_fetch());
        session.finish_next_fetch(Some(pair(3, 7)));

        assert_eq!(session.skip_pair(), Some(SkipPlan::Promoted));
        assert_eq!(session.current().unwrap().ids(), [3, 7]);
        assert!(!session.has_next());
    }

    #[test]
    fn test_skip_blocked_while_voting() {
        let mut session = ranking_session();
        assert!(session.begin_vote(Side::Left));
        assert!(session.skip_pair().is_none());
    }

    #[test]
    fn test_failed_fetch_leaves_slot_empty_for_retry() {
        let mut session = Session::new();
        assert!(session.begin_current_fetch());
        session.finish_current_fetch(None);

        assert!(session.current().is_none());
        assert!(session.begin_current_fetch());
    }
}
