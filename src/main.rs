use iced::{keyboard, Element, Subscription, Task, Theme};
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub mod api;
pub mod state;
pub mod ui;

use api::client::{ApiClient, ApiError};
use state::data::{ImageSize, Pair, ProgressStats, Side, Wallpaper};
use state::images::ImageCache;
use state::session::{Session, SkipPlan, View, VotePlan};
use ui::review::{ReviewState, REVIEW_LIMIT};
use ui::scan::ScanState;

/// Minimum time the vote feedback stays visible before the pair advances.
/// A UX timing contract: the highlight must be perceptible even when the
/// prefetched pair makes the advance instant.
const VOTE_DWELL: Duration = Duration::from_millis(300);

/// Main application state
struct Wallrank {
    /// Handle to the remote ranking service
    client: ApiClient,
    /// The session controller: view mode, pair slots, vote marker, progress
    session: Session,
    /// Fetched image bytes, keyed by id and resolution tier
    images: ImageCache,
    /// Scan screen UI state
    scan: ScanState,
    /// Review screen UI state
    review: ReviewState,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    // Scan screen
    ScanPathChanged(String),
    ScanSubmitted,
    ScanFinished(Result<i64, ApiError>),

    // Progress tracker
    ProgressFetched(Result<ProgressStats, ApiError>),

    // Pair prefetch queue
    CurrentPairFetched(Result<Pair, ApiError>),
    NextPairFetched(Result<Pair, ApiError>),
    RetryPair,
    SkipPair,

    // Vote pipeline (click and keyboard intents both land on VoteIntent)
    VoteIntent(Side),
    VoteDwellElapsed,
    VoteRecorded(Result<(), ApiError>),
    ColdVoteFinished(Result<(), ApiError>),

    // Image cache
    ImageFetched(i64, ImageSize, Result<Vec<u8>, ApiError>),

    // Review screen
    OpenReview,
    CloseReview,
    RefreshReview,
    ReviewFetched(Result<Vec<Wallpaper>, ApiError>),
    MovePathChanged(String),
    KeepWallpaper(i64),
    MoveWallpaper(i64),
    WallpaperMoved(i64, Result<(), ApiError>),
}

impl Wallrank {
    /// Create a new instance and kick off the initial progress refresh;
    /// a populated collection skips the scan screen entirely.
    fn new() -> (Self, Task<Message>) {
        let client = ApiClient::from_env();
        info!("ranking service at {}", client.base_url());

        let app = Wallrank {
            client,
            session: Session::new(),
            images: ImageCache::new(),
            scan: ScanState::default(),
            review: ReviewState::default(),
        };

        let startup = app.refresh_progress();
        (app, startup)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // ----- scan screen -----
            Message::ScanPathChanged(path) => {
                self.scan.path = path;
                Task::none()
            }
            Message::ScanSubmitted => {
                if self.scan.busy || self.scan.path.is_empty() {
                    return Task::none();
                }
                self.scan.busy = true;
                self.scan.error = None;

                let client = self.client.clone();
                let path = self.scan.path.clone();
                Task::perform(async move { client.scan(path).await }, Message::ScanFinished)
            }
            Message::ScanFinished(Ok(count)) => {
                self.scan.busy = false;
                if count > 0 {
                    info!("scan indexed {count} wallpapers");
                    self.session.scan_succeeded(count);
                    Task::batch([self.refresh_progress(), self.ensure_current()])
                } else {
                    self.scan.error =
                        Some("No supported images found in that directory.".to_string());
                    Task::none()
                }
            }
            Message::ScanFinished(Err(err)) => {
                self.scan.busy = false;
                error!("scan failed: {err}");
                self.scan.error =
                    Some("Failed to scan directory. Please check the path.".to_string());
                Task::none()
            }

            // ----- progress tracker -----
            Message::ProgressFetched(Ok(stats)) => {
                self.session.apply_progress(stats);
                if self.session.view() == View::Rank {
                    self.ensure_current()
                } else {
                    Task::none()
                }
            }
            Message::ProgressFetched(Err(err)) => {
                // Previous snapshot (or none) stays up
                warn!("progress refresh failed: {err}");
                Task::none()
            }

            // ----- pair prefetch queue -----
            Message::CurrentPairFetched(Ok(pair)) => {
                self.session.finish_current_fetch(Some(pair));

                let ids = self.session.current().map(Pair::ids);
                let mut tasks = vec![self.ensure_next()];
                if let Some(ids) = ids {
                    tasks.push(self.fetch_images(ids, ImageSize::Full));
                }
                self.prune_images();
                Task::batch(tasks)
            }
            Message::CurrentPairFetched(Err(err)) => {
                self.session.finish_current_fetch(None);
                error!("pair fetch failed: {err}");
                Task::none()
            }
            Message::NextPairFetched(Ok(pair)) => {
                self.session.finish_next_fetch(Some(pair));

                // Warm the prefetched pair at the reduced tier
                let ids = self.session.next().map(Pair::ids);
                let task = match ids {
                    Some(ids) => self.fetch_images(ids, ImageSize::Medium),
                    None => Task::none(),
                };
                self.prune_images();
                task
            }
            Message::NextPairFetched(Err(err)) => {
                self.session.finish_next_fetch(None);
                warn!("next-pair prefetch failed: {err}");
                Task::none()
            }
            Message::RetryPair => self.ensure_current(),
            Message::SkipPair => match self.session.skip_pair() {
                Some(SkipPlan::Promoted) => {
                    let ids = self.session.current().map(Pair::ids);
                    let mut tasks = vec![self.ensure_next()];
                    if let Some(ids) = ids {
                        tasks.push(self.fetch_images(ids, ImageSize::Full));
                    }
                    self.prune_images();
                    Task::batch(tasks)
                }
                Some(SkipPlan::Refetch) => self.ensure_current(),
                None => Task::none(),
            },

            // ----- vote pipeline -----
            Message::VoteIntent(side) => {
                if self.session.view() != View::Rank || !self.session.begin_vote(side) {
                    return Task::none();
                }
                Task::perform(tokio::time::sleep(VOTE_DWELL), |_| Message::VoteDwellElapsed)
            }
            Message::VoteDwellElapsed => match self.session.resolve_vote() {
                Some(VotePlan::Warm {
                    winner_id,
                    loser_id,
                }) => {
                    debug!("warm vote: {winner_id} over {loser_id}");
                    let client = self.client.clone();
                    let vote = Task::perform(
                        async move { client.vote(winner_id, loser_id).await },
                        Message::VoteRecorded,
                    );

                    // The promoted pair is already on screen; everything
                    // else is fire-and-forget and unordered.
                    let ids = self.session.current().map(Pair::ids);
                    let mut tasks = vec![vote, self.refresh_progress(), self.ensure_next()];
                    if let Some(ids) = ids {
                        tasks.push(self.fetch_images(ids, ImageSize::Full));
                    }
                    self.prune_images();
                    Task::batch(tasks)
                }
                Some(VotePlan::Cold {
                    winner_id,
                    loser_id,
                }) => {
                    debug!("cold vote: {winner_id} over {loser_id}");
                    let client = self.client.clone();
                    Task::perform(
                        async move { client.vote(winner_id, loser_id).await },
                        Message::ColdVoteFinished,
                    )
                }
                None => Task::none(),
            },
            Message::VoteRecorded(Ok(())) => Task::none(),
            Message::VoteRecorded(Err(err)) => {
                // The optimistic promotion is not rolled back; server-side
                // state may now disagree with what the user saw.
                warn!("background vote failed to record: {err}");
                Task::none()
            }
            Message::ColdVoteFinished(result) => {
                let recorded = match result {
                    Ok(()) => true,
                    Err(err) => {
                        error!("vote failed: {err}");
                        false
                    }
                };
                if self.session.finish_cold_vote(recorded) {
                    let fetch = self.ensure_current();
                    Task::batch([self.refresh_progress(), fetch])
                } else {
                    Task::none()
                }
            }

            // ----- image cache -----
            Message::ImageFetched(id, size, Ok(bytes)) => {
                self.images.insert(id, size, bytes);
                Task::none()
            }
            Message::ImageFetched(id, size, Err(err)) => {
                self.images.fail(id, size);
                warn!("image {id} ({}) failed to load: {err}", size.as_str());
                Task::none()
            }

            // ----- review screen -----
            Message::OpenReview => {
                if !self.session.open_review() {
                    return Task::none();
                }
                self.fetch_review_list()
            }
            Message::RefreshReview => {
                if self.review.loading {
                    return Task::none();
                }
                self.fetch_review_list()
            }
            Message::ReviewFetched(Ok(items)) => {
                self.review.loading = false;
                let ids: Vec<i64> = items.iter().map(|w| w.id).collect();
                self.review.items = items;

                let task = self.fetch_images(ids, ImageSize::Small);
                self.prune_images();
                task
            }
            Message::ReviewFetched(Err(err)) => {
                self.review.loading = false;
                error!("review list fetch failed: {err}");
                self.review.error = Some("Failed to load the review list.".to_string());
                Task::none()
            }
            Message::CloseReview => {
                if self.session.close_review() {
                    // Cached pairs survive the round trip; this only fetches
                    // when the slot is actually empty
                    self.ensure_current()
                } else {
                    Task::none()
                }
            }
            Message::MovePathChanged(path) => {
                self.review.move_path = path;
                Task::none()
            }
            Message::KeepWallpaper(id) => {
                self.review.items.retain(|w| w.id != id);
                Task::none()
            }
            Message::MoveWallpaper(id) => {
                self.review.error = None;
                let client = self.client.clone();
                let destination = self.review.move_path.clone();
                Task::perform(
                    async move { client.move_wallpaper(id, destination).await },
                    move |result| Message::WallpaperMoved(id, result),
                )
            }
            Message::WallpaperMoved(id, Ok(())) => {
                info!("wallpaper {id} moved out of the ranking pool");
                self.review.items.retain(|w| w.id != id);
                Task::none()
            }
            Message::WallpaperMoved(id, Err(err)) => {
                error!("failed to move wallpaper {id}: {err}");
                self.review.error =
                    Some("Failed to move wallpaper. The file was left in place.".to_string());
                Task::none()
            }
        }
    }

    /// Build the user interface for the active screen
    fn view(&self) -> Element<Message> {
        match self.session.view() {
            View::Scan => ui::scan::view(&self.scan),
            View::Rank => ui::rank::view(&self.session, &self.images),
            View::Review => ui::review::view(&self.review, &self.images),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(handle_key)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    // ----- remote work helpers -----

    fn refresh_progress(&self) -> Task<Message> {
        let client = self.client.clone();
        Task::perform(
            async move { client.get_progress().await },
            Message::ProgressFetched,
        )
    }

    /// Block-fetch the displayed pair if the slot is empty. Guarded by the
    /// session so concurrent calls never issue duplicate requests.
    fn ensure_current(&mut self) -> Task<Message> {
        if !self.session.begin_current_fetch() {
            return Task::none();
        }
        let client = self.client.clone();
        Task::perform(
            async move { client.get_pair().await },
            Message::CurrentPairFetched,
        )
    }

    /// Prefetch the pair after the displayed one, at most one ahead
    fn ensure_next(&mut self) -> Task<Message> {
        if !self.session.begin_next_fetch() {
            return Task::none();
        }
        let client = self.client.clone();
        Task::perform(
            async move { client.get_pair().await },
            Message::NextPairFetched,
        )
    }

    /// Fetch image bytes for every id not already cached or in flight
    fn fetch_images(
        &mut self,
        ids: impl IntoIterator<Item = i64>,
        size: ImageSize,
    ) -> Task<Message> {
        let mut tasks = Vec::new();
        for id in ids {
            if !self.images.begin_fetch(id, size) {
                continue;
            }
            let client = self.client.clone();
            tasks.push(Task::perform(
                async move { client.fetch_image(id, size).await },
                move |result| Message::ImageFetched(id, size, result),
            ));
        }
        Task::batch(tasks)
    }

    fn fetch_review_list(&mut self) -> Task<Message> {
        self.review.loading = true;
        self.review.error = None;
        let client = self.client.clone();
        Task::perform(
            async move { client.get_review_list(REVIEW_LIMIT).await },
            Message::ReviewFetched,
        )
    }

    /// Evict cached images for wallpapers no longer on any screen
    fn prune_images(&mut self) {
        let mut keep = std::collections::HashSet::new();
        if let Some(pair) = self.session.current() {
            keep.extend(pair.ids());
        }
        if let Some(pair) = self.session.next() {
            keep.extend(pair.ids());
        }
        keep.extend(self.review.items.iter().map(|w| w.id));
        self.images.retain_ids(&keep);
    }
}

/// Arrow keys vote for the matching side; everything else passes through.
/// The same in-flight exclusion as clicking applies in `update`.
fn handle_key(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        keyboard::Key::Named(keyboard::key::Named::ArrowLeft) => {
            Some(Message::VoteIntent(Side::Left))
        }
        keyboard::Key::Named(keyboard::key::Named::ArrowRight) => {
            Some(Message::VoteIntent(Side::Right))
        }
        _ => None,
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    iced::application("Wallpaper Ranker", Wallrank::update, Wallrank::view)
        .subscription(Wallrank::subscription)
        .theme(Wallrank::theme)
        .centered()
        .run_with(Wallrank::new)
}
