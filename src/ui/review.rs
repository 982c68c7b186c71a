/// Review screen: lowest-rated wallpapers
///
/// Grid of the bottom-rated items with Keep (local dismissal) and Move
/// (remote relocation to a user-editable folder). Returning to ranking
/// leaves the controller's pair slots untouched.

use iced::widget::{button, column, container, image, row, scrollable, text, text_input, Space};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::data::{ImageSize, Wallpaper};
use crate::state::images::ImageCache;
use crate::Message;

/// How many lowest-rated items the review list asks for
pub const REVIEW_LIMIT: u32 = 50;

const GRID_COLUMNS: usize = 4;

/// Screen-local UI state for the review view
#[derive(Debug)]
pub struct ReviewState {
    pub items: Vec<Wallpaper>,
    pub loading: bool,
    pub move_path: String,
    pub error: Option<String>,
}

impl Default for ReviewState {
    fn default() -> Self {
        ReviewState {
            items: Vec::new(),
            loading: false,
            move_path: "./rejected".to_string(),
            error: None,
        }
    }
}

pub fn view<'a>(state: &'a ReviewState, images: &'a ImageCache) -> Element<'a, Message> {
    let header = row![
        column![
            text("Review Low-Rated").size(24),
            text("Decide what to do with your lowest ranked wallpapers.").size(13),
        ]
        .spacing(4),
        Space::with_width(Length::Fill),
        text("Move to:").size(13),
        text_input("./rejected", &state.move_path)
            .on_input(Message::MovePathChanged)
            .padding(8)
            .size(14)
            .width(180),
        button(text("Refresh").size(14))
            .style(button::secondary)
            .on_press_maybe((!state.loading).then_some(Message::RefreshReview)),
        button(text("Back").size(14))
            .style(button::secondary)
            .on_press(Message::CloseReview),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    let mut content = column![header]
        .spacing(20)
        .padding(20)
        .width(Length::Fill)
        .height(Length::Fill);

    if let Some(error) = &state.error {
        content = content.push(text(error).size(14).style(text::danger));
    }

    let body: Element<'a, Message> = if state.loading {
        centered(text("Loading review list…").size(16).into())
    } else if state.items.is_empty() {
        centered(
            column![
                text("No wallpapers to review.").size(16),
                button(text("Return to Ranking"))
                    .style(button::text)
                    .on_press(Message::CloseReview),
            ]
            .spacing(12)
            .align_x(Alignment::Center)
            .into(),
        )
    } else {
        let mut grid = column![].spacing(16);
        for chunk in state.items.chunks(GRID_COLUMNS) {
            let mut line = row![].spacing(16);
            for item in chunk {
                line = line.push(card(item, images));
            }
            grid = grid.push(line);
        }
        scrollable(grid).width(Length::Fill).height(Length::Fill).into()
    };

    content.push(body).into()
}

/// One grid cell: thumbnail, rating, and the keep/move actions
fn card<'a>(item: &'a Wallpaper, images: &'a ImageCache) -> Element<'a, Message> {
    let thumb: Element<'a, Message> = match images.get(item.id, ImageSize::Small) {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(130)
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text("Loading…").size(12))
            .width(Length::Fill)
            .height(130)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into(),
    };

    column![
        thumb,
        text(&item.filename).size(12),
        text(format!(
            "μ {:.1}  ·  {} comparisons",
            item.rating_mu, item.comparisons_count
        ))
        .size(11),
        row![
            button(text("Keep").size(12))
                .style(button::secondary)
                .on_press(Message::KeepWallpaper(item.id))
                .width(Length::Fill),
            button(text("Move").size(12))
                .style(button::danger)
                .on_press(Message::MoveWallpaper(item.id))
                .width(Length::Fill),
        ]
        .spacing(8),
    ]
    .spacing(6)
    .width(230)
    .into()
}

fn centered<'a>(content: Element<'a, Message>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
