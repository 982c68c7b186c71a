/// Rank screen: side-by-side comparison
///
/// Renders the current pair with a progress header and vote feedback.
/// Clicking a side (or pressing the matching arrow key, handled by the
/// keyboard subscription) emits a single vote intent; the controller
/// decides whether it is accepted.

use iced::widget::{button, column, container, image, progress_bar, row, text, Space};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::data::{Side, Wallpaper};
use crate::state::images::ImageCache;
use crate::state::session::Session;
use crate::Message;

pub fn view<'a>(session: &'a Session, images: &'a ImageCache) -> Element<'a, Message> {
    let percentage = session.progress().map(|p| p.percentage).unwrap_or(0.0) as f32;

    let header = column![
        row![
            text("PROGRESS").size(11),
            Space::with_width(Length::Fill),
            text(format!("{percentage:.1}%")).size(11),
        ],
        progress_bar(0.0..=100.0, percentage).height(6),
    ]
    .spacing(4)
    .max_width(640);

    let body: Element<'a, Message> = match session.current() {
        Some(pair) => row![
            side(&pair.left, Side::Left, session, images),
            side(&pair.right, Side::Right, session, images),
        ]
        .spacing(24)
        .width(Length::Fill)
        .height(Length::Fill)
        .into(),
        None if session.loading_current() => centered(text("Loading pair…").size(18).into()),
        None => centered(
            column![
                text("Error loading wallpapers.").size(18).style(text::danger),
                button(text("Try Again")).on_press(Message::RetryPair).padding(10),
            ]
            .spacing(16)
            .align_x(Alignment::Center)
            .into(),
        ),
    };

    let can_act = session.current().is_some() && session.voting().is_none();
    let footer = row![
        button(text("Stop & Review").size(14))
            .style(button::text)
            .on_press(Message::OpenReview),
        button(text("Skip Pair").size(14))
            .style(button::text)
            .on_press_maybe(can_act.then_some(Message::SkipPair)),
    ]
    .spacing(16);

    let hints = row![
        text("← Left Arrow").size(11),
        Space::with_width(Length::Fill),
        text("Right Arrow →").size(11),
    ]
    .width(Length::Fill);

    column![
        container(header).width(Length::Fill).center_x(Length::Fill),
        body,
        container(footer).width(Length::Fill).center_x(Length::Fill),
        hints,
    ]
    .spacing(12)
    .padding(16)
    .into()
}

/// One half of the comparison: the image and its select button
fn side<'a>(
    item: &'a Wallpaper,
    this_side: Side,
    session: &'a Session,
    images: &'a ImageCache,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match images.best(item.id) {
        Some(handle) => image(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .content_fit(ContentFit::Contain)
            .into(),
        None => centered(text("Loading…").size(14).into()),
    };

    // Vote feedback: the picked side lights up while the in-flight marker
    // is set; the other side goes quiet.
    let (label, style): (&str, fn(&iced::Theme, button::Status) -> button::Style) =
        match session.voting() {
            Some(side) if side == this_side => ("Voted!", button::success),
            Some(_) => ("·", button::secondary),
            None => match this_side {
                Side::Left => ("Select Left", button::primary),
                Side::Right => ("Select Right", button::primary),
            },
        };

    let select = session
        .voting()
        .is_none()
        .then_some(Message::VoteIntent(this_side));

    column![
        container(picture).width(Length::Fill).height(Length::Fill),
        button(text(label).size(16))
            .style(style)
            .on_press_maybe(select)
            .width(Length::Fill)
            .padding(10),
    ]
    .spacing(8)
    .width(Length::Fill)
    .height(Length::Fill)
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
