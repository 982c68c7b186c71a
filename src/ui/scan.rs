/// Scan screen: directory path entry
///
/// The starting screen. A scan that finds images hands the session over to
/// the rank screen; a scan that finds nothing (or fails) keeps the user
/// here with an inline message.

use iced::widget::{button, column, container, text, text_input};
use iced::{Alignment, Element, Length};

use crate::Message;

/// Screen-local UI state for the scan view
#[derive(Debug, Default)]
pub struct ScanState {
    pub path: String,
    pub busy: bool,
    pub error: Option<String>,
}

pub fn view(state: &ScanState) -> Element<'_, Message> {
    let mut content = column![
        text("Wallpaper Ranker").size(36),
        text("Enter the path to your wallpaper collection to begin ranking.").size(16),
        text_input("/home/user/wallpapers", &state.path)
            .on_input(Message::ScanPathChanged)
            .on_submit(Message::ScanSubmitted)
            .padding(12)
            .size(18),
    ]
    .spacing(20)
    .max_width(520)
    .align_x(Alignment::Center);

    if let Some(error) = &state.error {
        content = content.push(text(error).size(14).style(text::danger));
    }

    let label = if state.busy {
        "Scanning Collection…"
    } else {
        "Start Ranking"
    };
    let submit = (!state.busy && !state.path.is_empty()).then_some(Message::ScanSubmitted);

    content = content.push(
        button(text(label).size(18))
            .on_press_maybe(submit)
            .padding(12)
            .width(Length::Fill),
    );

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
