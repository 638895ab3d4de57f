use iced::widget::{button, row, text, text_input};
use iced::{Alignment, Element, Length};

use crate::state::{Action, SearchMode};
use crate::style::{self, Palette};
use crate::Message;

pub const SEARCH_PLACEHOLDER: &str = "Search photos with natural language...";

/// Title bar with the search box and the keyword/deep mode switch.
pub fn view<'a>(query: &'a str, mode: SearchMode, loading: bool) -> Element<'a, Message> {
    let mut input = text_input(SEARCH_PLACEHOLDER, query)
        .on_input(move |q| Message::App(Action::SearchEdited { query: q, mode }))
        .padding(8)
        .width(Length::Fill);
    if mode.is_deep() {
        input = input.on_submit(Message::App(Action::DeepSearchTriggered));
    }

    row![
        text("PhotoMind").size(26),
        input,
        mode_button(SearchMode::Keyword, mode, query),
        mode_button(SearchMode::Deep, mode, query),
        button("Deep search")
            .style(style::button_primary())
            .on_press_maybe((!loading).then_some(Message::App(Action::DeepSearchTriggered))),
    ]
    .spacing(Palette::SPACING)
    .padding(Palette::SPACING)
    .align_items(Alignment::Center)
    .into()
}

fn mode_button<'a>(target: SearchMode, current: SearchMode, query: &str) -> Element<'a, Message> {
    let style = if target == current {
        style::button_primary()
    } else {
        style::button_secondary()
    };
    button(text(target.to_string()))
        .style(style)
        .on_press(Message::App(Action::SearchEdited { query: query.to_string(), mode: target }))
        .into()
}
