use iced::widget::{button, column, row, scrollable, text, text_input, Column};
use iced::{Element, Length};

use api_client::Tab;

use crate::state::{Action, ALL_PHOTOS};
use crate::style::{self, Palette};
use crate::Message;

/// Inline "add tab" editor state.
#[derive(Debug, Default, Clone)]
pub struct SidebarState {
    adding: bool,
    new_tab_name: String,
}

impl SidebarState {
    pub fn adding(&self) -> bool {
        self.adding
    }

    pub fn new_tab_name(&self) -> &str {
        &self.new_tab_name
    }

    pub(crate) fn open(&mut self) {
        self.adding = true;
    }

    pub(crate) fn close(&mut self) {
        self.adding = false;
        self.new_tab_name.clear();
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.new_tab_name = name;
    }

    /// Trimmed name to create, closing the editor. Blank names keep it open.
    pub(crate) fn take_name(&mut self) -> Option<String> {
        let name = self.new_tab_name.trim().to_string();
        if name.is_empty() {
            return None;
        }
        self.close();
        Some(name)
    }
}

pub fn view<'a>(tabs: Option<&'a [Tab]>, active_tab: &'a str, sidebar: &'a SidebarState) -> Element<'a, Message> {
    let mut nav = Column::new().spacing(4).push(tab_entry(ALL_PHOTOS, active_tab));

    match tabs {
        None => {
            nav = nav.push(text("Loading tabs...").size(14));
        }
        Some(tabs) => {
            for tab in tabs {
                nav = nav.push(tab_entry(&tab.tab_name, active_tab));
            }
        }
    }

    let add: Element<Message> = if sidebar.adding {
        column![
            text_input("Tab name", &sidebar.new_tab_name)
                .on_input(|s| Message::App(Action::AddTabNameChanged(s)))
                .on_submit(Message::App(Action::AddTabSubmitted)),
            row![
                button("Add")
                    .style(style::button_primary())
                    .on_press(Message::App(Action::AddTabSubmitted)),
                button("Cancel")
                    .style(style::button_secondary())
                    .on_press(Message::App(Action::AddTabCancelled)),
            ]
            .spacing(8),
        ]
        .spacing(8)
        .into()
    } else {
        button("+ New tab")
            .style(style::button_secondary())
            .on_press(Message::App(Action::AddTabOpened))
            .into()
    };

    column![
        button("Upload Photos")
            .width(Length::Fill)
            .style(style::button_primary())
            .on_press(Message::App(Action::UploadModalOpened)),
        text("Library").size(14),
        scrollable(nav).height(Length::Fill),
        add,
    ]
    .spacing(Palette::SPACING)
    .width(Length::Fixed(220.0))
    .into()
}

fn tab_entry<'a>(name: &str, active_tab: &str) -> Element<'a, Message> {
    button(text(name.to_string()))
        .width(Length::Fill)
        .style(style::tab_button(name == active_tab))
        .on_press(Message::App(Action::TabSelected(name.to_string())))
        .into()
}
