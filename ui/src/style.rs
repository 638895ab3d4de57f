//! Colors, spacing and widget styles for the PhotoMind window.
//!
//! All views pull their appearance from here so the gallery, sidebar and
//! dialogs share one palette.

use iced::theme;
use iced::widget::{button, container};
use iced::{Background, Border, Color, Theme};

pub struct Palette;

impl Palette {
    pub const PRIMARY: Color = Color { r: 0.15, g: 0.39, b: 0.92, a: 1.0 };
    pub const PRIMARY_LIGHT: Color = Color { r: 0.86, g: 0.91, b: 1.0, a: 1.0 };
    pub const ON_PRIMARY: Color = Color::WHITE;
    pub const SURFACE: Color = Color { r: 0.98, g: 0.98, b: 0.98, a: 1.0 };
    pub const ON_SURFACE: Color = Color { r: 0.1, g: 0.1, b: 0.1, a: 1.0 };
    pub const MUTED: Color = Color { r: 0.9, g: 0.91, b: 0.93, a: 1.0 };
    pub const ERROR: Color = Color { r: 0.80, g: 0.0, b: 0.0, a: 1.0 };
    pub const ERROR_LIGHT: Color = Color { r: 1.0, g: 0.93, b: 0.93, a: 1.0 };

    pub const SPACING: u16 = 16;
}

struct Filled {
    background: Color,
    text: Color,
    hover: Color,
}

impl button::StyleSheet for Filled {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.background)),
            text_color: self.text,
            border: Border { color: self.background, width: 1.0, radius: 6.0.into() },
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.hover)),
            ..self.active(style)
        }
    }

    fn disabled(&self, style: &Self::Style) -> button::Appearance {
        let active = self.active(style);
        button::Appearance {
            background: Some(Background::Color(Color { a: 0.5, ..self.background })),
            text_color: Color { a: 0.5, ..active.text_color },
            ..active
        }
    }
}

/// Style for primary action buttons.
pub fn button_primary() -> theme::Button {
    theme::Button::Custom(Box::new(Filled {
        background: Palette::PRIMARY,
        text: Palette::ON_PRIMARY,
        hover: Color { r: 0.11, g: 0.31, b: 0.85, a: 1.0 },
    }))
}

pub fn button_secondary() -> theme::Button {
    theme::Button::Custom(Box::new(Filled {
        background: Palette::MUTED,
        text: Palette::ON_SURFACE,
        hover: Color { r: 0.82, g: 0.84, b: 0.87, a: 1.0 },
    }))
}

/// Sidebar entry, highlighted when it is the active tab.
pub fn tab_button(active: bool) -> theme::Button {
    let background = if active { Palette::PRIMARY_LIGHT } else { Color::TRANSPARENT };
    theme::Button::Custom(Box::new(Filled {
        background,
        text: if active { Palette::PRIMARY } else { Palette::ON_SURFACE },
        hover: if active { Palette::PRIMARY_LIGHT } else { Palette::MUTED },
    }))
}

struct Outlined {
    border: Color,
    background: Color,
}

impl button::StyleSheet for Outlined {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.background)),
            text_color: Palette::ON_SURFACE,
            border: Border { color: self.border, width: 2.0, radius: 8.0.into() },
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            border: Border { color: Palette::PRIMARY, width: 2.0, radius: 8.0.into() },
            ..self.active(style)
        }
    }
}

pub fn drop_zone(active: bool) -> theme::Button {
    let (border, background) = if active {
        (Palette::PRIMARY, Palette::PRIMARY_LIGHT)
    } else {
        (Palette::MUTED, Palette::SURFACE)
    };
    theme::Button::Custom(Box::new(Outlined { border, background }))
}

pub fn photo_card() -> theme::Button {
    theme::Button::Custom(Box::new(Outlined { border: Palette::MUTED, background: Color::WHITE }))
}

struct Boxed {
    background: Color,
    text: Color,
    border: Color,
    radius: f32,
}

impl container::StyleSheet for Boxed {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(Background::Color(self.background)),
            text_color: Some(self.text),
            border: Border { color: self.border, width: 1.0, radius: self.radius.into() },
            shadow: Default::default(),
        }
    }
}

/// Container style for dialogs and panels.
pub fn card() -> theme::Container {
    theme::Container::Custom(Box::new(Boxed {
        background: Palette::SURFACE,
        text: Palette::ON_SURFACE,
        border: Palette::MUTED,
        radius: 8.0,
    }))
}

pub fn label_chip() -> theme::Container {
    theme::Container::Custom(Box::new(Boxed {
        background: Palette::PRIMARY_LIGHT,
        text: Palette::PRIMARY,
        border: Palette::PRIMARY_LIGHT,
        radius: 10.0,
    }))
}

pub fn error_banner() -> theme::Container {
    theme::Container::Custom(Box::new(Boxed {
        background: Palette::ERROR_LIGHT,
        text: Palette::ERROR,
        border: Palette::ERROR,
        radius: 4.0,
    }))
}

/// Dimmed backdrop behind modal dialogs.
pub fn backdrop() -> theme::Container {
    theme::Container::Custom(Box::new(Boxed {
        background: Color { r: 0.0, g: 0.0, b: 0.0, a: 0.45 },
        text: Palette::ON_SURFACE,
        border: Color::TRANSPARENT,
        radius: 0.0,
    }))
}
