//! Upload dialog: drop zone, file list and the processing indicator.

use iced::widget::{button, column, container, progress_bar, row, scrollable, text, Column};
use iced::{Alignment, Element, Length};
use std::path::PathBuf;

use crate::state::Action;
use crate::style::{self, Palette};
use crate::Message;

/// Extensions offered by the file picker. Only a hint; nothing is enforced.
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "heic"];

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub size: Option<u64>,
}

impl SelectedFile {
    fn new(path: PathBuf) -> Self {
        let size = std::fs::metadata(&path).ok().map(|m| m.len());
        Self { path, size }
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug, Default, Clone)]
pub struct UploadModal {
    drag_active: bool,
    files: Vec<SelectedFile>,
    uploading: bool,
}

impl UploadModal {
    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn files(&self) -> &[SelectedFile] {
        &self.files
    }

    pub fn uploading(&self) -> bool {
        self.uploading
    }

    pub(crate) fn set_drag_active(&mut self, active: bool) {
        self.drag_active = active;
    }

    pub(crate) fn set_uploading(&mut self, uploading: bool) {
        self.uploading = uploading;
    }

    /// Append files, skipping paths that are already listed.
    pub(crate) fn add_files(&mut self, paths: Vec<PathBuf>) {
        for path in paths {
            if !self.files.iter().any(|f| f.path == path) {
                self.files.push(SelectedFile::new(path));
            }
        }
    }

    pub(crate) fn remove_file(&mut self, index: usize) {
        if index < self.files.len() {
            self.files.remove(index);
        }
    }
}

/// Human readable size, e.g. `1.5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut exp = 0;
    while value >= 1024.0 && exp < UNITS.len() - 1 {
        value /= 1024.0;
        exp += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exp])
}

pub fn upload_button_label(modal: &UploadModal) -> String {
    if modal.uploading {
        return "Processing...".to_string();
    }
    match modal.files.len() {
        0 => "Upload Photos".to_string(),
        1 => "Upload 1 file".to_string(),
        n => format!("Upload {} files", n),
    }
}

pub fn view(modal: &UploadModal) -> Element<'_, Message> {
    let drop_hint = if modal.drag_active {
        "Release to add these photos"
    } else {
        "Drop photos here or click to browse"
    };
    let drop_zone = button(
        column![
            text(drop_hint).size(18),
            text("Support for JPG, PNG, GIF, and other image formats").size(14),
            text("Maximum file size: 16MB per image").size(12),
        ]
        .spacing(6)
        .align_items(Alignment::Center),
    )
    .width(Length::Fill)
    .padding(30)
    .style(style::drop_zone(modal.drag_active))
    .on_press_maybe((!modal.uploading).then_some(Message::PickFiles));

    let mut content = column![
        row![
            text("Upload Photos").size(22).width(Length::Fill),
            button("Close").style(style::button_secondary()).on_press_maybe(
                (!modal.uploading).then_some(Message::App(Action::UploadModalClosed))
            ),
        ]
        .align_items(Alignment::Center),
        drop_zone,
    ]
    .spacing(Palette::SPACING);

    if !modal.files.is_empty() {
        let mut list = Column::new().spacing(4);
        for (i, file) in modal.files.iter().enumerate() {
            let size = file.size.map(format_file_size).unwrap_or_else(|| "unknown size".into());
            list = list.push(
                row![
                    text(file.name()).width(Length::Fill),
                    text(size).size(12),
                    button("Remove").style(style::button_secondary()).on_press_maybe(
                        (!modal.uploading).then_some(Message::App(Action::UploadFileRemoved(i)))
                    ),
                ]
                .spacing(10)
                .align_items(Alignment::Center),
            );
        }
        content = content
            .push(text(format!("Selected Files ({})", modal.files.len())).size(16))
            .push(scrollable(list).height(Length::Fixed(160.0)));
    }

    let can_upload = !modal.uploading && !modal.files.is_empty();
    content = content.push(
        row![
            button("Cancel").style(style::button_secondary()).on_press_maybe(
                (!modal.uploading).then_some(Message::App(Action::UploadModalClosed))
            ),
            button(text(upload_button_label(modal)))
                .style(style::button_primary())
                .on_press_maybe(can_upload.then_some(Message::App(Action::UploadConfirmed))),
        ]
        .spacing(10),
    );

    if modal.uploading {
        content = content.push(
            column![
                text("Processing images with AI...").size(14),
                text("This may take a moment").size(12),
                progress_bar(0.0..=1.0, 0.5).height(Length::Fixed(6.0)),
            ]
            .spacing(4),
        );
    }

    container(content)
        .padding(20)
        .width(Length::Fixed(560.0))
        .style(style::card())
        .into()
}
