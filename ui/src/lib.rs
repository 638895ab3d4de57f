//! User interface for PhotoMind.

mod image_loader;
mod style;

pub mod detail;
pub mod gallery;
pub mod header;
pub mod sidebar;
pub mod state;
pub mod upload;

pub use image_loader::{ImageLoader, ImageLoaderError};
pub use state::{Action, AppState, Effect, SearchMode, ALL_PHOTOS};

use api_client::ApiClient;
use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{
    event, executor, keyboard, window, Alignment, Application, Command, Element, Event, Length,
    Settings, Subscription, Theme,
};
use rfd::AsyncFileDialog;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::PathBuf;
use tokio::time::{sleep, Duration};

use crate::gallery::GalleryView;
use crate::style::Palette;

const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Startup parameters handed over by the launcher.
#[derive(Debug, Clone)]
pub struct UiFlags {
    pub api_base_url: String,
    pub cache_dir: PathBuf,
    pub thumbnails_preload: usize,
    pub preload_threads: usize,
}

#[cfg_attr(feature = "trace-spans", tracing::instrument)]
pub fn run(flags: UiFlags) -> iced::Result {
    PhotoMindUI::run(Settings::with_flags(flags))
}

#[derive(Debug, Clone)]
pub enum Message {
    App(Action),
    PickFiles,
    ThumbnailLoaded(String, Result<Handle, String>),
    FullImageLoaded(String, Result<Handle, String>),
    LoadMorePhotos,
    EscapePressed,
}

impl From<Action> for Message {
    fn from(action: Action) -> Self {
        Message::App(action)
    }
}

pub struct PhotoMindUI {
    state: AppState,
    client: ApiClient,
    image_loader: ImageLoader,
    thumbnails: HashMap<String, Handle>,
    full_images: HashMap<String, Handle>,
    requested: HashSet<String>,
    requested_full: HashSet<String>,
    page_start: usize,
    display_limit: usize,
    error_log_path: PathBuf,
}

impl PhotoMindUI {
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn photo_count(&self) -> usize {
        self.state.photos().len()
    }

    /// Number of photos passing the current tag/query filter.
    pub fn visible_count(&self) -> usize {
        gallery::filter_photos(self.state.photos(), self.state.search_query(), self.state.tags()).len()
    }

    pub fn error_count(&self) -> usize {
        self.state.errors().len()
    }

    pub fn display_limit(&self) -> usize {
        self.display_limit
    }

    pub fn thumbnail_requests(&self) -> usize {
        self.requested.len()
    }

    pub fn has_thumbnail(&self, photo_id: &str) -> bool {
        self.thumbnails.contains_key(photo_id)
    }

    fn log_error(&self, msg: &str) {
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.error_log_path)
        {
            let _ = writeln!(file, "{}", msg);
        }
    }

    fn error_timeout() -> Command<Message> {
        Command::perform(
            async {
                sleep(ERROR_DISPLAY_DURATION).await;
            },
            |_| Message::App(Action::ErrorsCleared),
        )
    }

    fn dispatch(&mut self, action: Action) -> Command<Message> {
        if matches!(action, Action::TabSelected(_) | Action::SearchEdited { .. }) {
            self.display_limit = self.page_start;
        }

        let errors_before = self.state.errors().len();
        let effects = self.state.update(action);

        let mut commands: Vec<Command<Message>> =
            effects.into_iter().map(|effect| self.perform(effect)).collect();

        if self.state.errors().len() > errors_before {
            for msg in &self.state.errors()[errors_before..] {
                self.log_error(msg);
            }
            commands.push(Self::error_timeout());
        }
        commands.push(self.request_images());
        Command::batch(commands)
    }

    /// Turn a requested effect into an async API call whose result is fed
    /// back into the state store.
    fn perform(&self, effect: Effect) -> Command<Message> {
        let client = self.client.clone();
        match effect {
            Effect::FetchTabs => Command::perform(
                async move { client.get_tabs().await.map_err(|e| e.to_string()) },
                |result| Message::App(Action::TabsLoaded(result)),
            ),
            Effect::FetchPhotos { generation } => Command::perform(
                async move { client.search_images("").await.map_err(|e| e.to_string()) },
                move |result| Message::App(Action::PhotosLoaded { generation, result }),
            ),
            Effect::DeepSearch { query, generation } => Command::perform(
                async move { client.deep_search(&query).await.map_err(|e| e.to_string()) },
                move |result| Message::App(Action::TagsResolved { generation, result }),
            ),
            Effect::CreateTab { name } => Command::perform(
                async move { client.add_tab(&name).await.map_err(|e| e.to_string()) },
                |result| Message::App(Action::TabCreated(result)),
            ),
            Effect::Upload { files } => Command::perform(
                async move {
                    client
                        .upload_images(&files)
                        .await
                        .map(|uploaded| uploaded.len())
                        .map_err(|e| e.to_string())
                },
                |result| Message::App(Action::UploadFinished(result)),
            ),
        }
    }

    /// Fetch thumbnails for the cards on screen and the full image for an
    /// open detail view. Each image is requested at most once.
    fn request_images(&mut self) -> Command<Message> {
        let mut wanted: Vec<(String, String)> = Vec::new();
        for entry in gallery::filter_photos(self.state.photos(), self.state.search_query(), self.state.tags())
            .iter()
            .take(self.display_limit)
        {
            if self.requested.insert(entry.photo.id.clone()) {
                wanted.push((entry.photo.id.clone(), entry.photo.preview_url().to_string()));
            }
        }

        let mut commands = Vec::new();
        for (id, url) in wanted {
            let loader = self.image_loader.clone();
            commands.push(Command::perform(
                async move {
                    let result = loader.load_thumbnail(&id, &url).await.map_err(|e| e.to_string());
                    (id, result)
                },
                |(id, result)| Message::ThumbnailLoaded(id, result),
            ));
        }

        if let Some(photo) = self.state.selected_photo() {
            if !self.requested_full.contains(&photo.id) {
                let id = photo.id.clone();
                let url = photo.s3_url.clone();
                self.requested_full.insert(id.clone());
                let loader = self.image_loader.clone();
                commands.push(Command::perform(
                    async move {
                        let result = loader.load_full_image(&id, &url).await.map_err(|e| e.to_string());
                        (id, result)
                    },
                    |(id, result)| Message::FullImageLoaded(id, result),
                ));
            }
        }

        Command::batch(commands)
    }

    fn error_banner(&self) -> Option<Element<'_, Message>> {
        if self.state.errors().is_empty() {
            return None;
        }
        let mut list = Column::new().spacing(5);
        for (i, msg) in self.state.errors().iter().enumerate() {
            list = list.push(
                row![
                    text(msg.clone()).size(14).width(Length::Fill),
                    button("Dismiss")
                        .style(style::button_secondary())
                        .on_press(Message::App(Action::ErrorDismissed(i))),
                ]
                .spacing(10)
                .align_items(Alignment::Center),
            );
        }
        let banner = column![
            row![
                text("Something went wrong").size(16).width(Length::Fill),
                button("Dismiss All")
                    .style(style::button_secondary())
                    .on_press(Message::App(Action::ErrorsCleared)),
            ]
            .spacing(10)
            .align_items(Alignment::Center),
            scrollable(list).height(Length::Fixed(90.0)),
        ]
        .spacing(5);
        Some(
            container(banner)
                .style(style::error_banner())
                .padding(10)
                .width(Length::Fill)
                .into(),
        )
    }
}

impl Application for PhotoMindUI {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = UiFlags;

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(flags)))]
    fn new(flags: Self::Flags) -> (Self, Command<Message>) {
        tracing::info!("starting PhotoMind UI against {}", flags.api_base_url);
        let page_start = if flags.thumbnails_preload == 0 {
            gallery::PAGE_SIZE
        } else {
            flags.thumbnails_preload
        };
        let mut app = Self {
            state: AppState::new(),
            client: ApiClient::with_base_url(flags.api_base_url),
            image_loader: ImageLoader::new(flags.cache_dir.clone(), flags.preload_threads),
            thumbnails: HashMap::new(),
            full_images: HashMap::new(),
            requested: HashSet::new(),
            requested_full: HashSet::new(),
            page_start,
            display_limit: page_start,
            error_log_path: flags.cache_dir.join("ui_errors.log"),
        };
        let command = app.dispatch(Action::Mounted);
        (app, command)
    }

    fn title(&self) -> String {
        String::from("PhotoMind - AI Photo Gallery")
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::App(action) => return self.dispatch(action),
            Message::PickFiles => {
                return Command::perform(
                    async {
                        AsyncFileDialog::new()
                            .add_filter("Images", &upload::IMAGE_EXTENSIONS[..])
                            .pick_files()
                            .await
                            .map(|files| files.into_iter().map(|f| f.path().to_path_buf()).collect())
                            .unwrap_or_default()
                    },
                    |files: Vec<PathBuf>| Message::App(Action::UploadFilesAdded(files)),
                );
            }
            Message::ThumbnailLoaded(id, result) => match result {
                Ok(handle) => {
                    self.thumbnails.insert(id, handle);
                }
                Err(e) => {
                    tracing::warn!("failed to load thumbnail for {}: {}", id, e);
                    self.requested.remove(&id);
                }
            },
            Message::FullImageLoaded(id, result) => match result {
                Ok(handle) => {
                    self.full_images.insert(id, handle);
                }
                Err(e) => {
                    tracing::warn!("failed to load image for {}: {}", id, e);
                    self.requested_full.remove(&id);
                }
            },
            Message::LoadMorePhotos => {
                self.display_limit += gallery::PAGE_SIZE;
                return self.request_images();
            }
            Message::EscapePressed => {
                let action = if self.state.upload_modal().is_some() {
                    Action::UploadModalClosed
                } else if self.state.selected_photo().is_some() {
                    Action::DetailClosed
                } else if self.state.sidebar().adding() {
                    Action::AddTabCancelled
                } else {
                    return Command::none();
                };
                return self.dispatch(action);
            }
        }
        Command::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status| match event {
            Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Named(keyboard::key::Named::Escape),
                ..
            }) => Some(Message::EscapePressed),
            Event::Window(_, window::Event::FileHovered(_)) => {
                Some(Message::App(Action::UploadFilesHovered))
            }
            Event::Window(_, window::Event::FilesHoveredLeft) => {
                Some(Message::App(Action::UploadHoverLeft))
            }
            Event::Window(_, window::Event::FileDropped(path)) => {
                Some(Message::App(Action::UploadFilesAdded(vec![path])))
            }
            _ => None,
        })
    }

    #[cfg_attr(feature = "trace-spans", tracing::instrument(skip(self)))]
    fn view(&self) -> Element<Message> {
        if let Some(modal) = self.state.upload_modal() {
            return overlay(upload::view(modal));
        }
        if let Some(photo) = self.state.selected_photo() {
            let handle = self
                .full_images
                .get(&photo.id)
                .or_else(|| self.thumbnails.get(&photo.id));
            return overlay(detail::view(photo, handle));
        }

        let entries = gallery::filter_photos(self.state.photos(), self.state.search_query(), self.state.tags());
        let grid = gallery::view(GalleryView {
            entries: &entries,
            query: self.state.search_query(),
            loading: self.state.loading(),
            display_limit: self.display_limit,
            thumbnails: &self.thumbnails,
        });

        let mut main = Column::new().spacing(Palette::SPACING).width(Length::Fill);
        if let Some(banner) = self.error_banner() {
            main = main.push(banner);
        }
        main = main.push(grid);

        column![
            header::view(self.state.search_query(), self.state.search_mode(), self.state.loading()),
            row![
                sidebar::view(self.state.tabs(), self.state.active_tab(), self.state.sidebar()),
                main,
            ]
            .spacing(Palette::SPACING)
            .padding(Palette::SPACING),
        ]
        .into()
    }
}

fn overlay(content: Element<'_, Message>) -> Element<'_, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .style(style::backdrop())
        .into()
}
