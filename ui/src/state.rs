//! Orchestrator state for the PhotoMind window.
//!
//! All cross-component state lives in [`AppState`]. Every user interaction
//! and every completed request is an [`Action`]; [`AppState::update`] applies
//! it and returns the [`Effect`]s (requests) the caller has to perform. The
//! results of those requests come back as further actions.
//!
//! Photo fetches and deep searches carry a generation number. Only the answer
//! to the most recently issued request of each kind is applied, so a slow
//! response to a superseded tab switch or search edit can never overwrite
//! newer state.

use api_client::{Photo, Tab, TagHit};
use std::path::PathBuf;

use crate::sidebar::SidebarState;
use crate::upload::UploadModal;

/// Sentinel tab that shows the whole collection.
pub const ALL_PHOTOS: &str = "All Photos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Keyword,
    Deep,
}

impl SearchMode {
    pub fn is_deep(self) -> bool {
        self == SearchMode::Deep
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SearchMode::Keyword => "Keyword",
            SearchMode::Deep => "Deep",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    Mounted,
    TabSelected(String),
    SearchEdited { query: String, mode: SearchMode },
    DeepSearchTriggered,
    PhotosLoaded { generation: u64, result: Result<Vec<Photo>, String> },
    TagsResolved { generation: u64, result: Result<Vec<TagHit>, String> },
    TabsLoaded(Result<Vec<Tab>, String>),
    PhotoSelected(Photo),
    DetailClosed,
    UploadModalOpened,
    UploadModalClosed,
    UploadFilesHovered,
    UploadHoverLeft,
    UploadFilesAdded(Vec<PathBuf>),
    UploadFileRemoved(usize),
    UploadConfirmed,
    UploadFinished(Result<usize, String>),
    AddTabOpened,
    AddTabNameChanged(String),
    AddTabCancelled,
    AddTabSubmitted,
    TabCreated(Result<Tab, String>),
    ErrorDismissed(usize),
    ErrorsCleared,
}

/// A request the state store wants issued.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchTabs,
    FetchPhotos { generation: u64 },
    DeepSearch { query: String, generation: u64 },
    CreateTab { name: String },
    Upload { files: Vec<PathBuf> },
}

#[derive(Debug)]
pub struct AppState {
    active_tab: String,
    search_query: String,
    search_mode: SearchMode,
    tags: Vec<String>,
    photos: Vec<Photo>,
    tabs: Option<Vec<Tab>>,
    selected_photo: Option<Photo>,
    upload_modal: Option<UploadModal>,
    sidebar: SidebarState,
    errors: Vec<String>,
    photos_generation: u64,
    tags_generation: u64,
    pending_photos: Option<u64>,
    pending_tags: Option<u64>,
    uploading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_tab: ALL_PHOTOS.to_string(),
            search_query: String::new(),
            search_mode: SearchMode::Keyword,
            tags: Vec::new(),
            photos: Vec::new(),
            tabs: None,
            selected_photo: None,
            upload_modal: None,
            sidebar: SidebarState::default(),
            errors: Vec::new(),
            photos_generation: 0,
            tags_generation: 0,
            pending_photos: None,
            pending_tags: None,
            uploading: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_tab(&self) -> &str {
        &self.active_tab
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search_mode
    }

    /// Lower-cased tag names currently filtering the gallery.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// `None` until the tab list has been fetched.
    pub fn tabs(&self) -> Option<&[Tab]> {
        self.tabs.as_deref()
    }

    pub fn selected_photo(&self) -> Option<&Photo> {
        self.selected_photo.as_ref()
    }

    pub fn upload_modal(&self) -> Option<&UploadModal> {
        self.upload_modal.as_ref()
    }

    pub fn sidebar(&self) -> &SidebarState {
        &self.sidebar
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// True while a current photo fetch, deep search or upload is outstanding.
    pub fn loading(&self) -> bool {
        self.pending_photos.is_some() || self.pending_tags.is_some() || self.uploading
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Mounted => {
                self.search_mode = SearchMode::Keyword;
                vec![Effect::FetchTabs, self.fetch_photos()]
            }
            Action::TabSelected(name) => {
                tracing::info!("switching to tab {:?}", name);
                self.search_query.clear();
                self.tags.clear();
                self.active_tab = name.clone();
                if name == ALL_PHOTOS {
                    self.search_mode = SearchMode::Keyword;
                    self.invalidate_tags();
                    vec![self.fetch_photos()]
                } else {
                    self.search_mode = SearchMode::Deep;
                    vec![self.deep_search(name)]
                }
            }
            Action::SearchEdited { query, mode } => {
                self.search_query = query;
                self.search_mode = mode;
                match mode {
                    SearchMode::Keyword => vec![self.fetch_photos()],
                    SearchMode::Deep => Vec::new(),
                }
            }
            Action::DeepSearchTriggered => {
                self.search_mode = SearchMode::Deep;
                let query = self.search_query.trim().to_string();
                if query.is_empty() {
                    self.tags.clear();
                    self.invalidate_tags();
                    return Vec::new();
                }
                vec![self.deep_search(query)]
            }
            Action::PhotosLoaded { generation, result } => {
                if self.pending_photos != Some(generation) {
                    tracing::debug!("discarding stale photo response {}", generation);
                    return Vec::new();
                }
                self.pending_photos = None;
                match result {
                    Ok(photos) => {
                        tracing::info!("loaded {} photos", photos.len());
                        self.photos = photos;
                    }
                    Err(err) => self.record_error(format!("Failed to load photos: {}", err)),
                }
                Vec::new()
            }
            Action::TagsResolved { generation, result } => {
                if self.pending_tags != Some(generation) {
                    tracing::debug!("discarding stale deep search response {}", generation);
                    return Vec::new();
                }
                self.pending_tags = None;
                match result {
                    Ok(hits) => {
                        self.tags = hits.into_iter().map(|h| h.tag.to_lowercase()).collect();
                        tracing::info!("deep search resolved tags {:?}", self.tags);
                    }
                    Err(err) => {
                        self.tags.clear();
                        self.record_error(format!("Deep search failed: {}", err));
                    }
                }
                Vec::new()
            }
            Action::TabsLoaded(result) => {
                match result {
                    Ok(tabs) => self.tabs = Some(tabs),
                    Err(err) => {
                        self.tabs = Some(Vec::new());
                        self.record_error(format!("Failed to load tabs: {}", err));
                    }
                }
                Vec::new()
            }
            Action::PhotoSelected(photo) => {
                self.selected_photo = Some(photo);
                Vec::new()
            }
            Action::DetailClosed => {
                self.selected_photo = None;
                Vec::new()
            }
            Action::UploadModalOpened => {
                if self.upload_modal.is_none() {
                    self.upload_modal = Some(UploadModal::default());
                }
                Vec::new()
            }
            Action::UploadModalClosed => {
                if !self.uploading {
                    self.upload_modal = None;
                }
                Vec::new()
            }
            Action::UploadFilesHovered => {
                if let Some(modal) = &mut self.upload_modal {
                    modal.set_drag_active(true);
                }
                Vec::new()
            }
            Action::UploadHoverLeft => {
                if let Some(modal) = &mut self.upload_modal {
                    modal.set_drag_active(false);
                }
                Vec::new()
            }
            Action::UploadFilesAdded(files) => {
                if let Some(modal) = &mut self.upload_modal {
                    modal.set_drag_active(false);
                    if !modal.uploading() {
                        modal.add_files(files);
                    }
                }
                Vec::new()
            }
            Action::UploadFileRemoved(index) => {
                if let Some(modal) = &mut self.upload_modal {
                    if !modal.uploading() {
                        modal.remove_file(index);
                    }
                }
                Vec::new()
            }
            Action::UploadConfirmed => {
                let Some(modal) = &mut self.upload_modal else {
                    return Vec::new();
                };
                if modal.uploading() || modal.files().is_empty() {
                    return Vec::new();
                }
                modal.set_uploading(true);
                self.uploading = true;
                let files: Vec<PathBuf> = modal.files().iter().map(|f| f.path.clone()).collect();
                tracing::info!("uploading {} files", files.len());
                vec![Effect::Upload { files }]
            }
            Action::UploadFinished(result) => {
                self.uploading = false;
                self.upload_modal = None;
                match result {
                    Ok(count) => {
                        tracing::info!("upload of {} files finished", count);
                        vec![self.fetch_photos()]
                    }
                    Err(err) => {
                        self.record_error(format!("Upload failed: {}", err));
                        Vec::new()
                    }
                }
            }
            Action::AddTabOpened => {
                self.sidebar.open();
                Vec::new()
            }
            Action::AddTabNameChanged(name) => {
                self.sidebar.set_name(name);
                Vec::new()
            }
            Action::AddTabCancelled => {
                self.sidebar.close();
                Vec::new()
            }
            Action::AddTabSubmitted => match self.sidebar.take_name() {
                Some(name) => vec![Effect::CreateTab { name }],
                None => Vec::new(),
            },
            Action::TabCreated(result) => {
                match result {
                    Ok(tab) => {
                        tracing::info!("created tab {:?}", tab.tab_name);
                        self.tabs.get_or_insert_with(Vec::new).push(tab);
                    }
                    Err(err) => self.record_error(format!("Failed to create tab: {}", err)),
                }
                Vec::new()
            }
            Action::ErrorDismissed(index) => {
                if index < self.errors.len() {
                    self.errors.remove(index);
                }
                Vec::new()
            }
            Action::ErrorsCleared => {
                self.errors.clear();
                Vec::new()
            }
        }
    }

    fn fetch_photos(&mut self) -> Effect {
        self.photos_generation += 1;
        self.pending_photos = Some(self.photos_generation);
        Effect::FetchPhotos { generation: self.photos_generation }
    }

    fn deep_search(&mut self, query: String) -> Effect {
        self.tags_generation += 1;
        self.pending_tags = Some(self.tags_generation);
        Effect::DeepSearch { query, generation: self.tags_generation }
    }

    fn invalidate_tags(&mut self) {
        self.tags_generation += 1;
        self.pending_tags = None;
    }

    fn record_error(&mut self, msg: String) {
        tracing::error!("{}", msg);
        self.errors.push(msg);
    }
}
