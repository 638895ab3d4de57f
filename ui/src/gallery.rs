//! Photo grid: tag/query filtering, match highlighting and the card layout.

use api_client::Photo;
use iced::widget::image::Handle;
use iced::widget::{button, column, container, image, row, scrollable, text, Column, Row};
use iced::{Alignment, Element, Length};
use std::collections::HashMap;

use crate::state::Action;
use crate::style::{self, Palette};
use crate::Message;

pub const PAGE_SIZE: usize = 40;
const COLUMNS: usize = 4;
const MAX_LABELS: usize = 3;

/// A photo that survived filtering, with the tag that made it match.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryEntry<'a> {
    pub photo: &'a Photo,
    pub matched_tag: Option<String>,
}

/// Filter `photos` for display.
///
/// A tag set with at least one non-blank tag wins over the free-text query. Matching is
/// case-insensitive on substrings: for tags either side may contain the
/// other, for the query the photo tag has to contain it. With neither set
/// every photo is kept.
pub fn filter_photos<'a>(photos: &'a [Photo], query: &str, tags: &[String]) -> Vec<GalleryEntry<'a>> {
    let wanted: Vec<String> = tags
        .iter()
        .map(|t| t.to_lowercase())
        .filter(|t| !t.trim().is_empty())
        .collect();
    if !wanted.is_empty() {
        return photos
            .iter()
            .filter_map(|photo| {
                first_tag_matching(photo, |name| {
                    wanted.iter().any(|w| w.contains(name) || name.contains(w.as_str()))
                })
                .map(|tag| GalleryEntry { photo, matched_tag: Some(tag) })
            })
            .collect();
    }

    if !query.is_empty() {
        let query = query.to_lowercase();
        return photos
            .iter()
            .filter_map(|photo| {
                first_tag_matching(photo, |name| name.contains(query.as_str()))
                    .map(|tag| GalleryEntry { photo, matched_tag: Some(tag) })
            })
            .collect();
    }

    photos
        .iter()
        .map(|photo| GalleryEntry { photo, matched_tag: None })
        .collect()
}

fn first_tag_matching(photo: &Photo, pred: impl Fn(&str) -> bool) -> Option<String> {
    photo
        .tags
        .iter()
        .map(|t| t.name.to_lowercase())
        .filter(|name| !name.trim().is_empty())
        .find(|name| pred(name))
}

/// Labels shown on a card plus the size of the "+N" overflow chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLabels {
    pub labels: Vec<String>,
    pub more: Option<usize>,
}

pub fn card_labels(entry: &GalleryEntry<'_>) -> CardLabels {
    let total = entry.photo.tags.len();
    match &entry.matched_tag {
        Some(tag) => CardLabels {
            labels: vec![tag.clone()],
            more: (total > 1).then(|| total - 1),
        },
        None => CardLabels {
            labels: entry
                .photo
                .tags
                .iter()
                .take(MAX_LABELS)
                .map(|t| t.name.to_lowercase())
                .collect(),
            more: (total > MAX_LABELS).then(|| total - MAX_LABELS),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryStatus {
    Loading,
    Empty { message: String },
    Grid { heading: String, count: usize },
}

pub fn status(loading: bool, query: &str, visible: usize) -> GalleryStatus {
    if loading {
        return GalleryStatus::Loading;
    }
    if visible == 0 {
        let message = if query.is_empty() {
            "Upload some photos to get started!".to_string()
        } else {
            format!("No photos match \"{}\". Try a different search term.", query)
        };
        return GalleryStatus::Empty { message };
    }
    let heading = if query.is_empty() {
        "All Photos".to_string()
    } else {
        format!("Search results for \"{}\"", query)
    };
    GalleryStatus::Grid { heading, count: visible }
}

pub struct GalleryView<'a> {
    pub entries: &'a [GalleryEntry<'a>],
    pub query: &'a str,
    pub loading: bool,
    pub display_limit: usize,
    pub thumbnails: &'a HashMap<String, Handle>,
}

pub fn view<'a>(gallery: GalleryView<'_>) -> Element<'a, Message> {
    let (heading, count) = match status(gallery.loading, gallery.query, gallery.entries.len()) {
        GalleryStatus::Loading => {
            return centered(column![text("Loading your photos...").size(18)].into());
        }
        GalleryStatus::Empty { message } => {
            return centered(
                column![text("No photos found").size(22), text(message).size(16)]
                    .spacing(8)
                    .align_items(Alignment::Center)
                    .into(),
            );
        }
        GalleryStatus::Grid { heading, count } => (heading, count),
    };

    let mut rows = Column::new().spacing(Palette::SPACING);
    let mut current = Row::new().spacing(Palette::SPACING);
    let mut in_row = 0;
    for entry in gallery.entries.iter().take(gallery.display_limit) {
        current = current.push(card(entry, gallery.thumbnails.get(&entry.photo.id)));
        in_row += 1;
        if in_row == COLUMNS {
            rows = rows.push(current);
            current = Row::new().spacing(Palette::SPACING);
            in_row = 0;
        }
    }
    if in_row > 0 {
        rows = rows.push(current);
    }
    if gallery.display_limit < gallery.entries.len() {
        rows = rows.push(
            button("Load more")
                .style(style::button_secondary())
                .on_press(Message::LoadMorePhotos),
        );
    }

    column![
        row![
            text(heading).size(22).width(Length::Fill),
            text(format!("{} photos", count)).size(14),
        ]
        .align_items(Alignment::Center),
        scrollable(rows).height(Length::Fill),
    ]
    .spacing(Palette::SPACING)
    .into()
}

fn card<'a>(entry: &GalleryEntry<'_>, thumbnail: Option<&Handle>) -> Element<'a, Message> {
    let thumb: Element<Message> = match thumbnail {
        Some(handle) => image(handle.clone())
            .width(Length::Fixed(180.0))
            .height(Length::Fixed(180.0))
            .into(),
        None => container(text("Loading..."))
            .width(Length::Fixed(180.0))
            .height(Length::Fixed(180.0))
            .center_x()
            .center_y()
            .into(),
    };

    let labels = card_labels(entry);
    let mut chips = Row::new().spacing(4);
    for label in labels.labels {
        chips = chips.push(container(text(label).size(12)).padding([2, 6]).style(style::label_chip()));
    }
    if let Some(more) = labels.more {
        chips = chips.push(container(text(format!("+{}", more)).size(12)).padding([2, 6]).style(style::label_chip()));
    }

    let photo = entry.photo;
    let body = column![
        thumb,
        chips,
        text(photo.display_name().to_string()).size(14),
        text(photo.date_modified.clone()).size(12),
    ]
    .spacing(6)
    .width(Length::Fixed(180.0));

    button(body)
        .padding(8)
        .style(style::photo_card())
        .on_press(Message::App(Action::PhotoSelected(photo.clone())))
        .into()
}

fn centered<'a>(content: Element<'a, Message>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x()
        .center_y()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::Tag;

    fn photo(id: &str, tags: &[&str]) -> Photo {
        Photo {
            id: id.to_string(),
            s3_url: format!("https://bucket/{}.jpg", id),
            date_modified: "1/1/2024".into(),
            modified_at: None,
            user_id: None,
            tags: tags
                .iter()
                .map(|t| Tag { name: t.to_string(), confidence: 0.8 })
                .collect(),
            thumbnail_url: None,
            filename: None,
        }
    }

    fn ids(entries: &[GalleryEntry<'_>]) -> Vec<String> {
        entries.iter().map(|e| e.photo.id.clone()).collect()
    }

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_filter_keeps_everything() {
        let photos = vec![photo("1", &["dog"]), photo("2", &[]), photo("3", &["City"])];
        let entries = filter_photos(&photos, "", &[]);
        assert_eq!(ids(&entries), vec!["1", "2", "3"]);
        assert!(entries.iter().all(|e| e.matched_tag.is_none()));
    }

    #[test]
    fn test_tag_filter_matches_either_direction() {
        let photos = vec![
            photo("1", &["Mountain View"]),
            photo("2", &["city"]),
            photo("3", &["Lake"]),
        ];
        let entries = filter_photos(&photos, "", &tags(&["mountain", "lake"]));
        assert_eq!(ids(&entries), vec!["1", "3"]);
        assert_eq!(entries[0].matched_tag.as_deref(), Some("mountain view"));
        assert_eq!(entries[1].matched_tag.as_deref(), Some("lake"));
    }

    #[test]
    fn test_filter_tag_containing_photo_tag() {
        let photos = vec![photo("1", &["Dog"]), photo("2", &["Cat"])];
        let entries = filter_photos(&photos, "", &tags(&["hot dog stand"]));
        assert_eq!(ids(&entries), vec!["1"]);
        assert_eq!(entries[0].matched_tag.as_deref(), Some("dog"));
    }

    #[test]
    fn test_tag_filter_wins_over_query() {
        let photos = vec![photo("1", &["dog"]), photo("2", &["beach"])];
        let entries = filter_photos(&photos, "beach", &tags(&["dog"]));
        assert_eq!(ids(&entries), vec!["1"]);
    }

    #[test]
    fn test_first_matching_tag_is_recorded() {
        let photos = vec![photo("1", &["Grass", "Dog", "Puppy Dog"])];
        let entries = filter_photos(&photos, "dog", &[]);
        assert_eq!(entries[0].matched_tag.as_deref(), Some("dog"));
    }

    #[test]
    fn test_query_filter_is_case_insensitive() {
        let photos = vec![photo("1", &["Sunset Beach"]), photo("2", &["Forest"]), photo("3", &[])];
        let entries = filter_photos(&photos, "BEACH", &[]);
        assert_eq!(ids(&entries), vec!["1"]);
        assert_eq!(entries[0].matched_tag.as_deref(), Some("sunset beach"));
    }

    #[test]
    fn test_blank_tag_names_never_match() {
        let photos = vec![photo("1", &[""]), photo("2", &["dog"])];
        let entries = filter_photos(&photos, "", &tags(&["dog"]));
        assert_eq!(ids(&entries), vec!["2"]);
    }

    #[test]
    fn test_blank_filter_tags_are_ignored() {
        let photos = vec![photo("1", &["city"]), photo("2", &["dog"])];
        assert!(filter_photos(&photos, "", &tags(&["", "dog"]))
            .iter()
            .map(|e| e.photo.id.as_str())
            .eq(["2"]));

        // a tag set of only blanks behaves like no tag set
        let entries = filter_photos(&photos, "", &tags(&["", "  "]));
        assert_eq!(ids(&entries), vec!["1", "2"]);
        assert!(entries.iter().all(|e| e.matched_tag.is_none()));
        let entries = filter_photos(&photos, "cit", &tags(&[" "]));
        assert_eq!(ids(&entries), vec!["1"]);
    }

    #[test]
    fn test_filtered_results_satisfy_match_property() {
        let photos = vec![
            photo("1", &["Dog", "Grass"]),
            photo("2", &["Car"]),
            photo("3", &["Snowy Mountain"]),
            photo("4", &[]),
            photo("5", &["LAKE", "Boat"]),
        ];
        for filter in [vec!["dog"], vec!["mountain", "lake"], vec!["boat", "car"], vec!["zebra"]] {
            let filter = tags(&filter);
            let entries = filter_photos(&photos, "", &filter);
            for photo in &photos {
                let matches = photo.tags.iter().any(|t| {
                    let name = t.name.to_lowercase();
                    !name.is_empty()
                        && filter.iter().any(|f| f.contains(&name) || name.contains(f.as_str()))
                });
                assert_eq!(entries.iter().any(|e| e.photo.id == photo.id), matches);
            }
        }
    }

    #[test]
    fn test_card_labels_unfiltered() {
        let photos = vec![photo("1", &["A", "B", "C", "D", "E"]), photo("2", &["x"])];
        let entries = filter_photos(&photos, "", &[]);
        assert_eq!(
            card_labels(&entries[0]),
            CardLabels { labels: tags(&["a", "b", "c"]), more: Some(2) }
        );
        assert_eq!(card_labels(&entries[1]), CardLabels { labels: tags(&["x"]), more: None });
    }

    #[test]
    fn test_card_labels_when_filtering() {
        let photos = vec![photo("1", &["Grass", "Dog", "Pet"])];
        let entries = filter_photos(&photos, "do", &[]);
        assert_eq!(card_labels(&entries[0]), CardLabels { labels: tags(&["dog"]), more: Some(2) });
    }

    #[test]
    fn test_status_copy() {
        assert_eq!(status(true, "dog", 0), GalleryStatus::Loading);
        assert_eq!(status(true, "", 5), GalleryStatus::Loading);
        assert_eq!(
            status(false, "", 0),
            GalleryStatus::Empty { message: "Upload some photos to get started!".into() }
        );
        assert_eq!(
            status(false, "dog", 0),
            GalleryStatus::Empty { message: "No photos match \"dog\". Try a different search term.".into() }
        );
        assert_eq!(
            status(false, "dog", 2),
            GalleryStatus::Grid { heading: "Search results for \"dog\"".into(), count: 2 }
        );
        assert_eq!(status(false, "", 3), GalleryStatus::Grid { heading: "All Photos".into(), count: 3 });
    }
}
