//! Video card.
//!
//! A card shows one catalog entry: a thumbnail that turns into a looping
//! preview on hover, the size and compression figures, and actions to play,
//! download or delete the video. The card owns only its UI flags; what
//! download and delete actually do is up to the caller.
//!
//! The catalog page script replays these transitions in the browser. It
//! clones its preview, fallback and player markup from [`figure_html`] and
//! [`player_html`], so both paths render identical fragments.

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use vidvault_media::MediaUrlBuilder;
use vidvault_models::Video;

/// Callbacks for user actions on a card.
pub trait CardActions {
    /// Download the video from `url`, saving it under `title`.
    fn on_download(&mut self, url: &str, title: &str);

    /// Remove the video. Ignored unless the caller handles it.
    fn on_delete(&mut self, _video: &Video) {}
}

/// What the card's media area shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardFigure {
    /// Still thumbnail with a play overlay.
    Thumbnail { url: String },
    /// Muted looping preview clip.
    Preview { url: String },
    /// Preview failed to load.
    PreviewUnavailable,
}

/// Display values for one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub figure: CardFigure,
    pub title: String,
    pub description: Option<String>,
    pub duration: String,
    pub uploaded: String,
    pub original_size: String,
    pub compressed_size: String,
    pub compression_percentage: i64,
    /// Full-resolution URL when the player overlay is open.
    pub player_url: Option<String>,
}

/// Interactive card over a single video.
#[derive(Debug, Clone)]
pub struct VideoCard<'a> {
    video: &'a Video,
    media: &'a MediaUrlBuilder,
    hovered: bool,
    preview_error: bool,
    show_player: bool,
}

impl<'a> VideoCard<'a> {
    pub fn new(video: &'a Video, media: &'a MediaUrlBuilder) -> Self {
        Self {
            video,
            media,
            hovered: false,
            preview_error: false,
            show_player: false,
        }
    }

    pub fn video(&self) -> &Video {
        self.video
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn has_preview_error(&self) -> bool {
        self.preview_error
    }

    pub fn is_player_visible(&self) -> bool {
        self.show_player
    }

    pub fn mouse_enter(&mut self) {
        self.hovered = true;
    }

    pub fn mouse_leave(&mut self) {
        self.hovered = false;
    }

    /// The preview clip failed to load. Sticky for the card's lifetime.
    pub fn preview_failed(&mut self) {
        self.preview_error = true;
    }

    pub fn open_player(&mut self) {
        self.show_player = true;
    }

    pub fn close_player(&mut self) {
        self.show_player = false;
    }

    /// Request a download of the full-resolution rendition.
    pub fn download<A: CardActions + ?Sized>(&self, actions: &mut A) {
        let url = self.media.full_url(&self.video.public_id);
        actions.on_download(&url, &self.video.title);
    }

    /// Request deletion of this video.
    pub fn delete<A: CardActions + ?Sized>(&self, actions: &mut A) {
        actions.on_delete(self.video);
    }

    pub fn figure(&self) -> CardFigure {
        match (self.hovered, self.preview_error) {
            (false, _) => CardFigure::Thumbnail {
                url: self.media.thumbnail_url(&self.video.public_id),
            },
            (true, false) => CardFigure::Preview {
                url: self.media.preview_url(&self.video.public_id),
            },
            (true, true) => CardFigure::PreviewUnavailable,
        }
    }

    /// Derive every display value, with relative time measured from `now`.
    pub fn view(&self, now: DateTime<Utc>) -> CardView {
        let video = self.video;
        CardView {
            figure: self.figure(),
            title: video.title.clone(),
            description: video.description.clone(),
            duration: video.duration_display(),
            uploaded: video.uploaded_ago(now),
            original_size: video.original_size_display(),
            compressed_size: video.compressed_size_display(),
            compression_percentage: video.compression_percentage(),
            player_url: self
                .show_player
                .then(|| self.media.full_url(&video.public_id)),
        }
    }

    /// Render the card as an HTML fragment.
    pub fn render(&self, now: DateTime<Utc>) -> String {
        let view = self.view(now);
        let video = self.video;

        let figure = figure_html(&view.figure, &view.title);

        let description = view
            .description
            .as_deref()
            .map(|d| format!(r#"<p class="description">{}</p>"#, text(d)))
            .unwrap_or_default();

        let player = view
            .player_url
            .as_deref()
            .map(player_html)
            .unwrap_or_default();

        format!(
            concat!(
                r#"<article class="card" data-video-id="{id}" data-title="{title_attr}" "#,
                r#"data-thumbnail-url="{thumb}" data-preview-url="{preview}" data-full-url="{full}">"#,
                r#"<figure class="card-figure">{figure}<span class="duration">{duration}</span></figure>"#,
                r#"<div class="card-body"><h2 class="card-title">{title}</h2>{description}"#,
                r#"<p class="uploaded">Uploaded {uploaded}</p>"#,
                r#"<dl class="sizes"><div><dt>Original</dt><dd>{original}</dd></div>"#,
                r#"<div><dt>Compressed</dt><dd>{compressed}</dd></div></dl>"#,
                r#"<div class="card-footer"><span class="compression">Compression: <span class="accent">{percent}%</span></span>"#,
                r#"<span class="card-actions">"#,
                r#"<button type="button" data-action="play" aria-label="Play video">Play</button>"#,
                r#"<button type="button" data-action="download" aria-label="Download video">Download</button>"#,
                r#"<button type="button" data-action="delete" aria-label="Delete video">Delete</button>"#,
                r#"</span></div></div>{player}</article>"#,
            ),
            id = attr(video.id.as_str()),
            title_attr = attr(&view.title),
            thumb = attr(&self.media.thumbnail_url(&video.public_id)),
            preview = attr(&self.media.preview_url(&video.public_id)),
            full = attr(&self.media.full_url(&video.public_id)),
            figure = figure,
            duration = text(&view.duration),
            title = text(&view.title),
            description = description,
            uploaded = text(&view.uploaded),
            original = text(&view.original_size),
            compressed = text(&view.compressed_size),
            percent = view.compression_percentage,
            player = player,
        )
    }
}

/// Markup for the card's media area.
pub fn figure_html(figure: &CardFigure, title: &str) -> String {
    match figure {
        CardFigure::Thumbnail { url } => format!(
            r#"<img src="{}" alt="{}"><button type="button" class="play-overlay" data-action="play" aria-label="Play video">&#9654;</button>"#,
            attr(url),
            attr(title),
        ),
        CardFigure::Preview { url } => format!(
            r#"<video src="{}" autoplay muted loop playsinline></video>"#,
            attr(url)
        ),
        CardFigure::PreviewUnavailable => {
            r#"<div class="preview-unavailable"><p>Preview not available</p></div>"#.to_string()
        }
    }
}

/// Full-resolution player overlay.
pub fn player_html(url: &str) -> String {
    format!(
        r#"<div class="player-overlay"><button type="button" data-action="close" aria-label="Close video">&times;</button><video src="{}" controls autoplay></video></div>"#,
        attr(url)
    )
}
