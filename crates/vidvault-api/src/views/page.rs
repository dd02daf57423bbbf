//! Full HTML pages.

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use vidvault_media::MediaUrlBuilder;
use vidvault_models::Video;

use crate::access::{HOME_PATH, SIGN_IN_PATH, SIGN_UP_PATH};

use super::card::{figure_html, player_html, CardFigure, VideoCard};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f4f4f5; color: #18181b; }
header { display: flex; justify-content: space-between; align-items: center; padding: 1rem 2rem; background: #fff; }
main { padding: 2rem; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 1.5rem; }
.card { background: #fff; border-radius: 1rem; overflow: hidden; box-shadow: 0 4px 12px rgba(0,0,0,.1); }
.card-figure { position: relative; aspect-ratio: 16 / 9; margin: 0; background: #000; }
.card-figure img, .card-figure video { width: 100%; height: 100%; object-fit: cover; }
.play-overlay { position: absolute; inset: 0; border: 0; background: rgba(0,0,0,.3); color: #fff; font-size: 3rem; cursor: pointer; }
.preview-unavailable { display: flex; height: 100%; align-items: center; justify-content: center; background: #e5e7eb; color: #ef4444; }
.duration { position: absolute; right: .5rem; bottom: .5rem; padding: .1rem .5rem; border-radius: .5rem; background: rgba(255,255,255,.7); font-size: .875rem; }
.card-body { padding: 1rem; }
.sizes { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
.sizes dt { font-weight: 600; }
.sizes dd { margin: 0; }
.card-footer { display: flex; justify-content: space-between; align-items: center; margin-top: 1rem; }
.accent { color: #0d9488; }
.player-overlay { position: fixed; inset: 0; z-index: 50; display: flex; align-items: center; justify-content: center; background: rgba(0,0,0,.8); }
.player-overlay video { max-width: 48rem; width: 100%; max-height: 80vh; }
.player-overlay button { position: absolute; top: 1rem; right: 1rem; border: 0; background: none; color: #fff; font-size: 2rem; }
.error { color: #b91c1c; }
"#;

const CARD_SCRIPT: &str = r#"
function fromTemplate(id) {
  return document.getElementById(id).content.firstElementChild.cloneNode(true);
}

document.querySelectorAll('.card').forEach(function (card) {
  var figure = card.querySelector('.card-figure');
  var still = figure.innerHTML;
  var previewFailed = false;

  function showFigure(node) {
    var duration = figure.querySelector('.duration');
    figure.replaceChildren(node, duration);
  }

  card.addEventListener('mouseenter', function () {
    if (previewFailed) {
      showFigure(fromTemplate('card-preview-unavailable'));
      return;
    }
    var video = fromTemplate('card-preview');
    video.src = card.dataset.previewUrl;
    video.addEventListener('error', function () {
      previewFailed = true;
      showFigure(fromTemplate('card-preview-unavailable'));
    });
    showFigure(video);
  });
  card.addEventListener('mouseleave', function () { figure.innerHTML = still; });

  card.addEventListener('click', function (event) {
    var button = event.target.closest('[data-action]');
    if (!button) return;
    event.stopPropagation();
    var action = button.dataset.action;

    if (action === 'play') {
      var overlay = fromTemplate('card-player');
      overlay.querySelector('video').src = card.dataset.fullUrl;
      card.appendChild(overlay);
    } else if (action === 'close') {
      button.closest('.player-overlay').remove();
    } else if (action === 'download') {
      fetch(card.dataset.fullUrl)
        .then(function (response) { return response.blob(); })
        .then(function (blob) {
          var link = document.createElement('a');
          link.href = URL.createObjectURL(blob);
          link.download = card.dataset.title + '.mp4';
          document.body.appendChild(link);
          link.click();
          link.remove();
          URL.revokeObjectURL(link.href);
        });
    } else if (action === 'delete') {
      if (!confirm('Delete "' + card.dataset.title + '"?')) return;
      fetch('/api/videos', {
        method: 'DELETE',
        headers: { 'Content-Type': 'application/json' },
        credentials: 'same-origin',
        body: JSON.stringify({ id: card.dataset.videoId })
      }).then(function (response) {
        if (response.ok) {
          card.remove();
        } else {
          response.json().then(function (body) { alert(body.error || 'Failed to delete video'); });
        }
      });
    }
  });
});
"#;

/// Which auth page to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPage {
    SignIn,
    SignUp,
}

impl AuthPage {
    fn title(&self) -> &'static str {
        match self {
            AuthPage::SignIn => "Sign in",
            AuthPage::SignUp => "Sign up",
        }
    }

    /// The other page, offered as an alternative.
    fn alternate(&self) -> (&'static str, &'static str) {
        match self {
            AuthPage::SignIn => ("No account yet? Sign up", SIGN_UP_PATH),
            AuthPage::SignUp => ("Already registered? Sign in", SIGN_IN_PATH),
        }
    }
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Vidvault</title>
<style>{style}</style>
</head>
<body>
{body}
</body>
</html>"#,
        title = text(title),
        style = STYLE,
        body = body,
    )
}

/// Catalog page listing videos newest-first.
pub fn home_page(
    videos: &[Video],
    media: &MediaUrlBuilder,
    load_error: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let content = match load_error {
        Some(message) => format!(r#"<p class="error">{}</p>"#, text(message)),
        None if videos.is_empty() => r#"<p class="empty">No videos available</p>"#.to_string(),
        None => {
            let cards: String = videos
                .iter()
                .map(|video| VideoCard::new(video, media).render(now))
                .collect();
            format!(r#"<section class="grid">{}</section>"#, cards)
        }
    };

    let body = format!(
        r#"<header><a href="{home}"><strong>Vidvault</strong></a></header>
<main>
<h1>Videos</h1>
{content}
</main>
<template id="card-preview">{preview}</template>
<template id="card-preview-unavailable">{unavailable}</template>
<template id="card-player">{player}</template>
<script>{script}</script>"#,
        home = HOME_PATH,
        content = content,
        preview = figure_html(&CardFigure::Preview { url: String::new() }, ""),
        unavailable = figure_html(&CardFigure::PreviewUnavailable, ""),
        player = player_html(""),
        script = CARD_SCRIPT,
    );

    layout("Videos", &body)
}

/// Sign-in or sign-up page pointing at the auth provider.
pub fn auth_page(page: AuthPage, provider_url: Option<&str>) -> String {
    let action = match provider_url {
        Some(url) => format!(
            r#"<p><a class="button" href="{}">Continue to {}</a></p>"#,
            attr(url),
            page.title().to_lowercase()
        ),
        None => r#"<p class="error">Authentication is not configured.</p>"#.to_string(),
    };
    let (alternate_label, alternate_path) = page.alternate();

    let body = format!(
        r#"<main>
<h1>{title}</h1>
{action}
<p><a href="{alternate_path}">{alternate_label}</a></p>
</main>"#,
        title = page.title(),
        action = action,
        alternate_path = alternate_path,
        alternate_label = alternate_label,
    );

    layout(page.title(), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidvault_media::MediaConfig;

    fn media() -> MediaUrlBuilder {
        MediaUrlBuilder::new(MediaConfig::new("demo")).unwrap()
    }

    #[test]
    fn test_home_page_renders_cards_in_order() {
        let now = Utc::now();
        let videos = vec![
            Video::new("Newest", "a", 1.0, 10, 5).created(now),
            Video::new("Older", "b", 1.0, 10, 5).created(now - chrono::Duration::hours(2)),
        ];
        let html = home_page(&videos, &media(), None, now);

        let newest = html.find("Newest").unwrap();
        let older = html.find("Older").unwrap();
        assert!(newest < older);
        assert!(html.contains("2 hours ago"));
    }

    #[test]
    fn test_home_page_script_templates_match_card_markup() {
        let html = home_page(&[], &media(), None, Utc::now());
        assert!(html.contains(&format!(
            r#"<template id="card-preview-unavailable">{}</template>"#,
            figure_html(&CardFigure::PreviewUnavailable, "")
        )));
        assert!(html.contains(&format!(
            r#"<template id="card-player">{}</template>"#,
            player_html("")
        )));
        assert!(html.contains(r#"<template id="card-preview"><video src="" autoplay muted loop playsinline></video></template>"#));
    }

    #[test]
    fn test_home_page_empty_and_error() {
        let now = Utc::now();
        assert!(home_page(&[], &media(), None, now).contains("No videos available"));
        assert!(home_page(&[], &media(), Some("Failed to fetch videos"), now)
            .contains("Failed to fetch videos"));
    }

    #[test]
    fn test_auth_page_links_provider() {
        let html = auth_page(AuthPage::SignIn, Some("https://accounts.example.com/sign-in?a=1&b=2"));
        assert!(html.contains("https://accounts.example.com/sign-in?a=1&amp;b=2"));
        assert!(html.contains(r#"href="/sign-up""#));

        let html = auth_page(AuthPage::SignUp, None);
        assert!(html.contains("Authentication is not configured."));
        assert!(html.contains(r#"href="/sign-in""#));
    }
}
