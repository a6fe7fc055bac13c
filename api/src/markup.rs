//! HTML fragments for the static kiosk page. Every piece of sheet text goes
//! through [`escape_html`] before it is inserted.

use crate::normalize::{embed_url, watch_url};
use crate::{GameRecord, StationRecord};
use std::fmt::Write;

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.trim().chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn badge(class: &str, text: &str) -> String {
    format!(r#"<span class="{class}">{text}</span>"#)
}

pub fn game_card(game: &GameRecord) -> String {
    let title = escape_html(&game.title);

    let mut badges = String::new();
    for platform in &game.platforms {
        badges.push_str(&badge("badge accent", &escape_html(platform)));
    }
    if !game.genre.is_empty() {
        badges.push_str(&badge("badge", &escape_html(&game.genre)));
    }
    if !game.station.is_empty() {
        badges.push_str(&badge("badge", &format!("Station: {}", escape_html(&game.station))));
    }

    let thumb = if game.thumbnail_url.is_empty() {
        format!(r#"<div class="thumb-fallback">{title}</div>"#)
    } else {
        format!(
            r#"<img src="{}" alt="{title} cover" loading="lazy" />"#,
            escape_html(&game.thumbnail_url)
        )
    };

    let trailer = match game.trailer_id() {
        Some(id) => format!(
            r#"<a class="button secondary" data-action="trailer" data-id="{}" data-embed="{}" href="{}">Watch Clip</a>"#,
            escape_html(game.key()),
            escape_html(&embed_url(id)),
            escape_html(&watch_url(id)),
        ),
        None => r#"<button class="secondary" data-action="trailer" disabled>Watch Clip</button>"#.to_string(),
    };

    format!(
        r#"<article class="game">
  <div class="game-thumb">{thumb}</div>
  <div class="game-body">
    <div class="game-title">{title}</div>
    <div class="badges">{badges}</div>
    <div class="game-actions">{trailer}<button class="primary" data-action="book" data-title="{title}">Book</button></div>
  </div>
</article>
"#
    )
}

fn empty_state(headline: &str, hint: &str) -> String {
    format!(r#"<div class="station"><b>{headline}</b><div class="muted">{hint}</div></div>"#)
}

pub fn game_grid(games: &[&GameRecord]) -> String {
    if games.is_empty() {
        return empty_state(
            "No games found.",
            "Try clearing filters or searching a different keyword.",
        );
    }
    games.iter().map(|g| game_card(g)).collect()
}

pub fn featured_grid(games: &[&GameRecord]) -> String {
    if games.is_empty() {
        return empty_state(
            "No featured games right now.",
            "Set <b>featured</b> to Yes in your sheet.",
        );
    }
    games.iter().map(|g| game_card(g)).collect()
}

pub fn station_list(stations: &[StationRecord]) -> String {
    let mut out = String::new();
    for s in stations {
        let name = if s.station_name.is_empty() { "Station".to_string() } else { escape_html(&s.station_name) };
        let status = if s.status.is_empty() { "Unknown".to_string() } else { escape_html(&s.status) };
        let _ = write!(out, r#"<div class="station"><b>{name}</b> <span class="badge">{status}</span>"#);
        if !s.note.is_empty() {
            let _ = write!(out, r#"<div class="muted">{}</div>"#, escape_html(&s.note));
        }
        out.push_str("</div>\n");
    }
    out
}

/// `<option>` list for a filter control, with a leading "All ..." entry.
pub fn filter_options(all_label: &str, values: &[String], selected: &str) -> String {
    let mut out = format!(r#"<option value="">{}</option>"#, escape_html(all_label));
    for v in values {
        let v = escape_html(v);
        let sel = if v == escape_html(selected) { " selected" } else { "" };
        let _ = write!(out, r#"<option value="{v}"{sel}>{v}</option>"#);
    }
    out
}

/// Everything needed for a standalone signage page.
pub struct KioskPage<'a> {
    pub title: &'a str,
    pub games: &'a [&'a GameRecord],
    pub featured: &'a [&'a GameRecord],
    pub stations: &'a [StationRecord],
    pub platforms: &'a [String],
    pub genres: &'a [String],
    pub updated: &'a str,
}

pub fn kiosk_page(page: &KioskPage) -> String {
    let stations = if page.stations.is_empty() {
        String::new()
    } else {
        format!(
            "<section id=\"stations\"><h2>Stations</h2>\n{}</section>\n",
            station_list(page.stations)
        )
    };
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8" /><title>{title}</title></head>
<body>
<header><h1>{title}</h1><span class="muted">Updated {updated}</span></header>
<nav class="filters">
<select id="platformFilter">{platforms}</select>
<select id="genreFilter">{genres}</select>
</nav>
<section id="featured"><h2>Featured</h2>
{featured}</section>
<section id="games"><h2>Games</h2>
{games}</section>
{stations}</body>
</html>
"#,
        title = escape_html(page.title),
        updated = escape_html(page.updated),
        platforms = filter_options("All platforms", page.platforms, ""),
        genres = filter_options("All genres", page.genres, ""),
        featured = featured_grid(page.featured),
        games = game_grid(page.games),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#" <b>"Tom" & 'Jerry'</b> "#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn card_escapes_sheet_text() {
        let game = GameRecord {
            title: "<script>alert(1)</script>".into(),
            genre: "A&B".into(),
            ..Default::default()
        };
        let html = game_card(&game);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("A&amp;B"));
    }

    #[test]
    fn card_disables_trailer_without_youtube_id() {
        let game = GameRecord { title: "Pong".into(), trailer_url: "https://example.com".into(), ..Default::default() };
        assert!(game_card(&game).contains("disabled"));

        let game = GameRecord { title: "Pong".into(), trailer_url: "https://youtu.be/abc123XY".into(), ..Default::default() };
        let html = game_card(&game);
        assert!(!html.contains("disabled"));
        assert!(html.contains("https://www.youtube.com/embed/abc123XY"));
    }

    #[test]
    fn empty_grids_explain_themselves() {
        assert!(game_grid(&[]).contains("No games found."));
        assert!(featured_grid(&[]).contains("No featured games right now."));
    }

    #[test]
    fn options_mark_selection() {
        let html = filter_options("All platforms", &["PC".into(), "PS5".into()], "PS5");
        assert!(html.starts_with(r#"<option value="">All platforms</option>"#));
        assert!(html.contains(r#"<option value="PS5" selected>PS5</option>"#));
        assert!(html.contains(r#"<option value="PC">PC</option>"#));
    }

    #[test]
    fn stations_default_name_and_status() {
        let html = station_list(&[StationRecord::default()]);
        assert!(html.contains("<b>Station</b>"));
        assert!(html.contains("Unknown"));
    }
}
