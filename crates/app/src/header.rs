//! Header line: title plus the language and theme selectors.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
};
use unicode_width::UnicodeWidthStr;

use crate::state::AppState;

const TITLE: &str = " Code Sandbox ";
const SUBTITLE: &str = "with ratatui";

/// Header selector hit by a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTarget {
    Language,
    Theme,
}

/// Screen areas of the header selectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderRegions {
    pub language: Rect,
    pub theme: Rect,
}

impl HeaderRegions {
    pub fn hit(&self, x: u16, y: u16) -> Option<HeaderTarget> {
        let inside = |r: &Rect| x >= r.left() && x < r.right() && y >= r.top() && y < r.bottom();
        if inside(&self.language) {
            Some(HeaderTarget::Language)
        } else if inside(&self.theme) {
            Some(HeaderTarget::Theme)
        } else {
            None
        }
    }
}

/// Write `text` at `x` clipped to `area`; returns the area it covered.
fn put(buf: &mut Buffer, area: Rect, x: u16, text: &str, style: Style) -> Rect {
    if x >= area.right() {
        return Rect::new(area.right(), area.y, 0, 0);
    }
    let max_width = (area.right() - x) as usize;
    let (end, _) = buf.set_stringn(x, area.y, text, max_width, style);
    Rect::new(x, area.y, end - x, 1)
}

/// Render the header and return where its selectors ended up.
pub fn render_header(buf: &mut Buffer, area: Rect, state: &AppState) -> HeaderRegions {
    if area.height == 0 || area.width == 0 {
        return HeaderRegions::default();
    }
    let theme = state.theme;
    let base = Style::default().fg(theme.fg).bg(theme.accented_bg);
    buf.set_style(area, base);

    let title_style = base.fg(theme.accented_fg).add_modifier(Modifier::BOLD);
    let dim_style = base.fg(theme.disabled);
    let value_style = Style::default()
        .fg(theme.selected_fg)
        .bg(theme.selected_bg)
        .add_modifier(Modifier::BOLD);

    let title = put(buf, area, area.x, TITLE, title_style);
    put(buf, area, title.right(), SUBTITLE, dim_style);

    // Selectors are right-aligned
    let language_value = format!(" {} ▾ ", state.language);
    let theme_value = format!(" {} ▾ ", theme.name);
    let selectors_width = "Language ".width()
        + language_value.width()
        + "  Theme ".width()
        + theme_value.width()
        + 1;
    let min_x = title.right().saturating_add(SUBTITLE.width() as u16 + 2);
    let x = area
        .right()
        .saturating_sub(selectors_width as u16)
        .max(min_x);

    let label = put(buf, area, x, "Language ", dim_style);
    let language = put(buf, area, label.right(), &language_value, value_style);
    let label = put(buf, area, language.right(), "  Theme ", dim_style);
    let theme_region = put(buf, area, label.right(), &theme_value, value_style);

    HeaderRegions {
        language,
        theme: theme_region,
    }
}
