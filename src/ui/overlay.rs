use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::config::Theme;
use crate::game::DeathReason;

const QUIT_HINT: &str = "[Q]/[Esc] Quit";

/// Draws the game-over popup centered over `area`.
pub fn render_game_over(
    frame: &mut Frame<'_>,
    area: Rect,
    death_reason: Option<DeathReason>,
    theme: &Theme,
) {
    let cause = cause_text(death_reason);
    let lines = ["GAME OVER", cause, "", QUIT_HINT];
    let popup = centered_popup(area, &lines);
    frame.render_widget(Clear, popup);

    let body = vec![
        Line::styled(
            lines[0],
            Style::default()
                .fg(theme.overlay_title)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(cause),
        Line::from(""),
        Line::styled(QUIT_HINT, Style::default().fg(theme.overlay_footer)),
    ];

    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered()),
        popup,
    );
}

fn cause_text(death_reason: Option<DeathReason>) -> &'static str {
    match death_reason {
        Some(DeathReason::WallCollision) => "You hit the wall",
        Some(DeathReason::SelfCollision) => "You ran into yourself",
        None => "",
    }
}

/// Returns a bordered box just big enough for `lines`, clamped to `area`.
fn centered_popup(area: Rect, lines: &[&str]) -> Rect {
    let text_width = lines.iter().map(|line| line.width()).max().unwrap_or(0);
    let width = u16::try_from(text_width + 4)
        .unwrap_or(u16::MAX)
        .min(area.width);
    let height = u16::try_from(lines.len() + 2)
        .unwrap_or(u16::MAX)
        .min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::centered_popup;

    #[test]
    fn popup_is_centered_and_sized_to_text() {
        let popup = centered_popup(Rect::new(0, 0, 40, 20), &["GAME OVER", "abc"]);

        assert_eq!(popup, Rect::new(13, 8, 13, 4));
    }

    #[test]
    fn popup_never_exceeds_area() {
        let area = Rect::new(2, 1, 6, 3);
        let popup = centered_popup(area, &["a very long line of text", "", "", ""]);

        assert_eq!(popup, area);
    }
}
