//! Smooth Unicode progress bar.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Render a bar for `progress` (0.0..=1.0) in `area`, flanked by elapsed and
/// total time when the length is known.
pub fn draw_progress(
    frame: &mut Frame,
    area: Rect,
    progress: f64,
    total_secs: Option<f64>,
    bar_style: Style,
    label_style: Style,
) {
    if area.width < 4 || area.height == 0 {
        return;
    }

    let progress = progress.clamp(0.0, 1.0);
    let (left_label, right_label) = match total_secs {
        Some(total) => (fmt_time(total * progress), fmt_time(total)),
        None => (String::new(), String::new()),
    };
    let label_w = if left_label.is_empty() {
        0
    } else {
        (left_label.len() + right_label.len() + 2) as u16
    };
    let bar_w = area.width.saturating_sub(label_w).max(4) as usize;

    let mut spans = Vec::new();
    if !left_label.is_empty() {
        spans.push(Span::styled(format!("{} ", left_label), label_style));
    }
    spans.push(Span::styled(bar(progress, bar_w), bar_style));
    if !right_label.is_empty() {
        spans.push(Span::styled(format!(" {}", right_label), label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// `width` cells of bar, filled in eighths.
fn bar(progress: f64, width: usize) -> String {
    let eighths = (progress * width as f64 * 8.0) as usize;
    let full_blocks = (eighths / 8).min(width);
    let partial = eighths % 8;

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..full_blocks {
        bar.push('█');
    }
    if full_blocks < width {
        bar.push(BLOCKS[partial]);
        for _ in (full_blocks + 1)..width {
            bar.push(' ');
        }
    }
    bar
}

fn fmt_time(secs: f64) -> String {
    if secs < 0.0 {
        return "0:00".to_string();
    }
    let s = secs as u64;
    let h = s / 3600;
    let m = (s % 3600) / 60;
    let s = s % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_is_always_full_width() {
        for progress in [0.0, 0.13, 0.5, 0.999, 1.0] {
            assert_eq!(bar(progress, 20).chars().count(), 20);
        }
    }

    #[test]
    fn test_bar_partial_cell() {
        // 10 cells at 25% is 2.5 cells: two full blocks and a half block.
        assert_eq!(bar(0.25, 10), "██▌       ");
        assert_eq!(bar(1.0, 3), "███");
    }

    #[test]
    fn test_fmt_time() {
        assert_eq!(fmt_time(0.0), "0:00");
        assert_eq!(fmt_time(65.4), "1:05");
        assert_eq!(fmt_time(3725.0), "1:02:05");
    }
}
