//! Color palette and styles for the tracker TUI.
//!
//! Most colors come from the theme section of `config.json`; toast colors are
//! fixed so notices read the same under any theme.

use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use tracing::warn;
use tracker_core::config::ThemeConfig;

// ── Fixed palette ─────────────────────────────────────────────────────────────

pub const C_TOAST_INFO: Color = Color::Rgb(139, 164, 176);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(135, 169, 135);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(196, 116, 110);
pub const C_TOO_SMALL: Color = Color::Indexed(1);

// ── Configured palette ────────────────────────────────────────────────────────

/// A foreground/background pair for one button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonColors {
    pub fg: Color,
    pub bg: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Highlighted while its group has focus.
    Selected,
    /// Highlighted, but its group is not focused.
    SelectedIdle,
    Unselected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub background: Color,
    pub text: Color,
    pub accent: Color,
    pub highlight: Color,
    pub dialog_border: Color,
    pub table_border: Color,
    pub selected_text: Color,
    pub alt_text: Color,
    pub alt_background: Color,
    pub list_selection: Color,
    pub list_title_fg: Color,
    pub button_selected: ButtonColors,
    pub button_unselected: ButtonColors,
    pub button_selected_idle: ButtonColors,
}

impl Theme {
    /// Build from the config section. A color that does not parse falls
    /// back to the built-in value for that slot.
    pub fn from_config(config: &ThemeConfig) -> Self {
        let defaults = ThemeConfig::default();
        let pick = |name: &str, value: &str, default: &str| {
            parse_color(value).unwrap_or_else(|| {
                warn!("theme: cannot parse {} = {:?}, using {}", name, value, default);
                parse_color(default).unwrap_or(Color::Reset)
            })
        };

        Self {
            primary: pick("ColorPrimary", &config.color_primary, &defaults.color_primary),
            background: pick(
                "ColorBackground",
                &config.color_background,
                &defaults.color_background,
            ),
            text: pick("ColorText", &config.color_text, &defaults.color_text),
            accent: pick("ColorAccent", &config.color_accent, &defaults.color_accent),
            highlight: pick(
                "ColorHighlight",
                &config.color_highlight,
                &defaults.color_highlight,
            ),
            dialog_border: pick(
                "ColorDialogBorder",
                &config.color_dialog_border,
                &defaults.color_dialog_border,
            ),
            table_border: pick(
                "ColorTableBorder",
                &config.color_table_border,
                &defaults.color_table_border,
            ),
            selected_text: pick(
                "ColorSelectedText",
                &config.color_selected_text,
                &defaults.color_selected_text,
            ),
            alt_text: pick("ColorAltText", &config.color_alt_text, &defaults.color_alt_text),
            alt_background: pick(
                "ColorAltBackground",
                &config.color_alt_background,
                &defaults.color_alt_background,
            ),
            list_selection: pick(
                "ColorListSelection",
                &config.color_list_selection,
                &defaults.color_list_selection,
            ),
            list_title_fg: pick(
                "ColorListTitleFg",
                &config.color_list_title_fg,
                &defaults.color_list_title_fg,
            ),
            button_selected: ButtonColors {
                fg: pick(
                    "ColorActiveSelectedBtnFG",
                    &config.color_active_selected_btn_fg,
                    &defaults.color_active_selected_btn_fg,
                ),
                bg: pick(
                    "ColorActiveSelectedBtnBG",
                    &config.color_active_selected_btn_bg,
                    &defaults.color_active_selected_btn_bg,
                ),
            },
            button_unselected: ButtonColors {
                fg: pick(
                    "ColorActiveUnselectedBtnFG",
                    &config.color_active_unselected_btn_fg,
                    &defaults.color_active_unselected_btn_fg,
                ),
                bg: pick(
                    "ColorActiveUnselectedBtnBG",
                    &config.color_active_unselected_btn_bg,
                    &defaults.color_active_unselected_btn_bg,
                ),
            },
            button_selected_idle: ButtonColors {
                fg: pick(
                    "ColorAltSelectedBtnFG",
                    &config.color_alt_selected_btn_fg,
                    &defaults.color_alt_selected_btn_fg,
                ),
                bg: pick(
                    "ColorAltSelectedBtnBG",
                    &config.color_alt_selected_btn_bg,
                    &defaults.color_alt_selected_btn_bg,
                ),
            },
        }
    }

    // ── Predefined styles ─────────────────────────────────────────────────────

    pub fn style_base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn style_header(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .bg(self.background)
            .add_modifier(Modifier::BOLD)
    }

    pub fn style_text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn style_secondary(&self) -> Style {
        Style::default().fg(self.alt_text)
    }

    pub fn style_title(&self) -> Style {
        Style::default().fg(self.primary).add_modifier(Modifier::BOLD)
    }

    pub fn style_table_border(&self) -> Style {
        Style::default().fg(self.table_border)
    }

    pub fn style_dialog_border(&self) -> Style {
        Style::default().fg(self.dialog_border)
    }

    pub fn style_table_header(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted table row; dimmed while the table does not have focus.
    pub fn style_row_selected(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.selected_text)
                .bg(self.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.alt_text).bg(self.button_selected_idle.bg)
        }
    }

    pub fn style_list_selected(&self) -> Style {
        Style::default()
            .fg(self.list_selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn style_list_title(&self) -> Style {
        Style::default().fg(self.list_title_fg).bg(self.accent)
    }

    pub fn style_button(&self, state: ButtonState) -> Style {
        let colors = match state {
            ButtonState::Selected => self.button_selected,
            ButtonState::SelectedIdle => self.button_selected_idle,
            ButtonState::Unselected => self.button_unselected,
        };
        Style::default().fg(colors.fg).bg(colors.bg)
    }

    pub fn style_progress(&self) -> Style {
        Style::default().fg(self.accent)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

/// `#rrggbb`, a 0-255 ANSI index such as `"240"`, or a color name.
pub fn parse_color(value: &str) -> Option<Color> {
    Color::from_str(value.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_and_index() {
        assert_eq!(parse_color("#c4746e"), Some(Color::Rgb(0xc4, 0x74, 0x6e)));
        assert_eq!(parse_color("240"), Some(Color::Indexed(240)));
        assert_eq!(parse_color("not a color"), None);
    }

    #[test]
    fn test_defaults_follow_config_defaults() {
        let theme = Theme::default();
        assert_eq!(theme.primary, Color::Rgb(0xc4, 0x74, 0x6e));
        assert_eq!(theme.table_border, Color::Indexed(240));
        assert_eq!(theme.button_selected.bg, Color::Rgb(0x87, 0xa9, 0x87));
    }

    #[test]
    fn test_unparseable_color_falls_back() {
        let config = ThemeConfig {
            color_accent: "#zzzzzz".into(),
            ..ThemeConfig::default()
        };
        let theme = Theme::from_config(&config);
        assert_eq!(theme.accent, Color::Rgb(0x8a, 0x9a, 0x7b));
    }
}
