//! StartScreen: logo plus the add-link / browse choice.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Text},
    widgets::Paragraph,
    Frame,
};
use tracker_core::nav::{NavState, StartChoice};

use crate::{
    component::Component,
    theme::{ButtonState, Theme},
    widgets::button::{draw_buttons, BUTTON_HEIGHT},
};

const LOGO: &[&str] = &[
    r"   __                  __                   __        _ ",
    r"  / /__________ ______/ /_____  _____      / /___  __(_)",
    r" / __/ ___/ __ `/ ___/ //_/ _ \/ ___/_____/ __/ / / / / ",
    r"/ /_/ /  / /_/ / /__/ ,< /  __/ /  /_____/ /_/ /_/ / /  ",
    r"\__/_/   \__,_/\___/_/|_|\___/_/         \__/\__,_/_/   ",
];

const PROMPT: &str = "Enter in new Sheet Tracker link or browse downloaded trackers";
const ADD_LINK: &str = "Yes (Add new link)";
const BROWSE: &str = "No (Browse)";

#[derive(Default)]
pub struct StartScreen;

impl Component for StartScreen {
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &NavState, theme: &Theme) {
        let content_h = LOGO.len() as u16 + 2 + BUTTON_HEIGHT;
        let [_, logo_area, _, prompt_area, buttons_area, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(LOGO.len() as u16),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(BUTTON_HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(area);
        if area.height < content_h {
            return;
        }

        let logo = Text::from(LOGO.iter().map(|l| Line::from(*l)).collect::<Vec<_>>());
        frame.render_widget(
            Paragraph::new(logo)
                .alignment(Alignment::Center)
                .style(theme.style_header()),
            logo_area,
        );
        frame.render_widget(
            Paragraph::new(PROMPT)
                .alignment(Alignment::Center)
                .style(theme.style_text()),
            prompt_area,
        );

        let state_of = |choice: StartChoice| {
            if state.start_choice == choice {
                ButtonState::Selected
            } else {
                ButtonState::Unselected
            }
        };
        draw_buttons(
            frame,
            buttons_area,
            &[
                (ADD_LINK, state_of(StartChoice::AddLink)),
                (BROWSE, state_of(StartChoice::Browse)),
            ],
            theme,
        );
    }
}
