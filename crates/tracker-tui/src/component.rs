//! Component trait: the interface every screen panel implements.
//!
//! Components only render. Keys go to the navigation state, which is the
//! single owner of what the UI shows; a component reads it and keeps
//! nothing but presentation state such as scroll offsets.

use ratatui::{layout::Rect, Frame};
use tracker_core::nav::NavState;

use crate::theme::Theme;

pub trait Component {
    /// Render into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &NavState, theme: &Theme);
}
