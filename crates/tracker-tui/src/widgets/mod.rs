pub mod button;
pub mod progress_bar;
pub mod toast;
