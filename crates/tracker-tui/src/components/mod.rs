pub mod catalog_list;
pub mod link_input;
pub mod player_panel;
pub mod start_screen;
pub mod table_view;
