pub mod color;
pub mod confirm_delete;
pub mod day_list;
pub mod editor;
pub mod form;
pub mod help;
pub mod login;
pub mod month_view;
pub mod popup;
pub mod status_bar;
