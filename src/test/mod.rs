mod client;
mod ui_state;
