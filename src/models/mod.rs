pub mod activity;
pub mod calendar_event;
