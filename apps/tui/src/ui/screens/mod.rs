pub mod calendar;
pub mod detail;
pub mod help;
pub mod list;
pub mod map;
