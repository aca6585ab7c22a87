//! Static train query assistant.
//!
//! Answers free-text questions such as "show me trains from Chennai to New
//! Delhi tomorrow" against an offline timetable: classify the intent, pull
//! out station, date and train-number mentions, resolve stations to codes
//! and list the direct trains between them.

pub mod assistant;
pub mod cache;
pub mod config;
pub mod domain;
pub mod interpret;
pub mod nlu;
pub mod planner;
pub mod railstatus;
pub mod stations;
pub mod timetable;
pub mod web;
