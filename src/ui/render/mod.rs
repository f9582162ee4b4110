mod all;
mod cases;
mod dashboard;
mod export;
mod footer;
mod log;
mod login;
mod menu;
mod new_case;
mod recovery;
mod users;

use super::*;

pub use all::all as render;
