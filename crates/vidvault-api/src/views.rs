//! Server-rendered views.

pub mod card;
pub mod page;

pub use card::{CardActions, CardFigure, CardView, VideoCard};
pub use page::{auth_page, home_page, AuthPage};
