mod favorite_button;
pub use favorite_button::*;

mod theme;
pub use theme::*;

pub mod notification;
