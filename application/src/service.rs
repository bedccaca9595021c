mod book;
mod cart;
mod order;
mod session_cart;
mod wishlist;

pub use self::{book::*, cart::*, order::*, session_cart::*, wishlist::*};
