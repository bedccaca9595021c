mod book;
mod cart;
mod order;
mod session;
mod wishlist;

pub use self::{book::*, cart::*, order::*, session::*, wishlist::*};
