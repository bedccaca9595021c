mod book;
mod cart;
mod category;
mod order;
mod session;
mod wishlist;

pub use self::{book::*, cart::*, category::*, order::*, session::*, wishlist::*};
