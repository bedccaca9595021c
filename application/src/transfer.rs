mod book;
mod cart;
mod order;
mod wishlist;

pub use self::{book::*, cart::*, order::*, wishlist::*};
