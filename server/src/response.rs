mod book;
mod cart;
mod order;
mod rejection;
mod wishlist;

pub use self::{book::*, cart::*, order::*, rejection::*, wishlist::*};
