mod book;
mod cart;
mod category;
mod common;
mod order;
mod session;
mod user;
mod wishlist;

pub use self::{
    book::*, cart::*, category::*, common::*, order::*, session::*, user::*, wishlist::*,
};
