use crate::entity::Book;
use crate::outcome::CartRejection;

/// Hard cap on the quantity of one book per cart, regardless of stock.
pub const MAX_QUANTITY_PER_ITEM: i32 = 10;

/// Gate applied before any add-to-cart: the book must exist, be on sale, and
/// have at least one unit in stock. Shared by the persistent and the
/// session-backed cart so the two variants cannot drift apart.
pub fn purchasable(book: Option<&Book>) -> Result<&Book, CartRejection> {
    let book = book.ok_or(CartRejection::BookNotFound)?;
    if !*book.is_active().as_ref() {
        return Err(CartRejection::BookInactive);
    }
    if *book.stock().as_ref() <= 0 {
        return Err(CartRejection::OutOfStock);
    }
    Ok(book)
}

/// Validates the quantity a cart line would end up with. `in_cart` is the
/// quantity held before the mutation and is echoed back in the rejection so
/// the caller can word a precise message.
pub fn admissible_total(book: &Book, in_cart: i32, new_total: i32) -> Result<(), CartRejection> {
    let available = *book.stock().as_ref();
    if new_total > available {
        return Err(CartRejection::InsufficientStock { available, in_cart });
    }
    if new_total > MAX_QUANTITY_PER_ITEM {
        return Err(CartRejection::QuantityLimitExceeded {
            limit: MAX_QUANTITY_PER_ITEM,
            in_cart,
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::entity::{
        Book, BookAuthor, BookId, BookPrice, BookStock, BookTitle, CreatedAt, IsActive, UpdatedAt,
    };
    use crate::outcome::CartRejection;

    use super::{admissible_total, purchasable, MAX_QUANTITY_PER_ITEM};

    fn book(stock: i32, active: bool) -> Book {
        let now = OffsetDateTime::now_utc();
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("test"),
            BookAuthor::new("tester"),
            BookPrice::new(Decimal::new(100_000, 0)),
            None,
            BookStock::new(stock),
            IsActive::new(active),
            None,
            CreatedAt::new(now),
            UpdatedAt::new(now),
        )
    }

    #[test]
    fn missing_inactive_and_empty_books_are_refused() {
        assert_eq!(purchasable(None), Err(CartRejection::BookNotFound));
        let inactive = book(5, false);
        assert_eq!(
            purchasable(Some(&inactive)),
            Err(CartRejection::BookInactive)
        );
        let drained = book(0, true);
        assert_eq!(purchasable(Some(&drained)), Err(CartRejection::OutOfStock));
        let fine = book(5, true);
        assert!(purchasable(Some(&fine)).is_ok());
    }

    #[test]
    fn totals_above_stock_report_exact_availability() {
        let book = book(3, true);
        assert_eq!(
            admissible_total(&book, 2, 4),
            Err(CartRejection::InsufficientStock {
                available: 3,
                in_cart: 2
            })
        );
        assert!(admissible_total(&book, 2, 3).is_ok());
    }

    #[test]
    fn the_per_item_cap_binds_even_with_plenty_of_stock() {
        let book = book(100, true);
        assert_eq!(
            admissible_total(&book, 7, MAX_QUANTITY_PER_ITEM + 1),
            Err(CartRejection::QuantityLimitExceeded {
                limit: MAX_QUANTITY_PER_ITEM,
                in_cart: 7
            })
        );
        assert!(admissible_total(&book, 7, MAX_QUANTITY_PER_ITEM).is_ok());
    }
}
