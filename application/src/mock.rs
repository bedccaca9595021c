//! Deterministic in-memory stand-ins for the driver crate. The transaction
//! snapshots state when it opens and restores it on roll back, so the
//! all-or-nothing behaviour of the real store is observable in unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::database::{
    DatabaseConnection, DependOnSessionDatabaseConnection, Transaction,
};
use kernel::interface::query::{
    BookListing, BookQuery, CartQuery, CategoryQuery, DependOnBookQuery, DependOnCartQuery,
    DependOnCategoryQuery, DependOnOrderQuery, DependOnSessionCartQuery, DependOnWishlistQuery,
    OrderQuery, SessionCartQuery, WishlistQuery,
};
use kernel::interface::update::{
    BookModifier, CartModifier, DependOnBookModifier, DependOnCartModifier, DependOnOrderModifier,
    DependOnSessionCartModifier, DependOnWishlistModifier, OrderModifier, SessionCartModifier,
    WishlistModifier,
};
use kernel::prelude::entity::{
    Book, BookAuthor, BookId, BookPrice, BookStock, BookTitle, CartItem, Category, CreatedAt,
    IsActive, Order, OrderId, OrderItem, OrderStatus, PaymentMethod, Quantity, SelectLimit,
    SelectOffset, SessionCart, SessionId, UpdatedAt, UserId, WishlistItem,
};
use kernel::KernelError;

use crate::transfer::ShippingAddressDto;

#[derive(Clone, Default)]
struct State {
    books: HashMap<Uuid, Book>,
    categories: Vec<Category>,
    cart_items: HashMap<(Uuid, Uuid), CartItem>,
    orders: HashMap<Uuid, Order>,
    order_items: HashMap<Uuid, Vec<OrderItem>>,
    wishlist_items: HashMap<(Uuid, Uuid), WishlistItem>,
    session_carts: HashMap<Uuid, SessionCart>,
}

pub struct MockApp {
    state: Arc<Mutex<State>>,
}

impl MockApp {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    pub fn user() -> Uuid {
        Uuid::new_v4()
    }

    pub fn session() -> Uuid {
        Uuid::new_v4()
    }

    pub fn shipping() -> ShippingAddressDto {
        ShippingAddressDto {
            recipient: "Test Buyer".into(),
            phone: "0123456789".into(),
            line1: "1 Test Street".into(),
            line2: None,
            city: "Hanoi".into(),
            country: "Vietnam".into(),
        }
    }

    pub fn payment() -> PaymentMethod {
        PaymentMethod::CashOnDelivery
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn seed_book(
        &self,
        stock: i32,
        price: Decimal,
        discount_price: Option<Decimal>,
        is_active: bool,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let book = Book::new(
            BookId::new(id),
            BookTitle::new(format!("Book {id}")),
            BookAuthor::new("Author"),
            BookPrice::new(price),
            discount_price.map(BookPrice::new),
            BookStock::new(stock),
            IsActive::new(is_active),
            None,
            CreatedAt::new(now),
            UpdatedAt::new(now),
        );
        self.lock().books.insert(id, book);
        id
    }

    pub fn set_stock(&self, book_id: Uuid, stock: i32) {
        let mut state = self.lock();
        let book = state.books.remove(&book_id).unwrap();
        state
            .books
            .insert(book_id, book.reconstruct(|b| b.stock = BookStock::new(stock)));
    }

    pub fn set_active(&self, book_id: Uuid, is_active: bool) {
        let mut state = self.lock();
        let book = state.books.remove(&book_id).unwrap();
        state.books.insert(
            book_id,
            book.reconstruct(|b| b.is_active = IsActive::new(is_active)),
        );
    }

    pub fn set_discount_price(&self, book_id: Uuid, discount_price: Option<Decimal>) {
        let mut state = self.lock();
        let book = state.books.remove(&book_id).unwrap();
        state.books.insert(
            book_id,
            book.reconstruct(|b| b.discount_price = discount_price.map(BookPrice::new)),
        );
    }

    pub fn stock_of(&self, book_id: Uuid) -> i32 {
        *self.lock().books[&book_id].stock().as_ref()
    }

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    pub fn session_cart(&self, session_id: Uuid) -> Option<SessionCart> {
        self.lock().session_carts.get(&session_id).cloned()
    }
}

pub struct MockTransaction {
    state: Arc<Mutex<State>>,
    snapshot: State,
}

impl MockTransaction {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl Transaction for MockTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        *self.state.lock().unwrap() = self.snapshot;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MockApp {
    type Transaction = MockTransaction;
    async fn transact(&self) -> error_stack::Result<MockTransaction, KernelError> {
        let snapshot = self.lock().clone();
        Ok(MockTransaction {
            state: Arc::clone(&self.state),
            snapshot,
        })
    }
}

impl DependOnSessionDatabaseConnection for MockApp {
    type SessionDatabaseConnection = Self;
    fn session_database_connection(&self) -> &Self {
        self
    }
}

pub struct MockBookRepository;

#[async_trait::async_trait]
impl BookQuery for MockBookRepository {
    type Transaction = MockTransaction;

    async fn find_by_id(
        &self,
        con: &mut MockTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        Ok(con.lock().books.get(id.as_ref()).cloned())
    }

    async fn find_active(
        &self,
        con: &mut MockTransaction,
        listing: &BookListing,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let keyword = listing.keyword.as_deref().map(str::to_lowercase);
        let mut books: Vec<Book> = con
            .lock()
            .books
            .values()
            .filter(|book| *book.is_active().as_ref())
            .filter(|book| match &keyword {
                None => true,
                Some(keyword) => {
                    book.title().as_ref().to_lowercase().contains(keyword)
                        || book.author().as_ref().to_lowercase().contains(keyword)
                }
            })
            .filter(|book| match &listing.category_id {
                None => true,
                Some(category_id) => book.category_id().as_ref() == Some(category_id),
            })
            .cloned()
            .collect();
        books.sort_by(|a, b| {
            b.created_at()
                .as_ref()
                .cmp(a.created_at().as_ref())
                .then_with(|| a.id().as_ref().cmp(b.id().as_ref()))
        });
        let offset = *listing.offset.as_ref() as usize;
        let limit = *listing.limit.as_ref() as usize;
        Ok(books.into_iter().skip(offset).take(limit).collect())
    }
}

#[async_trait::async_trait]
impl BookModifier for MockBookRepository {
    type Transaction = MockTransaction;

    async fn create(
        &self,
        con: &mut MockTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        con.lock().books.insert(*book.id().as_ref(), book.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut MockTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        con.lock().books.insert(*book.id().as_ref(), book.clone());
        Ok(())
    }

    async fn delete(
        &self,
        con: &mut MockTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        con.lock().books.remove(book_id.as_ref());
        Ok(())
    }

    async fn reserve_stock(
        &self,
        con: &mut MockTransaction,
        book_id: &BookId,
        quantity: &Quantity,
    ) -> error_stack::Result<bool, KernelError> {
        let mut state = con.lock();
        let Some(book) = state.books.remove(book_id.as_ref()) else {
            return Ok(false);
        };
        let stock = *book.stock().as_ref();
        let taken = *quantity.as_ref();
        if stock < taken {
            state.books.insert(*book_id.as_ref(), book);
            return Ok(false);
        }
        state.books.insert(
            *book_id.as_ref(),
            book.reconstruct(|b| b.stock = BookStock::new(stock - taken)),
        );
        Ok(true)
    }

    async fn restore_stock(
        &self,
        con: &mut MockTransaction,
        book_id: &BookId,
        quantity: &Quantity,
    ) -> error_stack::Result<(), KernelError> {
        let mut state = con.lock();
        if let Some(book) = state.books.remove(book_id.as_ref()) {
            let stock = *book.stock().as_ref() + *quantity.as_ref();
            state.books.insert(
                *book_id.as_ref(),
                book.reconstruct(|b| b.stock = BookStock::new(stock)),
            );
        }
        Ok(())
    }
}

pub struct MockCategoryRepository;

#[async_trait::async_trait]
impl CategoryQuery for MockCategoryRepository {
    type Transaction = MockTransaction;

    async fn find_all(
        &self,
        con: &mut MockTransaction,
    ) -> error_stack::Result<Vec<Category>, KernelError> {
        Ok(con.lock().categories.clone())
    }
}

pub struct MockCartRepository;

#[async_trait::async_trait]
impl CartQuery for MockCartRepository {
    type Transaction = MockTransaction;

    async fn find_by_user(
        &self,
        con: &mut MockTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartItem>, KernelError> {
        let mut items: Vec<CartItem> = con
            .lock()
            .cart_items
            .values()
            .filter(|item| item.user_id() == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.created_at()
                .as_ref()
                .cmp(b.created_at().as_ref())
                .then_with(|| a.book_id().as_ref().cmp(b.book_id().as_ref()))
        });
        Ok(items)
    }

    async fn find_item(
        &self,
        con: &mut MockTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<Option<CartItem>, KernelError> {
        Ok(con
            .lock()
            .cart_items
            .get(&(*user_id.as_ref(), *book_id.as_ref()))
            .cloned())
    }

    async fn count(
        &self,
        con: &mut MockTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<i32, KernelError> {
        Ok(con
            .lock()
            .cart_items
            .values()
            .filter(|item| item.user_id() == user_id)
            .map(|item| *item.quantity().as_ref())
            .sum())
    }
}

#[async_trait::async_trait]
impl CartModifier for MockCartRepository {
    type Transaction = MockTransaction;

    async fn add_quantity(
        &self,
        con: &mut MockTransaction,
        user_id: &UserId,
        book_id: &BookId,
        quantity: &Quantity,
        at: OffsetDateTime,
    ) -> error_stack::Result<Quantity, KernelError> {
        let key = (*user_id.as_ref(), *book_id.as_ref());
        let mut state = con.lock();
        let total = match state.cart_items.remove(&key) {
            Some(existing) => {
                let total = *existing.quantity().as_ref() + *quantity.as_ref();
                state.cart_items.insert(
                    key,
                    CartItem::new(
                        user_id.clone(),
                        book_id.clone(),
                        Quantity::new(total),
                        existing.created_at().clone(),
                        UpdatedAt::new(at),
                    ),
                );
                total
            }
            None => {
                state.cart_items.insert(
                    key,
                    CartItem::new(
                        user_id.clone(),
                        book_id.clone(),
                        quantity.clone(),
                        CreatedAt::new(at),
                        UpdatedAt::new(at),
                    ),
                );
                *quantity.as_ref()
            }
        };
        Ok(Quantity::new(total))
    }

    async fn set_quantity(
        &self,
        con: &mut MockTransaction,
        user_id: &UserId,
        book_id: &BookId,
        quantity: &Quantity,
        at: OffsetDateTime,
    ) -> error_stack::Result<Option<Quantity>, KernelError> {
        let key = (*user_id.as_ref(), *book_id.as_ref());
        let mut state = con.lock();
        match state.cart_items.remove(&key) {
            None => Ok(None),
            Some(existing) => {
                state.cart_items.insert(
                    key,
                    CartItem::new(
                        user_id.clone(),
                        book_id.clone(),
                        quantity.clone(),
                        existing.created_at().clone(),
                        UpdatedAt::new(at),
                    ),
                );
                Ok(Some(quantity.clone()))
            }
        }
    }

    async fn delete(
        &self,
        con: &mut MockTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        con.lock()
            .cart_items
            .remove(&(*user_id.as_ref(), *book_id.as_ref()));
        Ok(())
    }

    async fn clear(
        &self,
        con: &mut MockTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<(), KernelError> {
        con.lock()
            .cart_items
            .retain(|(user, _), _| user != user_id.as_ref());
        Ok(())
    }
}

pub struct MockOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for MockOrderRepository {
    type Transaction = MockTransaction;

    async fn find_by_id(
        &self,
        con: &mut MockTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        Ok(con.lock().orders.get(id.as_ref()).cloned())
    }

    async fn find_items(
        &self,
        con: &mut MockTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Vec<OrderItem>, KernelError> {
        Ok(con
            .lock()
            .order_items
            .get(id.as_ref())
            .cloned()
            .unwrap_or_default())
    }

    async fn find_by_user(
        &self,
        con: &mut MockTransaction,
        user_id: &UserId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let mut orders: Vec<Order> = con
            .lock()
            .orders
            .values()
            .filter(|order| order.user_id() == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at().as_ref().cmp(a.created_at().as_ref()));
        Ok(orders
            .into_iter()
            .skip(*offset.as_ref() as usize)
            .take(*limit.as_ref() as usize)
            .collect())
    }
}

#[async_trait::async_trait]
impl OrderModifier for MockOrderRepository {
    type Transaction = MockTransaction;

    async fn create(
        &self,
        con: &mut MockTransaction,
        order: &Order,
        items: &[OrderItem],
    ) -> error_stack::Result<(), KernelError> {
        let mut state = con.lock();
        state.orders.insert(*order.id().as_ref(), order.clone());
        state
            .order_items
            .insert(*order.id().as_ref(), items.to_vec());
        Ok(())
    }

    async fn update_status(
        &self,
        con: &mut MockTransaction,
        id: &OrderId,
        status: OrderStatus,
    ) -> error_stack::Result<(), KernelError> {
        let mut state = con.lock();
        if let Some(order) = state.orders.remove(id.as_ref()) {
            state
                .orders
                .insert(*id.as_ref(), order.reconstruct(|o| o.status = status));
        }
        Ok(())
    }
}

pub struct MockWishlistRepository;

#[async_trait::async_trait]
impl WishlistQuery for MockWishlistRepository {
    type Transaction = MockTransaction;

    async fn find_by_user(
        &self,
        con: &mut MockTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<WishlistItem>, KernelError> {
        let mut items: Vec<WishlistItem> = con
            .lock()
            .wishlist_items
            .values()
            .filter(|item| item.user_id() == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.added_at().as_ref().cmp(a.added_at().as_ref()));
        Ok(items)
    }

    async fn contains(
        &self,
        con: &mut MockTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        Ok(con
            .lock()
            .wishlist_items
            .contains_key(&(*user_id.as_ref(), *book_id.as_ref())))
    }
}

#[async_trait::async_trait]
impl WishlistModifier for MockWishlistRepository {
    type Transaction = MockTransaction;

    async fn add(
        &self,
        con: &mut MockTransaction,
        item: &WishlistItem,
    ) -> error_stack::Result<(), KernelError> {
        let key = (*item.user_id().as_ref(), *item.book_id().as_ref());
        con.lock().wishlist_items.entry(key).or_insert(item.clone());
        Ok(())
    }

    async fn remove(
        &self,
        con: &mut MockTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        con.lock()
            .wishlist_items
            .remove(&(*user_id.as_ref(), *book_id.as_ref()));
        Ok(())
    }
}

pub struct MockSessionCartRepository;

#[async_trait::async_trait]
impl SessionCartQuery for MockSessionCartRepository {
    type Transaction = MockTransaction;

    async fn find(
        &self,
        con: &mut MockTransaction,
        session_id: &SessionId,
    ) -> error_stack::Result<Option<SessionCart>, KernelError> {
        Ok(con.lock().session_carts.get(session_id.as_ref()).cloned())
    }
}

#[async_trait::async_trait]
impl SessionCartModifier for MockSessionCartRepository {
    type Transaction = MockTransaction;

    async fn save(
        &self,
        con: &mut MockTransaction,
        session_id: &SessionId,
        cart: &SessionCart,
    ) -> error_stack::Result<(), KernelError> {
        con.lock()
            .session_carts
            .insert(*session_id.as_ref(), cart.clone());
        Ok(())
    }

    async fn clear(
        &self,
        con: &mut MockTransaction,
        session_id: &SessionId,
    ) -> error_stack::Result<(), KernelError> {
        con.lock().session_carts.remove(session_id.as_ref());
        Ok(())
    }
}

impl DependOnBookQuery for MockApp {
    type BookQuery = MockBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &MockBookRepository
    }
}

impl DependOnBookModifier for MockApp {
    type BookModifier = MockBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &MockBookRepository
    }
}

impl DependOnCategoryQuery for MockApp {
    type CategoryQuery = MockCategoryRepository;
    fn category_query(&self) -> &Self::CategoryQuery {
        &MockCategoryRepository
    }
}

impl DependOnCartQuery for MockApp {
    type CartQuery = MockCartRepository;
    fn cart_query(&self) -> &Self::CartQuery {
        &MockCartRepository
    }
}

impl DependOnCartModifier for MockApp {
    type CartModifier = MockCartRepository;
    fn cart_modifier(&self) -> &Self::CartModifier {
        &MockCartRepository
    }
}

impl DependOnOrderQuery for MockApp {
    type OrderQuery = MockOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &MockOrderRepository
    }
}

impl DependOnOrderModifier for MockApp {
    type OrderModifier = MockOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &MockOrderRepository
    }
}

impl DependOnWishlistQuery for MockApp {
    type WishlistQuery = MockWishlistRepository;
    fn wishlist_query(&self) -> &Self::WishlistQuery {
        &MockWishlistRepository
    }
}

impl DependOnWishlistModifier for MockApp {
    type WishlistModifier = MockWishlistRepository;
    fn wishlist_modifier(&self) -> &Self::WishlistModifier {
        &MockWishlistRepository
    }
}

impl DependOnSessionCartQuery for MockApp {
    type SessionCartQuery = MockSessionCartRepository;
    fn session_cart_query(&self) -> &Self::SessionCartQuery {
        &MockSessionCartRepository
    }
}

impl DependOnSessionCartModifier for MockApp {
    type SessionCartModifier = MockSessionCartRepository;
    fn session_cart_modifier(&self) -> &Self::SessionCartModifier {
        &MockSessionCartRepository
    }
}
