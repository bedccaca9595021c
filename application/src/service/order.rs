use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::outcome::OrderRejection;
use kernel::interface::query::{BookQuery, CartQuery, DependOnOrderQuery, OrderQuery};
use kernel::interface::update::{
    BookModifier, CartModifier, DependOnBookModifier, DependOnOrderModifier, OrderModifier,
};
use kernel::prelude::entity::{
    CartTotals, CreatedAt, Order, OrderId, OrderItem, OrderNumber, OrderPricing, OrderStatus,
    UserId,
};
use kernel::KernelError;

use crate::service::CartService;
use crate::transfer::{
    AddCartItemDto, CancelOrderDto, CreateOrderDto, GetCartDto, GetOrderDto, GetUserOrdersDto,
    OrderDto, OrderStatusDto, OrderSummaryDto, ReorderDto, ReorderFailureDto, ReorderedDto,
    UpdateOrderStatusDto,
};

/// Order engine: converts a validated cart into an immutable order and walks
/// the status lifecycle. Stock is re-checked and taken inside the checkout
/// transaction; a cart shown seconds ago is never trusted.
#[async_trait::async_trait]
pub trait OrderService:
    CartService + DependOnBookModifier + DependOnOrderQuery + DependOnOrderModifier
{
    async fn create_order(
        &self,
        dto: CreateOrderDto,
    ) -> error_stack::Result<Result<OrderDto, OrderRejection>, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let mut connection = self.database_connection().transact().await?;

        let items = self
            .cart_query()
            .find_by_user(&mut connection, &user_id)
            .await?;
        if items.is_empty() {
            connection.roll_back().await?;
            warn!("Refused checkout for user {}: empty cart", dto.user_id);
            return Ok(Err(OrderRejection::EmptyCart));
        }

        let now = OffsetDateTime::now_utc();
        let order_id = OrderId::new(Uuid::new_v4());
        let mut lines = Vec::with_capacity(items.len());
        let mut priced = Vec::with_capacity(items.len());
        for item in &items {
            let requested = *item.quantity().as_ref();
            let book = self
                .book_query()
                .find_by_id(&mut connection, item.book_id())
                .await?;
            let book = match book {
                Some(book) if *book.is_active().as_ref() => book,
                _ => {
                    connection.roll_back().await?;
                    warn!(
                        "Aborted checkout for user {}: book {} unavailable",
                        dto.user_id,
                        item.book_id().as_ref()
                    );
                    return Ok(Err(OrderRejection::InsufficientStock {
                        book_id: item.book_id().clone(),
                        available: 0,
                        requested,
                    }));
                }
            };

            let reserved = self
                .book_modifier()
                .reserve_stock(&mut connection, item.book_id(), item.quantity())
                .await?;
            if !reserved {
                let available = *book.stock().as_ref();
                connection.roll_back().await?;
                warn!(
                    "Aborted checkout for user {}: book {} has {} left, {} requested",
                    dto.user_id,
                    item.book_id().as_ref(),
                    available,
                    requested
                );
                return Ok(Err(OrderRejection::InsufficientStock {
                    book_id: item.book_id().clone(),
                    available,
                    requested,
                }));
            }

            priced.push((*book.display_price().as_ref(), requested));
            lines.push(OrderItem::new(
                order_id.clone(),
                item.book_id().clone(),
                book.title().clone(),
                item.quantity().clone(),
                book.display_price().clone(),
            ));
        }

        let totals = CartTotals::from_lines(priced);
        let order = Order::new(
            order_id,
            user_id.clone(),
            OrderNumber::generate(now, Uuid::new_v4()),
            OrderStatus::Pending,
            dto.shipping.into(),
            dto.payment_method,
            OrderPricing::from(&totals),
            CreatedAt::new(now),
        );
        self.order_modifier()
            .create(&mut connection, &order, &lines)
            .await?;
        self.cart_modifier().clear(&mut connection, &user_id).await?;
        connection.commit().await?;

        info!(
            "Created order {} for user {} ({} lines)",
            order.number().as_ref(),
            dto.user_id,
            lines.len()
        );
        Ok(Ok(OrderDto::from_parts(order, lines)))
    }

    /// An order of another user is indistinguishable from a missing one.
    async fn get_order(
        &self,
        dto: GetOrderDto,
    ) -> error_stack::Result<Result<OrderDto, OrderRejection>, KernelError> {
        let order_id = OrderId::new(dto.order_id);
        let user_id = UserId::new(dto.user_id);
        let mut connection = self.database_connection().transact().await?;

        let order = self
            .order_query()
            .find_by_id(&mut connection, &order_id)
            .await?;
        let order = match order {
            Some(order) if order.user_id() == &user_id => order,
            _ => {
                connection.commit().await?;
                return Ok(Err(OrderRejection::NotFound));
            }
        };
        let items = self
            .order_query()
            .find_items(&mut connection, &order_id)
            .await?;
        connection.commit().await?;
        Ok(Ok(OrderDto::from_parts(order, items)))
    }

    async fn get_user_orders(
        &self,
        dto: GetUserOrdersDto,
    ) -> error_stack::Result<Vec<OrderSummaryDto>, KernelError> {
        let user_id = UserId::new(dto.user_id);
        let mut connection = self.database_connection().transact().await?;
        let orders = self
            .order_query()
            .find_by_user(&mut connection, &user_id, &dto.limit, &dto.offset)
            .await?;
        connection.commit().await?;
        Ok(orders.into_iter().map(OrderSummaryDto::from).collect())
    }

    /// Cancellation restores the reserved stock in the same transaction that
    /// flips the status.
    async fn cancel_order(
        &self,
        dto: CancelOrderDto,
    ) -> error_stack::Result<Result<OrderStatusDto, OrderRejection>, KernelError> {
        let order_id = OrderId::new(dto.order_id);
        let user_id = UserId::new(dto.user_id);
        let mut connection = self.database_connection().transact().await?;

        let order = self
            .order_query()
            .find_by_id(&mut connection, &order_id)
            .await?;
        let order = match order {
            Some(order) if order.user_id() == &user_id => order,
            _ => {
                connection.roll_back().await?;
                return Ok(Err(OrderRejection::NotFound));
            }
        };
        if !order.status().is_cancellable() {
            let status = *order.status();
            connection.roll_back().await?;
            warn!(
                "Refused cancellation of order {}: status {status}",
                dto.order_id
            );
            return Ok(Err(OrderRejection::NotCancellable { status }));
        }

        let items = self
            .order_query()
            .find_items(&mut connection, &order_id)
            .await?;
        for item in &items {
            self.book_modifier()
                .restore_stock(&mut connection, item.book_id(), item.quantity())
                .await?;
        }
        self.order_modifier()
            .update_status(&mut connection, &order_id, OrderStatus::Cancelled)
            .await?;
        connection.commit().await?;

        info!("Cancelled order {}", dto.order_id);
        Ok(Ok(OrderStatusDto {
            order_id: dto.order_id,
            status: OrderStatus::Cancelled,
        }))
    }

    /// Puts a past order's lines back into the cart. Each line is attempted
    /// on its own; failures are reported, the rest proceeds.
    async fn reorder(
        &self,
        dto: ReorderDto,
    ) -> error_stack::Result<Result<ReorderedDto, OrderRejection>, KernelError> {
        let order_id = OrderId::new(dto.order_id);
        let user_id = UserId::new(dto.user_id);
        let mut connection = self.database_connection().transact().await?;

        let order = self
            .order_query()
            .find_by_id(&mut connection, &order_id)
            .await?;
        if !matches!(order, Some(order) if order.user_id() == &user_id) {
            connection.commit().await?;
            return Ok(Err(OrderRejection::NotFound));
        }
        let items = self
            .order_query()
            .find_items(&mut connection, &order_id)
            .await?;
        connection.commit().await?;

        let mut failures = Vec::new();
        for item in items {
            let book_id = *item.book_id().as_ref();
            let added = self
                .add_item(AddCartItemDto {
                    user_id: dto.user_id,
                    book_id,
                    quantity: *item.quantity().as_ref(),
                })
                .await?;
            if let Err(reason) = added {
                warn!("Reorder of order {} skipped book {book_id}: {reason}", dto.order_id);
                failures.push(ReorderFailureDto { book_id, reason });
            }
        }

        let badge = self
            .get_item_count(GetCartDto {
                user_id: dto.user_id,
            })
            .await?;
        Ok(Ok(ReorderedDto {
            item_count: badge.item_count,
            failures,
        }))
    }

    /// Back-office transition along the fixed lifecycle. Moving to
    /// `Cancelled` through here restores stock exactly like a customer
    /// cancellation.
    async fn update_order_status(
        &self,
        dto: UpdateOrderStatusDto,
    ) -> error_stack::Result<Result<OrderStatusDto, OrderRejection>, KernelError> {
        let order_id = OrderId::new(dto.order_id);
        let mut connection = self.database_connection().transact().await?;

        let order = self
            .order_query()
            .find_by_id(&mut connection, &order_id)
            .await?;
        let Some(order) = order else {
            connection.roll_back().await?;
            return Ok(Err(OrderRejection::NotFound));
        };
        let from = *order.status();
        if !from.can_transition_to(dto.status) {
            connection.roll_back().await?;
            warn!(
                "Refused status change of order {}: {from} -> {}",
                dto.order_id, dto.status
            );
            return Ok(Err(OrderRejection::InvalidTransition {
                from,
                to: dto.status,
            }));
        }

        if dto.status == OrderStatus::Cancelled {
            let items = self
                .order_query()
                .find_items(&mut connection, &order_id)
                .await?;
            for item in &items {
                self.book_modifier()
                    .restore_stock(&mut connection, item.book_id(), item.quantity())
                    .await?;
            }
        }
        self.order_modifier()
            .update_status(&mut connection, &order_id, dto.status)
            .await?;
        connection.commit().await?;

        info!("Order {} moved {from} -> {}", dto.order_id, dto.status);
        Ok(Ok(OrderStatusDto {
            order_id: dto.order_id,
            status: dto.status,
        }))
    }
}

impl<T> OrderService for T where
    T: CartService + DependOnBookModifier + DependOnOrderQuery + DependOnOrderModifier
{
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;

    use kernel::interface::outcome::OrderRejection;
    use kernel::prelude::entity::{BookId, OrderStatus};

    use crate::mock::MockApp;
    use crate::service::{CartService, OrderService};
    use crate::transfer::{
        AddCartItemDto, CancelOrderDto, CreateOrderDto, GetCartDto, GetOrderDto, ReorderDto,
        UpdateCartItemDto, UpdateOrderStatusDto,
    };

    #[tokio::test]
    async fn checkout_of_an_empty_cart_is_refused() {
        let app = MockApp::new();
        let user = MockApp::user();

        let rejection = app
            .create_order(CreateOrderDto {
                user_id: user,
                shipping: MockApp::shipping(),
                payment_method: MockApp::payment(),
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(rejection, OrderRejection::EmptyCart);
        assert_eq!(app.order_count(), 0);
    }

    #[tokio::test]
    async fn checkout_snapshots_prices_takes_stock_and_clears_the_cart() {
        let app = MockApp::new();
        let first = app.seed_book(5, Decimal::new(100_000, 0), None, true);
        let second = app.seed_book(
            4,
            Decimal::new(200_000, 0),
            Some(Decimal::new(150_000, 0)),
            true,
        );
        let user = MockApp::user();

        for (book, quantity) in [(first, 2), (second, 1)] {
            app.add_item(AddCartItemDto {
                user_id: user,
                book_id: book,
                quantity,
            })
            .await
            .unwrap()
            .unwrap();
        }

        let order = app
            .create_order(CreateOrderDto {
                user_id: user,
                shipping: MockApp::shipping(),
                payment_method: MockApp::payment(),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 2);
        assert!(order.number.starts_with("ORD-"));
        // Captured prices are the display prices at commit time.
        let captured = |book| {
            order
                .items
                .iter()
                .find(|item| item.book_id == book)
                .unwrap()
                .unit_price
        };
        assert_eq!(captured(first), Decimal::new(100_000, 0));
        assert_eq!(captured(second), Decimal::new(150_000, 0));
        assert_eq!(order.subtotal, Decimal::new(350_000, 0));
        assert_eq!(order.tax, Decimal::new(35_000, 0));
        assert_eq!(order.shipping_fee, Decimal::ZERO);
        assert_eq!(order.total, Decimal::new(385_000, 0));

        assert_eq!(app.stock_of(first), 3);
        assert_eq!(app.stock_of(second), 3);
        let cart = app.get_cart(GetCartDto { user_id: user }).await.unwrap();
        assert!(cart.is_empty);

        // Later price changes never touch the captured snapshot.
        app.set_discount_price(first, Some(Decimal::new(10_000, 0)));
        let reread = app
            .get_order(GetOrderDto {
                order_id: order.id,
                user_id: user,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            reread
                .items
                .iter()
                .find(|item| item.book_id == first)
                .unwrap()
                .unit_price,
            Decimal::new(100_000, 0)
        );
    }

    #[tokio::test]
    async fn checkout_aborts_wholesale_when_one_line_lacks_stock() {
        let app = MockApp::new();
        let fine = app.seed_book(5, Decimal::new(100_000, 0), None, true);
        let scarce = app.seed_book(3, Decimal::new(50_000, 0), None, true);
        let user = MockApp::user();

        for (book, quantity) in [(fine, 2), (scarce, 3)] {
            app.add_item(AddCartItemDto {
                user_id: user,
                book_id: book,
                quantity,
            })
            .await
            .unwrap()
            .unwrap();
        }

        // Another shopper drains the scarce book before this checkout lands.
        app.set_stock(scarce, 1);

        let rejection = app
            .create_order(CreateOrderDto {
                user_id: user,
                shipping: MockApp::shipping(),
                payment_method: MockApp::payment(),
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(
            rejection,
            OrderRejection::InsufficientStock {
                book_id: BookId::new(scarce),
                available: 1,
                requested: 3
            }
        );

        // All-or-nothing: the first line's stock is untouched, the cart kept.
        assert_eq!(app.order_count(), 0);
        assert_eq!(app.stock_of(fine), 5);
        assert_eq!(app.stock_of(scarce), 1);
        let cart = app.get_cart(GetCartDto { user_id: user }).await.unwrap();
        assert_eq!(cart.items.len(), 2);
    }

    #[tokio::test]
    async fn foreign_orders_read_as_not_found() {
        let app = MockApp::new();
        let book = app.seed_book(5, Decimal::new(100_000, 0), None, true);
        let owner = MockApp::user();
        let stranger = MockApp::user();

        app.add_item(AddCartItemDto {
            user_id: owner,
            book_id: book,
            quantity: 1,
        })
        .await
        .unwrap()
        .unwrap();
        let order = app
            .create_order(CreateOrderDto {
                user_id: owner,
                shipping: MockApp::shipping(),
                payment_method: MockApp::payment(),
            })
            .await
            .unwrap()
            .unwrap();

        let rejection = app
            .get_order(GetOrderDto {
                order_id: order.id,
                user_id: stranger,
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(rejection, OrderRejection::NotFound);

        let rejection = app
            .cancel_order(CancelOrderDto {
                order_id: order.id,
                user_id: stranger,
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(rejection, OrderRejection::NotFound);
    }

    #[tokio::test]
    async fn cancellation_restores_stock_only_from_pending() {
        let app = MockApp::new();
        let book = app.seed_book(5, Decimal::new(100_000, 0), None, true);
        let user = MockApp::user();

        app.add_item(AddCartItemDto {
            user_id: user,
            book_id: book,
            quantity: 2,
        })
        .await
        .unwrap()
        .unwrap();
        let order = app
            .create_order(CreateOrderDto {
                user_id: user,
                shipping: MockApp::shipping(),
                payment_method: MockApp::payment(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(app.stock_of(book), 3);

        let cancelled = app
            .cancel_order(CancelOrderDto {
                order_id: order.id,
                user_id: user,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(app.stock_of(book), 5);

        // A delivered order refuses cancellation and keeps its status.
        app.add_item(AddCartItemDto {
            user_id: user,
            book_id: book,
            quantity: 1,
        })
        .await
        .unwrap()
        .unwrap();
        let delivered = app
            .create_order(CreateOrderDto {
                user_id: user,
                shipping: MockApp::shipping(),
                payment_method: MockApp::payment(),
            })
            .await
            .unwrap()
            .unwrap();
        for status in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            app.update_order_status(UpdateOrderStatusDto {
                order_id: delivered.id,
                status,
            })
            .await
            .unwrap()
            .unwrap();
        }

        let rejection = app
            .cancel_order(CancelOrderDto {
                order_id: delivered.id,
                user_id: user,
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(
            rejection,
            OrderRejection::NotCancellable {
                status: OrderStatus::Delivered
            }
        );
        let reread = app
            .get_order(GetOrderDto {
                order_id: delivered.id,
                user_id: user,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reread.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn status_updates_respect_the_lifecycle() {
        let app = MockApp::new();
        let book = app.seed_book(5, Decimal::new(100_000, 0), None, true);
        let user = MockApp::user();

        app.add_item(AddCartItemDto {
            user_id: user,
            book_id: book,
            quantity: 1,
        })
        .await
        .unwrap()
        .unwrap();
        let order = app
            .create_order(CreateOrderDto {
                user_id: user,
                shipping: MockApp::shipping(),
                payment_method: MockApp::payment(),
            })
            .await
            .unwrap()
            .unwrap();

        let rejection = app
            .update_order_status(UpdateOrderStatusDto {
                order_id: order.id,
                status: OrderStatus::Delivered,
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(
            rejection,
            OrderRejection::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Delivered
            }
        );

        let moved = app
            .update_order_status(UpdateOrderStatusDto {
                order_id: order.id,
                status: OrderStatus::Processing,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.status, OrderStatus::Processing);
    }

    #[tokio::test]
    async fn reorder_reports_failed_lines_and_adds_the_rest() {
        let app = MockApp::new();
        let fine = app.seed_book(10, Decimal::new(100_000, 0), None, true);
        let fragile = app.seed_book(5, Decimal::new(50_000, 0), None, true);
        let user = MockApp::user();

        for (book, quantity) in [(fine, 2), (fragile, 2)] {
            app.add_item(AddCartItemDto {
                user_id: user,
                book_id: book,
                quantity,
            })
            .await
            .unwrap()
            .unwrap();
        }
        let order = app
            .create_order(CreateOrderDto {
                user_id: user,
                shipping: MockApp::shipping(),
                payment_method: MockApp::payment(),
            })
            .await
            .unwrap()
            .unwrap();

        // The second book goes off sale before the reorder.
        app.set_active(fragile, false);

        let reordered = app
            .reorder(ReorderDto {
                order_id: order.id,
                user_id: user,
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reordered.item_count, 2);
        assert_eq!(reordered.failures.len(), 1);
        assert_eq!(reordered.failures[0].book_id, fragile);
    }

    /// The walkthrough from the requirements: stock 3 at 100 000 each.
    #[tokio::test]
    async fn example_scenario_end_to_end() {
        let app = MockApp::new();
        let book = app.seed_book(3, Decimal::new(100_000, 0), None, true);
        let user = MockApp::user();

        app.add_item(AddCartItemDto {
            user_id: user,
            book_id: book,
            quantity: 2,
        })
        .await
        .unwrap()
        .unwrap();
        let cart = app.get_cart(GetCartDto { user_id: user }).await.unwrap();
        assert_eq!(cart.subtotal, Decimal::new(200_000, 0));
        assert_eq!(cart.tax, Decimal::new(20_000, 0));

        let rejection = app
            .add_item(AddCartItemDto {
                user_id: user,
                book_id: book,
                quantity: 2,
            })
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(
            rejection,
            kernel::interface::outcome::CartRejection::InsufficientStock {
                available: 3,
                in_cart: 2
            }
        );

        app.update_item(UpdateCartItemDto {
            user_id: user,
            book_id: book,
            quantity: 3,
        })
        .await
        .unwrap()
        .unwrap();

        let order = app
            .create_order(CreateOrderDto {
                user_id: user,
                shipping: MockApp::shipping(),
                payment_method: MockApp::payment(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 3);
        assert_eq!(order.items[0].unit_price, Decimal::new(100_000, 0));
        assert_eq!(app.stock_of(book), 0);
    }
}
