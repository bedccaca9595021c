use error_stack::Report;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::{DependOnOrderQuery, OrderQuery};
use kernel::interface::update::{DependOnOrderModifier, OrderModifier};
use kernel::prelude::entity::{
    BookId, BookPrice, BookTitle, CreatedAt, Order, OrderId, OrderItem, OrderNumber, OrderPricing,
    OrderStatus, PaymentMethod, Quantity, SelectLimit, SelectOffset, ShippingAddress, UserId,
};
use kernel::KernelError;

use crate::database::postgres::{PgTransaction, PostgresDatabase};
use crate::error::ConvertError;

pub struct PostgresOrderRepository;

#[async_trait::async_trait]
impl OrderQuery for PostgresOrderRepository {
    type Transaction = PgTransaction;

    async fn find_by_id(
        &self,
        con: &mut PgTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        PgOrderInternal::find_by_id(con, id).await
    }

    async fn find_items(
        &self,
        con: &mut PgTransaction,
        id: &OrderId,
    ) -> error_stack::Result<Vec<OrderItem>, KernelError> {
        PgOrderInternal::find_items(con, id).await
    }

    async fn find_by_user(
        &self,
        con: &mut PgTransaction,
        user_id: &UserId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        PgOrderInternal::find_by_user(con, user_id, limit, offset).await
    }
}

#[async_trait::async_trait]
impl OrderModifier for PostgresOrderRepository {
    type Transaction = PgTransaction;

    async fn create(
        &self,
        con: &mut PgTransaction,
        order: &Order,
        items: &[OrderItem],
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::create(con, order, items).await
    }

    async fn update_status(
        &self,
        con: &mut PgTransaction,
        id: &OrderId,
        status: OrderStatus,
    ) -> error_stack::Result<(), KernelError> {
        PgOrderInternal::update_status(con, id, status).await
    }
}

impl DependOnOrderQuery for PostgresDatabase {
    type OrderQuery = PostgresOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &PostgresOrderRepository
    }
}

impl DependOnOrderModifier for PostgresDatabase {
    type OrderModifier = PostgresOrderRepository;
    fn order_modifier(&self) -> &Self::OrderModifier {
        &PostgresOrderRepository
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    user_id: Uuid,
    order_number: String,
    status: String,
    recipient: String,
    phone: String,
    line1: String,
    line2: Option<String>,
    city: String,
    country: String,
    payment_method: String,
    subtotal: Decimal,
    tax: Decimal,
    shipping_fee: Decimal,
    total: Decimal,
    created_at: OffsetDateTime,
}

impl TryFrom<OrderRow> for Order {
    type Error = Report<KernelError>;
    fn try_from(value: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&value.status).ok_or_else(|| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown order status: {}", value.status))
        })?;
        let payment = PaymentMethod::parse(&value.payment_method).ok_or_else(|| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown payment method: {}", value.payment_method))
        })?;
        Ok(Order::new(
            OrderId::new(value.id),
            UserId::new(value.user_id),
            OrderNumber::new(value.order_number),
            status,
            ShippingAddress::new(
                value.recipient,
                value.phone,
                value.line1,
                value.line2,
                value.city,
                value.country,
            ),
            payment,
            OrderPricing::new(value.subtotal, value.tax, value.shipping_fee, value.total),
            CreatedAt::new(value.created_at),
        ))
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    order_id: Uuid,
    book_id: Uuid,
    title: String,
    quantity: i32,
    unit_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(value: OrderItemRow) -> Self {
        OrderItem::new(
            OrderId::new(value.order_id),
            BookId::new(value.book_id),
            BookTitle::new(value.title),
            Quantity::new(value.quantity),
            BookPrice::new(value.unit_price),
        )
    }
}

pub(in crate::database) struct PgOrderInternal;

impl PgOrderInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &OrderId,
    ) -> error_stack::Result<Option<Order>, KernelError> {
        let row = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, order_number, status, recipient, phone, line1, line2, city, country, payment_method, subtotal, tax, shipping_fee, total, created_at
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Order::try_from).transpose()
    }

    async fn find_items(
        con: &mut PgConnection,
        id: &OrderId,
    ) -> error_stack::Result<Vec<OrderItem>, KernelError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            // language=postgresql
            r#"
            SELECT order_id, book_id, title, quantity, unit_price
            FROM order_items
            WHERE order_id = $1
            ORDER BY title
            "#,
        )
        .bind(id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn find_by_user(
        con: &mut PgConnection,
        user_id: &UserId,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Order>, KernelError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, order_number, status, recipient, phone, line1, line2, city, country, payment_method, subtotal, tax, shipping_fee, total, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.as_ref())
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Order::try_from).collect()
    }

    async fn create(
        con: &mut PgConnection,
        order: &Order,
        items: &[OrderItem],
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            INSERT INTO orders (id, user_id, order_number, status, recipient, phone, line1, line2, city, country, payment_method, subtotal, tax, shipping_fee, total, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(order.id().as_ref())
        .bind(order.user_id().as_ref())
        .bind(order.number().as_ref())
        .bind(order.status().as_str())
        .bind(order.shipping().recipient())
        .bind(order.shipping().phone())
        .bind(order.shipping().line1())
        .bind(order.shipping().line2())
        .bind(order.shipping().city())
        .bind(order.shipping().country())
        .bind(order.payment().as_str())
        .bind(order.pricing().subtotal())
        .bind(order.pricing().tax())
        .bind(order.pricing().shipping_fee())
        .bind(order.pricing().total())
        .bind(order.created_at().as_ref())
        .execute(&mut *con)
        .await
        .convert_error()?;

        for item in items {
            sqlx::query(
                // language=postgresql
                r#"
                INSERT INTO order_items (order_id, book_id, title, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(item.order_id().as_ref())
            .bind(item.book_id().as_ref())
            .bind(item.title().as_ref())
            .bind(item.quantity().as_ref())
            .bind(item.unit_price().as_ref())
            .execute(&mut *con)
            .await
            .convert_error()?;
        }
        Ok(())
    }

    async fn update_status(
        con: &mut PgConnection,
        id: &OrderId,
        status: OrderStatus,
    ) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE orders
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .bind(status.as_str())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use rust_decimal::Decimal;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::OrderQuery;
    use kernel::interface::update::{BookModifier, OrderModifier};
    use kernel::prelude::entity::{
        Book, BookAuthor, BookId, BookPrice, BookStock, BookTitle, CreatedAt, IsActive, Order,
        OrderId, OrderItem, OrderNumber, OrderPricing, OrderStatus, PaymentMethod, Quantity,
        SelectLimit, SelectOffset, ShippingAddress, UpdatedAt, UserId,
    };
    use kernel::KernelError;

    use crate::database::postgres::{
        PostgresBookRepository, PostgresDatabase, PostgresOrderRepository,
    };

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> Result<(), error_stack::Report<KernelError>> {
        let db = PostgresDatabase::new().await?;
        db.migrate().await?;
        let mut con = db.transact().await?;

        let now = OffsetDateTime::now_utc();
        let book_id = BookId::new(Uuid::new_v4());
        let book = Book::new(
            book_id.clone(),
            BookTitle::new("test"),
            BookAuthor::new("tester"),
            BookPrice::new(Decimal::new(100_000, 0)),
            None,
            BookStock::new(5),
            IsActive::new(true),
            None,
            CreatedAt::new(now),
            UpdatedAt::new(now),
        );
        PostgresBookRepository.create(&mut con, &book).await?;

        let order_id = OrderId::new(Uuid::new_v4());
        let user_id = UserId::new(Uuid::new_v4());
        let order = Order::new(
            order_id.clone(),
            user_id.clone(),
            OrderNumber::generate(now, Uuid::new_v4()),
            OrderStatus::Pending,
            ShippingAddress::new("Tester", "0123456789", "1 Test St", None, "Hanoi", "Vietnam"),
            PaymentMethod::CashOnDelivery,
            OrderPricing::new(
                Decimal::new(200_000, 0),
                Decimal::new(20_000, 0),
                Decimal::new(30_000, 0),
                Decimal::new(250_000, 0),
            ),
            CreatedAt::new(now),
        );
        let items = vec![OrderItem::new(
            order_id.clone(),
            book_id,
            BookTitle::new("test"),
            Quantity::new(2),
            BookPrice::new(Decimal::new(100_000, 0)),
        )];
        PostgresOrderRepository
            .create(&mut con, &order, &items)
            .await?;

        let found = PostgresOrderRepository
            .find_by_id(&mut con, &order_id)
            .await?;
        assert_eq!(found, Some(order));

        let found_items = PostgresOrderRepository
            .find_items(&mut con, &order_id)
            .await?;
        assert_eq!(found_items, items);

        let listed = PostgresOrderRepository
            .find_by_user(
                &mut con,
                &user_id,
                &SelectLimit::default(),
                &SelectOffset::default(),
            )
            .await?;
        assert_eq!(listed.len(), 1);

        PostgresOrderRepository
            .update_status(&mut con, &order_id, OrderStatus::Processing)
            .await?;
        let found = PostgresOrderRepository
            .find_by_id(&mut con, &order_id)
            .await?
            .unwrap();
        assert_eq!(found.status(), &OrderStatus::Processing);

        con.roll_back().await?;
        Ok(())
    }
}
