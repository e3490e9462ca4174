use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use hotelbook_core::repository::TicketRepository;
use hotelbook_shared::{Enrollment, Ticket, TicketStatus, TicketType, TicketWithType};

pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
    id: i32,
    user_id: i32,
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: i32,
    enrollment_id: i32,
    ticket_type_id: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    type_name: String,
    type_price: i32,
    is_remote: bool,
    includes_hotel: bool,
    type_created_at: DateTime<Utc>,
    type_updated_at: DateTime<Utc>,
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn find_enrollment_by_user(
        &self,
        user_id: i32,
    ) -> Result<Option<Enrollment>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, EnrollmentRow>("SELECT id, user_id FROM enrollments WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Enrollment { id: row.id, user_id: row.user_id }))
    }

    async fn find_ticket_with_type(
        &self,
        enrollment_id: i32,
    ) -> Result<Option<TicketWithType>, Box<dyn std::error::Error + Send + Sync>> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT t.id, t.enrollment_id, t.ticket_type_id, t.status, t.created_at, t.updated_at,
                   tt.name AS type_name, tt.price AS type_price, tt.is_remote, tt.includes_hotel,
                   tt.created_at AS type_created_at, tt.updated_at AS type_updated_at
            FROM tickets t
            JOIN ticket_types tt ON tt.id = t.ticket_type_id
            WHERE t.enrollment_id = $1
            ORDER BY t.created_at DESC, t.id DESC
            LIMIT 1
            "#,
        )
        .bind(enrollment_id)
        .fetch_optional(&self.pool)
        .await?;

        let row = match row {
            Some(row) => row,
            None => return Ok(None),
        };

        let status = TicketStatus::parse(&row.status)
            .ok_or_else(|| format!("ticket {} has unknown status {}", row.id, row.status))?;

        Ok(Some(TicketWithType {
            ticket: Ticket {
                id: row.id,
                enrollment_id: row.enrollment_id,
                ticket_type_id: row.ticket_type_id,
                status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            ticket_type: TicketType {
                id: row.ticket_type_id,
                name: row.type_name,
                price: row.type_price,
                is_remote: row.is_remote,
                includes_hotel: row.includes_hotel,
                created_at: row.type_created_at,
                updated_at: row.type_updated_at,
            },
        }))
    }
}
