use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use ridehub_domain::party::{Client, Driver};
use ridehub_domain::repository::{ClientRepository, DriverRepository, RepoError};

pub struct PgClientRepository {
    pool: PgPool,
}

impl PgClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    email: String,
    phone: String,
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Client {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
        }
    }
}

#[async_trait]
impl ClientRepository for PgClientRepository {
    async fn insert(&self, client: &Client) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO clients (id, user_id, name, email, phone) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(client.id)
        .bind(client.user_id)
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Client>, RepoError> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT id, user_id, name, email, phone FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Client::from))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Client>, RepoError> {
        let row = sqlx::query_as::<_, ClientRow>(
            "SELECT id, user_id, name, email, phone FROM clients WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Client::from))
    }

    async fn update_contact(&self, id: Uuid, email: &str, phone: &str) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE clients SET email = $1, phone = $2 WHERE id = $3")
            .bind(email)
            .bind(phone)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err("client not found".into());
        }
        Ok(())
    }
}

pub struct PgDriverRepository {
    pool: PgPool,
}

impl PgDriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DriverRow {
    id: Uuid,
    user_id: Option<Uuid>,
    name: String,
    email: String,
    phone: String,
    license_id: String,
    active: bool,
}

impl From<DriverRow> for Driver {
    fn from(row: DriverRow) -> Self {
        Driver {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            license_id: row.license_id,
            active: row.active,
        }
    }
}

#[async_trait]
impl DriverRepository for PgDriverRepository {
    async fn insert(&self, driver: &Driver) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO drivers (id, user_id, name, email, phone, license_id, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(driver.id)
        .bind(driver.user_id)
        .bind(&driver.name)
        .bind(&driver.email)
        .bind(&driver.phone)
        .bind(&driver.license_id)
        .bind(driver.active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Driver>, RepoError> {
        let row = sqlx::query_as::<_, DriverRow>(
            "SELECT id, user_id, name, email, phone, license_id, active FROM drivers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Driver::from))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Driver>, RepoError> {
        let row = sqlx::query_as::<_, DriverRow>(
            "SELECT id, user_id, name, email, phone, license_id, active FROM drivers WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Driver::from))
    }

    async fn list_active(&self) -> Result<Vec<Driver>, RepoError> {
        let rows = sqlx::query_as::<_, DriverRow>(
            "SELECT id, user_id, name, email, phone, license_id, active \
             FROM drivers WHERE active = TRUE ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Driver::from).collect())
    }
}
