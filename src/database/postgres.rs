use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::models::{Cat, Feeding, NewUser, Toy, User};
use crate::database::repository::{
    CatToyRepository, FeedingRepository, Repository, RepositoryError, Scope, Store, UserRepository,
};

const CAT_COLUMNS: &str = "id, name, breed, description, age, owner_id";

/// Postgres-backed store. Referential integrity (feeding and association
/// cascades) is enforced by the schema in `database::schema`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Cat> for PgStore {
    async fn create(&self, cat: Cat) -> Result<Cat, RepositoryError> {
        let sql = format!(
            "INSERT INTO cats (name, breed, description, age, owner_id) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            CAT_COLUMNS
        );
        sqlx::query_as::<_, Cat>(&sql)
            .bind(&cat.name)
            .bind(cat.breed.as_str())
            .bind(&cat.description)
            .bind(cat.age)
            .bind(cat.owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "cat"))
    }

    async fn get_by_id(&self, id: i64) -> Result<Cat, RepositoryError> {
        let sql = format!("SELECT {} FROM cats WHERE id = $1", CAT_COLUMNS);
        sqlx::query_as::<_, Cat>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "cat"))?
            .ok_or_else(|| RepositoryError::NotFound(format!("Cat with ID {} not found", id)))
    }

    async fn list(&self, scope: Scope) -> Result<Vec<Cat>, RepositoryError> {
        let query = match scope {
            Scope::All => sqlx::query_as::<_, Cat>("SELECT id, name, breed, description, age, owner_id FROM cats ORDER BY id"),
            Scope::OwnedBy(owner_id) => sqlx::query_as::<_, Cat>(
                "SELECT id, name, breed, description, age, owner_id FROM cats WHERE owner_id = $1 ORDER BY id",
            )
            .bind(owner_id),
        };
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "cat"))
    }

    async fn update(&self, cat: Cat) -> Result<Cat, RepositoryError> {
        // name and owner_id are immutable once stored
        let sql = format!(
            "UPDATE cats SET breed = $2, description = $3, age = $4 WHERE id = $1 RETURNING {}",
            CAT_COLUMNS
        );
        sqlx::query_as::<_, Cat>(&sql)
            .bind(cat.id)
            .bind(cat.breed.as_str())
            .bind(&cat.description)
            .bind(cat.age)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "cat"))?
            .ok_or_else(|| RepositoryError::NotFound(format!("Cat with ID {} not found", cat.id)))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cats WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "cat"))?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Cat with ID {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<Toy> for PgStore {
    async fn create(&self, toy: Toy) -> Result<Toy, RepositoryError> {
        sqlx::query_as::<_, Toy>("INSERT INTO toys (name, color) VALUES ($1, $2) RETURNING id, name, color")
            .bind(&toy.name)
            .bind(&toy.color)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "toy"))
    }

    async fn get_by_id(&self, id: i64) -> Result<Toy, RepositoryError> {
        sqlx::query_as::<_, Toy>("SELECT id, name, color FROM toys WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "toy"))?
            .ok_or_else(|| RepositoryError::NotFound(format!("Toy with ID {} not found", id)))
    }

    async fn list(&self, _scope: Scope) -> Result<Vec<Toy>, RepositoryError> {
        sqlx::query_as::<_, Toy>("SELECT id, name, color FROM toys ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "toy"))
    }

    async fn update(&self, toy: Toy) -> Result<Toy, RepositoryError> {
        sqlx::query_as::<_, Toy>("UPDATE toys SET name = $2, color = $3 WHERE id = $1 RETURNING id, name, color")
            .bind(toy.id)
            .bind(&toy.name)
            .bind(&toy.color)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "toy"))?
            .ok_or_else(|| RepositoryError::NotFound(format!("Toy with ID {} not found", toy.id)))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM toys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "toy"))?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Toy with ID {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl CatToyRepository for PgStore {
    async fn toys_for_cat(&self, cat_id: i64) -> Result<Vec<Toy>, RepositoryError> {
        sqlx::query_as::<_, Toy>(
            r#"
            SELECT t.id, t.name, t.color
            FROM toys t
            JOIN cats_toys ct ON ct.toy_id = t.id
            WHERE ct.cat_id = $1
            ORDER BY t.id
            "#,
        )
        .bind(cat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "toy"))
    }

    async fn cats_for_toy(&self, toy_id: i64) -> Result<Vec<Cat>, RepositoryError> {
        sqlx::query_as::<_, Cat>(
            r#"
            SELECT c.id, c.name, c.breed, c.description, c.age, c.owner_id
            FROM cats c
            JOIN cats_toys ct ON ct.cat_id = c.id
            WHERE ct.toy_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(toy_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "cat"))
    }

    async fn add_toy(&self, cat_id: i64, toy_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO cats_toys (cat_id, toy_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(cat_id)
            .bind(toy_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "association"))?;
        Ok(())
    }

    async fn remove_toy(&self, cat_id: i64, toy_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cats_toys WHERE cat_id = $1 AND toy_id = $2")
            .bind(cat_id)
            .bind(toy_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "association"))?;
        Ok(())
    }
}

#[async_trait]
impl FeedingRepository for PgStore {
    async fn add_feeding(&self, feeding: Feeding) -> Result<Feeding, RepositoryError> {
        sqlx::query_as::<_, Feeding>(
            "INSERT INTO feedings (date, meal, cat_id) VALUES ($1, $2, $3) RETURNING id, date, meal, cat_id",
        )
        .bind(feeding.date)
        .bind(feeding.meal.as_str())
        .bind(feeding.cat_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "feeding"))
    }

    async fn feedings_for_cat(&self, cat_id: i64) -> Result<Vec<Feeding>, RepositoryError> {
        sqlx::query_as::<_, Feeding>(
            "SELECT id, date, meal, cat_id FROM feedings WHERE cat_id = $1 ORDER BY date DESC, id DESC",
        )
        .bind(cat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "feeding"))
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id, username, password_hash, date_joined",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "user"))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, date_joined FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "user"))
    }

    async fn get_user(&self, id: i64) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>("SELECT id, username, password_hash, date_joined FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "user"))?
            .ok_or_else(|| RepositoryError::NotFound(format!("User with ID {} not found", id)))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "health"))?;
        Ok(())
    }
}
