// Runs against a real database only when DATABASE_URL is set; otherwise
// every test returns early.

use anyhow::Result;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tokio::sync::Mutex;

use cat_collector::config::AppConfig;
use cat_collector::database::models::{Breed, Cat, Feeding, Meal, NewUser, Toy};
use cat_collector::database::{
    CatToyRepository, DatabaseManager, FeedingRepository, PgStore, Repository, RepositoryError, UserRepository,
};

// concurrent CREATE TABLE IF NOT EXISTS can still collide in the catalog
static MIGRATIONS: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

async fn pg_store() -> Result<Option<PgStore>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        return Ok(None);
    };
    let mut config = AppConfig::development().database;
    config.url = Some(url);
    config.max_connections = 2;

    let pool = DatabaseManager::connect(&config).await?;
    {
        let _guard = MIGRATIONS.lock().await;
        DatabaseManager::migrate(&pool).await?;
        // a second run must be a no-op
        DatabaseManager::migrate(&pool).await?;
    }
    Ok(Some(PgStore::new(pool)))
}

async fn owner(store: &PgStore) -> Result<i64> {
    let username = format!("pg-{}", uuid::Uuid::new_v4().simple());
    let user = store
        .create_user(NewUser { username, password_hash: "x".into() })
        .await?;
    Ok(user.id)
}

async fn cat(store: &PgStore, owner_id: i64, name: &str) -> Result<Cat> {
    let cat = Repository::<Cat>::create(
        store,
        Cat {
            id: 0,
            name: name.into(),
            breed: Breed::Tabby,
            description: String::new(),
            age: 3,
            owner_id,
        },
    )
    .await?;
    Ok(cat)
}

async fn feed(store: &PgStore, cat_id: i64, date: &str, meal: Meal) -> Result<Feeding> {
    let feeding = store
        .add_feeding(Feeding {
            id: 0,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d")?,
            meal,
            cat_id,
        })
        .await?;
    Ok(feeding)
}

#[tokio::test]
async fn deleting_a_cat_removes_its_feedings() -> Result<()> {
    let Some(store) = pg_store().await? else {
        return Ok(());
    };
    let owner_id = owner(&store).await?;
    let tom = cat(&store, owner_id, "Tom").await?;
    feed(&store, tom.id, "2024-01-01", Meal::Breakfast).await?;
    feed(&store, tom.id, "2024-01-01", Meal::Dinner).await?;
    assert_eq!(store.feedings_for_cat(tom.id).await?.len(), 2);

    Repository::<Cat>::delete_by_id(&store, tom.id).await?;

    assert!(store.feedings_for_cat(tom.id).await?.is_empty());
    assert!(matches!(
        Repository::<Cat>::get_by_id(&store, tom.id).await,
        Err(RepositoryError::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
async fn associating_a_toy_twice_keeps_one_link() -> Result<()> {
    let Some(store) = pg_store().await? else {
        return Ok(());
    };
    let owner_id = owner(&store).await?;
    let tom = cat(&store, owner_id, "Tom").await?;
    let ball = Repository::<Toy>::create(&store, Toy { id: 0, name: "Ball".into(), color: "red".into() }).await?;

    store.add_toy(tom.id, ball.id).await?;
    store.add_toy(tom.id, ball.id).await?;

    let toys = store.toys_for_cat(tom.id).await?;
    assert_eq!(toys.iter().map(|t| t.id).collect::<Vec<_>>(), vec![ball.id]);
    let cats = store.cats_for_toy(ball.id).await?;
    assert_eq!(cats.iter().map(|c| c.id).collect::<Vec<_>>(), vec![tom.id]);

    store.remove_toy(tom.id, ball.id).await?;
    assert!(store.toys_for_cat(tom.id).await?.is_empty());

    Repository::<Toy>::delete_by_id(&store, ball.id).await?;
    Repository::<Cat>::delete_by_id(&store, tom.id).await?;
    Ok(())
}

#[tokio::test]
async fn feedings_come_back_newest_first() -> Result<()> {
    let Some(store) = pg_store().await? else {
        return Ok(());
    };
    let owner_id = owner(&store).await?;
    let tom = cat(&store, owner_id, "Tom").await?;

    let first = feed(&store, tom.id, "2024-01-01", Meal::Lunch).await?;
    let newest = feed(&store, tom.id, "2024-02-15", Meal::Lunch).await?;
    let oldest = feed(&store, tom.id, "2023-12-31", Meal::Lunch).await?;
    // same date: the later row wins
    let second = feed(&store, tom.id, "2024-01-01", Meal::Dinner).await?;

    let ids: Vec<i64> = store.feedings_for_cat(tom.id).await?.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![newest.id, second.id, first.id, oldest.id]);

    Repository::<Cat>::delete_by_id(&store, tom.id).await?;
    Ok(())
}
