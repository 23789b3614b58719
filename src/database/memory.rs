//! In-memory store used by the test suite and by `serve --memory`.
//!
//! All tables live behind one `tokio::sync::Mutex`, so every operation sees
//! a consistent snapshot and cascades happen atomically.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::{Mutex, MutexGuard};

use crate::database::models::{Cat, Feeding, NewUser, Toy, User};
use crate::database::repository::{
    CatToyRepository, FeedingRepository, Repository, RepositoryError, Scope, Store, UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    cats: BTreeMap<i64, Cat>,
    toys: BTreeMap<i64, Toy>,
    feedings: BTreeMap<i64, Feeding>,
    cats_toys: BTreeSet<(i64, i64)>,
}

impl Tables {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn acquire_lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().await
    }
}

#[async_trait]
impl Repository<Cat> for InMemoryStore {
    async fn create(&self, mut cat: Cat) -> Result<Cat, RepositoryError> {
        let mut tables = self.acquire_lock().await;
        if !tables.users.contains_key(&cat.owner_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "Owner {} does not exist",
                cat.owner_id
            )));
        }
        cat.id = tables.assign_id();
        tables.cats.insert(cat.id, cat.clone());
        Ok(cat)
    }

    async fn get_by_id(&self, id: i64) -> Result<Cat, RepositoryError> {
        let tables = self.acquire_lock().await;
        tables
            .cats
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Cat with ID {} not found", id)))
    }

    async fn list(&self, scope: Scope) -> Result<Vec<Cat>, RepositoryError> {
        let tables = self.acquire_lock().await;
        let cats = tables
            .cats
            .values()
            .filter(|cat| match scope {
                Scope::All => true,
                Scope::OwnedBy(owner_id) => cat.owner_id == owner_id,
            })
            .cloned()
            .collect();
        Ok(cats)
    }

    async fn update(&self, cat: Cat) -> Result<Cat, RepositoryError> {
        let mut tables = self.acquire_lock().await;
        let stored = tables
            .cats
            .get_mut(&cat.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Cat with ID {} not found", cat.id)))?;
        // name and owner_id are immutable once stored
        stored.breed = cat.breed;
        stored.description = cat.description;
        stored.age = cat.age;
        Ok(stored.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tables = self.acquire_lock().await;
        if tables.cats.remove(&id).is_none() {
            return Err(RepositoryError::NotFound(format!("Cat with ID {} not found", id)));
        }
        tables.feedings.retain(|_, feeding| feeding.cat_id != id);
        tables.cats_toys.retain(|(cat_id, _)| *cat_id != id);
        Ok(())
    }
}

#[async_trait]
impl Repository<Toy> for InMemoryStore {
    async fn create(&self, mut toy: Toy) -> Result<Toy, RepositoryError> {
        let mut tables = self.acquire_lock().await;
        toy.id = tables.assign_id();
        tables.toys.insert(toy.id, toy.clone());
        Ok(toy)
    }

    async fn get_by_id(&self, id: i64) -> Result<Toy, RepositoryError> {
        let tables = self.acquire_lock().await;
        tables
            .toys
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("Toy with ID {} not found", id)))
    }

    async fn list(&self, _scope: Scope) -> Result<Vec<Toy>, RepositoryError> {
        let tables = self.acquire_lock().await;
        Ok(tables.toys.values().cloned().collect())
    }

    async fn update(&self, toy: Toy) -> Result<Toy, RepositoryError> {
        let mut tables = self.acquire_lock().await;
        let stored = tables
            .toys
            .get_mut(&toy.id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Toy with ID {} not found", toy.id)))?;
        *stored = toy;
        Ok(stored.clone())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tables = self.acquire_lock().await;
        if tables.toys.remove(&id).is_none() {
            return Err(RepositoryError::NotFound(format!("Toy with ID {} not found", id)));
        }
        tables.cats_toys.retain(|(_, toy_id)| *toy_id != id);
        Ok(())
    }
}

#[async_trait]
impl CatToyRepository for InMemoryStore {
    async fn toys_for_cat(&self, cat_id: i64) -> Result<Vec<Toy>, RepositoryError> {
        let tables = self.acquire_lock().await;
        let toys = tables
            .cats_toys
            .iter()
            .filter(|(c, _)| *c == cat_id)
            .filter_map(|(_, toy_id)| tables.toys.get(toy_id).cloned())
            .collect();
        Ok(toys)
    }

    async fn cats_for_toy(&self, toy_id: i64) -> Result<Vec<Cat>, RepositoryError> {
        let tables = self.acquire_lock().await;
        let cats = tables
            .cats_toys
            .iter()
            .filter(|(_, t)| *t == toy_id)
            .filter_map(|(cat_id, _)| tables.cats.get(cat_id).cloned())
            .collect();
        Ok(cats)
    }

    async fn add_toy(&self, cat_id: i64, toy_id: i64) -> Result<(), RepositoryError> {
        let mut tables = self.acquire_lock().await;
        if !tables.cats.contains_key(&cat_id) || !tables.toys.contains_key(&toy_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "Cannot associate cat {} with toy {}",
                cat_id, toy_id
            )));
        }
        tables.cats_toys.insert((cat_id, toy_id));
        Ok(())
    }

    async fn remove_toy(&self, cat_id: i64, toy_id: i64) -> Result<(), RepositoryError> {
        let mut tables = self.acquire_lock().await;
        tables.cats_toys.remove(&(cat_id, toy_id));
        Ok(())
    }
}

#[async_trait]
impl FeedingRepository for InMemoryStore {
    async fn add_feeding(&self, mut feeding: Feeding) -> Result<Feeding, RepositoryError> {
        let mut tables = self.acquire_lock().await;
        if !tables.cats.contains_key(&feeding.cat_id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "Cat {} does not exist",
                feeding.cat_id
            )));
        }
        feeding.id = tables.assign_id();
        tables.feedings.insert(feeding.id, feeding.clone());
        Ok(feeding)
    }

    async fn feedings_for_cat(&self, cat_id: i64) -> Result<Vec<Feeding>, RepositoryError> {
        let tables = self.acquire_lock().await;
        let mut feedings: Vec<Feeding> = tables
            .feedings
            .values()
            .filter(|feeding| feeding.cat_id == cat_id)
            .cloned()
            .collect();
        feedings.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(feedings)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.acquire_lock().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "Username {} already exists",
                user.username
            )));
        }
        let stored = User {
            id: tables.assign_id(),
            username: user.username,
            password_hash: user.password_hash,
            date_joined: Utc::now(),
        };
        tables.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.acquire_lock().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn get_user(&self, id: i64) -> Result<User, RepositoryError> {
        let tables = self.acquire_lock().await;
        tables
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("User with ID {} not found", id)))
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Breed, Meal};
    use chrono::NaiveDate;

    async fn seed_user(store: &InMemoryStore, name: &str) -> User {
        store
            .create_user(NewUser {
                username: name.to_string(),
                password_hash: "x".to_string(),
            })
            .await
            .unwrap()
    }

    fn cat(owner_id: i64, name: &str) -> Cat {
        Cat {
            id: 0,
            name: name.to_string(),
            breed: Breed::Tabby,
            description: String::new(),
            age: 2,
            owner_id,
        }
    }

    #[tokio::test]
    async fn delete_cat_cascades_feedings_and_toys() {
        let store = InMemoryStore::new();
        let owner = seed_user(&store, "alice").await;
        let tom = Repository::<Cat>::create(&store, cat(owner.id, "Tom")).await.unwrap();
        let mouse = Repository::<Toy>::create(
            &store,
            Toy { id: 0, name: "Mouse".into(), color: "grey".into() },
        )
        .await
        .unwrap();

        store.add_toy(tom.id, mouse.id).await.unwrap();
        store
            .add_feeding(Feeding {
                id: 0,
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                meal: Meal::Dinner,
                cat_id: tom.id,
            })
            .await
            .unwrap();

        Repository::<Cat>::delete_by_id(&store, tom.id).await.unwrap();

        assert!(store.feedings_for_cat(tom.id).await.unwrap().is_empty());
        assert!(store.cats_for_toy(mouse.id).await.unwrap().is_empty());
        // the toy itself survives
        assert!(Repository::<Toy>::get_by_id(&store, mouse.id).await.is_ok());
    }

    #[tokio::test]
    async fn update_keeps_name_and_owner() {
        let store = InMemoryStore::new();
        let owner = seed_user(&store, "alice").await;
        let tom = Repository::<Cat>::create(&store, cat(owner.id, "Tom")).await.unwrap();

        let mut changed = tom.clone();
        changed.name = "Jerry".into();
        changed.owner_id = 999;
        changed.age = 7;
        let stored = Repository::<Cat>::update(&store, changed).await.unwrap();

        assert_eq!(stored.name, "Tom");
        assert_eq!(stored.owner_id, owner.id);
        assert_eq!(stored.age, 7);
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = InMemoryStore::new();
        seed_user(&store, "alice").await;
        let err = store
            .create_user(NewUser { username: "alice".into(), password_hash: "y".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn feedings_list_newest_first() {
        let store = InMemoryStore::new();
        let owner = seed_user(&store, "alice").await;
        let tom = Repository::<Cat>::create(&store, cat(owner.id, "Tom")).await.unwrap();
        for day in [3, 1, 2] {
            store
                .add_feeding(Feeding {
                    id: 0,
                    date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                    meal: Meal::Lunch,
                    cat_id: tom.id,
                })
                .await
                .unwrap();
        }

        let days: Vec<u32> = store
            .feedings_for_cat(tom.id)
            .await
            .unwrap()
            .iter()
            .map(|f| chrono::Datelike::day(&f.date))
            .collect();
        assert_eq!(days, vec![3, 2, 1]);
    }
}
