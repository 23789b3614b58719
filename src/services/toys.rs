use serde::Serialize;
use std::sync::Arc;

use crate::database::models::{Cat, Toy};
use crate::database::{Scope, Store};
use crate::forms::{ToyFields, ToyForm};
use crate::middleware::AuthUser;

use super::{CrudHandler, OwnershipPolicy, Resource, ServiceResult};

impl Resource for Toy {
    const NAME: &'static str = "Toy";

    type CreateForm = ToyForm;
    type UpdateForm = ToyForm;

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> Option<i64> {
        None
    }

    fn from_create(fields: ToyFields, _actor: &AuthUser) -> Self {
        Toy {
            id: 0,
            name: fields.name,
            color: fields.color,
        }
    }

    fn apply_update(&mut self, changes: ToyFields) {
        self.name = changes.name;
        self.color = changes.color;
    }

    fn scope(_actor: &AuthUser) -> Scope {
        Scope::All
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToyDetail {
    pub toy: Toy,
    /// Only the acting user's cats
    pub cats: Vec<Cat>,
}

/// Toys are shared: any signed-in user may create, edit or delete them
pub struct ToyService {
    store: Arc<dyn Store>,
    toys: CrudHandler<Toy, dyn Store>,
}

impl ToyService {
    pub fn new(store: Arc<dyn Store>, policy: OwnershipPolicy) -> Self {
        Self {
            toys: CrudHandler::new(store.clone(), policy),
            store,
        }
    }

    pub async fn list(&self, actor: &AuthUser) -> ServiceResult<Vec<Toy>> {
        self.toys.list(actor).await
    }

    pub async fn get(&self, actor: &AuthUser, toy_id: i64) -> ServiceResult<Toy> {
        self.toys.get(actor, toy_id).await
    }

    pub async fn detail(&self, actor: &AuthUser, toy_id: i64) -> ServiceResult<ToyDetail> {
        let toy = self.toys.get(actor, toy_id).await?;
        let cats = self
            .store
            .cats_for_toy(toy_id)
            .await?
            .into_iter()
            .filter(|cat| cat.owner_id == actor.id)
            .collect();
        Ok(ToyDetail { toy, cats })
    }

    pub async fn create(&self, actor: &AuthUser, form: &ToyForm) -> ServiceResult<Toy> {
        self.toys.create(actor, form).await
    }

    pub async fn update(&self, actor: &AuthUser, toy_id: i64, form: &ToyForm) -> ServiceResult<Toy> {
        self.toys.update(actor, toy_id, form).await
    }

    /// Also drops the toy from every cat that had it
    pub async fn delete(&self, actor: &AuthUser, toy_id: i64) -> ServiceResult<()> {
        self.toys.delete(actor, toy_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Breed, NewUser};
    use crate::database::{CatToyRepository, InMemoryStore, Repository, UserRepository};
    use crate::services::ServiceError;

    async fn user(store: &InMemoryStore, name: &str) -> AuthUser {
        let user = store
            .create_user(NewUser { username: name.into(), password_hash: "x".into() })
            .await
            .unwrap();
        AuthUser { id: user.id, username: user.username }
    }

    fn form(name: &str, color: &str) -> ToyForm {
        ToyForm { name: Some(name.into()), color: Some(color.into()) }
    }

    #[tokio::test]
    async fn toys_are_shared_between_users() {
        let store = Arc::new(InMemoryStore::new());
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let service = ToyService::new(store.clone(), OwnershipPolicy::Enforce);

        let mouse = service.create(&alice, &form("Mouse", "grey")).await.unwrap();
        let renamed = service.update(&bob, mouse.id, &form("Big Mouse", "white")).await.unwrap();

        assert_eq!(renamed.name, "Big Mouse");
        assert_eq!(service.list(&alice).await.unwrap(), vec![renamed]);
    }

    #[tokio::test]
    async fn detail_lists_only_the_actors_cats() {
        let store = Arc::new(InMemoryStore::new());
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let service = ToyService::new(store.clone(), OwnershipPolicy::Enforce);
        let mouse = service.create(&alice, &form("Mouse", "grey")).await.unwrap();

        for owner in [&alice, &bob] {
            let cat = Repository::<Cat>::create(
                &*store,
                Cat {
                    id: 0,
                    name: format!("{}'s cat", owner.username),
                    breed: Breed::Mixed,
                    description: String::new(),
                    age: 1,
                    owner_id: owner.id,
                },
            )
            .await
            .unwrap();
            store.add_toy(cat.id, mouse.id).await.unwrap();
        }

        let detail = service.detail(&alice, mouse.id).await.unwrap();
        assert_eq!(detail.cats.len(), 1);
        assert_eq!(detail.cats[0].owner_id, alice.id);
    }

    #[tokio::test]
    async fn missing_toys_are_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let alice = user(&store, "alice").await;
        let service = ToyService::new(store, OwnershipPolicy::Enforce);

        assert!(matches!(service.get(&alice, 12).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.delete(&alice, 12).await, Err(ServiceError::NotFound(_))));
    }
}
