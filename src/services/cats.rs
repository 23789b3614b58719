use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::database::models::{Cat, Feeding, Meal, Toy};
use crate::database::{Repository, Scope, Store};
use crate::forms::{CatChanges, CatFields, CatForm, CatUpdateForm, FeedingForm, Validate};
use crate::middleware::AuthUser;

use super::{CrudHandler, OwnershipPolicy, Resource, ServiceError, ServiceResult};

impl Resource for Cat {
    const NAME: &'static str = "Cat";

    type CreateForm = CatForm;
    type UpdateForm = CatUpdateForm;

    fn id(&self) -> i64 {
        self.id
    }

    fn owner_id(&self) -> Option<i64> {
        Some(self.owner_id)
    }

    fn from_create(fields: CatFields, actor: &AuthUser) -> Self {
        Cat {
            id: 0,
            name: fields.name,
            breed: fields.breed,
            description: fields.description,
            age: fields.age,
            owner_id: actor.id,
        }
    }

    fn apply_update(&mut self, changes: CatChanges) {
        self.breed = changes.breed;
        self.description = changes.description;
        self.age = changes.age;
    }

    fn scope(actor: &AuthUser) -> Scope {
        Scope::OwnedBy(actor.id)
    }
}

/// Everything the cat detail page shows
#[derive(Debug, Clone, Serialize)]
pub struct CatDetail {
    pub cat: Cat,
    pub feedings: Vec<Feeding>,
    pub fed_for_today: bool,
    pub toys: Vec<Toy>,
    pub available_toys: Vec<Toy>,
}

/// Cat CRUD plus the cat's feedings and toy associations
pub struct CatService {
    store: Arc<dyn Store>,
    cats: CrudHandler<Cat, dyn Store>,
}

impl CatService {
    pub fn new(store: Arc<dyn Store>, policy: OwnershipPolicy) -> Self {
        Self {
            cats: CrudHandler::new(store.clone(), policy),
            store,
        }
    }

    pub async fn list_for_user(&self, actor: &AuthUser) -> ServiceResult<Vec<Cat>> {
        self.cats.list(actor).await
    }

    pub async fn get(&self, actor: &AuthUser, cat_id: i64) -> ServiceResult<Cat> {
        self.cats.get(actor, cat_id).await
    }

    pub async fn detail(&self, actor: &AuthUser, cat_id: i64) -> ServiceResult<CatDetail> {
        let cat = self.cats.get(actor, cat_id).await?;
        let feedings = self.store.feedings_for_cat(cat_id).await?;
        let toys = self.store.toys_for_cat(cat_id).await?;
        let all_toys = Repository::<Toy>::list(&*self.store, Scope::All).await?;

        Ok(CatDetail {
            fed_for_today: fed_on(&feedings, Utc::now().date_naive()),
            available_toys: toys_not_in(all_toys, &toys),
            cat,
            feedings,
            toys,
        })
    }

    pub async fn create(&self, actor: &AuthUser, form: &CatForm) -> ServiceResult<Cat> {
        self.cats.create(actor, form).await
    }

    pub async fn update(&self, actor: &AuthUser, cat_id: i64, form: &CatUpdateForm) -> ServiceResult<Cat> {
        self.cats.update(actor, cat_id, form).await
    }

    /// Feedings and toy associations go with the cat
    pub async fn delete(&self, actor: &AuthUser, cat_id: i64) -> ServiceResult<()> {
        self.cats.delete(actor, cat_id).await
    }

    pub async fn toys(&self, actor: &AuthUser, cat_id: i64) -> ServiceResult<Vec<Toy>> {
        self.cats.get(actor, cat_id).await?;
        Ok(self.store.toys_for_cat(cat_id).await?)
    }

    /// All toys minus the ones the cat already has
    pub async fn toys_not_on_cat(&self, actor: &AuthUser, cat_id: i64) -> ServiceResult<Vec<Toy>> {
        let owned = self.toys(actor, cat_id).await?;
        let all_toys = Repository::<Toy>::list(&*self.store, Scope::All).await?;
        Ok(toys_not_in(all_toys, &owned))
    }

    pub async fn associate_toy(&self, actor: &AuthUser, cat_id: i64, toy_id: i64) -> ServiceResult<()> {
        self.cats.get(actor, cat_id).await?;
        Repository::<Toy>::get_by_id(&*self.store, toy_id).await?;
        self.store.add_toy(cat_id, toy_id).await?;
        tracing::info!("User {} gave toy {} to cat {}", actor.id, toy_id, cat_id);
        Ok(())
    }

    pub async fn disassociate_toy(&self, actor: &AuthUser, cat_id: i64, toy_id: i64) -> ServiceResult<()> {
        self.cats.get(actor, cat_id).await?;
        Repository::<Toy>::get_by_id(&*self.store, toy_id).await?;
        self.store.remove_toy(cat_id, toy_id).await?;
        tracing::info!("User {} took toy {} from cat {}", actor.id, toy_id, cat_id);
        Ok(())
    }

    pub async fn feedings(&self, actor: &AuthUser, cat_id: i64) -> ServiceResult<Vec<Feeding>> {
        self.cats.get(actor, cat_id).await?;
        Ok(self.store.feedings_for_cat(cat_id).await?)
    }

    /// The cat always comes from `cat_id`; the form carries only date and meal
    pub async fn add_feeding(&self, actor: &AuthUser, cat_id: i64, form: &FeedingForm) -> ServiceResult<Feeding> {
        self.cats.get(actor, cat_id).await?;
        let fields = form.validate().map_err(ServiceError::Validation)?;
        let feeding = self
            .store
            .add_feeding(Feeding {
                id: 0,
                date: fields.date,
                meal: fields.meal,
                cat_id,
            })
            .await?;
        tracing::info!("User {} logged {} for cat {} on {}", actor.id, feeding.meal, cat_id, feeding.date);
        Ok(feeding)
    }
}

fn toys_not_in(all_toys: Vec<Toy>, owned: &[Toy]) -> Vec<Toy> {
    let owned: HashSet<i64> = owned.iter().map(|toy| toy.id).collect();
    all_toys.into_iter().filter(|toy| !owned.contains(&toy.id)).collect()
}

/// True when every meal has been logged for `day`
pub fn fed_on(feedings: &[Feeding], day: NaiveDate) -> bool {
    let meals: HashSet<Meal> = feedings.iter().filter(|f| f.date == day).map(|f| f.meal).collect();
    Meal::ALL.iter().all(|meal| meals.contains(meal))
}
