use std::marker::PhantomData;
use std::sync::Arc;

use crate::database::{Repository, Scope};
use crate::forms::Validate;
use crate::middleware::AuthUser;

use super::{OwnershipPolicy, ServiceError, ServiceResult};

/// An entity managed through [`CrudHandler`]: its forms (and so its
/// validation rules), how a create form becomes a record, how an update
/// form changes one, and who may see it.
pub trait Resource: Clone + Send + Sync + 'static {
    /// Display name used in messages and logs
    const NAME: &'static str;

    type CreateForm: Validate + Send + Sync;
    type UpdateForm: Validate + Send + Sync;

    fn id(&self) -> i64;

    /// `None` for shared records
    fn owner_id(&self) -> Option<i64>;

    /// Build an unsaved record; ownership comes from `actor`, never the form
    fn from_create(fields: <Self::CreateForm as Validate>::Output, actor: &AuthUser) -> Self;

    fn apply_update(&mut self, changes: <Self::UpdateForm as Validate>::Output);

    /// Rows of this kind `actor` may list
    fn scope(actor: &AuthUser) -> Scope;
}

/// Generic list/get/create/update/delete over any [`Resource`]
pub struct CrudHandler<E, R: ?Sized> {
    repo: Arc<R>,
    policy: OwnershipPolicy,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R> CrudHandler<E, R>
where
    E: Resource,
    R: Repository<E> + ?Sized,
{
    pub fn new(repo: Arc<R>, policy: OwnershipPolicy) -> Self {
        Self {
            repo,
            policy,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self, actor: &AuthUser) -> ServiceResult<Vec<E>> {
        Ok(self.repo.list(E::scope(actor)).await?)
    }

    pub async fn get(&self, actor: &AuthUser, id: i64) -> ServiceResult<E> {
        let record = self.repo.get_by_id(id).await?;
        self.policy.check(actor, &record)?;
        Ok(record)
    }

    pub async fn create(&self, actor: &AuthUser, form: &E::CreateForm) -> ServiceResult<E> {
        let fields = form.validate().map_err(ServiceError::Validation)?;
        let record = self.repo.create(E::from_create(fields, actor)).await?;
        tracing::info!("User {} created {} {}", actor.id, E::NAME, record.id());
        Ok(record)
    }

    /// Looks the record up first, so a missing id wins over a bad form
    pub async fn update(&self, actor: &AuthUser, id: i64, form: &E::UpdateForm) -> ServiceResult<E> {
        let mut record = self.get(actor, id).await?;
        let changes = form.validate().map_err(ServiceError::Validation)?;
        record.apply_update(changes);
        let record = self.repo.update(record).await?;
        tracing::info!("User {} updated {} {}", actor.id, E::NAME, id);
        Ok(record)
    }

    pub async fn delete(&self, actor: &AuthUser, id: i64) -> ServiceResult<()> {
        self.get(actor, id).await?;
        self.repo.delete_by_id(id).await?;
        tracing::info!("User {} deleted {} {}", actor.id, E::NAME, id);
        Ok(())
    }
}
