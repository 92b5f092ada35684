//! Generic object pool with active/inactive lifecycle tracking
//!
//! Entities are created once and recycled instead of being rebuilt on every
//! spawn. The pool never stores the active/inactive split itself: it is
//! derived from each entity's own `is_active()` flag, so the two views always
//! form a true partition of the pooled set.
//!
//! Scan order is creation order. `acquire` always reuses the oldest inactive
//! entity before growing, and growth appends exactly one entity.

use thiserror::Error;

use super::entity::EntityId;

/// An entity that can live in a [`Pool`]
pub trait Poolable {
    fn id(&self) -> EntityId;
    fn is_active(&self) -> bool;
}

/// Collaborator that owns the construction and state changes of pooled entities
///
/// `activate` and `deactivate` are the only places an entity's active flag
/// should change. `deactivate` may be called on an already inactive entity and
/// must tolerate it.
pub trait PoolLifecycle<T> {
    type Error: std::error::Error + 'static;

    fn create(&mut self) -> Result<T, Self::Error>;
    fn activate(&mut self, item: &mut T) -> Result<(), Self::Error>;
    fn deactivate(&mut self, item: &mut T) -> Result<(), Self::Error>;
    fn destroy(&mut self, item: T) -> Result<(), Self::Error>;
}

/// Pool errors
#[derive(Debug, Error)]
pub enum PoolError<E: std::error::Error + 'static> {
    /// The entity was never handed out by this pool
    #[error("entity {0} does not belong to this pool")]
    NotOwned(EntityId),

    /// A lifecycle callback failed
    #[error("pool lifecycle callback failed: {0}")]
    Lifecycle(#[source] E),
}

/// Growable pool of reusable entities
#[derive(Debug)]
pub struct Pool<T, L> {
    /// Entities in creation order
    items: Vec<T>,
    lifecycle: L,
    initial_capacity: usize,
    growth_count: usize,
}

impl<T, L> Pool<T, L>
where
    T: Poolable,
    L: PoolLifecycle<T>,
{
    /// Build a pool with `initial_capacity` parked entities
    pub fn new(mut lifecycle: L, initial_capacity: usize) -> Result<Self, PoolError<L::Error>> {
        let mut items = Vec::with_capacity(initial_capacity);

        if let Err(e) = Self::fill(&mut lifecycle, &mut items, initial_capacity) {
            // Hand back what was already built before failing
            for item in items.drain(..) {
                let id = item.id();
                if let Err(cleanup) = lifecycle.destroy(item) {
                    log::warn!("Failed to destroy {} during pool rollback: {}", id, cleanup);
                }
            }
            return Err(PoolError::Lifecycle(e));
        }

        log::debug!("Pool created with {} entities", items.len());

        Ok(Self {
            items,
            lifecycle,
            initial_capacity,
            growth_count: 0,
        })
    }

    fn fill(lifecycle: &mut L, items: &mut Vec<T>, count: usize) -> Result<(), L::Error> {
        for _ in 0..count {
            let mut item = lifecycle.create()?;
            let parked = lifecycle.deactivate(&mut item);
            items.push(item);
            parked?;
        }
        Ok(())
    }

    /// Activate and return the first inactive entity, growing by one if none is free
    pub fn acquire(&mut self) -> Result<&mut T, PoolError<L::Error>> {
        let index = match self.items.iter().position(|item| !item.is_active()) {
            Some(index) => index,
            None => {
                let item = self.lifecycle.create().map_err(PoolError::Lifecycle)?;
                self.items.push(item);
                self.growth_count += 1;
                log::debug!(
                    "Pool grew to {} entities (growth #{})",
                    self.items.len(),
                    self.growth_count
                );
                self.items.len() - 1
            }
        };

        let item = &mut self.items[index];
        self.lifecycle
            .activate(item)
            .map_err(PoolError::Lifecycle)?;
        log::trace!("Acquired {}", item.id());
        Ok(item)
    }

    /// Park an entity for reuse
    pub fn release(&mut self, id: EntityId) -> Result<(), PoolError<L::Error>> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or(PoolError::NotOwned(id))?;

        self.lifecycle
            .deactivate(item)
            .map_err(PoolError::Lifecycle)?;
        log::trace!("Released {}", id);
        Ok(())
    }

    /// Destroy every pooled entity, leaving the pool empty
    ///
    /// All entities are discarded even when a destroy call fails; the first
    /// failure is returned.
    pub fn clear(&mut self) -> Result<(), PoolError<L::Error>> {
        let mut first_error = None;

        for item in self.items.drain(..) {
            if let Err(e) = self.lifecycle.destroy(item) {
                first_error.get_or_insert(e);
            }
        }

        log::debug!("Pool cleared");

        match first_error {
            Some(e) => Err(PoolError::Lifecycle(e)),
            None => Ok(()),
        }
    }
}

impl<T, L> Pool<T, L>
where
    T: Poolable,
{
    /// Active entities in creation order
    pub fn active(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|item| item.is_active())
    }

    /// Inactive entities in creation order
    pub fn inactive(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|item| !item.is_active())
    }

    /// Mutable access to active entities (owner-only adjustments such as freezing)
    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut().filter(|item| item.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn inactive_count(&self) -> usize {
        self.inactive().count()
    }

    /// All entities in creation order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Current number of pooled entities
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// How many times `acquire` had to create a new entity
    pub fn growth_count(&self) -> usize {
        self.growth_count
    }

    pub fn lifecycle(&self) -> &L {
        &self.lifecycle
    }
}
