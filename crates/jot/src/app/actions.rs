//! Journal actions
//!
//! Every action mutates the cache first, so the view updates immediately,
//! then persists the change. A failed write leaves the cache ahead of the
//! store until the next reconciliation corrects it.
//!
//! The key handler only queues [`Action`]s. One task performs them in
//! submission order and reports their outcome on the status channel, so the
//! UI loop never waits on the store.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use jot_core::{
    model::{
        bullet::{find, parent_of},
        flatten_rows, Bullet, CollectionMeta, Entry,
    },
    ReconcilingCache,
};
use tokio::sync::mpsc;

use super::types::{Action, AppContext};

/// Perform queued actions one at a time until every sender is gone
///
/// Writes keep going after the status receiver closes so nothing queued
/// before quitting is lost.
pub async fn run_actions(
    ctx: AppContext,
    mut actions: mpsc::Receiver<Action>,
    status: mpsc::Sender<String>,
) {
    while let Some(action) = actions.recv().await {
        tracing::debug!(?action, "performing action");
        if let Some(message) = perform(&ctx, action).await {
            let _ = status.send(message).await;
        }
    }
    tracing::debug!("action queue closed");
}

/// Perform one action, returning the status text it leaves behind
pub async fn perform(ctx: &AppContext, action: Action) -> Option<String> {
    let outcome = match action {
        Action::AddBullet {
            collection,
            parent_id,
            label,
        } => add_bullet(ctx, &collection, parent_id.as_deref(), &label)
            .await
            .map(|_| None),
        Action::AddCollection { name } => add_collection(ctx, &name).await.map(|_| None),
        Action::ToggleBullet { collection, id } => {
            toggle_bullet(ctx, &collection, &id).await.map(|()| None)
        }
        Action::DeleteBullet { collection, id } => delete_bullet(ctx, &collection, &id)
            .await
            .map(|removed| Some(format!("deleted {removed} entries"))),
        Action::Refresh => refresh(ctx)
            .await
            .map(|events| Some(format!("refreshed ({events} changes)"))),
    };
    outcome.unwrap_or_else(|e| Some(format!("{e:#}")))
}

/// Add a bullet, top-level or under `parent_id`
///
/// # Errors
/// Returns error if the label is empty, the parent is gone, or the store
/// write fails
pub async fn add_bullet(
    ctx: &AppContext,
    collection: &str,
    parent_id: Option<&str>,
    label: &str,
) -> Result<String> {
    let bullet = Bullet {
        id: Some(uuid::Uuid::new_v4().to_string()),
        label: label.trim().to_string(),
        created_at: Some(Utc::now()),
        ..Bullet::default()
    };

    let id = match parent_id {
        Some(parent) => ctx
            .cache
            .create_child_bullet(collection, parent, bullet.clone())?
            .with_context(|| format!("entry {parent} no longer exists"))?,
        None => ctx.cache.create_bullet(collection, bullet.clone())?,
    };

    let entry = Entry::from_bullet(collection, parent_id.map(str::to_string), &bullet)
        .context("new entry has no id")?;
    ctx.store.store(&entry).await?;
    tracing::debug!(collection, id = %id, "added entry");
    Ok(id)
}

/// Flip a bullet between open and completed
///
/// # Errors
/// Returns error if the bullet is gone or the store write fails
pub async fn toggle_bullet(ctx: &AppContext, collection: &str, id: &str) -> Result<()> {
    let (mut bullet, parent) = locate(&ctx.cache, collection, id)?;
    bullet.kind = bullet.kind.toggled();

    if !ctx.cache.update_bullet(collection, &bullet)? {
        bail!("entry {id} no longer exists");
    }
    let entry = Entry::from_bullet(collection, parent, &bullet).context("entry has no id")?;
    ctx.store.store(&entry).await?;
    Ok(())
}

/// Delete a bullet and its sub-entries
///
/// # Errors
/// Returns error if any store delete fails
pub async fn delete_bullet(ctx: &AppContext, collection: &str, id: &str) -> Result<usize> {
    let (subtree, _) = locate(&ctx.cache, collection, id)?;
    let entries = flatten_rows(collection, std::slice::from_ref(&subtree));

    if !ctx.cache.delete_bullet(collection, id)? {
        return Ok(0);
    }
    for entry in &entries {
        ctx.store.delete(entry).await?;
    }
    tracing::debug!(collection, id, removed = entries.len(), "deleted entry");
    Ok(entries.len())
}

/// Create a collection
///
/// # Errors
/// Returns error if the name is empty or the catalog write fails
pub async fn add_collection(ctx: &AppContext, name: &str) -> Result<String> {
    let tree = ctx.cache.create_collection(CollectionMeta::generic(name))?;
    let meta = ctx.store.ensure_collection(name, None).await?;
    tracing::debug!(collection = %meta.name, collections = tree.len(), "added collection");
    Ok(meta.name)
}

/// Re-read the whole journal
///
/// # Errors
/// Returns error if the collection catalog cannot be read
pub async fn refresh(ctx: &AppContext) -> Result<usize> {
    ctx.sync.refresh().await.context("Failed to refresh journal")
}

/// Current copy of a bullet and its parent id
fn locate(
    cache: &ReconcilingCache,
    collection: &str,
    id: &str,
) -> Result<(Bullet, Option<String>)> {
    let section = cache
        .section(collection)
        .with_context(|| format!("collection {collection} is not loaded"))?;
    let bullet = find(&section.rows, id)
        .cloned()
        .with_context(|| format!("entry {id} no longer exists"))?;
    let parent = parent_of(&section.rows, id).flatten().map(str::to_string);
    Ok((bullet, parent))
}
