//! Client-side timeline store.
//!
//! Holds everything a gallery front-end renders: the moment list, the
//! filtered view, the open detail view and collection panel, and the
//! in-flight flags that disable each action's trigger while it runs.
//! Front-ends call the async operations and redraw on `TimelineEvent`s.
//!
//! State lives behind a `tokio::sync::RwLock`; no lock is held across a
//! backend call, so other reads stay responsive while a request is pending.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

use super::backend::TimelineBackend;
use super::form::MomentDraft;
use super::stats::TimelineStats;
use crate::models::{Collection, Moment, NewMoment};
use crate::Result;

/// Channel capacity for store events.
const CHANNEL_CAPACITY: usize = 256;

// ============================================================================
// Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Transient user-facing notification (a toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TimelineEvent {
    /// State changed; take a fresh snapshot.
    StateChanged,
    Notice(Notice),
    /// A moment was just created; bring the gallery into view.
    ScrollToGallery,
}

// ============================================================================
// State
// ============================================================================

/// Collection picker for one moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipPanel {
    pub moment_id: String,
    pub collection_ids: HashSet<String>,
}

impl MembershipPanel {
    pub fn contains(&self, collection_id: &str) -> bool {
        self.collection_ids.contains(collection_id)
    }
}

#[derive(Debug, Clone)]
pub struct TimelineState {
    /// Every moment, newest first.
    pub moments: Vec<Moment>,
    /// Moments shown under the current collection filter.
    pub visible: Vec<Moment>,
    pub loading: bool,
    /// Moment open in the detail view.
    pub selected_moment: Option<Moment>,
    /// Active collection filter; `None` shows everything.
    pub selected_collection: Option<String>,
    pub collections: Vec<Collection>,
    pub collections_count: i64,
    pub generating: bool,
    /// Moment whose delete is in flight.
    pub deleting: Option<String>,
    /// Last generation failure, shown under the form.
    pub form_error: Option<String>,
    pub membership_panel: Option<MembershipPanel>,
    /// (moment, collection) pairs with a membership change in flight.
    pub pending_memberships: HashSet<(String, String)>,
    /// Member ids of the selected collection once fetched.
    collection_members: Option<HashSet<String>>,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self {
            moments: Vec::new(),
            visible: Vec::new(),
            loading: true,
            selected_moment: None,
            selected_collection: None,
            collections: Vec::new(),
            collections_count: 0,
            generating: false,
            deleting: None,
            form_error: None,
            membership_panel: None,
            pending_memberships: HashSet::new(),
            collection_members: None,
        }
    }
}

impl TimelineState {
    /// Recompute `visible` from `moments` and the collection filter.
    ///
    /// While a selected collection's members are still loading the
    /// previous view is kept.
    fn refilter(&mut self) {
        match (&self.selected_collection, &self.collection_members) {
            (None, _) => self.visible = self.moments.clone(),
            (Some(_), Some(members)) => {
                self.visible = self
                    .moments
                    .iter()
                    .filter(|m| members.contains(&m.id))
                    .cloned()
                    .collect();
            }
            (Some(_), None) => {}
        }
    }

    fn remove_moment(&mut self, id: &str) {
        self.moments.retain(|m| m.id != id);
        // refilter keeps the old view while members are unresolved
        self.visible.retain(|m| m.id != id);
        if let Some(members) = self.collection_members.as_mut() {
            members.remove(id);
        }
        if self
            .membership_panel
            .as_ref()
            .is_some_and(|panel| panel.moment_id == id)
        {
            self.membership_panel = None;
        }
        self.selected_moment = None;
        self.refilter();
    }

    fn apply_membership(&mut self, moment_id: &str, collection_id: &str, present: bool) {
        if let Some(panel) = self
            .membership_panel
            .as_mut()
            .filter(|panel| panel.moment_id == moment_id)
        {
            if present {
                panel.collection_ids.insert(collection_id.to_string());
            } else {
                panel.collection_ids.remove(collection_id);
            }
        }

        if self.selected_collection.as_deref() == Some(collection_id) {
            if let Some(members) = self.collection_members.as_mut() {
                if present {
                    members.insert(moment_id.to_string());
                } else {
                    members.remove(moment_id);
                }
            }
            self.refilter();
        }
    }
}

// ============================================================================
// Store
// ============================================================================

/// Observable gallery state plus the operations that mutate it.
#[derive(Clone)]
pub struct TimelineStore {
    backend: Arc<dyn TimelineBackend>,
    state: Arc<RwLock<TimelineState>>,
    events: broadcast::Sender<TimelineEvent>,
}

impl TimelineStore {
    pub fn new(backend: Arc<dyn TimelineBackend>) -> Self {
        let (events, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            backend,
            state: Arc::new(RwLock::new(TimelineState::default())),
            events,
        }
    }

    /// Subscribe to state changes and notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<TimelineEvent> {
        self.events.subscribe()
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> TimelineState {
        self.state.read().await.clone()
    }

    pub async fn stats(&self) -> TimelineStats {
        let state = self.state.read().await;
        TimelineStats::compute(&state.moments, state.collections_count, Utc::now())
    }

    fn emit(&self, event: TimelineEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn notify(&self, level: NoticeLevel, message: &str) {
        self.emit(TimelineEvent::Notice(Notice {
            level,
            message: message.to_string(),
        }));
    }

    /// Mutate state, then announce the change.
    async fn update<R>(&self, f: impl FnOnce(&mut TimelineState) -> R) -> R {
        let result = {
            let mut state = self.state.write().await;
            f(&mut state)
        };
        self.emit(TimelineEvent::StateChanged);
        result
    }

    // ------------------------------------------------------------------------
    // Loading and filtering
    // ------------------------------------------------------------------------

    /// Load moments, collections and the collection count.
    pub async fn load(&self) -> Result<()> {
        self.update(|s| s.loading = true).await;

        let result = match self.backend.list_moments().await {
            Ok(moments) => {
                self.update(|s| {
                    s.moments = moments;
                    s.refilter();
                })
                .await;
                Ok(())
            }
            Err(e) => {
                warn!("Fetch error: {}", e);
                self.notify(NoticeLevel::Error, "Failed to load moments");
                Err(e)
            }
        };

        self.refresh_collections().await;
        self.update(|s| s.loading = false).await;

        let selected = self.state.read().await.selected_collection.clone();
        if selected.is_some() {
            self.select_collection(selected).await?;
        }

        result
    }

    /// Reload the collection list and count. Failures keep the old values.
    async fn refresh_collections(&self) {
        match self.backend.list_collections().await {
            Ok(collections) => self.update(|s| s.collections = collections).await,
            Err(e) => warn!("Failed to load collections: {}", e),
        }
        match self.backend.count_collections().await {
            Ok(count) => self.update(|s| s.collections_count = count).await,
            Err(e) => warn!("Failed to count collections: {}", e),
        }
    }

    /// Filter the gallery by collection, or show everything with `None`.
    pub async fn select_collection(&self, collection_id: Option<String>) -> Result<()> {
        self.update(|s| {
            s.selected_collection = collection_id.clone();
            s.collection_members = None;
            s.refilter();
        })
        .await;

        let Some(collection_id) = collection_id else {
            return Ok(());
        };

        let ids = self
            .backend
            .list_collection_moment_ids(&collection_id)
            .await
            .map_err(|e| {
                warn!(collection_id = %collection_id, "Failed to load collection members: {}", e);
                e
            })?;

        self.update(|s| {
            // Another selection may have happened while this one loaded
            if s.selected_collection.as_deref() == Some(collection_id.as_str()) {
                s.collection_members = Some(ids.into_iter().collect());
                s.refilter();
            } else {
                debug!(collection_id = %collection_id, "Discarding stale collection members");
            }
        })
        .await;

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Creating and deleting moments
    // ------------------------------------------------------------------------

    /// Generate and store a moment from the draft.
    ///
    /// Returns `Ok(None)` without doing anything when the draft is blank or
    /// a generation is already running. On success the draft's description
    /// is cleared.
    pub async fn submit(&self, draft: &mut MomentDraft) -> Result<Option<Moment>> {
        if !draft.is_submittable() {
            return Ok(None);
        }

        let started = self
            .update(|s| {
                if s.generating {
                    return false;
                }
                s.generating = true;
                s.form_error = None;
                true
            })
            .await;
        if !started {
            return Ok(None);
        }

        let request = draft.to_request();
        let image_url = match self.backend.generate_image(&request).await {
            Ok(url) => url,
            Err(e) => {
                let message = e.to_string();
                self.update(|s| {
                    s.generating = false;
                    s.form_error = Some(message);
                })
                .await;
                return Err(e);
            }
        };

        let new_moment = NewMoment {
            user_description: request.description,
            moment_type: draft.moment_type,
            cinematic_style: draft.cinematic_style,
            image_url,
            tags: None,
        };

        match self.backend.insert_moment(new_moment).await {
            Ok(moment) => {
                self.update(|s| {
                    s.generating = false;
                    s.moments.insert(0, moment.clone());
                    s.refilter();
                })
                .await;
                draft.clear_description();
                self.notify(NoticeLevel::Success, "Moment created successfully");
                self.emit(TimelineEvent::ScrollToGallery);
                Ok(Some(moment))
            }
            Err(e) => {
                warn!("Save error: {}", e);
                self.update(|s| s.generating = false).await;
                self.notify(NoticeLevel::Error, "Failed to save moment");
                Err(e)
            }
        }
    }

    /// Delete a moment and drop it from every view.
    ///
    /// Returns `Ok(false)` when another delete is still in flight.
    pub async fn delete_moment(&self, id: &str) -> Result<bool> {
        let started = self
            .update(|s| {
                if s.deleting.is_some() {
                    return false;
                }
                s.deleting = Some(id.to_string());
                true
            })
            .await;
        if !started {
            return Ok(false);
        }

        match self.backend.delete_moment(id).await {
            Ok(()) => {
                self.update(|s| {
                    s.deleting = None;
                    s.remove_moment(id);
                })
                .await;
                self.notify(NoticeLevel::Success, "Moment deleted");
                Ok(true)
            }
            Err(e) => {
                warn!("Delete error: {}", e);
                self.update(|s| s.deleting = None).await;
                self.notify(NoticeLevel::Error, "Failed to delete moment");
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Detail view
    // ------------------------------------------------------------------------

    /// Open the detail view. Returns false for an unknown moment.
    pub async fn open_moment(&self, id: &str) -> bool {
        self.update(|s| {
            s.selected_moment = s.moments.iter().find(|m| m.id == id).cloned();
            s.selected_moment.is_some()
        })
        .await
    }

    pub async fn close_moment(&self) {
        self.update(|s| s.selected_moment = None).await;
    }

    // ------------------------------------------------------------------------
    // Collections
    // ------------------------------------------------------------------------

    /// Create a collection. A blank name is ignored.
    pub async fn create_collection(&self, name: &str) -> Result<Option<Collection>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        match self.backend.create_collection(name, None).await {
            Ok(collection) => {
                self.notify(NoticeLevel::Success, "Collection created");
                self.refresh_collections().await;
                Ok(Some(collection))
            }
            Err(e) => {
                warn!("Create collection error: {}", e);
                self.notify(NoticeLevel::Error, "Failed to create collection");
                Err(e)
            }
        }
    }

    /// Open the collection picker for a moment.
    pub async fn open_membership_panel(&self, moment_id: &str) -> Result<()> {
        let collections = self.backend.list_collections().await?;
        let ids = self.backend.list_moment_collection_ids(moment_id).await?;

        self.update(|s| {
            s.collections = collections;
            s.membership_panel = Some(MembershipPanel {
                moment_id: moment_id.to_string(),
                collection_ids: ids.into_iter().collect(),
            });
        })
        .await;

        Ok(())
    }

    pub async fn close_membership_panel(&self) {
        self.update(|s| s.membership_panel = None).await;
    }

    /// Put a moment in a collection or take it out.
    ///
    /// Stating the wanted end state makes repeated calls converge. Returns
    /// `Ok(false)` when a change for the same pair is still in flight.
    pub async fn set_membership(
        &self,
        moment_id: &str,
        collection_id: &str,
        present: bool,
    ) -> Result<bool> {
        let key = (moment_id.to_string(), collection_id.to_string());
        let started = self
            .update(|s| s.pending_memberships.insert(key.clone()))
            .await;
        if !started {
            return Ok(false);
        }

        let result = self
            .backend
            .set_membership(moment_id, collection_id, present)
            .await;

        self.update(|s| {
            s.pending_memberships.remove(&key);
            if result.is_ok() {
                s.apply_membership(moment_id, collection_id, present);
            }
        })
        .await;

        match (result, present) {
            (Ok(_), true) => {
                self.notify(NoticeLevel::Success, "Added to collection");
                Ok(true)
            }
            (Ok(_), false) => {
                self.notify(NoticeLevel::Success, "Removed from collection");
                Ok(true)
            }
            (Err(e), true) => {
                warn!("Add to collection error: {}", e);
                self.notify(NoticeLevel::Error, "Failed to add to collection");
                Err(e)
            }
            (Err(e), false) => {
                warn!("Remove from collection error: {}", e);
                self.notify(NoticeLevel::Error, "Failed to remove from collection");
                Err(e)
            }
        }
    }

    /// Flip a moment's membership in a collection.
    ///
    /// The current state comes from the open panel for this moment, or from
    /// the backend when no such panel is open.
    pub async fn toggle_membership(&self, moment_id: &str, collection_id: &str) -> Result<bool> {
        let known = self
            .state
            .read()
            .await
            .membership_panel
            .as_ref()
            .filter(|panel| panel.moment_id == moment_id)
            .map(|panel| panel.contains(collection_id));

        let is_member = match known {
            Some(is_member) => is_member,
            None => self.backend.is_member(moment_id, collection_id).await?,
        };

        self.set_membership(moment_id, collection_id, !is_member)
            .await
    }
}
