//! Panel manager for Downbar.
//!
//! Owns the display item list and the set of active (still-progressing)
//! downloads, reconciles both against host snapshots, and drives a
//! self-rescheduling refresh loop over exactly the active set.
//!
//! All mutation happens on one consumer: the manager is either driven
//! directly (tests) or by `run` consuming a command channel fed by the
//! renderer's actions, host push notifications, and the poll timer.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::warn;
use url::Url;

use crate::classify::classify;
use crate::format;
use crate::host::{DownloadHost, HostEvent};
use crate::types::download::{DownloadDescriptor, DownloadId, DownloadQuery, DownloadRecord};
use crate::types::item::{ItemState, PanelItem};
use crate::types::settings::PanelConfig;

/// Unit of work processed by the manager's consumer loop.
#[derive(Debug)]
pub enum PanelCommand {
    /// Re-fetch the full listing from the host.
    Refresh,
    /// A push notification from the host subsystem.
    Host(HostEvent),
    /// The poll timer fired.
    Tick,
    Select(DownloadId),
    Open(DownloadId),
    Show(DownloadId),
    /// Pause, resume, or retry depending on the item's current state.
    ToggleState(DownloadId),
    Cancel(DownloadId),
    Erase(DownloadId),
    /// Erase every item that is neither in progress nor paused.
    ClearInactive,
}

/// Cloneable front door for the rendering layer: sends commands into the
/// manager loop and reads the published item snapshots.
#[derive(Clone)]
pub struct PanelHandle {
    commands: mpsc::UnboundedSender<PanelCommand>,
    items: watch::Receiver<Vec<PanelItem>>,
}

impl PanelHandle {
    pub fn refresh(&self) {
        let _ = self.commands.send(PanelCommand::Refresh);
    }

    pub fn host_event(&self, event: HostEvent) {
        let _ = self.commands.send(PanelCommand::Host(event));
    }

    pub fn select(&self, id: DownloadId) {
        let _ = self.commands.send(PanelCommand::Select(id));
    }

    pub fn open(&self, id: DownloadId) {
        let _ = self.commands.send(PanelCommand::Open(id));
    }

    pub fn show(&self, id: DownloadId) {
        let _ = self.commands.send(PanelCommand::Show(id));
    }

    pub fn toggle_state(&self, id: DownloadId) {
        let _ = self.commands.send(PanelCommand::ToggleState(id));
    }

    pub fn cancel(&self, id: DownloadId) {
        let _ = self.commands.send(PanelCommand::Cancel(id));
    }

    pub fn erase(&self, id: DownloadId) {
        let _ = self.commands.send(PanelCommand::Erase(id));
    }

    pub fn clear_inactive(&self) {
        let _ = self.commands.send(PanelCommand::ClearInactive);
    }

    /// Latest published snapshot of the display list.
    pub fn items(&self) -> Vec<PanelItem> {
        self.items.borrow().clone()
    }

    /// Watch channel carrying every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Vec<PanelItem>> {
        self.items.clone()
    }

    /// Source URL of an item, for the renderer to place on the clipboard.
    pub fn copy_link(&self, id: DownloadId) -> Option<String> {
        self.items
            .borrow()
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.url.clone())
    }
}

/// The download-state reconciliation engine.
pub struct PanelManager {
    host: Arc<dyn DownloadHost>,
    config: PanelConfig,
    items: Vec<PanelItem>,
    active: HashSet<DownloadId>,
    /// Pending poll timer; at most one exists at any time.
    tick_task: Option<JoinHandle<()>>,
    commands: mpsc::UnboundedSender<PanelCommand>,
    items_tx: watch::Sender<Vec<PanelItem>>,
    items_rx: watch::Receiver<Vec<PanelItem>>,
}

impl PanelManager {
    /// Creates a manager and the receiving end of its command channel.
    pub fn new(
        host: Arc<dyn DownloadHost>,
        config: PanelConfig,
    ) -> (Self, mpsc::UnboundedReceiver<PanelCommand>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (items_tx, items_rx) = watch::channel(Vec::new());
        let manager = Self {
            host,
            config,
            items: Vec::new(),
            active: HashSet::new(),
            tick_task: None,
            commands,
            items_tx,
            items_rx,
        };
        (manager, receiver)
    }

    /// Spawns the manager loop onto the runtime and returns its handle.
    /// The loop performs the initial listing before processing commands.
    pub fn spawn(host: Arc<dyn DownloadHost>, config: PanelConfig) -> PanelHandle {
        let (manager, receiver) = Self::new(host, config);
        let handle = manager.handle();
        tokio::spawn(manager.run(receiver));
        handle
    }

    pub fn handle(&self) -> PanelHandle {
        PanelHandle {
            commands: self.commands.clone(),
            items: self.items_rx.clone(),
        }
    }

    /// Consumer loop: the only place display state is mutated once spawned.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<PanelCommand>) {
        self.refresh().await;
        self.publish();
        while let Some(command) = commands.recv().await {
            self.handle_command(command).await;
        }
    }

    pub async fn handle_command(&mut self, command: PanelCommand) {
        match command {
            PanelCommand::Refresh => self.refresh().await,
            PanelCommand::Host(HostEvent::Created(record)) => self.handle_created(record).await,
            PanelCommand::Host(HostEvent::Changed { id }) => self.handle_changed(id).await,
            PanelCommand::Host(HostEvent::Erased { id }) => self.handle_erased(id),
            PanelCommand::Tick => self.handle_tick().await,
            PanelCommand::Select(id) => self.select(id),
            PanelCommand::Open(id) => self.open(id).await,
            PanelCommand::Show(id) => self.show(id).await,
            PanelCommand::ToggleState(id) => self.toggle_state(id).await,
            PanelCommand::Cancel(id) => self.cancel_download(id).await,
            PanelCommand::Erase(id) => self.erase_item(id).await,
            PanelCommand::ClearInactive => self.clear_inactive().await,
        }
        self.publish();
    }

    fn publish(&self) {
        let _ = self.items_tx.send(self.items.clone());
    }

    // === Queries ===

    pub fn items(&self) -> &[PanelItem] {
        &self.items
    }

    pub fn item(&self, id: DownloadId) -> Option<&PanelItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn is_active(&self, id: DownloadId) -> bool {
        self.active.contains(&id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether a poll timer is currently pending.
    pub fn is_polling(&self) -> bool {
        self.tick_task.is_some()
    }

    // === Initial listing & event ingestion ===

    /// Rebuilds the display list from the host's latest downloads.
    pub async fn refresh(&mut self) {
        let query = DownloadQuery::latest(self.config.listing_limit);
        let records = match self.host.search(&query).await {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "initial download listing failed");
                return;
            }
        };

        self.items = records.iter().map(|record| self.normalize(record)).collect();

        for record in &records {
            self.set_file_icon(record.id).await;
        }
        for record in records {
            if classify(&record) == ItemState::InProgress {
                self.activate(record.id).await;
            } else {
                self.prune_active(record.id);
            }
            self.apply_record(&record);
        }
    }

    /// A download appeared on the host: add it to the front of the list,
    /// request its icon, and start polling it if it is progressing.
    pub async fn handle_created(&mut self, record: DownloadRecord) {
        let item = self.normalize(&record);
        self.items.insert(0, item);
        self.set_file_icon(record.id).await;
        if classify(&record) == ItemState::InProgress {
            self.activate(record.id).await;
        } else {
            self.prune_active(record.id);
        }
    }

    /// The host reported a change. The payload is partial, so the full
    /// record is re-fetched before merging. A record that is progressing
    /// again (e.g. resumed outside this UI) re-enters the active set.
    pub async fn handle_changed(&mut self, id: DownloadId) {
        self.refresh_item(id).await;
        let progressing = self
            .item(id)
            .is_some_and(|item| item.state == ItemState::InProgress);
        if progressing {
            self.activate(id).await;
        }
    }

    /// Erasure is the only path that removes an item from the list.
    pub fn handle_erased(&mut self, id: DownloadId) {
        self.prune_active(id);
        self.items.retain(|item| item.id != id);
    }

    pub async fn handle_tick(&mut self) {
        self.tick_task = None;
        self.check_active().await;
    }

    // === Active download tracker ===

    /// Starts polling `id` if the host still knows it. A stale id is a
    /// no-op; repeated calls never duplicate the timer.
    pub async fn activate(&mut self, id: DownloadId) {
        if self.active.contains(&id) {
            return;
        }
        if self.lookup(id).await.is_some() {
            self.active.insert(id);
            self.check_active().await;
        }
    }

    /// Stops polling `id`, then triggers one final merge so the display
    /// reflects the terminal state it is no longer polled for.
    pub async fn deactivate(&mut self, id: DownloadId) {
        self.prune_active(id);
        self.refresh_item(id).await;
    }

    /// Removes `id` from the active set and disarms the timer once the set
    /// is empty. Idempotent.
    fn prune_active(&mut self, id: DownloadId) {
        self.active.remove(&id);
        if self.active.is_empty() {
            if let Some(task) = self.tick_task.take() {
                task.abort();
            }
        }
    }

    /// The scheduler: refreshes every active download and arms exactly one
    /// timer for the next pass. Cancelling the prior timer first makes
    /// repeated invocations idempotent; an empty active set is the idle
    /// state and leaves no timer armed.
    pub async fn check_active(&mut self) {
        if let Some(task) = self.tick_task.take() {
            task.abort();
        }
        if self.active.is_empty() {
            return;
        }

        let ids: Vec<DownloadId> = self.active.iter().copied().collect();
        for id in ids {
            self.refresh_item(id).await;
        }

        // Everything may have finished during the pass above.
        if self.active.is_empty() {
            return;
        }
        self.schedule_tick();
    }

    fn schedule_tick(&mut self) {
        let commands = self.commands.clone();
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        self.tick_task = Some(tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            let _ = commands.send(PanelCommand::Tick);
        }));
    }

    // === Record normalizer ===

    /// Builds a display-ready item from a raw host record.
    fn normalize(&self, record: &DownloadRecord) -> PanelItem {
        let state = classify(record);
        let now_ms = Utc::now().timestamp_millis();
        let remaining = format::remaining_seconds(record.estimated_end_time, now_ms);

        PanelItem {
            id: record.id,
            url: record.url.clone(),
            file_name: file_name_of(&record.filename),
            file_path: record.filename.clone(),
            hostname: hostname_of(&record.url),
            state,
            size: format::file_size(record.bytes_received as i64),
            percentage: format::percentage(record.bytes_received, record.total_bytes),
            date_time: format::date_time(record.start_time),
            remaining: format::remaining_time(state, remaining),
            speed: format::transfer_speed(
                state,
                remaining,
                record.bytes_received,
                record.total_bytes,
            ),
            state_button_text: state.button_label().to_string(),
            in_progress: matches!(state, ItemState::Paused | ItemState::InProgress),
            icon_url: None,
            selected: false,
        }
    }

    // === Update merger ===

    /// Re-fetches the record for `id` and merges it into the display item.
    /// A lookup miss prunes the id from the active set and leaves the item
    /// as-is.
    pub async fn refresh_item(&mut self, id: DownloadId) {
        if let Some(record) = self.lookup(id).await {
            self.apply_record(&record);
        }
    }

    async fn lookup(&mut self, id: DownloadId) -> Option<DownloadRecord> {
        match self.host.search(&DownloadQuery::by_id(id)).await {
            Ok(mut records) => {
                if let Some(record) = records.pop() {
                    Some(record)
                } else {
                    warn!(id, "download no longer known to the host");
                    self.prune_active(id);
                    None
                }
            }
            Err(err) => {
                warn!(id, error = %err, "download lookup failed");
                None
            }
        }
    }

    /// Folds a fresh host snapshot into the existing display item.
    ///
    /// State, button label, remaining and speed always track the snapshot.
    /// Size and percentage only move forward: a snapshot with zero bytes
    /// received never clobbers progress already shown.
    pub fn apply_record(&mut self, record: &DownloadRecord) {
        let state = classify(record);
        let now_ms = Utc::now().timestamp_millis();
        let remaining = format::remaining_seconds(record.estimated_end_time, now_ms);
        let in_progress = matches!(state, ItemState::Paused | ItemState::InProgress);

        let Some(index) = self.items.iter().position(|item| item.id == record.id) else {
            // Possible desync between the active set and the display list;
            // keep the historical no-op but leave a trace of it.
            warn!(id = record.id, "merge target not in display list");
            if state != ItemState::InProgress {
                self.prune_active(record.id);
            }
            return;
        };

        {
            let item = &mut self.items[index];
            item.state = state;
            item.in_progress = in_progress;
            item.state_button_text = state.button_label().to_string();
            item.remaining = format::remaining_time(state, remaining);
            item.speed = format::transfer_speed(
                state,
                remaining,
                record.bytes_received,
                record.total_bytes,
            );

            if record.bytes_received > 0 {
                let mut size = format::file_size(record.bytes_received as i64);
                if record.total_bytes > 0 {
                    if in_progress {
                        size = format!("{} of {}", size, format::file_size(record.total_bytes));
                    }
                    item.percentage =
                        format::percentage(record.bytes_received, record.total_bytes);
                }
                item.size = size;
            }

            if in_progress {
                item.date_time = format::date_time(record.start_time);
            }
        }

        if state != ItemState::InProgress {
            self.prune_active(record.id);
        }
    }

    async fn set_file_icon(&mut self, id: DownloadId) {
        match self.host.get_file_icon(id).await {
            Ok(icon_url) => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
                    item.icon_url = Some(icon_url);
                }
            }
            Err(err) => {
                warn!(id, error = %err, "file icon fetch failed");
            }
        }
    }

    // === Renderer actions ===

    /// Single-select: picking an item deselects every other one.
    pub fn select(&mut self, id: DownloadId) {
        for item in &mut self.items {
            item.selected = item.id == id;
        }
    }

    pub async fn open(&mut self, id: DownloadId) {
        if let Err(err) = self.host.open(id).await {
            warn!(id, error = %err, "open failed");
        }
    }

    pub async fn show(&mut self, id: DownloadId) {
        if let Err(err) = self.host.show(id).await {
            warn!(id, error = %err, "show in folder failed");
        }
    }

    /// Dispatches the state button by the item's current semantic state:
    /// pause while in progress, resume while paused, retry otherwise.
    pub async fn toggle_state(&mut self, id: DownloadId) {
        let Some(item) = self.item(id) else {
            return;
        };
        match item.state {
            ItemState::InProgress => self.pause_download(id).await,
            ItemState::Paused => self.resume_download(id).await,
            _ => self.retry_download(id).await,
        }
    }

    async fn pause_download(&mut self, id: DownloadId) {
        match self.host.pause(id).await {
            Ok(()) => self.deactivate(id).await,
            Err(err) => warn!(id, error = %err, "pause failed"),
        }
    }

    async fn resume_download(&mut self, id: DownloadId) {
        match self.host.resume(id).await {
            Ok(()) => self.activate(id).await,
            Err(err) => warn!(id, error = %err, "resume failed"),
        }
    }

    /// Retry erases the failed download, then starts a fresh one for the
    /// same URL and file name and begins polling the new id.
    async fn retry_download(&mut self, id: DownloadId) {
        let Some(item) = self.item(id) else {
            return;
        };
        let descriptor = DownloadDescriptor {
            url: item.url.clone(),
            filename: item.file_name.clone(),
        };

        self.deactivate(id).await;
        match self.host.erase(&DownloadQuery::by_id(id)).await {
            Ok(()) => match self.host.download(&descriptor).await {
                Ok(new_id) => self.activate(new_id).await,
                Err(err) => warn!(id, error = %err, "retry download failed"),
            },
            Err(err) => warn!(id, error = %err, "erase before retry failed"),
        }
    }

    pub async fn cancel_download(&mut self, id: DownloadId) {
        match self.host.cancel(id).await {
            Ok(()) => self.deactivate(id).await,
            Err(err) => warn!(id, error = %err, "cancel failed"),
        }
    }

    /// Asks the host to erase one download. The item itself leaves the
    /// display list when the host confirms with an Erased event.
    pub async fn erase_item(&mut self, id: DownloadId) {
        self.deactivate(id).await;
        if let Err(err) = self.host.erase(&DownloadQuery::by_id(id)).await {
            warn!(id, error = %err, "erase failed");
        }
    }

    /// Erases every item that is neither in progress nor paused.
    pub async fn clear_inactive(&mut self) {
        let inactive: Vec<DownloadId> = self
            .items
            .iter()
            .filter(|item| !matches!(item.state, ItemState::InProgress | ItemState::Paused))
            .map(|item| item.id)
            .collect();
        for id in inactive {
            self.erase_item(id).await;
        }
    }

    /// Source URL for the clipboard; the clipboard write itself belongs to
    /// the renderer.
    pub fn copy_link(&self, id: DownloadId) -> Option<String> {
        self.item(id).map(|item| item.url.clone())
    }
}

/// Last path segment after normalizing separators to `/`.
fn file_name_of(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    normalized
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Host of the parsed source URL, falling back to the raw URL string.
fn hostname_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}
