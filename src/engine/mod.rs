//! Stream orchestrator
//!
//! Drives a full extraction run: the users stream first (full refresh,
//! one request per configured username), then one scrobbles partition
//! per emitted user context. Checkpoints are committed only when a
//! window closes, so an interrupted run resumes from the last fully
//! consumed window.

mod fetcher;
mod types;

pub use fetcher::{PageFetcher, API_PATH};
pub use types::SyncStats;

use crate::auth::ApiKeyAuth;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::output::RecordSink;
use crate::pagination::{EnumeratedPaginator, NextPage, PageToken, WindowStep, WindowedCursor};
use crate::schema::path;
use crate::state::StateManager;
use crate::streams::{self, scrobbles, users, Context, StreamDefinition};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

/// Extraction engine over one configuration and one state store
#[derive(Debug)]
pub struct Engine {
    config: Config,
    client: HttpClient,
    state: StateManager,
}

impl Engine {
    /// Build an engine from a validated configuration and a state manager
    pub fn new(config: Config, state: StateManager) -> Self {
        let auth = ApiKeyAuth::new(config.api_key.clone());
        let client = HttpClient::with_auth(config.http_client_config(), auth);
        Self {
            config,
            client,
            state,
        }
    }

    /// The engine's state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Run a full sync, emitting typed rows into the sink.
    ///
    /// The catch-up horizon is fixed once at the start of the run so a
    /// long run does not chase a moving "now".
    pub async fn run(&self, sink: &mut dyn RecordSink) -> Result<SyncStats> {
        let started = Instant::now();
        let now = Utc::now();
        let mut stats = SyncStats::new();

        let contexts = self.sync_users(sink, &mut stats).await?;
        stats.add_stream();

        let stream = scrobbles::definition();
        for context in &contexts {
            self.sync_scrobbles_partition(&stream, context, sink, &mut stats, now)
                .await?;
            stats.add_partition();
        }
        stats.add_stream();

        sink.flush()?;
        self.state.save().await?;

        stats.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            records = stats.records_synced,
            pages = stats.pages_fetched,
            partitions = stats.partitions_synced,
            checkpoints = stats.checkpoints_written,
            duration_ms = stats.duration_ms,
            "Sync complete"
        );
        Ok(stats)
    }

    /// Sync the users stream and derive one child context per row
    async fn sync_users(
        &self,
        sink: &mut dyn RecordSink,
        stats: &mut SyncStats,
    ) -> Result<Vec<Context>> {
        let stream = users::definition();
        let fetcher = PageFetcher::new(&self.client);
        let mut paginator = EnumeratedPaginator::new(self.config.usernames.iter().cloned());
        let mut contexts = Vec::new();

        while let NextPage::Continue(token) = paginator.next() {
            let body = fetcher.fetch_page(&stream, None, Some(&token)).await?;
            stats.add_page();

            for raw in path::select_records(&body, stream.record_path) {
                let row = stream.map_record(&raw)?;
                let context = users::context_from_row(&row)?;
                sink.write(stream.name, &row)?;
                stats.add_record();
                contexts.push(context);
            }
        }

        info!(users = contexts.len(), "Users stream synced");
        Ok(contexts)
    }

    /// Sync one scrobbles partition, window by window
    async fn sync_scrobbles_partition(
        &self,
        stream: &StreamDefinition,
        context: &Context,
        sink: &mut dyn RecordSink,
        stats: &mut SyncStats,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let fetcher = PageFetcher::new(&self.client);
        let cursor = WindowedCursor::new(self.config.step_days, scrobbles::TOTAL_PAGES_PATH);

        let checkpoint = self
            .state
            .get_partition_cursor(stream.name, &context.username)
            .await;
        let floor =
            WindowedCursor::resolve_floor(checkpoint, context.registered_at, self.config.start_date);
        info!(
            partition = %context.username,
            floor = %floor,
            resumed = checkpoint.is_some(),
            "Syncing scrobbles partition"
        );

        let mut window = cursor.open(floor);
        loop {
            let token = PageToken::Window(window);
            let body = fetcher
                .fetch_page(stream, Some(&context.username), Some(&token))
                .await?;
            stats.add_page();

            self.emit_scrobbles(stream, context, &body, sink, stats)?;

            match cursor.advance(&body, &window, now) {
                WindowStep::NextPage(next) => window = next,
                WindowStep::AdvanceWindow { commit, next } => {
                    self.state
                        .advance_partition_cursor(stream.name, &context.username, commit)
                        .await?;
                    stats.add_checkpoint();
                    debug!(partition = %context.username, checkpoint = %commit, "Checkpoint committed");
                    window = next;
                }
                WindowStep::CaughtUp => {
                    debug!(partition = %context.username, "Partition caught up");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Map and emit the raw tracks of one page
    fn emit_scrobbles(
        &self,
        stream: &StreamDefinition,
        context: &Context,
        body: &Value,
        sink: &mut dyn RecordSink,
        stats: &mut SyncStats,
    ) -> Result<()> {
        for mut raw in path::select_records(body, stream.record_path) {
            // In-flight rows have no timestamp yet and reappear later
            if scrobbles::is_now_playing(&raw) {
                continue;
            }
            scrobbles::inject_username(&mut raw, &context.username);
            let row = stream.map_record(&raw)?;
            sink.write(stream.name, &row)?;
            stats.add_record();
        }
        Ok(())
    }

    /// Probe connectivity and credentials with a single profile request
    pub async fn check(&self) -> Result<String> {
        let stream = users::definition();
        let fetcher = PageFetcher::new(&self.client);
        let username = self
            .config
            .usernames
            .first()
            .ok_or_else(|| Error::missing_field("usernames"))?;

        let token = PageToken::Value(username.clone());
        let body = fetcher
            .fetch_page(&stream, None, Some(&token))
            .await
            .map_err(|e| Error::ConnectionCheck {
                message: e.to_string(),
            })?;

        if path::select_records(&body, stream.record_path).is_empty() {
            return Err(Error::ConnectionCheck {
                message: format!("profile response for '{username}' had no user payload"),
            });
        }

        Ok(format!("Connection OK: profile '{username}' reachable"))
    }

    /// Catalog of every defined stream, for `discover`
    pub fn discover() -> Value {
        Value::Array(
            streams::catalog()
                .iter()
                .map(StreamDefinition::descriptor)
                .collect(),
        )
    }
}
