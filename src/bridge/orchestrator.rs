//! Bridge orchestrator that ties the bus and C-Gate together.
//!
//! Single consumer of every bridge event. It owns the link readiness
//! flags, the command translator, and the status publisher, so all
//! bridge state changes happen on one task.

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::common::{BridgeEvent, BusPublish, Link, ThrottledQueue, WriteRequest};
use crate::config::types::{Config, GetAllConfig};
use crate::protocol::address::{percent_from_level, Address};
use crate::protocol::request::Request;
use serde_json::Value;

use super::publisher::StatusPublisher;
use super::translator::CommandTranslator;

/// The main bridge that orchestrates event flow.
pub struct BridgeOrchestrator {
    /// Translates write requests into C-Gate commands.
    translator: CommandTranslator,
    /// Builds the bus messages mirroring C-Bus state.
    publisher: StatusPublisher,
    /// C-Gate project name used to render object paths.
    project: String,
    /// Bulk level query settings, when configured.
    bulk_query: Option<GetAllConfig>,
    /// Log relayed traffic at info instead of debug.
    verbose: bool,
    /// Paced commands toward the C-Gate command port.
    gateway_queue: ThrottledQueue<String>,
    /// Paced publications toward the broker.
    bus_queue: ThrottledQueue<BusPublish>,
    command_up: bool,
    event_up: bool,
    bus_up: bool,
    all_ready: bool,
}

impl BridgeOrchestrator {
    /// Create a new orchestrator from configuration.
    pub fn new(
        config: &Config,
        gateway_queue: ThrottledQueue<String>,
        bus_queue: ThrottledQueue<BusPublish>,
    ) -> Self {
        Self {
            translator: CommandTranslator::new(),
            publisher: StatusPublisher::new(config.bridge.retain_reads),
            project: config.cgate.project.clone(),
            bulk_query: config.bridge.getall.clone(),
            verbose: config.bridge.verbose,
            gateway_queue,
            bus_queue,
            command_up: false,
            event_up: false,
            bus_up: false,
            all_ready: false,
        }
    }

    /// Consume bridge events until every sender is gone.
    pub async fn run(mut self, mut events_rx: mpsc::UnboundedReceiver<BridgeEvent>) {
        let mut bulk_timer = self
            .bulk_query
            .as_ref()
            .and_then(|getall| getall.period_secs)
            .map(|secs| {
                let period = Duration::from_secs(secs);
                let mut timer = tokio::time::interval_at(Instant::now() + period, period);
                timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
                timer
            });

        loop {
            tokio::select! {
                event = events_rx.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
                _ = async { bulk_timer.as_mut().unwrap().tick().await }, if bulk_timer.is_some() => {
                    self.handle_bulk_tick();
                }
            }
        }

        info!("Bridge event channel closed");
    }

    /// Dispatch one bridge event. Synchronous: all effects are queue
    /// pushes and state updates.
    fn handle_event(&mut self, event: BridgeEvent) {
        match event {
            BridgeEvent::Link { link, up } => self.handle_link(link, up),
            BridgeEvent::Write { request, payload } => self.handle_write(request, &payload),
            BridgeEvent::Level { address, level } => self.handle_level(address, level),
            BridgeEvent::Tree { document } => self.handle_tree(&document),
        }
    }

    // ========================================================================
    // Event handlers
    // ========================================================================

    fn handle_link(&mut self, link: Link, up: bool) {
        match link {
            Link::Command => {
                self.command_up = up;
                if up {
                    // First command of every session turns on event reporting
                    self.push_request(Request::EnableEvents);
                }
            }
            Link::Event => self.event_up = up,
            Link::Bus => {
                self.bus_up = up;
                if up {
                    self.bus_queue.push(self.publisher.announcement());
                }
            }
        }
        self.update_readiness();
    }

    fn handle_write(&mut self, request: WriteRequest, payload: &str) {
        for command in self.translator.translate(request, payload) {
            self.push_request(command);
        }
    }

    fn handle_level(&mut self, address: Address, level: u8) {
        if self.verbose {
            info!(
                point = %address,
                level,
                percent = percent_from_level(level),
                "C-Bus status"
            );
        } else {
            debug!(point = %address, level, "C-Bus status");
        }

        for message in self.publisher.level_messages(address, level) {
            self.bus_queue.push(message);
        }

        if let Some(ramp) = self.translator.fulfill_ramp(address, level) {
            self.push_request(ramp);
        }
    }

    fn handle_tree(&mut self, document: &Value) {
        match self.translator.take_tree_network() {
            Some(network) => {
                if self.verbose {
                    info!(network, "C-Bus tree received");
                } else {
                    debug!(network, "C-Bus tree received");
                }
                self.bus_queue.push(self.publisher.tree_message(network, document));
            }
            None => warn!("Dropping tree dump: no tree request outstanding"),
        }
    }

    // ========================================================================
    // Readiness and bulk queries
    // ========================================================================

    /// Recompute overall readiness; on the transition to all-ready,
    /// optionally issue the startup bulk query.
    fn update_readiness(&mut self) {
        let ready = self.command_up && self.event_up && self.bus_up;
        if ready && !self.all_ready {
            info!("Command, event and broker links all connected");
            if self.bulk_query.as_ref().is_some_and(|getall| getall.on_start) {
                self.push_bulk_query();
            }
        }
        self.all_ready = ready;
    }

    fn handle_bulk_tick(&mut self) {
        if self.all_ready {
            self.push_bulk_query();
        } else {
            debug!("Skipping periodic level query, links not ready");
        }
    }

    fn push_bulk_query(&self) {
        if let Some(ref getall) = self.bulk_query {
            info!(
                network = getall.network,
                application = getall.application,
                "Requesting all levels"
            );
            self.push_request(Request::GetAllLevels {
                network: getall.network,
                application: getall.application,
            });
        }
    }

    fn push_request(&self, request: Request) {
        self.gateway_queue.push(request.render(&self.project));
    }
}
