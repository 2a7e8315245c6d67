/// Feed Service - sequential book writer with periodic view refresh
///
/// This service is the single logical owner of an `OrderBookEngine`. It
/// consumes commands from the transport and publishes views for the
/// presentation layer.
///
/// ## Architecture
/// - Receives commands via MPSC channel (raw frames, reset, product switch)
/// - Applies frames one at a time in arrival order
/// - Publishes a `BookView` after every command and on every refresh tick
/// - Emits subscription control frames the transport must send
///
/// ## Locking
/// The engine sits behind a `parking_lot::Mutex` so presentation code can
/// read views through an `EngineHandle` from other threads. The guard is
/// taken for one command or one refresh and always released before the
/// service awaits again.
///
/// ## Usage
/// ```rust,no_run
/// use depth_engine::application::services::{FeedCommand, FeedService};
/// use depth_engine::shared::config::EngineConfig;
/// use tokio::sync::mpsc;
///
/// # async fn demo() {
/// let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
/// let (out_tx, mut out_rx) = mpsc::unbounded_channel();
///
/// let service = FeedService::new(EngineConfig::default(), cmd_rx, out_tx);
/// tokio::spawn(service.run());
///
/// cmd_tx.send(FeedCommand::Message(r#"{"feed":"book_ui_1","bids":[],"asks":[]}"#.into())).unwrap();
/// while let Some(output) = out_rx.recv().await {
///     println!("{:?}", output);
/// }
/// # }
/// ```

use crate::application::engine::OrderBookEngine;
use crate::domain::aggregation::BookView;
use crate::shared::config::EngineConfig;
use crate::shared::error::FeedError;
use crate::shared::metrics::METRICS;
use crate::shared::protocol::{ProductId, SubscriptionRequest};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

pub type SharedEngine = Arc<Mutex<OrderBookEngine>>;

/// Commands the feed service can receive
#[derive(Debug)]
pub enum FeedCommand {
    /// One raw frame from the venue
    Message(String),
    /// App backgrounded or user asked for a clean book
    Reset,
    /// Subscribe the current product again after a reset
    Resubscribe,
    /// Drop the current product and track another one
    SwitchProduct(ProductId),
    /// Transport lost its connection
    Disconnected(String),
}

/// Output produced by the feed service
#[derive(Debug)]
pub enum FeedOutput {
    View(BookView),
    /// Control frame the transport must forward to the venue
    Subscription(SubscriptionRequest),
}

/// Read access to a running service's engine
#[derive(Clone)]
pub struct EngineHandle {
    engine: SharedEngine,
}

impl EngineHandle {
    pub fn snapshot_view(&self) -> BookView {
        self.engine.lock().snapshot_view()
    }

    pub fn is_cleared(&self) -> bool {
        self.engine.lock().is_cleared()
    }

    pub fn product_id(&self) -> ProductId {
        self.engine.lock().product_id().clone()
    }
}

pub struct FeedService {
    engine: SharedEngine,
    command_receiver: UnboundedReceiver<FeedCommand>,
    output_sender: UnboundedSender<FeedOutput>,
    refresh_interval: Duration,
}

impl FeedService {
    pub fn new(
        config: EngineConfig,
        command_receiver: UnboundedReceiver<FeedCommand>,
        output_sender: UnboundedSender<FeedOutput>,
    ) -> Self {
        let refresh_interval = config.refresh_interval();
        FeedService {
            engine: Arc::new(Mutex::new(OrderBookEngine::new(config))),
            command_receiver,
            output_sender,
            refresh_interval,
        }
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            engine: Arc::clone(&self.engine),
        }
    }

    /// Runs until the command channel closes or the output receiver is gone
    pub async fn run(mut self) {
        let product = self.engine.lock().product_id().clone();
        info!(product = %product, "feed service started");

        if !self.emit(FeedOutput::Subscription(SubscriptionRequest::subscribe(product))) {
            return;
        }

        let mut ticker = tokio::time::interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let keep_running = tokio::select! {
                command = self.command_receiver.recv() => match command {
                    Some(command) => self.process_command(command),
                    None => break,
                },
                _ = ticker.tick() => self.publish_view(),
            };
            if !keep_running {
                break;
            }
        }
        info!("feed service stopped");
    }

    /// Handles one command; returns false once nobody listens for output
    fn process_command(&mut self, command: FeedCommand) -> bool {
        match command {
            FeedCommand::Message(raw) => {
                let outcome = self.engine.lock().apply(&raw);
                if !outcome.changed_book() {
                    return true;
                }
            }
            FeedCommand::Reset => {
                self.engine.lock().reset();
            }
            FeedCommand::Resubscribe => {
                let product = self.engine.lock().product_id().clone();
                if !self.emit(FeedOutput::Subscription(SubscriptionRequest::subscribe(product))) {
                    return false;
                }
            }
            FeedCommand::SwitchProduct(product) => {
                let previous = {
                    let mut engine = self.engine.lock();
                    let previous = engine.product_id().clone();
                    engine.switch_product(product.clone());
                    previous
                };
                let frames = [
                    SubscriptionRequest::unsubscribe(previous),
                    SubscriptionRequest::subscribe(product),
                ];
                for frame in frames {
                    if !self.emit(FeedOutput::Subscription(frame)) {
                        return false;
                    }
                }
            }
            FeedCommand::Disconnected(reason) => {
                let err = FeedError::Transport(reason);
                warn!(error = %err, "transport disconnected, clearing book");
                METRICS.errors_total.with_label_values(&[err.kind()]).inc();
                self.engine.lock().reset();
            }
        }
        self.publish_view()
    }

    fn publish_view(&self) -> bool {
        let view = self.engine.lock().snapshot_view();
        self.emit(FeedOutput::View(view))
    }

    fn emit(&self, output: FeedOutput) -> bool {
        if self.output_sender.send(output).is_err() {
            warn!("output channel closed, stopping feed service");
            return false;
        }
        true
    }
}
