//! Request-facing service: the eagerly built series cache, a bounded
//! fit-and-render worker pool, and payload assembly.

use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::{Duration, NaiveDate, Utc};
use gram_price::{load_close_series, normalize, NormalizedSeries, RawPricePoint};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chart;
use crate::config::{history_start, Commodity, CURRENCY_PAIR};
use crate::error::{ForecastError, Result};
use crate::horizon::Horizon;
use crate::models::sarima::SarimaModel;
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};

/// Eagerly built, read-only map from commodity to its normalized series.
///
/// The cache is built once at startup and never mutated, so request workers
/// share it through an `Arc` without locking. A commodity whose series
/// cannot be normalized is logged and excluded; the rest of the catalog
/// stays servable.
#[derive(Debug)]
pub struct SeriesCache {
    series: HashMap<Commodity, NormalizedSeries>,
}

impl SeriesCache {
    /// Normalize every commodity against the shared exchange-rate series.
    ///
    /// Rows before the configured history start are ignored on both sides.
    pub fn build(
        commodity_raw: &[(Commodity, Vec<RawPricePoint>)],
        fx_raw: &[RawPricePoint],
    ) -> Self {
        let start = history_start();
        let fx: Vec<RawPricePoint> = fx_raw
            .iter()
            .copied()
            .filter(|p| p.date >= start)
            .collect();

        let mut series = HashMap::new();
        for (commodity, raw) in commodity_raw {
            let raw: Vec<RawPricePoint> =
                raw.iter().copied().filter(|p| p.date >= start).collect();
            match normalize(&raw, &fx) {
                Ok(normalized) => {
                    info!(
                        commodity = commodity.display_name(),
                        points = normalized.len(),
                        "normalized series ready"
                    );
                    series.insert(*commodity, normalized);
                }
                Err(e) => {
                    warn!(
                        commodity = commodity.display_name(),
                        error = %e,
                        "excluding commodity from the servable set"
                    );
                }
            }
        }

        info!(commodities = series.len(), "series cache built");
        Self { series }
    }

    /// Build the cache from a directory of provider CSV exports, one
    /// `<ticker>.csv` per commodity plus the exchange-rate file.
    pub fn from_csv_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let fx = load_close_series(dir.join(format!("{CURRENCY_PAIR}.csv")))?;

        let mut commodity_raw = Vec::new();
        for commodity in Commodity::all() {
            let path = dir.join(format!("{}.csv", commodity.ticker()));
            match load_close_series(&path) {
                Ok(points) => commodity_raw.push((commodity, points)),
                Err(e) => warn!(
                    commodity = commodity.display_name(),
                    error = %e,
                    "excluding commodity input"
                ),
            }
        }

        Ok(Self::build(&commodity_raw, &fx))
    }

    /// Series for one commodity, if it survived normalization
    pub fn get(&self, commodity: Commodity) -> Option<&NormalizedSeries> {
        self.series.get(&commodity)
    }

    /// Commodities with a servable series, in catalog order
    pub fn available(&self) -> Vec<Commodity> {
        Commodity::all()
            .into_iter()
            .filter(|c| self.series.contains_key(c))
            .collect()
    }

    /// Number of servable commodities
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether no commodity survived normalization
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// A renderable forecast: the base64 PNG plus the structured fields a
/// presentation layer needs for captions
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPayload {
    /// Commodity display name
    pub commodity: String,
    /// Horizon label (short / medium / long)
    pub horizon: String,
    /// Name of the fitted model
    pub model: String,
    /// Base64-encoded PNG chart
    pub image_base64: String,
    /// Forecast points backing the chart
    pub forecast: ForecastResult,
}

impl ForecastPayload {
    /// JSON form for handing to the presentation layer
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One fit-and-render request travelling to a worker
struct RenderJob {
    commodity: Commodity,
    horizon: Horizon,
    reply: mpsc::Sender<Result<ForecastPayload>>,
}

enum PoolMsg {
    Job(RenderJob),
    Shutdown,
}

/// Bounded pool of render workers.
///
/// Jobs queue on a fixed-capacity channel. A full queue rejects
/// immediately, so request handlers shed load instead of piling up behind
/// CPU-bound fits.
#[derive(Debug)]
struct RenderPool {
    sender: mpsc::SyncSender<PoolMsg>,
    workers: Vec<Option<thread::JoinHandle<()>>>,
}

impl RenderPool {
    fn start(workers: usize, capacity: usize, cache: Arc<SeriesCache>) -> Self {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let receiver = Arc::clone(&receiver);
            let cache = Arc::clone(&cache);
            handles.push(Some(thread::spawn(move || worker_loop(receiver, cache))));
        }

        Self {
            sender,
            workers: handles,
        }
    }

    fn submit(&self, job: RenderJob) -> Result<()> {
        match self.sender.try_send(PoolMsg::Job(job)) {
            Ok(()) => Ok(()),
            Err(mpsc::TrySendError::Full(_)) => Err(ForecastError::Saturated),
            Err(mpsc::TrySendError::Disconnected(_)) => {
                Err(ForecastError::Worker("render pool is shut down".to_string()))
            }
        }
    }

    fn shutdown(&mut self) {
        // A full queue still has to accept shutdown, so block here rather
        // than try_send.
        for _ in 0..self.workers.len() {
            let _ = self.sender.send(PoolMsg::Shutdown);
        }
        for slot in &mut self.workers {
            if let Some(handle) = slot.take() {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for RenderPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(receiver: Arc<Mutex<mpsc::Receiver<PoolMsg>>>, cache: Arc<SeriesCache>) {
    loop {
        let msg = {
            let guard = match receiver.lock() {
                Ok(guard) => guard,
                Err(_) => return,
            };
            guard.recv()
        };

        match msg {
            Ok(PoolMsg::Job(job)) => {
                let outcome = run_job(&cache, job.commodity, job.horizon);
                let _ = job.reply.send(outcome);
            }
            Ok(PoolMsg::Shutdown) | Err(_) => return,
        }
    }
}

/// Fit on the full series, forecast, and render the windowed chart.
fn run_job(cache: &SeriesCache, commodity: Commodity, horizon: Horizon) -> Result<ForecastPayload> {
    let series = cache
        .get(commodity)
        .ok_or_else(|| ForecastError::Unavailable(commodity.display_name().to_string()))?;

    let profile = horizon.profile();
    debug!(
        commodity = commodity.display_name(),
        horizon = horizon.label(),
        points = series.len(),
        "fitting model"
    );

    let model = SarimaModel::gram_price_default();
    let trained = model.fit(series)?;
    let forecast = trained.forecast(profile.forecast_steps)?;

    // The window is purely visual; the fit above always saw the full series.
    let display_start = display_start_for(Utc::now().date_naive(), profile.history_window_days);
    let observed = series.window_from(display_start);
    let image_base64 = chart::render_base64(&observed, &forecast, display_start)?;

    Ok(ForecastPayload {
        commodity: commodity.display_name().to_string(),
        horizon: horizon.label().to_string(),
        model: trained.name().to_string(),
        image_base64,
        forecast,
    })
}

/// Left edge of the display window for a given "today"
fn display_start_for(today: NaiveDate, history_window_days: i64) -> NaiveDate {
    today - Duration::days(history_window_days)
}

/// Facade the presentation layer calls: owns the cache and the render pool
#[derive(Debug)]
pub struct ForecastService {
    cache: Arc<SeriesCache>,
    pool: RenderPool,
}

impl ForecastService {
    /// Default number of render workers
    pub const DEFAULT_WORKERS: usize = 2;
    /// Default render queue capacity
    pub const DEFAULT_QUEUE_CAPACITY: usize = 8;

    /// Build a service over an already-populated cache with default pool
    /// sizing.
    pub fn new(cache: SeriesCache) -> Self {
        Self::with_pool(cache, Self::DEFAULT_WORKERS, Self::DEFAULT_QUEUE_CAPACITY)
    }

    /// Build a service with explicit pool sizing
    pub fn with_pool(cache: SeriesCache, workers: usize, queue_capacity: usize) -> Self {
        let cache = Arc::new(cache);
        let pool = RenderPool::start(workers.max(1), queue_capacity.max(1), Arc::clone(&cache));
        Self { cache, pool }
    }

    /// Commodities that can currently be served
    pub fn available_commodities(&self) -> Vec<Commodity> {
        self.cache.available()
    }

    /// Resolve the request, dispatch one fit-and-render job, and wait for
    /// the payload.
    ///
    /// Unknown commodity or horizon strings fail fast before touching the
    /// pool; a full queue fails with [`ForecastError::Saturated`].
    pub fn render_forecast(&self, commodity: &str, horizon_label: &str) -> Result<ForecastPayload> {
        let commodity = Commodity::from_display_name(commodity)?;
        let horizon = Horizon::from_label(horizon_label)?;

        let (reply_tx, reply_rx) = mpsc::channel();
        self.pool.submit(RenderJob {
            commodity,
            horizon,
            reply: reply_tx,
        })?;

        reply_rx
            .recv()
            .map_err(|_| ForecastError::Worker("render worker dropped the reply".to_string()))?
    }

    /// Join the render workers. Dropping the service does the same.
    pub fn shutdown(mut self) {
        self.pool.shutdown();
    }
}
