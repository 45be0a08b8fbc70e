//! Client facade over a [`RateTransport`]: currency selection, caching and
//! the error suppression policy.
//!
//! Every operation takes `&mut self` and performs at most one transport
//! call. A client is meant to be owned by a single task; use one client per
//! concurrent context instead of sharing it.

use crate::core::cache::LruCache;
use crate::core::config::ClientConfig;
use crate::core::currency::{Currency, CurrencyRegistry, Table};
use crate::core::date::{IntoDate, format_date, parse_date, service_today, validate_range};
use crate::core::error::{ApiError, Error, Result};
use crate::core::rate::ExchangeRate;
use crate::core::transport::{Query, RateTable, RateTransport};
use crate::providers::nbp::NbpTransport;
use chrono::NaiveDate;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Which magnitudes a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuoteMode {
    /// Mid rate only.
    #[default]
    Mid,
    /// Bid/ask when the currency is quoted in table C, otherwise the mid rate.
    BidAsk,
    /// Bid/ask or [`ApiError::BidAskUnavailable`].
    RequireBidAsk,
}

impl QuoteMode {
    pub fn wants_bid_ask(&self) -> bool {
        !matches!(self, QuoteMode::Mid)
    }
}

impl From<bool> for QuoteMode {
    fn from(bid_ask: bool) -> Self {
        if bid_ask {
            QuoteMode::BidAsk
        } else {
            QuoteMode::Mid
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    currency_code: String,
    table: Table,
    bid_ask: bool,
    query: Query,
}

pub struct Client<T: RateTransport> {
    registry: Arc<CurrencyRegistry>,
    currency: Currency,
    use_float: bool,
    suppress_errors: bool,
    cache: LruCache<CacheKey, Vec<ExchangeRate>>,
    transport: T,
}

impl Client<NbpTransport> {
    /// Client talking to the configured NBP endpoint with the bundled registry.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = NbpTransport::new(&config.provider.base_url)?;
        Self::new(config, Arc::new(CurrencyRegistry::bundled()), transport)
    }
}

impl<T: RateTransport> Client<T> {
    pub fn new(config: &ClientConfig, registry: Arc<CurrencyRegistry>, transport: T) -> Result<Self> {
        let currency = registry.lookup(&config.currency_code)?.clone();
        debug!(
            currency = %currency.code(),
            use_float = config.use_float,
            suppress_errors = config.suppress_errors,
            cache_capacity = config.cache_capacity.get(),
            "Creating exchange rate client"
        );

        Ok(Self {
            registry,
            currency,
            use_float: config.use_float,
            suppress_errors: config.suppress_errors,
            cache: LruCache::new(config.cache_capacity),
            transport,
        })
    }

    pub fn currency_code(&self) -> &str {
        self.currency.code()
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Switches the active currency. Cached rates of the previous currency
    /// are left to age out.
    pub fn set_currency_code(&mut self, code: &str) -> Result<()> {
        self.currency = self.registry.lookup(code)?.clone();
        Ok(())
    }

    pub fn use_float(&self) -> bool {
        self.use_float
    }

    pub fn suppress_errors(&self) -> bool {
        self.suppress_errors
    }

    pub fn set_suppress_errors(&mut self, suppress_errors: bool) {
        self.suppress_errors = suppress_errors;
    }

    pub fn cache_capacity(&self) -> NonZeroUsize {
        self.cache.capacity()
    }

    pub fn registry(&self) -> &Arc<CurrencyRegistry> {
        &self.registry
    }

    /// Most recent published rate. Weekends and holidays resolve to the last
    /// business day on the service side.
    pub async fn current(&mut self, mode: QuoteMode) -> Result<Option<ExchangeRate>> {
        let result = self.fetch_one(Query::Current, mode).await;
        self.suppress(result)
    }

    /// Same as [`Client::current`].
    pub async fn invoke(&mut self, mode: QuoteMode) -> Result<Option<ExchangeRate>> {
        self.current(mode).await
    }

    /// Rate published today in Warsaw; no fallback to earlier days.
    pub async fn today(&mut self, mode: QuoteMode) -> Result<Option<ExchangeRate>> {
        let today = service_today();
        let result = self.fetch_today(today, mode).await;
        self.suppress(result)
    }

    pub async fn date<D: IntoDate>(
        &mut self,
        date: D,
        mode: QuoteMode,
    ) -> Result<Option<ExchangeRate>> {
        let date = parse_date(date)?;
        let result = self.fetch_date(date, mode).await;
        self.suppress(result)
    }

    /// The `n` most recent rates, oldest first.
    pub async fn last(&mut self, n: u32, mode: QuoteMode) -> Result<Option<Vec<ExchangeRate>>> {
        if n == 0 {
            return Err(Error::InvalidArgument(
                "number of rates must be a positive integer".to_string(),
            ));
        }

        let result = self.fetch_last(n, mode).await;
        self.suppress(result)
    }

    /// Rates published within `[start, end]`, oldest first.
    pub async fn date_range<S: IntoDate, E: IntoDate>(
        &mut self,
        start: S,
        end: E,
        mode: QuoteMode,
    ) -> Result<Option<Vec<ExchangeRate>>> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        let result = self.fetch_range(start, end, mode).await;
        self.suppress(result)
    }

    fn suppress<V>(&self, result: Result<V>) -> Result<Option<V>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(Error::Api(err)) if self.suppress_errors => {
                warn!(
                    currency = %self.currency.code(),
                    error = %err,
                    "Suppressed API error"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn fetch_one(&mut self, query: Query, mode: QuoteMode) -> Result<ExchangeRate> {
        let mut rates = self.fetch_rates(query, query, mode).await?;
        rates
            .pop()
            .ok_or_else(|| ApiError::NoData(self.describe(&query)).into())
    }

    async fn fetch_today(&mut self, today: NaiveDate, mode: QuoteMode) -> Result<ExchangeRate> {
        // Keyed by the concrete date so a cached entry does not outlive the day
        let rates = self
            .fetch_rates(Query::Today, Query::Date(today), mode)
            .await?;
        Self::single_on(rates, today)
            .ok_or_else(|| ApiError::NoData(self.describe(&Query::Today)).into())
    }

    async fn fetch_date(&mut self, date: NaiveDate, mode: QuoteMode) -> Result<ExchangeRate> {
        let query = Query::Date(date);
        let rates = self.fetch_rates(query, query, mode).await?;
        Self::single_on(rates, date)
            .ok_or_else(|| ApiError::NoData(self.describe(&query)).into())
    }

    async fn fetch_last(&mut self, n: u32, mode: QuoteMode) -> Result<Vec<ExchangeRate>> {
        let query = Query::Last(n);
        let mut rates = self.fetch_rates(query, query, mode).await?;
        let excess = rates.len().saturating_sub(n as usize);
        rates.drain(..excess);
        Ok(rates)
    }

    async fn fetch_range(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        mode: QuoteMode,
    ) -> Result<Vec<ExchangeRate>> {
        validate_range(start, end)?;
        let query = Query::Range(start, end);
        let rates: Vec<ExchangeRate> = self
            .fetch_rates(query, query, mode)
            .await?
            .into_iter()
            .filter(|rate| (start..=end).contains(&rate.date()))
            .collect();

        if rates.is_empty() {
            return Err(ApiError::NoData(self.describe(&query)).into());
        }
        Ok(rates)
    }

    fn single_on(rates: Vec<ExchangeRate>, date: NaiveDate) -> Option<ExchangeRate> {
        rates.into_iter().find(|rate| rate.date() == date)
    }

    fn describe(&self, query: &Query) -> String {
        match query {
            Query::Current => format!("{} (current)", self.currency.code()),
            Query::Today => format!("{} today", self.currency.code()),
            Query::Date(date) => format!("{} on {}", self.currency.code(), format_date(*date)),
            Query::Last(n) => format!("last {n} rates of {}", self.currency.code()),
            Query::Range(start, end) => format!(
                "{} between {} and {}",
                self.currency.code(),
                format_date(*start),
                format_date(*end)
            ),
        }
    }

    /// Picks the table to query for the active currency.
    fn resolve_table(&self, mode: QuoteMode) -> std::result::Result<Table, ApiError> {
        if mode.wants_bid_ask() {
            if self.currency.publishes_bid_ask() {
                return Ok(Table::C);
            }
            if mode == QuoteMode::RequireBidAsk {
                return Err(ApiError::BidAskUnavailable(self.currency.code().to_string()));
            }
            debug!(
                currency = %self.currency.code(),
                "Bid/ask not published, falling back to mid rate"
            );
        }

        self.currency
            .mid_table()
            .or_else(|| self.currency.publishes_bid_ask().then_some(Table::C))
            .ok_or_else(|| ApiError::NoData(format!("{} is not published", self.currency.code())))
    }

    /// Cache-checked fetch of every rate for `query`, sorted by date.
    /// `cache_query` is the period the result is stored under.
    #[instrument(skip(self), fields(currency = %self.currency.code()))]
    async fn fetch_rates(
        &mut self,
        query: Query,
        cache_query: Query,
        mode: QuoteMode,
    ) -> Result<Vec<ExchangeRate>> {
        let table = self.resolve_table(mode)?;
        let key = CacheKey {
            currency_code: self.currency.code().to_string(),
            table,
            bid_ask: mode.wants_bid_ask(),
            query: cache_query,
        };

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let payload = self
            .transport
            .fetch(table, self.currency.code(), &query)
            .await?;
        let rates = self.parse(payload)?;

        self.cache.put(key, rates.clone());
        Ok(rates)
    }

    fn parse(&self, payload: RateTable) -> Result<Vec<ExchangeRate>> {
        if !payload.code.eq_ignore_ascii_case(self.currency.code()) {
            return Err(ApiError::MalformedResponse(format!(
                "expected rates for {}, got {}",
                self.currency.code(),
                payload.code
            ))
            .into());
        }

        let mut rates = payload
            .rates
            .iter()
            .map(|record| ExchangeRate::from_record(&self.currency, record, self.use_float))
            .collect::<Result<Vec<_>>>()?;
        rates.sort_by_key(|rate| rate.date());
        Ok(rates)
    }
}
