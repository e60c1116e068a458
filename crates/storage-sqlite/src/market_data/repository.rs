use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use super::model::QuoteDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::quotes::dsl as quotes_dsl;
use crate::utils::chunk_for_sqlite;
use folio_core::quotes::QuoteStore;
use folio_core::Result;
use folio_market_data::Quote;

/// SQLite-backed store holding one row per ticker.
pub struct SqliteQuoteStore {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl SqliteQuoteStore {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }

    /// Number of stored tickers.
    pub fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        quotes_dsl::quotes
            .count()
            .get_result::<i64>(&mut conn)
            .into_core()
    }
}

#[async_trait]
impl QuoteStore for SqliteQuoteStore {
    fn load(&self, ticker: &str) -> Result<Option<Quote>> {
        let mut conn = get_connection(&self.pool)?;
        let row = quotes_dsl::quotes
            .find(ticker)
            .select(QuoteDB::as_select())
            .first::<QuoteDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Quote::from))
    }

    fn load_many(&self, tickers: &[String]) -> Result<HashMap<String, Quote>> {
        if tickers.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = get_connection(&self.pool)?;
        let mut found = HashMap::with_capacity(tickers.len());

        for chunk in chunk_for_sqlite(tickers) {
            let rows = quotes_dsl::quotes
                .filter(quotes_dsl::ticker.eq_any(chunk))
                .select(QuoteDB::as_select())
                .load::<QuoteDB>(&mut conn)
                .into_core()?;

            for row in rows {
                found.insert(row.ticker.clone(), Quote::from(row));
            }
        }

        debug!("Loaded {} of {} stored quotes", found.len(), tickers.len());
        Ok(found)
    }

    async fn save(&self, quote: &Quote) -> Result<()> {
        let row = QuoteDB::from_quote(quote, Utc::now());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::replace_into(quotes_dsl::quotes)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::QueryFailed)?;
                Ok(())
            })
            .await
    }

    async fn save_many(&self, quotes: &[Quote]) -> Result<usize> {
        if quotes.is_empty() {
            return Ok(0);
        }

        let now = Utc::now();
        let rows: Vec<QuoteDB> = quotes.iter().map(|q| QuoteDB::from_quote(q, now)).collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut written = 0;
                // All rows share the actor's transaction.
                for row in &rows {
                    written += diesel::replace_into(quotes_dsl::quotes)
                        .values(row)
                        .execute(conn)
                        .map_err(StorageError::QueryFailed)?;
                }
                Ok(written)
            })
            .await
    }
}
