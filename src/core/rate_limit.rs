//! Rate limiting - Limite di richieste per client a finestra fissa
//!
//! Ogni client (indirizzo IP) ha un contatore che si azzera allo scadere della finestra.
//! Le finestre scadute vengono eliminate periodicamente da [`purge_expired_buckets`].

use crate::core::response::defaults;
use crate::core::{AppError, AppState};
use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::Response,
    middleware::Next,
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
struct Bucket {
    started_at: Instant,
    count: u32,
}

#[derive(Clone)]
pub struct RateLimiter {
    buckets: Arc<DashMap<String, Bucket>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            max_requests,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Registra una richiesta per `key`, ritorna `false` se il limite è già stato raggiunto
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut bucket = self.buckets.entry(key.to_string()).or_insert(Bucket {
            started_at: now,
            count: 0,
        });

        if now.duration_since(bucket.started_at) >= self.window {
            bucket.started_at = now;
            bucket.count = 0;
        }

        if bucket.count >= self.max_requests {
            return false;
        }

        bucket.count += 1;
        true
    }

    /// Elimina i contatori la cui finestra è scaduta
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        self.buckets
            .retain(|_, bucket| now.duration_since(bucket.started_at) < self.window);
    }

    pub fn tracked_clients(&self) -> usize {
        self.buckets.len()
    }
}

/// Task in background: pulisce i contatori scaduti una volta per finestra
pub async fn purge_expired_buckets(limiter: RateLimiter) {
    let mut interval = time::interval(limiter.window().max(Duration::from_secs(1)));
    // Salta il primo tick che avviene immediatamente
    interval.tick().await;

    loop {
        interval.tick().await;
        limiter.cleanup_expired();
        debug!("Rate limiter tracking {} clients", limiter.tracked_clients());
    }
}

pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    // senza ConnectInfo (es. nei test) tutte le richieste condividono lo stesso contatore
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !state.limiter.check(&client) {
        warn!("Rate limit exceeded for client: {}", client);
        return Err(AppError::too_many_requests(defaults::TOO_MANY_REQUESTS));
    }

    Ok(next.run(req).await)
}
