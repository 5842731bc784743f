//! Per-IP fixed-window rate limiting, in process. The window map lives
//! behind an async `RwLock`; every check sweeps out expired windows so the
//! map cannot grow without bound under IP churn.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::state::AppState;

pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: RwLock<HashMap<IpAddr, (Instant, u32)>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// True if the request is admitted. A fresh window starts at the first
    /// request after the previous one expires.
    pub async fn check(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.write().await;
        windows.retain(|_, (start, _)| now.duration_since(*start) < self.window);

        let entry = windows.entry(ip).or_insert((now, 0));
        if entry.1 >= self.max_requests {
            return false;
        }
        entry.1 += 1;
        true
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.windows.read().await.len()
    }
}

pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // ConnectInfo is absent when the router is driven outside a real
    // listener (oneshot in tests); fail open in that case.
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if let Some(ip) = ip {
        if !state.limiter.check(ip).await {
            return Err(AppError::RateLimited);
        }
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn admits_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let ip: IpAddr = "10.0.0.1".parse().unwrap();

        for _ in 0..3 {
            assert!(limiter.check(ip).await);
        }
        assert!(!limiter.check(ip).await);
    }

    #[tokio::test]
    async fn tracks_ips_independently() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let a: IpAddr = "10.0.0.1".parse().unwrap();
        let b: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check(a).await);
        assert!(!limiter.check(a).await);
        assert!(limiter.check(b).await);
    }

    #[tokio::test]
    async fn expired_windows_are_evicted() {
        let limiter = RateLimiter::new(5, Duration::from_millis(10));
        for last in 1..=20u8 {
            let ip = IpAddr::from([10, 0, 1, last]);
            assert!(limiter.check(ip).await);
        }
        assert_eq!(limiter.tracked().await, 20);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(limiter.check("10.0.2.1".parse().unwrap()).await);
        assert_eq!(limiter.tracked().await, 1);
    }

    #[tokio::test]
    async fn window_rolls_over() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));
        let ip: IpAddr = "10.0.0.3".parse().unwrap();

        assert!(limiter.check(ip).await);
        assert!(!limiter.check(ip).await);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(limiter.check(ip).await);
    }
}
