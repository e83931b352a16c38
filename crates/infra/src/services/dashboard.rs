//! Dashboard metrics service (REST dialect, single document)

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::DashboardGateway;
use fleetline_domain::constants::CACHE_TTL_SHORT_SECS;
use fleetline_domain::{ApiError, DashboardMetrics};
use serde::Deserialize;

use super::DASHBOARD_PATH;
use crate::api::{ApiClient, CallOptions};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DashboardRecord {
    active_trips: u32,
    total_drivers: u32,
    total_routes: u32,
    total_students: u32,
    on_time_rate: f64,
    alerts_today: u32,
    generated_at: DateTime<Utc>,
}

fn map_dashboard(record: DashboardRecord) -> DashboardMetrics {
    DashboardMetrics {
        active_trips: record.active_trips,
        total_drivers: record.total_drivers,
        total_routes: record.total_routes,
        total_students: record.total_students,
        on_time_rate: record.on_time_rate,
        alerts_today: record.alerts_today,
        generated_at: record.generated_at,
    }
}

/// Dashboard gateway over the shared API client.
///
/// The aggregate is volatile, so it carries the short TTL class; on top of
/// that, every mutation service flushes it eagerly.
pub struct DashboardService<C = SystemClock>
where
    C: Clock + Clone,
{
    api: Arc<ApiClient<C>>,
}

impl<C> DashboardService<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(api: Arc<ApiClient<C>>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<C> DashboardGateway for DashboardService<C>
where
    C: Clock + Clone + 'static,
{
    async fn get(&self) -> Result<DashboardMetrics, ApiError> {
        let options = CallOptions::new().max_age(Duration::from_secs(CACHE_TTL_SHORT_SECS));
        let record: DashboardRecord = self.api.get(DASHBOARD_PATH, options).await?;
        Ok(map_dashboard(record))
    }
}
