//! Dashboard statistics endpoint

use shared::DashboardStats;

use crate::ClientResult;
use crate::http::HttpClient;

/// `/statistics` resource
pub struct StatisticsApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> StatisticsApi<'a, C> {
    pub(crate) fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// `GET /statistics`
    pub async fn dashboard(&self) -> ClientResult<DashboardStats> {
        self.http.get("/statistics").await
    }
}
