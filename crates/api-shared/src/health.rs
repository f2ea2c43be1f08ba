use crate::dto::HealthRes;

/// Health check shared by the REST server and the combined runner.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Static health check; does not require an instance.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Odonto is alive".into(),
        }
    }
}
