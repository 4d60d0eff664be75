// Application state for HTTP handlers
use crate::application::session::DashboardSession;

#[derive(Clone)]
pub struct AppState {
    pub session: DashboardSession,
}
