use crate::services::dashboard_service;
use crate::session::Session;

pub fn execute(session: &Session) -> Result<String, String> {
    dashboard_service::create_dashboard(&session.state)
}
