use crate::services::profile_service;
use crate::session::Session;

pub fn execute(session: &Session) -> Result<String, String> {
    profile_service::create_profile_view(&session.state)
}

pub async fn next_of_kin(session: &mut Session, args: &[&str]) -> Result<String, String> {
    match args.split_first() {
        Some((&"set", rest)) => {
            let kin = profile_service::parse_next_of_kin(&rest.join(" "))?;
            let saved =
                profile_service::update_next_of_kin(&session.client, &mut session.state, kin).await?;
            Ok(format!(
                "✅ Next of kin set to {} ({})",
                saved.full_name, saved.relationship
            ))
        }
        None => profile_service::create_profile_view(&session.state),
        _ => Err("❌ Usage: `kin set <name> | <relationship> | <phone> [| <email>]`".to_string()),
    }
}
