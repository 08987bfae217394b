use tracing::info;

use super::PortalState;
use crate::api::{ApiError, PortalClient};
use crate::models::{security_question_prompt, NextOfKin};

/// Parse `name | relationship | phone [| email]`
pub fn parse_next_of_kin(input: &str) -> Result<NextOfKin, String> {
    let parts: Vec<&str> = input.split('|').map(str::trim).collect();
    if parts.len() < 3 || parts[..3].iter().any(|p| p.is_empty()) {
        return Err("❌ Usage: `kin set <full name> | <relationship> | <phone> [| <email>]`".to_string());
    }

    let phone = parts[2];
    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '))
    {
        return Err("❌ Phone number may only contain digits, spaces, '+' and '-'".to_string());
    }

    Ok(NextOfKin {
        full_name: parts[0].to_string(),
        relationship: parts[1].to_string(),
        phone_number: phone.to_string(),
        email: parts.get(3).filter(|e| !e.is_empty()).map(|e| e.to_string()),
        address: None,
    })
}

pub async fn update_next_of_kin(
    client: &PortalClient,
    state: &mut PortalState,
    kin: NextOfKin,
) -> Result<NextOfKin, String> {
    let mut profile = state
        .profile()
        .cloned()
        .ok_or("Please log in first".to_string())?;

    let saved = client
        .update_next_of_kin(&kin)
        .await
        .map_err(|e| match e {
            ApiError::Rejected(messages) => messages.join(" "),
            other => format!("Failed to update next of kin: {}", other),
        })?;

    profile.next_of_kin = Some(saved.clone());
    state.set_profile(profile);
    info!("Next of kin updated");
    Ok(saved)
}

pub fn create_profile_view(state: &PortalState) -> Result<String, String> {
    let profile = state.profile().ok_or("Please log in first".to_string())?;

    let mut view = format!(
        "👤 Profile\nName: {}\nEmail: {}\nRole: {}\nSecurity question: {}",
        profile.full_name(),
        profile.email,
        profile.role.name(),
        security_question_prompt(profile.security_question.as_deref()),
    );

    match &profile.next_of_kin {
        Some(kin) => {
            view.push_str(&format!(
                "\nNext of kin: {} ({}), {}",
                kin.full_name, kin.relationship, kin.phone_number
            ));
            if let Some(email) = &kin.email {
                view.push_str(&format!(", {}", email));
            }
        }
        None => view.push_str("\nNext of kin: not set"),
    }

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Profile, Role};

    #[test]
    fn test_parse_next_of_kin() {
        let kin = parse_next_of_kin("Ram Sharma | brother | +977 9800000000 | ram@example.np").unwrap();
        assert_eq!(kin.full_name, "Ram Sharma");
        assert_eq!(kin.relationship, "brother");
        assert_eq!(kin.email.as_deref(), Some("ram@example.np"));

        assert!(parse_next_of_kin("Ram | brother").is_err());
        assert!(parse_next_of_kin("Ram | | 98000").is_err());
        assert!(parse_next_of_kin("Ram | brother | call me").is_err());
    }

    #[test]
    fn test_profile_view() {
        let mut state = PortalState::default();
        assert!(create_profile_view(&state).is_err());

        state.set_profile(Profile {
            email: "sita@example.np".into(),
            first_name: "Sita".into(),
            last_name: "Sharma".into(),
            role: Role::Customer,
            security_question: Some("birth_city".into()),
            next_of_kin: None,
        });
        let view = create_profile_view(&state).unwrap();
        assert!(view.contains("Sita Sharma"));
        assert!(view.contains("In what city were you born?"));
        assert!(view.contains("Next of kin: not set"));
    }
}
