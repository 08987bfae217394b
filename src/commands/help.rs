/// Section title and lines; each line is `usage - description`
const SECTIONS: &[(&str, &[&str])] = &[
    (
        "🎯 General",
        &[
            "`help [section]` - Show this help message",
            "`login <email> <password>` - Start a session",
            "`logout` - End the session",
            "`quit` - Leave the portal",
        ],
    ),
    (
        "🏦 Accounts",
        &[
            "`dashboard` - Overview for your role",
            "`accounts` - List your accounts and balances",
            "`transactions [page]` - Transaction history, 10 per page",
            "`refresh` - Reload accounts, history and cards",
        ],
    ),
    (
        "💳 Cards",
        &[
            "`cards` - List your cards",
            "`card block <id>` / `card unblock <id>` - Change a card's status",
        ],
    ),
    (
        "👤 Profile",
        &[
            "`profile` - Show your profile",
            "`kin set <name> | <relationship> | <phone> [| <email>]` - Set next of kin",
        ],
    ),
    (
        "💸 Transfers",
        &[
            "`transfer <from> <to> <amount> <description>` - Start a transfer",
            "`answer <text>` - Answer your security question",
            "`otp <digits>` or just the digits - Type the emailed code; 6 digits verify automatically",
            "`otp clear` - Clear the code field",
            "`verify` - Verify the code in the field",
            "`resend` - Request a new code",
            "`back` - Abandon the transfer and return to the form",
            "`status` - Show the transfer in progress",
        ],
    ),
];

pub fn execute(args: &[&str]) -> Result<String, String> {
    let filter = args.first().map(|s| s.to_lowercase());

    let sections: Vec<String> = SECTIONS
        .iter()
        .filter(|(title, _)| {
            filter
                .as_deref()
                .map_or(true, |f| title.to_lowercase().contains(f))
        })
        .map(|(title, lines)| format!("{}\n  {}", title, lines.join("\n  ")))
        .collect();

    if sections.is_empty() {
        return Err(format!(
            "❌ No help section matches `{}`",
            filter.unwrap_or_default()
        ));
    }

    Ok(format!("📖 Portal Commands\n\n{}", sections.join("\n\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_and_filtered_help() {
        let full = execute(&[]).unwrap();
        assert!(full.contains("Transfers"));
        assert!(full.contains("Cards"));

        let cards = execute(&["cards"]).unwrap();
        assert!(cards.contains("card block"));
        assert!(!cards.contains("answer <text>"));

        assert!(execute(&["loans"]).is_err());
    }
}
