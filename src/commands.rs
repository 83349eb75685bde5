/// Available commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "companies",
    aliases: &["c", "co", "company"],
    description: "Company dashboard",
  },
  Command {
    name: "users",
    aliases: &["u", "user"],
    description: "All users",
  },
  Command {
    name: "professionals",
    aliases: &["p", "pros", "pro"],
    description: "Professional accounts",
  },
  Command {
    name: "offers",
    aliases: &["o", "offer"],
    description: "Offers and events",
  },
  Command {
    name: "plans",
    aliases: &["pl", "plan", "subscriptions"],
    description: "Subscription plans",
  },
  Command {
    name: "payments",
    aliases: &["pay", "payment"],
    description: "My subscription payments",
  },
  Command {
    name: "wallet",
    aliases: &["w", "requests", "cagnotte"],
    description: "Wallet requests (admin)",
  },
  Command {
    name: "history",
    aliases: &["h", "transactions"],
    description: "Wallet history (admin)",
  },
  Command {
    name: "stats",
    aliases: &["s", "statistics", "dashboard"],
    description: "Platform statistics",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit backoffice",
  },
];

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    // Exact match on name
    if cmd.name == input_lower {
      matches.push((cmd, 0));
      continue;
    }

    // Exact match on alias
    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    // Prefix match on name
    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    // Prefix match on alias
    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    // Fuzzy match (contains)
    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
      continue;
    }

    if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((cmd, 5));
    }
  }

  // Stable, so equal priorities keep declaration order
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}
