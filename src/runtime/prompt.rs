//! Prompts for a briefing session.

use chrono::NaiveDate;

/// Briefing instructions for the model, titled with `date`.
pub fn system_prompt(date: NaiveDate, tool_name: &str) -> String {
    format!(
        "You are an assistant that turns a set of web sources into a short, professional briefing.\n\
         \n\
         1. Use the {tool_name} tool to read every URL the user provides.\n\
         2. Group the sources by topic and extract the key claims, figures and viewpoints of each.\n\
         3. Write a briefing of at most 800 words titled \"{date} Briefing\": \
         an overview, three or four topical sections with their sources noted, \
         and a short outlook on the trends that cut across sources.\n\
         \n\
         Merge duplicate information, keep facts apart from analysis, and lead with what matters most.",
        date = date.format("%Y-%m-%d"),
    )
}

/// User prompt asking for a briefing over `urls`, numbered from 1.
pub fn briefing_prompt(urls: &[String], tool_name: &str) -> String {
    let list = urls
        .iter()
        .enumerate()
        .map(|(i, url)| format!("{}. {url}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Please prepare a briefing from the following URLs:\n\n{list}\n\n\
         Read each one with the {tool_name} tool and follow the briefing structure from your instructions."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_numbers_urls_from_one() {
        let prompt = briefing_prompt(
            &["https://a.test".to_string(), "https://b.test".to_string()],
            "jinaReader",
        );
        assert!(prompt.contains("1. https://a.test\n2. https://b.test"));
        assert!(prompt.contains("jinaReader"));
    }

    #[test]
    fn system_prompt_is_dated() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let prompt = system_prompt(date, "jinaReader");
        assert!(prompt.contains("2025-03-09 Briefing"));
        assert!(prompt.contains("jinaReader tool"));
    }
}
