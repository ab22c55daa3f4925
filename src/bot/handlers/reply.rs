//! Reply helpers - Discord message limits and user input parsing.

use crate::{
    bot::BotData,
    errors::{Error, Result},
};
use chrono::NaiveDate;

/// Maximum characters Discord accepts in one message
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

/// Splits `text` into chunks of at most `limit` characters, preferring line breaks.
#[must_use]
pub fn split_reply(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        for ch in line.chars() {
            if current_len == limit {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(ch);
            current_len += 1;
        }
        // start a new chunk at a line break once the next line may not fit
        if current_len > limit / 2 {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Sends `text`, split across several messages when it is too long.
pub async fn say_long(ctx: poise::Context<'_, BotData, Error>, text: &str) -> Result<()> {
    for chunk in split_reply(text, DISCORD_MESSAGE_LIMIT) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

/// Parses `YYYY-MM-DD` or `DD/MM/YYYY`.
#[must_use]
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_reply_short_text() {
        assert_eq!(split_reply("Olá", 2000), vec!["Olá"]);
        assert!(split_reply("", 2000).is_empty());
    }

    #[test]
    fn test_split_reply_respects_limit() {
        let text = "linha de teste\n".repeat(300);
        let chunks = split_reply(&text, 2000);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= 2000));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_reply_long_line() {
        let text = "é".repeat(4500);
        let chunks = split_reply(&text, 2000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_date("2024-03-15"), expected);
        assert_eq!(parse_date(" 15/03/2024 "), expected);
        assert_eq!(parse_date("março"), None);
    }
}
