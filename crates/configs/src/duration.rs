//! Human-friendly durations such as `24h`, `30m`, `90s`, `7d`, compound
//! values like `1h30m`, or bare seconds.

use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer};

pub fn parse(input: &str) -> Result<Duration> {
    let s = input.trim();
    if s.is_empty() {
        return Err(anyhow!("empty duration"));
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        let secs: u64 = s.parse().map_err(|_| anyhow!("invalid duration {input:?}"))?;
        return Ok(Duration::from_secs(secs));
    }

    // One or more `<digits><unit>` segments, summed: `1h30m`, `2d12h`.
    let mut total: u64 = 0;
    let mut rest = s;
    while !rest.is_empty() {
        let split = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (digits, tail) = rest.split_at(split);
        if digits.is_empty() {
            return Err(anyhow!("invalid duration {input:?}"));
        }
        let value: u64 = digits.parse().map_err(|_| anyhow!("invalid duration {input:?}"))?;
        let unit_len = tail.find(|c: char| c.is_ascii_digit()).unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);
        let scale = match unit {
            "s" => 1,
            "m" => 60,
            "h" => 3600,
            "d" => 86_400,
            "" => return Err(anyhow!("missing unit after {digits} in {input:?}")),
            _ => return Err(anyhow!("unknown duration unit in {input:?} (use s, m, h or d)")),
        };
        total = value
            .checked_mul(scale)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(|| anyhow!("duration {input:?} overflows"))?;
        rest = next;
    }
    Ok(Duration::from_secs(total))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Secs(u64),
    Text(String),
}

/// serde adapter accepting either an integer number of seconds or a string.
pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match Raw::deserialize(deserializer)? {
        Raw::Secs(s) => Ok(Duration::from_secs(s)),
        Raw::Text(t) => parse(&t).map_err(serde::de::Error::custom),
    }
}
