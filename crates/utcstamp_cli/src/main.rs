//! Smoke CLI for the UTC datetime codec.
//!
//! # Usage
//! - `utcstamp` prints the core version.
//! - `utcstamp encode <rfc3339> [precision]`
//! - `utcstamp decode <stored-text>`
//! - `utcstamp now [precision]`

use chrono::{DateTime, Utc};
use std::process::ExitCode;
use utcstamp_core::{canonical_utc, decode, encode, encode_now, Precision, SystemClock};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &[String]) -> Result<String, String> {
    match args.first().map(String::as_str) {
        None => Ok(format!("utcstamp_core version={}", utcstamp_core::core_version())),
        Some("encode") => {
            let input = args.get(1).ok_or("encode requires an RFC 3339 instant")?;
            let instant = DateTime::parse_from_rfc3339(input)
                .map_err(|err| format!("invalid instant `{input}`: {err}"))?
                .with_timezone(&Utc);
            Ok(encode(&instant, parse_precision(args.get(2))?))
        }
        Some("decode") => {
            let input = args.get(1).ok_or("decode requires stored datetime text")?;
            let instant = decode(input).map_err(|err| err.to_string())?;
            Ok(canonical_utc(&instant))
        }
        Some("now") => Ok(encode_now(&SystemClock, parse_precision(args.get(1))?)),
        Some(other) => Err(format!(
            "unknown command `{other}`; expected encode|decode|now"
        )),
    }
}

fn parse_precision(arg: Option<&String>) -> Result<Precision, String> {
    let Some(raw) = arg else {
        return Ok(Precision::default());
    };
    let digits: u8 = raw
        .parse()
        .map_err(|_| format!("precision must be a small integer, got `{raw}`"))?;
    Precision::new(digits).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::run;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn encode_and_decode_commands() {
        assert_eq!(
            run(&args(&["encode", "2024-03-15T17:30:45.678+09:00", "2"])).unwrap(),
            "2024-03-15 08:30:45.67"
        );
        assert_eq!(
            run(&args(&["decode", "2024-03-15 08:30:45"])).unwrap(),
            "2024-03-15T08:30:45.000Z"
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!(run(&args(&["encode", "2024-03-15T08:30:45Z", "5"])).is_err());
        assert!(run(&args(&["decode", "yesterday"])).is_err());
        assert!(run(&args(&["frobnicate"])).is_err());
    }
}
