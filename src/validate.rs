//! Validators for values once they have been read.

use crate::error::ValueError;
use crate::parse::parse_integer;
use regex_lite::Regex;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::path::Path;

/// Check `value` is one of `choices`.
pub fn is_one_of<T>(value: &T, choices: &[T]) -> Result<(), ValueError>
where
    T: PartialEq + fmt::Display,
{
    if choices.contains(value) {
        return Ok(());
    }
    Err(ValueError::not_one_of(value, choices))
}

/// Check every value is one of `choices`.
pub fn are_all_one_of<T>(values: &[T], choices: &[T]) -> Result<(), ValueError>
where
    T: Eq + Hash + fmt::Display,
{
    if !values.is_empty() && choices.is_empty() {
        return Err(ValueError::NoChoices);
    }

    let set: HashSet<&T> = choices.iter().collect();
    match values.iter().find(|value| !set.contains(value)) {
        Some(value) => Err(ValueError::not_one_of(value, choices)),
        None => Ok(()),
    }
}

/// Like [`are_all_one_of`], ignoring case.
pub fn are_all_one_of_case_insensitive<S: AsRef<str>>(
    values: &[S],
    choices: &[S],
) -> Result<(), ValueError> {
    if !values.is_empty() && choices.is_empty() {
        return Err(ValueError::NoChoices);
    }

    let set: HashSet<String> = choices.iter().map(|c| c.as_ref().to_lowercase()).collect();
    for value in values {
        if !set.contains(&value.as_ref().to_lowercase()) {
            let choices: Vec<&str> = choices.iter().map(AsRef::as_ref).collect();
            return Err(ValueError::not_one_of(value.as_ref(), &choices));
        }
    }
    Ok(())
}

/// Check `min <= n <= max`.
pub fn number_between<T>(n: T, min: T, max: T) -> Result<(), ValueError>
where
    T: PartialOrd + fmt::Display,
{
    if n < min || n > max {
        return Err(ValueError::out_of_range(n, min, max));
    }
    Ok(())
}

pub fn match_regex(value: &str, regex: &Regex) -> Result<(), ValueError> {
    if regex.is_match(value) {
        return Ok(());
    }
    Err(ValueError::RegexMismatch {
        value: value.to_string(),
        pattern: regex.as_str().to_string(),
    })
}

pub fn all_match_regex<S: AsRef<str>>(values: &[S], regex: &Regex) -> Result<(), ValueError> {
    values
        .iter()
        .try_for_each(|value| match_regex(value.as_ref(), regex))
}

/// Check `path` exists, is not a directory and can be opened.
pub fn file_exists(path: impl AsRef<Path>) -> Result<(), ValueError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(ValueError::FileNotFound { path: display });
        }
        Err(err) => {
            return Err(ValueError::FileUnreadable {
                path: display,
                reason: err.to_string(),
            });
        }
    };

    if metadata.is_dir() {
        return Err(ValueError::PathIsDirectory { path: display });
    }

    std::fs::File::open(path).map_err(|err| ValueError::FileUnreadable {
        path: display,
        reason: err.to_string(),
    })?;

    Ok(())
}

const UNPRIVILEGED_PORT_START_PATH: &str = "/proc/sys/net/ipv4/ip_unprivileged_port_start";
const DEFAULT_UNPRIVILEGED_PORT_START: u16 = 1024;
const CAP_NET_BIND_SERVICE: u32 = 10;

/// Check a `host:port` address can be listened on by user `uid`.
///
/// An empty address and port 0 are always valid. Uid 0 (root) and -1
/// (Windows) may use any port. Other users need a port at or above the
/// kernel's unprivileged port start, or the `CAP_NET_BIND_SERVICE`
/// capability.
pub fn listening_address(address: &str, uid: i64) -> Result<(), ValueError> {
    if address.is_empty() {
        return Ok(());
    }

    let (_, port) = split_host_port(address)?;
    check_port(port, uid, unprivileged_port_start, has_net_bind_service)
}

fn check_port<S, C>(value: &str, uid: i64, port_start: S, capable: C) -> Result<(), ValueError>
where
    S: FnOnce() -> Result<u16, ValueError>,
    C: FnOnce() -> Result<bool, ValueError>,
{
    let port: u16 = parse_integer(value)?;
    if port == 0 || uid == 0 || uid == -1 {
        return Ok(());
    }

    let unprivileged_start = port_start()?;
    if port >= unprivileged_start || capable()? {
        return Ok(());
    }

    Err(ValueError::PrivilegedPort {
        port,
        uid,
        unprivileged_start,
    })
}

/// Split `host:port` or `[ipv6]:port`.
fn split_host_port(address: &str) -> Result<(&str, &str), ValueError> {
    let missing_port = || ValueError::malformed(address, "listening address", "missing port");

    if let Some(rest) = address.strip_prefix('[') {
        let (host, after) = rest.split_once(']').ok_or_else(|| {
            ValueError::malformed(address, "listening address", "missing ']'")
        })?;
        let port = after.strip_prefix(':').ok_or_else(missing_port)?;
        return Ok((host, port));
    }

    let (host, port) = address.rsplit_once(':').ok_or_else(missing_port)?;
    if host.contains(':') {
        return Err(ValueError::malformed(
            address,
            "listening address",
            "too many colons",
        ));
    }
    Ok((host, port))
}

/// First port unprivileged users may bind, 1024 when procfs does not say.
fn unprivileged_port_start() -> Result<u16, ValueError> {
    match std::fs::read_to_string(UNPRIVILEGED_PORT_START_PATH) {
        Ok(content) => parse_integer(content.trim_end()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            Ok(DEFAULT_UNPRIVILEGED_PORT_START)
        }
        Err(err) => Err(ValueError::FileUnreadable {
            path: UNPRIVILEGED_PORT_START_PATH.to_string(),
            reason: err.to_string(),
        }),
    }
}

/// Whether the process holds `CAP_NET_BIND_SERVICE` in both its effective
/// and permitted sets. False where `/proc/self/status` does not exist.
fn has_net_bind_service() -> Result<bool, ValueError> {
    const STATUS_PATH: &str = "/proc/self/status";
    match std::fs::read_to_string(STATUS_PATH) {
        Ok(status) => Ok(status_has_capability(&status, CAP_NET_BIND_SERVICE)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(ValueError::FileUnreadable {
            path: STATUS_PATH.to_string(),
            reason: err.to_string(),
        }),
    }
}

fn status_has_capability(status: &str, capability: u32) -> bool {
    let has = |field: &str| {
        status
            .lines()
            .find_map(|line| line.strip_prefix(field))
            .and_then(|mask| u64::from_str_radix(mask.trim(), 16).ok())
            .is_some_and(|mask| mask & (1 << capability) != 0)
    };
    has("CapEff:") && has("CapPrm:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_is_one_of() {
        assert!(is_one_of(&"tcp", &["tcp", "udp"]).is_ok());
        let err = is_one_of(&"icmp", &["tcp", "udp"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value is not one of the possible choices: icmp must be one of tcp or udp"
        );
    }

    #[test]
    fn test_are_all_one_of() {
        assert!(are_all_one_of(&[1, 2], &[1, 2, 3]).is_ok());
        assert!(are_all_one_of::<i32>(&[], &[]).is_ok());
        assert_eq!(are_all_one_of(&[1], &[]).unwrap_err(), ValueError::NoChoices);
        let err = are_all_one_of(&[1, 4], &[1, 2, 3]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotOneOf);
        assert!(err.to_string().contains("4 must be one of 1, 2 or 3"));
    }

    #[test]
    fn test_are_all_one_of_case_insensitive() {
        assert!(are_all_one_of_case_insensitive(&["TCP", "udp"], &["tcp", "UDP"]).is_ok());
        assert!(are_all_one_of_case_insensitive(&["sctp"], &["tcp", "udp"]).is_err());
        assert_eq!(
            are_all_one_of_case_insensitive(&["x"], &[] as &[&str]).unwrap_err(),
            ValueError::NoChoices
        );
    }

    #[test]
    fn test_number_between() {
        assert!(number_between(5, 1, 10).is_ok());
        assert!(number_between(1, 1, 10).is_ok());
        assert!(number_between(10, 1, 10).is_ok());
        let err = number_between(11, 1, 10).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value is not in range: 11 is not between 1 and 10"
        );
        assert!(number_between(0.5, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_match_regex() {
        let regex = Regex::new(r"^[a-z]+$").unwrap();
        assert!(match_regex("abc", &regex).is_ok());
        assert_eq!(
            match_regex("ab1", &regex).unwrap_err().code(),
            ErrorCode::RegexMismatch
        );
        assert!(all_match_regex(&["a", "b"], &regex).is_ok());
        assert!(all_match_regex(&["a", "B"], &regex).is_err());
    }

    #[test]
    fn test_file_exists() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("settings.txt");
        std::fs::write(&file, "content").unwrap();

        assert!(file_exists(&file).is_ok());
        assert_eq!(
            file_exists(temp.path()).unwrap_err().code(),
            ErrorCode::PathIsDirectory
        );
        assert_eq!(
            file_exists(temp.path().join("missing")).unwrap_err().code(),
            ErrorCode::FileNotFound
        );
    }

    #[test]
    fn test_listening_address_valid() {
        assert!(listening_address("", 1000).is_ok());
        assert!(listening_address("1.2.3.4:0", 1000).is_ok());
        assert!(listening_address(":65535", 1000).is_ok());
        assert!(listening_address("[::1]:65535", 1000).is_ok());
        // Root and Windows may use any port
        assert!(listening_address("1.2.3.4:1", 0).is_ok());
        assert!(listening_address("1.2.3.4:1", -1).is_ok());
    }

    #[test]
    fn test_listening_address_malformed() {
        let addresses = [
            "1.2.3.4",
            "1.2.3.4:x",
            "1.2.3.4:-1",
            "1.2.3.4:+80",
            "::1:80",
            "[::1]80",
        ];
        for address in addresses {
            assert_eq!(
                listening_address(address, 1000).unwrap_err().code(),
                ErrorCode::MalformedValue,
                "address {address}"
            );
        }
        let err = listening_address("1.2.3.4:65537", 1000).unwrap_err();
        assert_eq!(err.code(), ErrorCode::OutOfRange);
    }

    #[test]
    fn test_privileged_port() {
        let err = check_port("80", 1000, || Ok(1024), || Ok(false)).unwrap_err();
        assert_eq!(
            err,
            ValueError::PrivilegedPort {
                port: 80,
                uid: 1000,
                unprivileged_start: 1024,
            }
        );
        assert!(check_port("80", 1000, || Ok(1024), || Ok(true)).is_ok());
        assert!(check_port("80", 0, || Ok(1024), || Ok(false)).is_ok());
        assert!(check_port("80", 1000, || Ok(80), || panic!("capabilities checked")).is_ok());
        assert!(check_port("0", 1000, || panic!("port start read"), || Ok(false)).is_ok());
    }

    #[test]
    fn test_status_has_capability() {
        let status = "Name:\tapp\nCapPrm:\t0000000000000400\nCapEff:\t0000000000000400\n";
        assert!(status_has_capability(status, CAP_NET_BIND_SERVICE));

        let effective_only = "CapPrm:\t0000000000000000\nCapEff:\t0000000000000400\n";
        assert!(!status_has_capability(effective_only, CAP_NET_BIND_SERVICE));
        assert!(!status_has_capability("Name:\tapp\n", CAP_NET_BIND_SERVICE));
    }
}
