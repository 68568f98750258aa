//! Owner and group names resolved to numeric ids
use crate::error::ConfigError;
use log::debug;
use nix::unistd::{Group, User};

/// Resolves a user name to a uid. A name unknown to the user database that is a
/// plain decimal number is taken as the uid itself, like `find -user 1000`.
pub fn resolve_user(name: &str) -> Result<u32, ConfigError> {
    match User::from_name(name) {
        Ok(Some(user)) => return Ok(user.uid.as_raw()),
        Ok(None) => {}
        Err(e) => debug!("user lookup for '{name}' failed: {e}"),
    }
    parse_numeric_id(name).ok_or_else(|| ConfigError::UnknownUser(name.to_string()))
}

/// Resolves a group name to a gid, with the same numeric fallback as [`resolve_user`].
pub fn resolve_group(name: &str) -> Result<u32, ConfigError> {
    match Group::from_name(name) {
        Ok(Some(group)) => return Ok(group.gid.as_raw()),
        Ok(None) => {}
        Err(e) => debug!("group lookup for '{name}' failed: {e}"),
    }
    parse_numeric_id(name).ok_or_else(|| ConfigError::UnknownGroup(name.to_string()))
}

fn parse_numeric_id(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}
