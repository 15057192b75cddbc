//! Access lists (`qconf -su`).

use serde::Serialize;
use tracing::warn;

use crate::config::QtoolsConfig;
use crate::error::{QtoolsError, QtoolsResult};
use crate::runner::{run_checked, CommandRunner};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserList {
    pub name: String,
    /// `ACL`, `DEPT` or both.
    pub kind: String,
    pub fshare: i32,
    pub oticket: i32,
    pub entries: Vec<String>,
}

/// Parse one `qconf -su` block of exactly five `key value` lines.
pub fn parse_user_list(text: &str) -> QtoolsResult<UserList> {
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() != 5 {
        return Err(QtoolsError::UserList(format!(
            "expected 5 lines, got {}",
            lines.len()
        )));
    }

    let name = value_of(lines[0], "name")?;
    let kind = value_of(lines[1], "type")?;
    let fshare = int_value_of(lines[2], "fshare")?;
    let oticket = int_value_of(lines[3], "oticket")?;
    let entries = value_of(lines[4], "entries")?
        .split(',')
        .map(str::to_string)
        .collect();

    Ok(UserList {
        name,
        kind,
        fshare,
        oticket,
        entries,
    })
}

/// Fetch and parse the named access lists with one `qconf -su a,b,c` call.
pub async fn get_user_lists(
    runner: &dyn CommandRunner,
    config: &QtoolsConfig,
    names: &[String],
) -> QtoolsResult<Vec<UserList>> {
    if names.is_empty() {
        return Err(QtoolsError::UserList("no user list names given".to_string()));
    }
    let qconf = config.sge_binary("qconf")?;
    let program = qconf.to_string_lossy();
    let output = run_checked(runner, &program, vec!["-su".to_string(), names.join(",")]).await?;

    output
        .stdout
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| {
            parse_user_list(block).inspect_err(|e| warn!("Error during parsing user list: {}\n{}", e, block))
        })
        .collect()
}

fn value_of(line: &str, key: &str) -> QtoolsResult<String> {
    let rest = line
        .trim_start()
        .strip_prefix(key)
        .filter(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        .ok_or_else(|| QtoolsError::UserList(format!("missing '{}' in line '{}'", key, line)))?;
    Ok(rest.trim().to_string())
}

fn int_value_of(line: &str, key: &str) -> QtoolsResult<i32> {
    let value = value_of(line, key)?;
    value
        .parse()
        .map_err(|e| QtoolsError::UserList(format!("{} '{}': {}", key, value, e)))
}
