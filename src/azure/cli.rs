//! Azure CLI command execution.
//!
//! Every remote call in the audit goes through [`run`], which executes one
//! `az` command line and returns its stdout.

use crate::error::{AuditError, AuditResult};
use colored::Colorize;
use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;

/// Upper bound on accepted stdout size. `az resource list` on a large
/// subscription stays well below this; anything bigger is a runaway query.
const MAX_STDOUT_BYTES: usize = 8_000_000;

/// Regex for splitting command strings while preserving quoted substrings.
static ARG_REGEX: OnceLock<Regex> = OnceLock::new();

fn arg_regex() -> &'static Regex {
    ARG_REGEX.get_or_init(|| {
        Regex::new(r#"'([^']*)'\s*|\"([^\"]*)\"\s*|([^'\s]*)\s*"#).expect("Invalid Regex")
    })
}

/// Run a command line and return its stdout.
///
/// The string is split on whitespace with quoted substrings kept intact,
/// so resource ids and type filters can be passed single-quoted.
///
/// # Arguments
/// * `cmd` - The full command line, e.g. `az account list --output json`
///
/// # Returns
/// * `Ok(String)` - stdout on success
/// * `Err` - spawn failure, non-zero exit, or oversized/invalid output
pub fn run(cmd: &str) -> AuditResult<String> {
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let args: Vec<&str> = split_args(cmd);
    log::trace!("split args={:?}", args);

    let program = args
        .first()
        .filter(|program| !program.is_empty())
        .ok_or_else(|| AuditError::Cli("empty command line".to_string()))?;

    let mut command = Command::new(program);
    for arg in args.iter().skip(1) {
        command.arg(arg);
    }

    let output = command
        .output()
        .map_err(|e| AuditError::Cli(format!("failed to spawn '{program}': {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\nstderr=\n{stderr}",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(AuditError::Cli(format!(
            "exit {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }

    if output.stdout.len() > MAX_STDOUT_BYTES {
        return Err(AuditError::Cli(format!(
            "response too large: {} bytes from: {cmd}",
            output.stdout.len()
        )));
    }
    log::debug!("ok, stdout {} bytes", output.stdout.len());

    String::from_utf8(output.stdout).map_err(|e| AuditError::Cli(format!("invalid UTF-8: {e}")))
}

/// Split a command line on whitespace, preserving quoted substrings.
fn split_args(input: &str) -> Vec<&str> {
    arg_regex()
        .find_iter(input)
        .map(|m| m.as_str().trim().trim_matches('\'').trim_matches('"'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args_plain() {
        let input = "az account list --output json";
        assert_eq!(split_args(input), vec!["az", "account", "list", "--output", "json"]);
    }

    #[test]
    fn test_split_args_quoted_resource_id() {
        let input = "az monitor diagnostic-settings list --resource '/subscriptions/s1/resourceGroups/rg one/providers/Microsoft.Sql/servers/db'";
        assert_eq!(
            split_args(input),
            vec![
                "az",
                "monitor",
                "diagnostic-settings",
                "list",
                "--resource",
                "/subscriptions/s1/resourceGroups/rg one/providers/Microsoft.Sql/servers/db",
            ]
        );
    }

    #[test]
    fn test_split_args_double_quoted_filter() {
        let input = "az resource list --resource-type \"Microsoft.KeyVault/vaults\"";
        assert_eq!(
            split_args(input),
            vec!["az", "resource", "list", "--resource-type", "Microsoft.KeyVault/vaults"]
        );
    }

    #[test]
    fn test_run_rejects_empty_command() {
        assert!(run("").is_err());
    }
}
