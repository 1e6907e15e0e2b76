//! External tool commands.
//!
//! A [`ToolCommand`] is the argument array configured for one collaborator
//! (layered-image converter, background remover, WebP encoder). Placeholders
//! are substituted per file before the process is started:
//!
//! | Placeholder | Value                             |
//! |-------------|-----------------------------------|
//! | `$INPUT`    | file being processed              |
//! | `$OUTPUT`   | file the tool must write          |
//! | `$QUALITY`  | lossy quality (encode stage only) |

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Result, bail};
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::utils::exec::{Cmd, ToolError, ToolOutput};

/// Placeholder name -> value.
pub type ToolVars = FxHashMap<&'static str, String>;

/// Variables for a single input/output pair.
pub fn file_vars(input: &Path, output: &Path) -> ToolVars {
    let mut vars = ToolVars::default();
    vars.insert("INPUT", input.display().to_string());
    vars.insert("OUTPUT", output.display().to_string());
    vars
}

/// Program plus arguments, as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolCommand(Vec<String>);

impl ToolCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.first().is_none_or(|program| program.trim().is_empty())
    }

    /// Program name (first element).
    pub fn program(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    /// Replace `$NAME` occurrences with values from `vars`.
    ///
    /// Each argument is scanned once, so a substituted value is never
    /// expanded again. Unknown names are kept verbatim.
    pub fn resolve(&self, vars: &ToolVars) -> Vec<String> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$([A-Z_]+)").unwrap());

        self.0
            .iter()
            .map(|arg| {
                re.replace_all(arg, |caps: &Captures| match vars.get(&caps[1]) {
                    Some(value) => value.clone(),
                    None => caps[0].to_string(),
                })
                .into_owned()
            })
            .collect()
    }

    /// Fail early if the program cannot be found on `PATH`.
    pub fn ensure_installed(&self) -> Result<()> {
        if self.is_empty() {
            bail!("no command configured");
        }
        let program = self.program();
        if which::which(program).is_err() {
            bail!("`{program}` not found, install it or change the configured command");
        }
        Ok(())
    }

    /// Run once with `vars` substituted and wait for it to exit.
    pub fn invoke(&self, vars: &ToolVars) -> Result<ToolOutput, ToolError> {
        Cmd::from_slice(&self.resolve(vars)).output()
    }
}

// ============================================================================
// Tests
// ============================================================================
