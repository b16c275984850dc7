use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use quill::domain::attachments::Attachment;

use crate::client::CliError;

pub fn read_opt_value(
    val: Option<String>,
    file: Option<PathBuf>,
) -> Result<Option<String>, CliError> {
    if let Some(path) = file {
        let data = fs::read_to_string(&path).map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        })?;
        return Ok(Some(data));
    }
    Ok(val)
}

pub async fn read_attachment(path: Option<&Path>) -> Result<Option<Attachment>, CliError> {
    match path {
        Some(path) => Attachment::read(path)
            .await
            .map(Some)
            .map_err(|source| CliError::InputFile {
                path: path.display().to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Ask `prompt` on stderr and read a y/N answer from `input`. Anything but an
/// explicit yes declines.
pub fn confirm_with(prompt: &str, input: &mut impl BufRead) -> Result<bool, CliError> {
    eprint!("{prompt} [y/N] ");
    io::stderr()
        .flush()
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, CliError> {
    if assume_yes {
        return Ok(true);
    }
    confirm_with(prompt, &mut io::stdin().lock())
}

pub fn read_secret(prompt: &str) -> Result<String, CliError> {
    eprint!("{prompt}: ");
    io::stderr()
        .flush()
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
