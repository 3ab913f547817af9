//! Line-oriented command loop over a loaded [`Session`].
//!
//! Every line is either a control command (English or Russian spelling) or a
//! search term; the empty line is a search for everything.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::warn;

use crate::{
    error::PriceError,
    export,
    query::Session,
    table,
};

pub const HELP_TEXT: &str = "\
Commands (English or Russian):
  exit    | выход    - leave the program
  export  | экспорт  - save the last search result as an HTML report
  help    | помощь   - show this help
Anything else is searched for in item names.
Press Enter on an empty line to list every item.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Export,
    Exit,
    Search(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "exit" | "выход" => Command::Exit,
            "export" | "экспорт" => Command::Export,
            "help" | "помощь" => Command::Help,
            _ => Command::Search(line.to_string()),
        }
    }
}

/// Runs the loop until `exit` or end of input.
pub fn run<R, W>(session: &mut Session, mut input: R, mut output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "Type 'help' for the list of commands.")?;
    loop {
        let Some(line) = prompt(&mut input, &mut output, "Item to search: ")? else {
            break;
        };
        match Command::parse(&line) {
            Command::Exit => break,
            Command::Help => writeln!(output, "{HELP_TEXT}")?,
            Command::Export => {
                let name = prompt(&mut input, &mut output, "Report file name: ")?;
                handle_export(session, name.as_deref(), &mut output)?;
            }
            Command::Search(term) => handle_search(session, &term, &mut output)?,
        }
    }
    writeln!(output, "Search finished")?;
    Ok(())
}

fn prompt<R, W>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Reading command")?;
    if read == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}

pub fn handle_search<W: Write>(session: &mut Session, term: &str, output: &mut W) -> Result<()> {
    match session.search(term) {
        Ok(result) if result.is_empty() => writeln!(output, "No matching items found")?,
        Ok(result) => write!(output, "{}", table::render_result_set(result))?,
        Err(err @ PriceError::UninitializedCatalog) => writeln!(output, "error: {err}")?,
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub fn handle_export<W: Write>(
    session: &Session,
    name: Option<&str>,
    output: &mut W,
) -> Result<()> {
    let Some(result) = session.last_result() else {
        writeln!(output, "error: {}", PriceError::NothingToExport)?;
        return Ok(());
    };
    let target = export::resolve_target(name);
    match export::export(result, &target) {
        Ok(path) => writeln!(output, "Export finished: {}", path.display())?,
        Err(err) => {
            warn!("Export to {target:?} failed: {err}");
            writeln!(output, "error: {err}")?;
        }
    }
    Ok(())
}
