//! Forget command implementation.

use super::with_store;
use crate::cli::ForgetArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lexcheck_domain::traits::StatuteStore;
use lexcheck_domain::DocumentId;
use lexcheck_extractor::Extractor;
use lexcheck_store::SqliteStore;
use lexcheck_verify::StatuteSource;
use std::io::{self, Write};

/// Execute the forget command.
pub fn execute_forget<S: StatuteSource>(
    args: ForgetArgs,
    extractor: &Extractor<S, SqliteStore>,
    formatter: &Formatter,
) -> Result<()> {
    let document_id = DocumentId::new(args.document);

    let records = with_store(extractor, |store| {
        if !store.document_exists(document_id)? {
            return Ok(None);
        }
        store.list_by_document(document_id).map(Some)
    })?
    .ok_or_else(|| CliError::NotFound(format!("document {}", document_id)))?;

    // Confirm deletion unless --yes is specified
    if !args.yes {
        println!(
            "About to delete document {} and {} statute record(s):",
            document_id,
            records.len()
        );
        for record in &records {
            println!("  - {}", record.reference);
        }
        print!("Continue? [y/N] ");
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    let removed = forget_document(extractor, document_id)?;
    println!(
        "{}",
        formatter.success(&format!(
            "Deleted document {} and {} statute record(s)",
            document_id, removed
        ))
    );

    Ok(())
}

/// Delete a document and its records, returning how many records went with it.
fn forget_document<S: StatuteSource>(
    extractor: &Extractor<S, SqliteStore>,
    document_id: DocumentId,
) -> Result<usize> {
    with_store(extractor, |store| store.delete_document(document_id))
}
