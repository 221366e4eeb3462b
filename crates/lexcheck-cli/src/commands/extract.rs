//! Extract command implementation.

use super::with_store;
use crate::cli::ExtractArgs;
use crate::error::Result;
use crate::output::Formatter;
use lexcheck_domain::traits::StatuteStore;
use lexcheck_domain::DocumentId;
use lexcheck_extractor::{ExtractionResult, Extractor};
use lexcheck_store::SqliteStore;
use lexcheck_verify::StatuteSource;
use std::fs;
use std::path::Path;

/// Execute the extract command.
pub async fn execute_extract<S: StatuteSource>(
    args: ExtractArgs,
    extractor: &Extractor<S, SqliteStore>,
    formatter: &Formatter,
) -> Result<()> {
    let result = run_extract(&args, extractor).await?;
    println!("{}", formatter.format_extraction(&result)?);
    Ok(())
}

/// Register the document and run a pass over the file's text.
async fn run_extract<S: StatuteSource>(
    args: &ExtractArgs,
    extractor: &Extractor<S, SqliteStore>,
) -> Result<ExtractionResult> {
    let bytes = fs::read(&args.file)?;
    let document_id = DocumentId::new(args.document);
    let label = args
        .label
        .clone()
        .unwrap_or_else(|| file_label(&args.file));

    with_store(extractor, |store| store.ensure_document(document_id, &label))?;
    Ok(extractor.extract_bytes(document_id, &bytes).await?)
}

/// Label a document after its file name.
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
