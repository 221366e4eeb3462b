//! Verify command implementation.

use crate::cli::VerifyArgs;
use crate::error::Result;
use crate::output::Formatter;
use lexcheck_domain::StatuteId;
use lexcheck_extractor::Extractor;
use lexcheck_store::SqliteStore;
use lexcheck_verify::StatuteSource;

/// Execute the verify command.
///
/// A failed lookup is reported but keeps the record's previous status.
pub async fn execute_verify<S: StatuteSource>(
    args: VerifyArgs,
    extractor: &Extractor<S, SqliteStore>,
    formatter: &Formatter,
) -> Result<()> {
    let outcome = extractor.reverify_by_id(StatuteId::new(args.id)).await?;
    println!("{}", formatter.format_reverify(&outcome)?);
    Ok(())
}
