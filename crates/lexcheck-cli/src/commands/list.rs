//! List and show command implementations.

use super::with_store;
use crate::cli::{ListArgs, ShowArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use lexcheck_domain::traits::{StatuteQuery, StatuteStore};
use lexcheck_domain::{DocumentId, StatuteId, StatuteRecord};
use lexcheck_extractor::Extractor;
use lexcheck_store::SqliteStore;
use lexcheck_verify::StatuteSource;

/// Execute the list command.
pub fn execute_list<S: StatuteSource>(
    args: ListArgs,
    extractor: &Extractor<S, SqliteStore>,
    formatter: &Formatter,
) -> Result<()> {
    let query = build_query(&args);
    let (records, total) =
        with_store(extractor, |store| Ok((store.query(&query)?, store.count(&query)?)))?;

    println!("{}", formatter.format_statutes(&records)?);
    if query.is_paginated() && records.len() < total {
        eprintln!(
            "{}",
            formatter.info(&format!(
                "Page {} of {} ({} records)",
                query.page(),
                total.div_ceil(query.per_page()),
                total
            ))
        );
    }
    Ok(())
}

/// Execute the show command.
pub fn execute_show<S: StatuteSource>(
    args: ShowArgs,
    extractor: &Extractor<S, SqliteStore>,
    formatter: &Formatter,
) -> Result<()> {
    let record = find_record(extractor, args.id)?;
    println!("{}", formatter.format_statute(&record)?);
    Ok(())
}

/// Translate list arguments into a store query.
fn build_query(args: &ListArgs) -> StatuteQuery {
    StatuteQuery {
        document_id: args.document.map(DocumentId::new),
        is_current: args.outdated.then_some(false),
        status: args.status.map(Into::into),
        page: args.page,
        per_page: args.per_page,
    }
}

/// Look up one record by storage ID.
pub(crate) fn find_record<S: StatuteSource>(
    extractor: &Extractor<S, SqliteStore>,
    id: i64,
) -> Result<StatuteRecord> {
    with_store(extractor, |store| store.get(StatuteId::new(id)))?
        .ok_or_else(|| CliError::NotFound(format!("statute record {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::StatusArg;
    use crate::commands::testing::create_test_extractor;
    use lexcheck_domain::VerificationStatus;
    use lexcheck_extractor::ExtractionRequest;
    use lexcheck_verify::MockSource;

    fn list_args() -> ListArgs {
        ListArgs {
            document: None,
            outdated: false,
            status: None,
            page: None,
            per_page: None,
        }
    }

    #[test]
    fn test_build_query() {
        let query = build_query(&list_args());
        assert_eq!(query.document_id, None);
        assert_eq!(query.is_current, None);
        assert!(!query.is_paginated());

        let query = build_query(&ListArgs {
            document: Some(2),
            outdated: true,
            page: Some(3),
            ..list_args()
        });
        assert_eq!(query.document_id, Some(DocumentId::new(2)));
        assert_eq!(query.is_current, Some(false));
        assert_eq!(query.page(), 3);

        let query = build_query(&ListArgs {
            status: Some(StatusArg::Unresolved),
            ..list_args()
        });
        assert_eq!(query.status, Some(VerificationStatus::Unresolved));
    }

    #[tokio::test]
    async fn test_outdated_filter_and_show() {
        let source = MockSource::new();
        source.respond("78 Stat. 241", false);
        let extractor = create_test_extractor(source);

        let document = DocumentId::new(1);
        with_store(&extractor, |store| store.ensure_document(document, "act.txt")).unwrap();
        extractor
            .extract(ExtractionRequest {
                document_id: document,
                text: "Enacted as Pub. L. No. 88-352, 78 Stat. 241.".to_string(),
            })
            .await
            .unwrap();

        let query = build_query(&ListArgs {
            outdated: true,
            ..list_args()
        });
        let outdated = with_store(&extractor, |store| store.query(&query)).unwrap();
        assert_eq!(outdated.len(), 1);
        assert_eq!(outdated[0].reference, "78 Stat. 241");

        let record = find_record(&extractor, outdated[0].id.value()).unwrap();
        assert_eq!(record.status, VerificationStatus::Outdated);

        assert!(matches!(
            find_record(&extractor, 999),
            Err(CliError::NotFound(_))
        ));
    }
}
