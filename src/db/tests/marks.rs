//! Shared tests for MarkRepo implementations

use crate::{
    db::repos::MarkRepo,
    models::{CreateApprovalMark, CreateRelevanceMark, MarkTable, RawArticleId},
};

/// Test context containing the repo under test
pub struct MarkTestContext<'a> {
    pub mark_repo: &'a dyn MarkRepo,
}

impl<'a> MarkTestContext<'a> {
    pub async fn relevance(&self, article_id: i64, is_relevant: bool) {
        self.mark_repo
            .mark_relevance(CreateRelevanceMark {
                article_id,
                is_relevant,
            })
            .await
            .expect("Failed to create relevance mark");
    }

    pub async fn approve(&self, article_id: i64) {
        self.mark_repo
            .approve(CreateApprovalMark {
                article_id,
                approved_by: None,
            })
            .await
            .expect("Failed to create approval");
    }
}

fn parsed(raw: Vec<RawArticleId>) -> Vec<Option<i64>> {
    let mut ids: Vec<_> = raw.iter().map(RawArticleId::parse).collect();
    ids.sort();
    ids
}

// ============================================================================
// Create Tests
// ============================================================================

pub async fn test_mark_relevance(ctx: &MarkTestContext<'_>) {
    let mark = ctx
        .mark_repo
        .mark_relevance(CreateRelevanceMark {
            article_id: 7,
            is_relevant: false,
        })
        .await
        .expect("mark");

    assert!(mark.id > 0);
    assert_eq!(mark.article_id, 7);
    assert!(!mark.is_relevant);
}

pub async fn test_approve(ctx: &MarkTestContext<'_>) {
    let approval = ctx
        .mark_repo
        .approve(CreateApprovalMark {
            article_id: 11,
            approved_by: Some("desk@example.com".to_string()),
        })
        .await
        .expect("approve");

    assert!(approval.id > 0);
    assert_eq!(approval.article_id, 11);
    assert_eq!(approval.approved_by.as_deref(), Some("desk@example.com"));
}

// ============================================================================
// List Tests
// ============================================================================

pub async fn test_list_article_ids_empty(ctx: &MarkTestContext<'_>) {
    for table in MarkTable::ALL {
        let ids = ctx.mark_repo.list_article_ids(table).await.unwrap();
        assert!(ids.is_empty(), "{table} should be empty");
    }
}

pub async fn test_list_article_ids_per_table(ctx: &MarkTestContext<'_>) {
    ctx.relevance(3, true).await;
    ctx.relevance(1, false).await;
    ctx.approve(2).await;
    ctx.approve(2).await;

    let relevance = ctx
        .mark_repo
        .list_article_ids(MarkTable::Relevance)
        .await
        .unwrap();
    assert_eq!(parsed(relevance), vec![Some(1), Some(3)]);

    let approvals = ctx
        .mark_repo
        .list_article_ids(MarkTable::Approval)
        .await
        .unwrap();
    assert_eq!(parsed(approvals), vec![Some(2), Some(2)], "one entry per row");
}

// ============================================================================
// Count Tests
// ============================================================================

pub async fn test_count_distinct(ctx: &MarkTestContext<'_>) {
    assert_eq!(ctx.mark_repo.count_distinct_irrelevant().await.unwrap(), 0);
    assert_eq!(ctx.mark_repo.count_distinct_approved().await.unwrap(), 0);

    ctx.relevance(1, false).await;
    ctx.relevance(1, false).await;
    ctx.relevance(2, false).await;
    ctx.relevance(3, true).await;
    ctx.approve(4).await;
    ctx.approve(4).await;
    ctx.approve(5).await;

    assert_eq!(ctx.mark_repo.count_distinct_irrelevant().await.unwrap(), 2);
    assert_eq!(ctx.mark_repo.count_distinct_approved().await.unwrap(), 2);
}

// ============================================================================
// SQLite Tests - Fast, in-memory
// ============================================================================

#[cfg(all(test, feature = "database-sqlite"))]
mod sqlite_tests {
    use super::*;
    use crate::db::{
        sqlite::SqliteMarkRepo,
        tests::harness::{create_sqlite_pool, insert_raw_mark, run_sqlite_migrations},
    };

    async fn create_repo() -> (SqliteMarkRepo, sqlx::SqlitePool) {
        let pool = create_sqlite_pool().await;
        run_sqlite_migrations(&pool).await;
        (SqliteMarkRepo::new(pool.clone()), pool)
    }

    macro_rules! sqlite_test {
        ($name:ident) => {
            #[tokio::test]
            async fn $name() {
                let (mark_repo, _pool) = create_repo().await;
                let ctx = MarkTestContext {
                    mark_repo: &mark_repo,
                };
                super::$name(&ctx).await;
            }
        };
    }

    // Create tests
    sqlite_test!(test_mark_relevance);
    sqlite_test!(test_approve);

    // List tests
    sqlite_test!(test_list_article_ids_empty);
    sqlite_test!(test_list_article_ids_per_table);

    // Count tests
    sqlite_test!(test_count_distinct);

    #[tokio::test]
    async fn test_list_article_ids_surfaces_malformed_rows() {
        let (repo, pool) = create_repo().await;
        insert_raw_mark(&pool, "article_approvals", Some("12")).await;
        insert_raw_mark(&pool, "article_approvals", Some("not-an-id")).await;
        insert_raw_mark(&pool, "article_approvals", None).await;

        let raw = repo.list_article_ids(MarkTable::Approval).await.unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(parsed(raw), vec![None, None, Some(12)]);
    }
}
